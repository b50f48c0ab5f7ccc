//! `submit` and `reset`

use super::{CommandArgs, Flow, SessionHandler};
use crate::form::{BookingForm, SubmitOutcome};
use crate::page::{MemoryPage, Page};
use anyhow::Result;

#[derive(Debug)]
pub struct SubmitHandler;

impl SessionHandler for SubmitHandler {
    fn execute(&self, form: &mut BookingForm<MemoryPage>, args: &CommandArgs) -> Result<Flow> {
        if args.command == "reset" {
            form.reset_booking_form();
            println!("Form cleared.");
            return Ok(Flow::Continue);
        }

        match form.handle_submit() {
            SubmitOutcome::Accepted => {
                for message in form.page_mut().take_acknowledgments() {
                    println!("✅ {}", message);
                }
            }
            SubmitOutcome::Rejected { invalid, focused } => {
                println!("❌ Request not sent. Please fix:");
                for field in invalid {
                    let value = form.page().value(field.element_id()).unwrap_or_default();
                    if let Err(e) = field.check(&value) {
                        println!("   - {}", e);
                    }
                }
                if let Some(id) = focused {
                    println!("   (cursor moved to {})", id);
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn can_handle(&self, command: &str) -> bool {
        command == "submit" || command == "reset"
    }
}
