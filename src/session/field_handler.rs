//! Contact field commands: `set <field> <value>` and `blur <field>`

use super::{CommandArgs, Flow, SessionHandler};
use crate::form::BookingForm;
use crate::page::{MemoryPage, Page};
use crate::validation::FieldId;
use anyhow::{anyhow, Result};

#[derive(Debug)]
pub struct FieldHandler;

impl SessionHandler for FieldHandler {
    fn execute(&self, form: &mut BookingForm<MemoryPage>, args: &CommandArgs) -> Result<Flow> {
        let Some(name) = args.args.first() else {
            println!("Usage: {} <fullName|mobile|email> [value]", args.command);
            return Ok(Flow::Continue);
        };
        let field: FieldId = name.parse()?;

        if args.command == "set" {
            // Everything after the field name is the value
            let value = args.args[1..].join(" ");
            if !form.page_mut().set_value(field.element_id(), &value) {
                return Err(anyhow!("Field #{} is not on the page", field));
            }
        }

        // Typing a value ends with the field losing focus
        match form.handle_blur(field.element_id()) {
            Some(Ok(())) => println!("✅ {} looks good", field),
            Some(Err(e)) => println!("❌ {}", e),
            None => {}
        }
        Ok(Flow::Continue)
    }

    fn can_handle(&self, command: &str) -> bool {
        command == "set" || command == "blur"
    }
}
