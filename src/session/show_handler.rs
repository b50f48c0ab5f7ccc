//! `show`: print the current page state

use super::{CommandArgs, Flow, SessionHandler};
use crate::form::BookingForm;
use crate::page::{ElementKind, MemoryPage};
use crate::validation::FieldId;
use anyhow::Result;

#[derive(Debug)]
pub struct ShowHandler;

impl SessionHandler for ShowHandler {
    fn execute(&self, form: &mut BookingForm<MemoryPage>, _args: &CommandArgs) -> Result<Flow> {
        let invalid_class = form.feedback().invalid_class.clone();
        let page = form.page();
        println!();
        for element in page.elements().iter().filter(|e| e.kind.is_control()) {
            let marker = if element.classes.contains(&invalid_class) { "❌" } else { "  " };
            let focus = if page.focused() == Some(element.id.as_str()) { "▶" } else { " " };
            let required = FieldId::from_element_id(&element.id).is_some_and(|f| f.is_required());
            let label = if required { format!("{}*", element.id) } else { element.id.clone() };
            println!("{} {} {:<16} {}", focus, marker, label, element.value);
        }
        println!();
        Ok(Flow::Continue)
    }

    fn can_handle(&self, command: &str) -> bool {
        command == "show" || command == "status"
    }
}
