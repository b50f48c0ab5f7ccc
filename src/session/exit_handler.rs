use super::{CommandArgs, Flow, SessionHandler};
use crate::form::BookingForm;
use crate::page::MemoryPage;
use anyhow::Result;

#[derive(Debug)]
pub struct ExitHandler;

impl SessionHandler for ExitHandler {
    fn execute(&self, _form: &mut BookingForm<MemoryPage>, _args: &CommandArgs) -> Result<Flow> {
        println!("Goodbye!");
        Ok(Flow::Exit)
    }

    fn can_handle(&self, command: &str) -> bool {
        command == "exit" || command == "quit"
    }
}
