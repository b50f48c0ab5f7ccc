//! Help for the interactive session

use super::{CommandArgs, Flow, SessionHandler};
use crate::form::BookingForm;
use crate::page::MemoryPage;
use anyhow::Result;

#[derive(Debug)]
pub struct HelpHandler;

impl SessionHandler for HelpHandler {
    fn execute(&self, _form: &mut BookingForm<MemoryPage>, _args: &CommandArgs) -> Result<Flow> {
        print_help();
        Ok(Flow::Continue)
    }

    fn can_handle(&self, command: &str) -> bool {
        command == "help" || command == "--help" || command == "-h"
    }
}

fn print_help() {
    println!("bookform - fill in the appointment request form");
    println!();
    println!("COMMANDS:");
    println!("  set <field> <value>  Type a value into fullName, mobile or email");
    println!("  blur <field>         Leave a field without changing it");
    println!("  date <YYYY-MM-DD>    Pick the appointment date");
    println!("  time <HH:MM>         Pick the appointment time (snapped to 15 minutes)");
    println!("  submit               Send the request");
    println!("  reset                Clear the form");
    println!("  show                 Show the form");
    println!("  help                 Show this help message");
    println!("  exit                 Exit the session");
    println!();
    println!("EXAMPLES:");
    println!("  set fullName \"John Doe\"");
    println!("  set mobile 9876543210");
    println!("  time 14:20");
}
