//! Interactive form session
//!
//! Drives a [`BookingForm`] over an in-memory page from typed commands, one
//! line per event, the way a user would fill in the page.

use crate::form::BookingForm;
use crate::page::MemoryPage;
use anyhow::{anyhow, Result};
use log::debug;
use std::fmt::Debug;

pub mod exit_handler;
pub mod field_handler;
pub mod help_handler;
pub mod schedule_handler;
pub mod show_handler;
pub mod submit_handler;

/// A parsed session line: command word and positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    pub command: String,
    pub args: Vec<String>,
}

impl CommandArgs {
    /// Split on whitespace, keeping double-quoted text together
    pub fn parse(input: &str) -> Result<Self> {
        let normalized_input = input.replace('\u{a0}', " ");

        let mut parts = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut quoted = false;
        let mut escaped = false;

        for c in normalized_input.trim().chars() {
            match c {
                '\\' if !escaped => {
                    escaped = true;
                }
                '"' if !escaped => {
                    in_quotes = !in_quotes;
                    quoted = true;
                }
                c if c.is_whitespace() && !in_quotes && !escaped => {
                    if !current.is_empty() || quoted {
                        parts.push(std::mem::take(&mut current));
                    }
                    quoted = false;
                }
                _ => {
                    if escaped && c != '"' && c != '\\' {
                        current.push('\\');
                    }
                    current.push(c);
                    escaped = false;
                }
            }
        }
        if in_quotes {
            return Err(anyhow!("Unterminated quote"));
        }
        if !current.is_empty() || quoted {
            parts.push(current);
        }

        if parts.is_empty() {
            return Err(anyhow!("No command provided"));
        }

        let command = parts.remove(0).to_lowercase();
        debug!("Parsed command: {:?}, args: {:?}", command, parts);
        Ok(CommandArgs { command, args: parts })
    }
}

/// Whether the session keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait SessionHandler: Debug {
    fn execute(&self, form: &mut BookingForm<MemoryPage>, args: &CommandArgs) -> Result<Flow>;
    fn can_handle(&self, command: &str) -> bool;
}

#[derive(Debug)]
pub struct Session {
    form: BookingForm<MemoryPage>,
    handlers: Vec<Box<dyn SessionHandler>>,
}

impl Session {
    pub fn new(form: BookingForm<MemoryPage>) -> Self {
        let handlers: Vec<Box<dyn SessionHandler>> = vec![
            Box::new(field_handler::FieldHandler),
            Box::new(schedule_handler::ScheduleHandler),
            Box::new(submit_handler::SubmitHandler),
            Box::new(show_handler::ShowHandler),
            Box::new(help_handler::HelpHandler),
            Box::new(exit_handler::ExitHandler),
        ];
        Self { form, handlers }
    }

    pub fn form(&self) -> &BookingForm<MemoryPage> {
        &self.form
    }

    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        let args = CommandArgs::parse(line)?;
        self.execute(args)
    }

    pub fn execute(&mut self, args: CommandArgs) -> Result<Flow> {
        for handler in &self.handlers {
            if handler.can_handle(&args.command) {
                debug!("Executing session command '{}' with {:?}", args.command, args.args);
                return handler.execute(&mut self.form, &args);
            }
        }
        println!("Unknown command '{}'. Type 'help' for available commands.", args.command);
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::page::Page;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        let today = NaiveDate::from_ymd_opt(2025, 4, 14).unwrap();
        let mut form = BookingForm::from_config(MemoryPage::booking_page(), &Config::default())
            .unwrap()
            .with_today(today);
        form.initialize();
        Session::new(form)
    }

    #[test]
    fn test_parse_quoted_arguments() {
        let args = CommandArgs::parse("SET fullName \"John  Doe\"").unwrap();
        assert_eq!(args.command, "set");
        assert_eq!(args.args, vec!["fullName".to_string(), "John  Doe".to_string()]);
    }

    #[test]
    fn test_parse_empty_quotes_is_empty_argument() {
        let args = CommandArgs::parse("set email \"\"").unwrap();
        assert_eq!(args.args, vec!["email".to_string(), String::new()]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(CommandArgs::parse("   ").is_err());
        assert!(CommandArgs::parse("set fullName \"John").is_err());
    }

    #[test]
    fn test_session_fills_and_submits() {
        let mut session = session();
        session.execute_line("set fullName \"John Doe\"").unwrap();
        session.execute_line("set mobile 9876543210").unwrap();
        session.execute_line("time 13:52").unwrap();
        assert_eq!(session.form().page().value("appointmentTime").as_deref(), Some("13:45"));

        assert_eq!(session.execute_line("submit").unwrap(), Flow::Continue);
        assert_eq!(session.form().page().value("fullName").as_deref(), Some(""));
        assert_eq!(session.form().page().value("appointmentTime").as_deref(), Some("09:00"));
    }

    #[test]
    fn test_set_marks_invalid_field() {
        let mut session = session();
        session.execute_line("set mobile 12345").unwrap();
        assert!(session.form().page().has_class("mobile", "is-invalid"));
    }

    #[test]
    fn test_exit_and_unknown() {
        let mut session = session();
        assert_eq!(session.execute_line("dance").unwrap(), Flow::Continue);
        assert_eq!(session.execute_line("").unwrap(), Flow::Continue);
        assert_eq!(session.execute_line("quit").unwrap(), Flow::Exit);
    }
}
