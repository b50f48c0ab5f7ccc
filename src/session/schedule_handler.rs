//! Date and time commands: `date <YYYY-MM-DD>` and `time <HH:MM>`

use super::{CommandArgs, Flow, SessionHandler};
use crate::form::BookingForm;
use crate::page::{MemoryPage, Page, DATE_INPUT_ID, TIME_INPUT_ID};
use crate::schedule::{format_date, parse_date_value};
use anyhow::{anyhow, Result};

#[derive(Debug)]
pub struct ScheduleHandler;

impl SessionHandler for ScheduleHandler {
    fn execute(&self, form: &mut BookingForm<MemoryPage>, args: &CommandArgs) -> Result<Flow> {
        let Some(value) = args.args.first() else {
            println!("Usage: date <YYYY-MM-DD> | time <HH:MM>");
            return Ok(Flow::Continue);
        };

        match args.command.as_str() {
            "date" => set_date(form, value)?,
            _ => set_time(form, value),
        }
        Ok(Flow::Continue)
    }

    fn can_handle(&self, command: &str) -> bool {
        command == "date" || command == "time"
    }
}

/// The date picker refuses dates before its lower bound
fn set_date(form: &mut BookingForm<MemoryPage>, value: &str) -> Result<()> {
    let date = parse_date_value(value)
        .ok_or_else(|| anyhow!("Invalid date '{}'. Expected YYYY-MM-DD", value))?;
    let earliest = form.window().date_bounds(form.today()).min;
    if date < earliest {
        println!("❌ Earliest selectable date is {}", format_date(earliest));
        return Ok(());
    }
    form.page_mut().set_value(DATE_INPUT_ID, &format_date(date));
    println!("📅 Date set to {}", format_date(date));
    Ok(())
}

fn set_time(form: &mut BookingForm<MemoryPage>, value: &str) {
    form.page_mut().set_value(TIME_INPUT_ID, value);
    match form.handle_time_change() {
        Some(snapped) if snapped != value => println!("🕘 Time snapped to {}", snapped),
        Some(snapped) => println!("🕘 Time set to {}", snapped),
        None => println!("⚠️  '{}' is not a time, left unchanged", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;

    fn form() -> BookingForm<MemoryPage> {
        let mut form = BookingForm::from_config(MemoryPage::booking_page(), &Config::default())
            .unwrap()
            .with_today(NaiveDate::from_ymd_opt(2025, 4, 14).unwrap());
        form.initialize();
        form
    }

    #[test]
    fn test_today_is_selectable_but_yesterday_is_not() {
        let mut form = form();
        set_date(&mut form, "2025-04-14").unwrap();
        assert_eq!(form.page().value(DATE_INPUT_ID).as_deref(), Some("2025-04-14"));

        set_date(&mut form, "2025-04-13").unwrap();
        assert_eq!(form.page().value(DATE_INPUT_ID).as_deref(), Some("2025-04-14"));

        assert!(set_date(&mut form, "14/04/2025").is_err());
    }

    #[test]
    fn test_time_is_snapped() {
        let mut form = form();
        set_time(&mut form, "07:30");
        assert_eq!(form.page().value(TIME_INPUT_ID).as_deref(), Some("09:00"));
    }
}
