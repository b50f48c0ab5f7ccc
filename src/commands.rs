//! One-shot commands
//
// Each command prints its result and reports whether it succeeded so the
// binary can set the exit status.

use crate::cli::{Commands, ConfigActions, SubmitArgs};
use crate::config::{get_config_path, Config};
use crate::form::{BookingForm, SubmitOutcome};
use crate::page::{MemoryPage, Page, DATE_INPUT_ID, TIME_INPUT_ID};
use crate::schedule::{format_date, format_time, parse_date_value, BookingWindow};
use crate::validation::{trim_value, FieldId};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use log::info;
use serde::Serialize;

/// Contact and scheduling values as they stood when the request was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRequest {
    pub full_name: String,
    pub mobile: String,
    pub email: String,
    pub date: String,
    pub time: String,
}

impl AppointmentRequest {
    fn read<P: Page>(page: &P) -> Self {
        let read = |id: &str| page.value(id).unwrap_or_default();
        Self {
            full_name: read(FieldId::FullName.element_id()),
            mobile: read(FieldId::Mobile.element_id()),
            email: read(FieldId::Email.element_id()),
            date: read(DATE_INPUT_ID),
            time: read(TIME_INPUT_ID),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitReport {
    pub request: AppointmentRequest,
    #[serde(flatten)]
    pub outcome: SubmitOutcome,
    pub page: MemoryPage,
}

/// Run a one-shot command. `Ok(false)` means the command ran but the input was rejected.
pub fn run(command: Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Snap { time } => {
            let window = BookingWindow::new(&config.window)?;
            println!("{}", window.snap_value(&time)?);
            Ok(true)
        }
        Commands::Check { field, value } => check_field(&field, &value),
        Commands::Window { today } => {
            let today = match today {
                Some(raw) => parse_date_value(&raw)
                    .ok_or_else(|| anyhow!("Invalid date '{}'. Expected YYYY-MM-DD", raw))?,
                None => Local::now().date_naive(),
            };
            show_window(config, today)?;
            Ok(true)
        }
        Commands::Submit(args) => {
            let report = submit(SubmitValues::from(&args), config, Local::now().date_naive())?;
            print_report(&report, args.json)?;
            Ok(report.outcome.is_accepted())
        }
        Commands::Config { action } => {
            handle_config(action, config)?;
            Ok(true)
        }
    }
}

fn check_field(name: &str, value: &str) -> Result<bool> {
    let field: FieldId = name.parse()?;
    match field.check(value) {
        Ok(()) => {
            println!("✅ {} is valid", field);
            Ok(true)
        }
        Err(e) => {
            println!("❌ {}", e);
            Ok(false)
        }
    }
}

fn show_window(config: &Config, today: NaiveDate) -> Result<()> {
    let window = BookingWindow::new(&config.window)?;
    let bounds = window.date_bounds(today);
    println!("Earliest selectable date: {}", format_date(bounds.min));
    println!("Preselected date:         {}", format_date(bounds.default));
    println!(
        "Booking hours:            {} - {} every {} minutes",
        format_time(window.opens_at()),
        format_time(window.closes_at()),
        window.step_minutes()
    );
    Ok(())
}

/// Values typed into a fresh booking page before submitting
#[derive(Debug, Clone, Default)]
pub struct SubmitValues {
    pub full_name: String,
    pub mobile: String,
    pub email: String,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl From<&SubmitArgs> for SubmitValues {
    fn from(args: &SubmitArgs) -> Self {
        Self {
            full_name: args.full_name.clone(),
            mobile: args.mobile.clone(),
            email: args.email.clone(),
            date: args.date.clone(),
            time: args.time.clone(),
        }
    }
}

/// Fill a fresh booking page the way a user would and submit it
pub fn submit(values: SubmitValues, config: &Config, today: NaiveDate) -> Result<SubmitReport> {
    let mut form = BookingForm::from_config(MemoryPage::booking_page(), config)?.with_today(today);
    form.initialize();

    if let Some(raw) = values.date.as_deref() {
        let date = parse_date_value(raw)
            .ok_or_else(|| anyhow!("Invalid date '{}'. Expected YYYY-MM-DD", raw))?;
        let earliest = form.window().date_bounds(today).min;
        if date < earliest {
            return Err(anyhow!("Earliest selectable date is {}", format_date(earliest)));
        }
        form.page_mut().set_value(DATE_INPUT_ID, &format_date(date));
    }
    if let Some(raw) = values.time.as_deref() {
        form.page_mut().set_value(TIME_INPUT_ID, raw);
        form.handle_time_change()
            .with_context(|| format!("Invalid time '{}'. Expected HH:MM", raw))?;
    }

    let entries = [
        (FieldId::FullName, values.full_name),
        (FieldId::Mobile, values.mobile),
        (FieldId::Email, values.email),
    ];
    for (field, value) in entries {
        form.page_mut().set_value(field.element_id(), &value);
        form.handle_blur(field.element_id());
    }

    let request = AppointmentRequest::read(form.page());
    let outcome = form.handle_submit();
    info!("Submitted request for {} at {}: {:?}", request.date, request.time, outcome);

    Ok(SubmitReport { request, outcome, page: form.into_page() })
}

fn print_report(report: &SubmitReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match &report.outcome {
        SubmitOutcome::Accepted => {
            for message in report.page.acknowledgments() {
                println!("✅ {}", message);
            }
            println!("   Name:   {}", trim_value(&report.request.full_name));
            println!("   Mobile: {}", report.request.mobile);
            if !trim_value(&report.request.email).is_empty() {
                println!("   Email:  {}", report.request.email);
            }
            println!("   When:   {} at {}", report.request.date, report.request.time);
        }
        SubmitOutcome::Rejected { invalid, .. } => {
            println!("❌ Request not sent. Please fix:");
            for field in invalid {
                let value = report.page.value(field.element_id()).unwrap_or_default();
                if let Err(e) = field.check(&value) {
                    println!("   - {}", e);
                }
            }
        }
    }
    Ok(())
}

fn handle_config(action: ConfigActions, config: &Config) -> Result<()> {
    match action {
        ConfigActions::Show => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigActions::Path => {
            println!("{}", get_config_path()?.display());
        }
        ConfigActions::Init { force } => {
            let path = get_config_path()?;
            if path.exists() && !force {
                println!("Config already exists at {} (use --force to overwrite)", path.display());
                return Ok(());
            }
            let written = Config::default().save()?;
            println!("Wrote default config to {}", written.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
    }

    fn values(full_name: &str, mobile: &str, email: &str) -> SubmitValues {
        SubmitValues {
            full_name: full_name.to_string(),
            mobile: mobile.to_string(),
            email: email.to_string(),
            ..SubmitValues::default()
        }
    }

    #[test]
    fn test_submit_accepted_reports_request_before_reset() -> Result<()> {
        let mut input = values("John Doe", "9876543210", "");
        input.time = Some("16:38".to_string());
        let report = submit(input, &Config::default(), today())?;

        assert!(report.outcome.is_accepted());
        assert_eq!(
            report.request,
            AppointmentRequest {
                full_name: "John Doe".into(),
                mobile: "9876543210".into(),
                email: String::new(),
                date: "2025-04-15".into(),
                time: "16:45".into(),
            }
        );
        assert_eq!(report.page.value("fullName").as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn test_submit_rejected() -> Result<()> {
        let report = submit(values("Jo", "9876543210", ""), &Config::default(), today())?;
        assert_eq!(
            report.outcome,
            SubmitOutcome::Rejected {
                invalid: vec![FieldId::FullName],
                focused: Some("fullName".into()),
            }
        );
        Ok(())
    }

    #[test]
    fn test_submit_rejects_dates_before_window() {
        let mut input = values("John Doe", "9876543210", "");
        input.date = Some("2025-04-13".to_string());
        assert!(submit(input, &Config::default(), today()).is_err());

        let mut input = values("John Doe", "9876543210", "");
        input.time = Some("noon".to_string());
        assert!(submit(input, &Config::default(), today()).is_err());
    }

    #[test]
    fn test_report_serializes_outcome_inline() -> Result<()> {
        let report = submit(values("Jo", "1", ""), &Config::default(), today())?;
        let json = serde_json::to_value(&report)?;
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["invalid"], serde_json::json!(["fullName", "mobile"]));
        assert_eq!(json["request"]["full_name"], "Jo");
        Ok(())
    }

    #[test]
    fn test_check_field() -> Result<()> {
        assert!(check_field("mobile", "9876543210")?);
        assert!(!check_field("email", "a@b")?);
        assert!(check_field("address", "x").is_err());
        Ok(())
    }
}
