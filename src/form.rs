//! Booking form handlers
//!
//! [`BookingForm`] reacts to the three events the page produces: a field
//! losing focus, the time input committing a new value, and a submit
//! request. It keeps no copy of any field value; every check reads the page
//! at the moment it runs.

use crate::config::{Config, FeedbackConfig};
use crate::page::{Page, ScrollOptions, DATE_INPUT_ID, FORM_ID, TIME_INPUT_ID};
use crate::schedule::{BookingWindow, DateBounds, ScheduleError};
use crate::validation::{FieldId, FieldInvalid};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Rejected,
    Accepted,
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormState::Editing => "editing",
            FormState::Submitting => "submitting",
            FormState::Rejected => "rejected",
            FormState::Accepted => "accepted",
        };
        f.write_str(name)
    }
}

/// Result of a submit request. Either way the form is back to editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SubmitOutcome {
    Accepted,
    Rejected {
        invalid: Vec<FieldId>,
        /// Element that received focus
        focused: Option<String>,
    },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

/// Which parts of the booking markup were found during initialization,
/// and therefore which event handlers the host should attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wiring {
    pub date_bounds: Option<DateBounds>,
    /// Time input present: attach the change handler
    pub time_bounds: bool,
    /// Form present: attach the blur and submit handlers
    pub form: bool,
}

#[derive(Debug, Clone)]
pub struct BookingForm<P: Page> {
    page: P,
    window: BookingWindow,
    feedback: FeedbackConfig,
    today: Option<NaiveDate>,
}

impl<P: Page> BookingForm<P> {
    pub fn new(page: P, window: BookingWindow, feedback: FeedbackConfig) -> Self {
        Self { page, window, feedback, today: None }
    }

    pub fn from_config(page: P, config: &Config) -> Result<Self, ScheduleError> {
        let window = BookingWindow::new(&config.window)?;
        Ok(Self::new(page, window, config.feedback.clone()))
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn into_page(self) -> P {
        self.page
    }

    pub fn window(&self) -> &BookingWindow {
        &self.window
    }

    pub fn feedback(&self) -> &FeedbackConfig {
        &self.feedback
    }

    /// Apply date and time bounds and report what the page offers
    pub fn initialize(&mut self) -> Wiring {
        let today = self.today();
        let date_bounds = self.window.init_date_bounds(&mut self.page, today);
        let time_bounds = self.window.init_time_bounds(&mut self.page);
        let form = self.page.has_element(FORM_ID);
        if !form {
            debug!("No #{} on page, form handlers not attached", FORM_ID);
        }

        Wiring { date_bounds, time_bounds, form }
    }

    /// A field lost focus. Only that field's marker is updated.
    ///
    /// Returns `None` for fields without a rule, whose marker is cleared.
    pub fn handle_blur(&mut self, element_id: &str) -> Option<Result<(), FieldInvalid>> {
        if element_id.is_empty() {
            return None;
        }

        let Some(field) = FieldId::from_element_id(element_id) else {
            self.page.set_class(element_id, &self.feedback.invalid_class, false);
            return None;
        };

        let value = self.page.value(element_id).unwrap_or_default();
        let result = field.check(&value);
        self.mark(field, result.is_ok());
        Some(result)
    }

    pub fn handle_time_change(&mut self) -> Option<String> {
        self.window.apply_time_change(&mut self.page)
    }

    /// Re-check every monitored field and either accept the request or send
    /// the user to the first invalid field
    pub fn handle_submit(&mut self) -> SubmitOutcome {
        debug!("Form state: {} -> {}", FormState::Editing, FormState::Submitting);

        let mut invalid = Vec::new();
        for field in FieldId::ALL {
            let Some(value) = self.page.value(field.element_id()) else {
                warn!("#{} missing at submit, skipping its check", field);
                continue;
            };
            let valid = field.validate(&value);
            self.mark(field, valid);
            if !valid {
                invalid.push(field);
            }
        }

        let outcome = if invalid.is_empty() {
            let acknowledgment = self.feedback.acknowledgment.clone();
            self.page.acknowledge(&acknowledgment);
            self.reset_booking_form();
            info!("Appointment request accepted");
            SubmitOutcome::Accepted
        } else {
            let focused = self
                .page
                .first_with_class(FORM_ID, &self.feedback.invalid_class)
                .or_else(|| invalid.first().map(|f| f.element_id().to_string()));
            if let Some(id) = &focused {
                self.page.scroll_into_view(id, ScrollOptions::centered());
                self.page.focus(id);
            }
            info!("Appointment request rejected, invalid fields: {:?}", invalid);
            SubmitOutcome::Rejected { invalid, focused }
        };

        let reached = if outcome.is_accepted() { FormState::Accepted } else { FormState::Rejected };
        debug!("Form state: {} -> {} -> {}", FormState::Submitting, reached, FormState::Editing);
        outcome
    }

    /// Clear every field and markers, then restore the date and time defaults
    pub fn reset_booking_form(&mut self) {
        if !self.page.reset_form(FORM_ID) {
            debug!("No #{} to reset, clearing fields one by one", FORM_ID);
        }
        for field in FieldId::ALL {
            self.page.set_value(field.element_id(), "");
            self.mark(field, true);
        }
        self.page.set_value(DATE_INPUT_ID, "");
        self.page.set_value(TIME_INPUT_ID, "");

        let today = self.today();
        self.window.init_date_bounds(&mut self.page, today);
        self.window.init_time_bounds(&mut self.page);
    }

    fn mark(&mut self, field: FieldId, valid: bool) {
        self.page.set_class(field.element_id(), &self.feedback.invalid_class, !valid);
    }
}

/// Build a form from the config and run date and time initialization once
pub fn initialize<P: Page>(
    page: P,
    config: &Config,
) -> Result<(BookingForm<P>, Wiring), ScheduleError> {
    let mut form = BookingForm::from_config(page, config)?;
    let wiring = form.initialize();
    Ok((form, wiring))
}
