//! Booking window: which dates and times an appointment may be requested for.
//
// Dates are bounded below only. Times are kept on a fixed grid between the
// opening and closing time, inclusive.

use crate::config::WindowConfig;
use crate::page::{Page, DATE_INPUT_ID, TIME_INPUT_ID};
use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

// Seconds and fractions are tolerated and dropped
static TIME_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::\d{2}(?:\.\d{1,3})?)?$").expect("valid time value regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Malformed time value: '{0}' (expected HH:MM)")]
    MalformedTime(String),
    #[error("Invalid booking window: {0}")]
    InvalidWindow(String),
}

/// Earliest selectable date and the date preselected in the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub default: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWindow {
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    step_minutes: u32,
    min_date_offset_days: u32,
    default_date_offset_days: u32,
}

impl Default for BookingWindow {
    /// 09:00 to 21:00 in 15 minute steps, today selectable, tomorrow preselected
    fn default() -> Self {
        let config = WindowConfig::default();
        Self {
            opens_at: config.opens_at,
            closes_at: config.closes_at,
            step_minutes: config.step_minutes,
            min_date_offset_days: config.min_date_offset_days,
            default_date_offset_days: config.default_date_offset_days,
        }
    }
}

impl BookingWindow {
    pub fn new(config: &WindowConfig) -> Result<Self, ScheduleError> {
        let step = config.step_minutes;
        if step == 0 || step > 60 || 60 % step != 0 {
            return Err(ScheduleError::InvalidWindow(format!(
                "step of {} minutes does not divide an hour",
                step
            )));
        }
        if config.opens_at >= config.closes_at {
            return Err(ScheduleError::InvalidWindow(format!(
                "opening time {} is not before closing time {}",
                format_time(config.opens_at),
                format_time(config.closes_at)
            )));
        }
        for bound in [config.opens_at, config.closes_at] {
            if bound.second() != 0 || minutes_of_day(bound) % step != 0 {
                return Err(ScheduleError::InvalidWindow(format!(
                    "{} is not on the {} minute grid",
                    format_time(bound),
                    step
                )));
            }
        }

        Ok(Self {
            opens_at: config.opens_at,
            closes_at: config.closes_at,
            step_minutes: step,
            min_date_offset_days: config.min_date_offset_days,
            default_date_offset_days: config.default_date_offset_days,
        })
    }

    pub fn opens_at(&self) -> NaiveTime {
        self.opens_at
    }

    pub fn closes_at(&self) -> NaiveTime {
        self.closes_at
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    /// Step as a time input expects it, in seconds
    pub fn step_seconds(&self) -> u32 {
        self.step_minutes * 60
    }

    pub fn date_bounds(&self, today: NaiveDate) -> DateBounds {
        DateBounds {
            min: add_days(today, self.min_date_offset_days),
            default: add_days(today, self.default_date_offset_days),
        }
    }

    /// Round to the nearest grid slot (halves round up), then clamp into the window
    pub fn snap(&self, time: NaiveTime) -> NaiveTime {
        let step = self.step_minutes;
        let total = time.hour() * 60 + time.minute();
        let rounded = (2 * total + step) / (2 * step) * step;

        let snapped = rounded.clamp(minutes_of_day(self.opens_at), minutes_of_day(self.closes_at));
        NaiveTime::from_hms_opt(snapped / 60, snapped % 60, 0).unwrap_or(self.closes_at)
    }

    /// [`BookingWindow::snap`] over the text value of a time input
    pub fn snap_value(&self, raw: &str) -> Result<String, ScheduleError> {
        let time = parse_time_value(raw)?;
        Ok(format_time(self.snap(time)))
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time.second() == 0
            && time >= self.opens_at
            && time <= self.closes_at
            && minutes_of_day(time) % self.step_minutes == 0
    }

    /// Set the date picker's lower bound and preselect the default date.
    ///
    /// Returns `None` when the page has no date input.
    pub fn init_date_bounds<P: Page>(&self, page: &mut P, today: NaiveDate) -> Option<DateBounds> {
        if !page.has_element(DATE_INPUT_ID) {
            debug!("No #{} on page, skipping date bounds", DATE_INPUT_ID);
            return None;
        }

        let bounds = self.date_bounds(today);
        page.set_attribute(DATE_INPUT_ID, "min", &format_date(bounds.min));
        page.set_value(DATE_INPUT_ID, &format_date(bounds.default));
        debug!("Date bounds: min {} default {}", bounds.min, bounds.default);
        Some(bounds)
    }

    /// Set the time picker's range and step, defaulting an empty value to the
    /// opening time. Returns `false` when the page has no time input.
    pub fn init_time_bounds<P: Page>(&self, page: &mut P) -> bool {
        if !page.has_element(TIME_INPUT_ID) {
            debug!("No #{} on page, skipping time bounds", TIME_INPUT_ID);
            return false;
        }

        page.set_attribute(TIME_INPUT_ID, "min", &format_time(self.opens_at));
        page.set_attribute(TIME_INPUT_ID, "max", &format_time(self.closes_at));
        page.set_attribute(TIME_INPUT_ID, "step", &self.step_seconds().to_string());

        if page.value(TIME_INPUT_ID).unwrap_or_default().is_empty() {
            page.set_value(TIME_INPUT_ID, &format_time(self.opens_at));
        }
        true
    }

    /// Change handler for the time input: snap the committed value in place.
    ///
    /// Empty or unparseable values are left as they are.
    pub fn apply_time_change<P: Page>(&self, page: &mut P) -> Option<String> {
        let current = page.value(TIME_INPUT_ID)?;
        if current.trim().is_empty() {
            return None;
        }

        match self.snap_value(&current) {
            Ok(snapped) => {
                if snapped != current {
                    debug!("Snapped time {} -> {}", current, snapped);
                    page.set_value(TIME_INPUT_ID, &snapped);
                }
                Some(snapped)
            }
            Err(e) => {
                warn!("Leaving time input unchanged: {}", e);
                None
            }
        }
    }
}

/// Snap a time value against the default 09:00-21:00 window
pub fn snap_time(raw: &str) -> Result<String, ScheduleError> {
    BookingWindow::default().snap_value(raw)
}

/// Parse the value of a time input (`H:MM`, `HH:MM`, `HH:MM:SS[.fff]`)
pub fn parse_time_value(raw: &str) -> Result<NaiveTime, ScheduleError> {
    let trimmed = raw.trim();
    let malformed = || ScheduleError::MalformedTime(raw.to_string());

    let caps = TIME_VALUE_RE.captures(trimmed).ok_or_else(malformed)?;
    let hour: u32 = caps[1].parse().map_err(|_| malformed())?;
    let minute: u32 = caps[2].parse().map_err(|_| malformed())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(malformed)
}

pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days))).unwrap_or(NaiveDate::MAX)
}
