pub mod cli;
pub mod commands;
pub mod config;
pub mod form;
pub mod page;
pub mod schedule;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use form::{initialize, BookingForm, SubmitOutcome, Wiring};
pub use page::{MemoryPage, Page};
pub use schedule::{snap_time, BookingWindow, DateBounds, ScheduleError};
pub use validation::{FieldId, FieldInvalid};
