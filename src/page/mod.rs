//! Page abstraction for the booking form
//!
//! The form rules never touch a concrete DOM. They address elements by id
//! through the [`Page`] trait, which is implemented by an in-memory model
//! (tests, terminal sessions) and, with the `web` feature, by the browser DOM.

use serde::Serialize;

mod memory;
#[cfg(feature = "web")]
pub mod web;

pub use memory::*;

/// Element ids the booking page is expected to expose
pub const DATE_INPUT_ID: &str = "appointmentDate";
pub const TIME_INPUT_ID: &str = "appointmentTime";
pub const FORM_ID: &str = "appointmentForm";

/// How an element should be brought into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollOptions {
    pub smooth: bool,
    pub block: ScrollBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

impl ScrollOptions {
    /// Smooth scroll that leaves the element vertically centered
    pub fn centered() -> Self {
        Self { smooth: true, block: ScrollBlock::Center }
    }
}

/// Element access by id.
///
/// Mutators return `false` when the element does not exist; callers treat a
/// missing element as a silent no-op.
pub trait Page {
    fn has_element(&self, id: &str) -> bool;

    /// Current value of an input, `None` when the element is missing
    fn value(&self, id: &str) -> Option<String>;

    fn set_value(&mut self, id: &str, value: &str) -> bool;

    fn attribute(&self, id: &str, name: &str) -> Option<String>;

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> bool;

    fn has_class(&self, id: &str, class: &str) -> bool;

    /// Add (`on = true`) or remove a class
    fn set_class(&mut self, id: &str, class: &str, on: bool) -> bool;

    /// Id of the first element, in document order, inside `scope_id` that carries `class`
    fn first_with_class(&self, scope_id: &str, class: &str) -> Option<String>;

    fn focus(&mut self, id: &str) -> bool;

    fn scroll_into_view(&mut self, id: &str, options: ScrollOptions) -> bool;

    /// Restore every control of a form to its empty value
    fn reset_form(&mut self, form_id: &str) -> bool;

    /// Blocking notice shown to the user
    fn acknowledge(&mut self, message: &str);
}
