//! In-memory page model
//
// Elements are kept in document order so "first invalid field" lookups match
// what a browser would return for the same markup.

use super::{Page, ScrollOptions, DATE_INPUT_ID, FORM_ID, TIME_INPUT_ID};
use crate::validation::FieldId;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Form,
    Input,
    TextArea,
    Select,
}

impl ElementKind {
    /// Whether the element carries a value
    pub fn is_control(self) -> bool {
        !matches!(self, ElementKind::Form)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub value: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    /// Id of the owning form, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

impl Element {
    fn new(id: &str, kind: ElementKind, form: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            kind,
            value: String::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            form: form.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub id: String,
    pub options: ScrollOptions,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryPage {
    elements: Vec<Element>,
    focused: Option<String>,
    scroll_requests: Vec<ScrollRequest>,
    acknowledgments: Vec<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full booking markup: one form holding the contact fields followed
    /// by the date and time pickers
    pub fn booking_page() -> Self {
        let mut ids: Vec<&str> = FieldId::ALL.iter().map(|f| f.element_id()).collect();
        ids.extend([DATE_INPUT_ID, TIME_INPUT_ID]);
        Self::new().with_form(FORM_ID, &ids)
    }

    /// Add a standalone input outside of any form
    pub fn with_input(mut self, id: &str) -> Self {
        self.elements.push(Element::new(id, ElementKind::Input, None));
        self
    }

    /// Add a form followed by its inputs, in the given order
    pub fn with_form(mut self, form_id: &str, input_ids: &[&str]) -> Self {
        self.elements.push(Element::new(form_id, ElementKind::Form, None));
        for id in input_ids {
            self.elements.push(Element::new(id, ElementKind::Input, Some(form_id)));
        }
        self
    }

    /// Render an existing element as a different kind of control
    pub fn with_kind(mut self, id: &str, kind: ElementKind) -> Self {
        if let Some(element) = self.element_mut(id) {
            element.kind = kind;
        }
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    pub fn acknowledgments(&self) -> &[String] {
        &self.acknowledgments
    }

    /// Drain acknowledgments shown since the last call
    pub fn take_acknowledgments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.acknowledgments)
    }
}

impl Page for MemoryPage {
    fn has_element(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn value(&self, id: &str) -> Option<String> {
        self.element(id).filter(|e| e.kind.is_control()).map(|e| e.value.clone())
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.element_mut(id).filter(|e| e.kind.is_control()) {
            Some(element) => {
                element.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.element(id).and_then(|e| e.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.attributes.insert(name.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn set_class(&mut self, id: &str, class: &str, on: bool) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        let present = element.classes.iter().any(|c| c == class);
        if on && !present {
            element.classes.push(class.to_string());
        } else if !on && present {
            element.classes.retain(|c| c != class);
        }
        true
    }

    fn first_with_class(&self, scope_id: &str, class: &str) -> Option<String> {
        self.elements
            .iter()
            .filter(|e| e.form.as_deref() == Some(scope_id))
            .find(|e| e.classes.iter().any(|c| c == class))
            .map(|e| e.id.clone())
    }

    fn focus(&mut self, id: &str) -> bool {
        if !self.has_element(id) {
            return false;
        }
        self.focused = Some(id.to_string());
        true
    }

    fn scroll_into_view(&mut self, id: &str, options: ScrollOptions) -> bool {
        if !self.has_element(id) {
            return false;
        }
        self.scroll_requests.push(ScrollRequest { id: id.to_string(), options });
        true
    }

    fn reset_form(&mut self, form_id: &str) -> bool {
        let is_form = self.element(form_id).is_some_and(|e| e.kind == ElementKind::Form);
        if !is_form {
            return false;
        }
        for element in self.elements.iter_mut().filter(|e| e.form.as_deref() == Some(form_id)) {
            element.value.clear();
        }
        true
    }

    fn acknowledge(&mut self, message: &str) {
        self.acknowledgments.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_booking_page_layout() {
        let page = MemoryPage::booking_page();
        let ids: Vec<&str> = page.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "appointmentForm",
                "fullName",
                "mobile",
                "email",
                "appointmentDate",
                "appointmentTime",
            ]
        );
        assert!(page.elements().iter().skip(1).all(|e| e.form.as_deref() == Some(FORM_ID)));
    }

    #[test]
    fn test_missing_element_is_noop() {
        let mut page = MemoryPage::new().with_input("appointmentTime");
        assert!(!page.set_value("appointmentDate", "2025-01-01"));
        assert!(!page.set_attribute("appointmentDate", "min", "2025-01-01"));
        assert!(!page.set_class("fullName", "is-invalid", true));
        assert!(!page.focus("fullName"));
        assert!(!page.reset_form(FORM_ID));
        assert_eq!(page.value("appointmentDate"), None);
        assert_eq!(page.focused(), None);
    }

    #[test]
    fn test_class_toggle_is_idempotent() {
        let mut page = MemoryPage::booking_page();
        page.set_class("mobile", "is-invalid", true);
        page.set_class("mobile", "is-invalid", true);
        assert_eq!(page.element("mobile").unwrap().classes, vec!["is-invalid".to_string()]);
        page.set_class("mobile", "is-invalid", false);
        assert!(!page.has_class("mobile", "is-invalid"));
    }

    #[test]
    fn test_first_with_class_follows_document_order() {
        let mut page = MemoryPage::booking_page();
        page.set_class("email", "is-invalid", true);
        page.set_class("mobile", "is-invalid", true);
        assert_eq!(page.first_with_class(FORM_ID, "is-invalid").as_deref(), Some("mobile"));
    }

    #[test]
    fn test_reset_form_only_touches_form_controls() {
        let mut page = MemoryPage::booking_page().with_input("newsletter");
        page.set_value("fullName", "John Doe");
        page.set_value("appointmentTime", "10:30");
        page.set_value("newsletter", "yes");
        assert!(page.reset_form(FORM_ID));
        assert_eq!(page.value("fullName").as_deref(), Some(""));
        assert_eq!(page.value("appointmentTime").as_deref(), Some(""));
        assert_eq!(page.value("newsletter").as_deref(), Some("yes"));
    }

    #[test]
    fn test_only_controls_carry_values() {
        let mut page = MemoryPage::booking_page()
            .with_kind("fullName", ElementKind::TextArea)
            .with_kind("mobile", ElementKind::Select);
        assert!(page.set_value("fullName", "John Doe"));
        assert!(page.set_value("mobile", "9876543210"));
        assert_eq!(page.value("fullName").as_deref(), Some("John Doe"));
        assert_eq!(page.value("mobile").as_deref(), Some("9876543210"));

        assert!(!page.set_value(FORM_ID, "x"));
        assert_eq!(page.value(FORM_ID), None);
    }
}
