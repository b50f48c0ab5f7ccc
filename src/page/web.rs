//! Browser DOM binding
//!
//! Build with `--features web` for `wasm32-unknown-unknown`. The host page
//! calls `initializeBookingForm()` once the document has loaded.

use super::{Page, ScrollBlock, ScrollOptions, FORM_ID, TIME_INPUT_ID};
use crate::config::Config;
use crate::form::{initialize, BookingForm, Wiring};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

/// The form controls that carry a value
enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
}

impl Control {
    fn from_element(element: Element) -> Option<Self> {
        let element = match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(Control::Input(input)),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(text_area) => return Some(Control::TextArea(text_area)),
            Err(element) => element,
        };
        element.dyn_into::<HtmlSelectElement>().ok().map(Control::Select)
    }

    fn value(&self) -> String {
        match self {
            Control::Input(e) => e.value(),
            Control::TextArea(e) => e.value(),
            Control::Select(e) => e.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            Control::Input(e) => e.set_value(value),
            Control::TextArea(e) => e.set_value(value),
            Control::Select(e) => e.set_value(value),
        }
    }
}

/// [`Page`] over the live document. Cloning only clones the JS handles.
#[derive(Debug, Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new(window: Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn control(&self, id: &str) -> Option<Control> {
        let element = self.element(id)?;
        let control = Control::from_element(element);
        if control.is_none() {
            log::debug!("#{} is not a form control", id);
        }
        control
    }
}

impl Page for WebPage {
    fn has_element(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn value(&self, id: &str) -> Option<String> {
        self.control(id).map(|control| control.value())
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.control(id) {
            Some(control) => {
                control.set_value(value);
                true
            }
            None => false,
        }
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.element(id)?.get_attribute(name)
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> bool {
        self.element(id).is_some_and(|e| e.set_attribute(name, value).is_ok())
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.class_list().contains(class))
    }

    fn set_class(&mut self, id: &str, class: &str, on: bool) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        let classes = element.class_list();
        let result = if on { classes.add_1(class) } else { classes.remove_1(class) };
        result.is_ok()
    }

    fn first_with_class(&self, scope_id: &str, class: &str) -> Option<String> {
        let scope = self.element(scope_id)?;
        let found = scope.query_selector(&format!(".{}", class)).ok()??;
        let id = found.id();
        (!id.is_empty()).then_some(id)
    }

    fn focus(&mut self, id: &str) -> bool {
        self.element(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            .is_some_and(|e| e.focus().is_ok())
    }

    fn scroll_into_view(&mut self, id: &str, options: ScrollOptions) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        let scroll = ScrollIntoViewOptions::new();
        let behavior = if options.smooth { ScrollBehavior::Smooth } else { ScrollBehavior::Auto };
        scroll.set_behavior(behavior);
        scroll.set_block(match options.block {
            ScrollBlock::Start => ScrollLogicalPosition::Start,
            ScrollBlock::Center => ScrollLogicalPosition::Center,
            ScrollBlock::End => ScrollLogicalPosition::End,
            ScrollBlock::Nearest => ScrollLogicalPosition::Nearest,
        });
        element.scroll_into_view_with_scroll_into_view_options(&scroll);
        true
    }

    fn reset_form(&mut self, form_id: &str) -> bool {
        match self.element(form_id).and_then(|e| e.dyn_into::<HtmlFormElement>().ok()) {
            Some(form) => {
                form.reset();
                true
            }
            None => false,
        }
    }

    fn acknowledge(&mut self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            log::warn!("Could not show acknowledgment: {:?}", e);
        }
    }
}

/// Register the page's event listeners.
///
/// Each listener owns its own copy of the form, so an event raised while
/// another handler runs (a blur caused by `focus()` during submit) is safe.
pub fn attach(form: BookingForm<WebPage>, wiring: &Wiring) -> Result<(), JsValue> {
    let document = form.page().document().clone();

    if wiring.time_bounds {
        if let Some(time_input) = document.get_element_by_id(TIME_INPUT_ID) {
            let mut handler = form.clone();
            let on_change = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                handler.handle_time_change();
            });
            time_input
                .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
            on_change.forget();
        }
    }

    if !wiring.form {
        return Ok(());
    }
    let Some(form_element) = document.get_element_by_id(FORM_ID) else {
        return Ok(());
    };

    // Blur does not bubble, so listen in the capture phase
    let mut handler = form.clone();
    let on_blur = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let id = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| element.id())
            .unwrap_or_default();
        handler.handle_blur(&id);
    });
    form_element.add_event_listener_with_callback_and_bool(
        "blur",
        on_blur.as_ref().unchecked_ref(),
        true,
    )?;
    on_blur.forget();

    let mut handler = form;
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        handler.handle_submit();
    });
    form_element.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    Ok(())
}

/// Entry point for the host page, called once the document is ready
#[wasm_bindgen(js_name = initializeBookingForm)]
pub fn initialize_booking_form() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let page = WebPage::new(window).ok_or_else(|| JsValue::from_str("no document"))?;
    let (form, wiring) =
        initialize(page, &Config::default()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    attach(form, &wiring)
}
