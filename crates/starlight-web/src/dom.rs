//! Thin helpers over `web-sys`.

use std::time::Duration;

use starlight_core::view::Delay;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, EventTarget};

pub const HIDDEN: &str = "hidden";

pub fn js_error(err: JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| "unknown js error".into())
}

pub fn by_id(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

/// All elements matching `selector`, in document order.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn add_classes(el: &Element, classes: &[&str]) {
    let list = el.class_list();
    for class in classes {
        let _ = list.add_1(class);
    }
}

pub fn remove_classes(el: &Element, classes: &[&str]) {
    let list = el.class_list();
    for class in classes {
        let _ = list.remove_1(class);
    }
}

pub fn set_hidden(el: &Element, hidden: bool) {
    if hidden {
        add_classes(el, &[HIDDEN]);
    } else {
        remove_classes(el, &[HIDDEN]);
    }
}

pub fn data(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{name}"))
}

pub fn set_data(el: &Element, name: &str, value: &str) {
    let _ = el.set_attribute(&format!("data-{name}"), value);
}

/// Create `<tag class="...">` with optional text content.
pub fn create(document: &Document, tag: &str, class: &str, text: Option<&str>) -> Option<Element> {
    let el = document.create_element(tag).ok()?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if text.is_some() {
        el.set_text_content(text);
    }
    Some(el)
}

/// Nearest ancestor-or-self of the event target matching `selector`.
pub fn closest(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

/// Whether the event was dispatched on `el` itself rather than a child.
pub fn targets(event: &Event, el: &Element) -> bool {
    event
        .target()
        .is_some_and(|target| JsValue::from(target) == JsValue::from(el.clone()))
}

/// Attach a listener for the lifetime of the page.
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        tracing::error!(event, error = %js_error(e), "Failed to attach listener");
    }
    closure.forget();
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// `setTimeout` as a future.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutDelay;

impl Delay for TimeoutDelay {
    async fn sleep(&self, duration: Duration) {
        let ms = duration.as_millis().min(i32::MAX as u128) as i32;
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().is_some_and(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .is_ok()
            });
            if !scheduled {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}
