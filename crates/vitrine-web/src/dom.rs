#![forbid(unsafe_code)]

//! `web-sys` adapters for the core host traits.
//!
//! [`DomElement`] and [`DomDocument`] wrap the live DOM; [`DomWatcher`]
//! wraps an `IntersectionObserver`. DOM calls that can throw are treated as
//! best effort: a failure leaves the element unchanged and is logged at
//! `debug`.

use js_sys::Array;
use tracing::debug;
use vitrine_core::element::{Document, Element};
use vitrine_core::watch::{Crossing, ViewportWatcher, WatchOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    NodeList,
};

/// Live DOM element.
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement(web_sys::Element);

impl DomElement {
    #[must_use]
    pub fn new(element: web_sys::Element) -> Self {
        Self(element)
    }

    #[must_use]
    pub fn as_element(&self) -> &web_sys::Element {
        &self.0
    }
}

fn elements(list: &NodeList) -> Vec<DomElement> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(DomElement)
        .collect()
}

fn logged(op: &'static str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        debug!(op, err = ?err, "DOM call failed");
    }
}

impl Element for DomElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        logged("classList.add", self.0.class_list().add_1(class));
    }

    fn remove_class(&self, class: &str) {
        logged("classList.remove", self.0.class_list().remove_1(class));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        logged("setAttribute", self.0.set_attribute(name, value));
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(html) = self.0.dyn_ref::<HtmlElement>() {
            logged("style.setProperty", html.style().set_property(property, value));
        }
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_element().map(Self)
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(Self)
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        self.0
            .query_selector_all(selector)
            .map(|list| elements(&list))
            .unwrap_or_default()
    }

    fn append_child(&self, child: &Self) {
        logged("appendChild", self.0.append_child(&child.0).map(drop));
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn height(&self) -> f64 {
        self.0.get_bounding_client_rect().height()
    }
}

/// Live document.
#[derive(Debug, Clone, PartialEq)]
pub struct DomDocument(web_sys::Document);

impl DomDocument {
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }
}

impl Document for DomDocument {
    type Element = DomElement;

    fn query(&self, selector: &str) -> Option<DomElement> {
        self.0.query_selector(selector).ok().flatten().map(DomElement)
    }

    fn query_all(&self, selector: &str) -> Vec<DomElement> {
        self.0
            .query_selector_all(selector)
            .map(|list| elements(&list))
            .unwrap_or_default()
    }

    fn create_element(&self, tag: &str) -> Option<DomElement> {
        self.0.create_element(tag).ok().map(DomElement)
    }
}

// ---------------------------------------------------------------------------
// IntersectionObserver
// ---------------------------------------------------------------------------

/// Observer callback signature: `(entries, observer)`.
pub type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// [`ViewportWatcher`] over an `IntersectionObserver`.
#[derive(Debug, Clone)]
pub struct DomWatcher {
    observer: IntersectionObserver,
}

impl DomWatcher {
    /// Create an observer rooted at the viewport with `options`.
    pub fn new(options: WatchOptions, callback: &ObserverCallback) -> Result<Self, JsValue> {
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self { observer })
    }

    /// Stop all observation; pending records are discarded.
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl From<IntersectionObserver> for DomWatcher {
    fn from(observer: IntersectionObserver) -> Self {
        Self { observer }
    }
}

impl ViewportWatcher<DomElement> for DomWatcher {
    fn observe(&mut self, target: &DomElement) {
        self.observer.observe(&target.0);
    }

    fn unobserve(&mut self, target: &DomElement) {
        self.observer.unobserve(&target.0);
    }
}

/// Convert an observer entry array into crossings, in delivery order.
#[must_use]
pub fn crossings(entries: &Array) -> Vec<Crossing<DomElement>> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .map(|entry| {
            Crossing::new(
                DomElement(entry.target()),
                entry.is_intersecting(),
                entry.intersection_ratio(),
            )
        })
        .collect()
}
