//! DOM-backed [`Surface`].
//!
//! Section elements are looked up under the table root by their
//! `data-layout` attribute on every pass, so re-rendered sections are
//! picked up without re-binding.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::layout::hidden_by_ancestor;
use crate::surface::{Attachment, Measurements, Surface};
use crate::types::HeightProperty;

const TABLE_WRAPPER: &str = "[data-layout='table-wrapper']";
const HEADER_WRAPPER: &str = "[data-layout='header-wrapper']";
const TABLE_HEADER: &str = "[data-layout='table-header']";
const FOOTER_WRAPPER: &str = "[data-layout='footer-wrapper']";
const APPEND_WRAPPER: &str = "[data-layout='append-wrapper']";
const BODY_WRAPPER: &str = "[data-layout='body-wrapper']";
const TABLE_BODY: &str = "[data-layout='table-body']";

/// Surface reading box metrics from a table root element
pub struct DomSurface {
    root: HtmlElement,
}

impl DomSurface {
    pub fn new(root: HtmlElement) -> Self {
        Self { root }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.root.query_selector(selector).ok().flatten()
    }

    fn offset_height(&self, selector: &str) -> Option<f64> {
        self.query(selector)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(|el| f64::from(el.offset_height()))
    }

    fn scroll_height(&self, selector: &str) -> Option<f64> {
        self.query(selector).map(|el| f64::from(el.scroll_height()))
    }

    fn header_hidden(&self) -> bool {
        let window = web_sys::window();
        hidden_by_ancestor(
            self.query(TABLE_HEADER),
            |el: &Element| el.parent_element(),
            |el| el.tag_name() == "DIV",
            |el| computed_display_none(window.as_ref(), el),
        )
    }
}

fn computed_display_none(window: Option<&web_sys::Window>, el: &Element) -> bool {
    window
        .and_then(|w| w.get_computed_style(el).ok().flatten())
        .and_then(|style| style.get_property_value("display").ok())
        .is_some_and(|display| display == "none")
}

impl Surface for DomSurface {
    fn is_interactive(&self) -> bool {
        web_sys::window().is_some()
    }

    fn attachment(&self) -> Attachment {
        if !self.root.is_connected() {
            return Attachment::Detached;
        }
        let hidden = self
            .query(TABLE_WRAPPER)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .and_then(|el| el.style().get_property_value("display").ok())
            .is_some_and(|display| display == "none");
        if hidden {
            Attachment::Hidden
        } else {
            Attachment::Visible
        }
    }

    fn measure(&self) -> Measurements {
        Measurements {
            client_width: f64::from(self.root.client_width()),
            client_height: f64::from(self.root.client_height()),
            header_wrapper: self.offset_height(HEADER_WRAPPER),
            header_hidden: self.header_hidden(),
            footer_wrapper: self.offset_height(FOOTER_WRAPPER),
            append_wrapper: self.offset_height(APPEND_WRAPPER),
            body_scroll_height: self.scroll_height(TABLE_BODY),
            body_wrapper_scroll_height: self.scroll_height(BODY_WRAPPER),
        }
    }

    fn apply_height(&mut self, property: HeightProperty, css: &str) {
        if let Err(e) = self.root.style().set_property(property.as_css(), css) {
            log::warn!("failed to set {property}: {e:?}");
        }
    }
}
