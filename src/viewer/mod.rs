//! WASM-exported `LayoutView` - the browser entry point.
//!
//! This module wires a [`TableLayout`] to the DOM:
//! - Measuring the table root through [`DomSurface`]
//! - Draining deferred passes on microtasks and animation frames
//! - Forwarding `columns` / `scrollable` events to JavaScript callbacks
//!
//! Callbacks receive a snapshot of the layout state. They run while the
//! engine is busy, so calling back into the view from a callback fails with
//! a "layout busy" error instead of re-entering.

mod schedule;
mod surface;

pub use surface::DomSurface;

use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::engine::{LayoutConfig, TableLayout};
use crate::error::LayoutError;
use crate::observer::{Callbacks, ObserverHandle};
use crate::types::{Column, ColumnStore, HeightValue};
use schedule::BrowserScheduler;

/// Table layout bound to a DOM element, exported to JavaScript
#[wasm_bindgen]
pub struct LayoutView {
    layout: Rc<RefCell<TableLayout>>,
    #[allow(dead_code)] // Kept so JS callbacks stay registered
    observers: Vec<ObserverHandle>,
}

#[wasm_bindgen]
impl LayoutView {
    /// Create a view over `root` with the given column tree and options.
    #[wasm_bindgen(constructor)]
    pub fn new(root: HtmlElement, columns: JsValue, config: JsValue) -> Result<LayoutView, JsValue> {
        console_error_panic_hook::set_once();

        let columns: Vec<Column> = serde_wasm_bindgen::from_value(columns)
            .map_err(|e| JsValue::from_str(&format!("Invalid columns: {e}")))?;
        let config: LayoutConfig = if config.is_undefined() || config.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid layout config: {e}")))?
        };

        let slot = Rc::new(RefCell::new(Weak::new()));
        let layout = TableLayout::builder()
            .table(DomSurface::new(root))
            .store(ColumnStore::new(columns))
            .scheduler(BrowserScheduler::new(Rc::clone(&slot)))
            .config(config)
            .build()?;
        let layout = Rc::new(RefCell::new(layout));
        *slot.borrow_mut() = Rc::downgrade(&layout);

        Ok(LayoutView {
            layout,
            observers: Vec::new(),
        })
    }

    #[wasm_bindgen(js_name = setHeight)]
    pub fn set_height(&self, value: JsValue) -> Result<(), JsValue> {
        let value = height_from_js(&value)?;
        self.engine()?.set_height(value)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setMaxHeight)]
    pub fn set_max_height(&self, value: JsValue) -> Result<(), JsValue> {
        let value = height_from_js(&value)?;
        self.engine()?.set_max_height(value)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&self, columns: JsValue) -> Result<(), JsValue> {
        let columns: Vec<Column> = serde_wasm_bindgen::from_value(columns)
            .map_err(|e| JsValue::from_str(&format!("Invalid columns: {e}")))?;
        self.engine()?.set_columns(columns)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setFit)]
    pub fn set_fit(&self, fit: bool) -> Result<(), JsValue> {
        self.engine()?.set_fit(fit)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setShowHeader)]
    pub fn set_show_header(&self, show_header: bool) -> Result<(), JsValue> {
        self.engine()?.set_show_header(show_header)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = doLayout)]
    pub fn do_layout(&self) -> Result<(), JsValue> {
        self.engine()?.do_layout()?;
        Ok(())
    }

    #[wasm_bindgen(js_name = updateColumnsWidth)]
    pub fn update_columns_width(&self) -> Result<(), JsValue> {
        self.engine()?.update_columns_width()?;
        Ok(())
    }

    #[wasm_bindgen(js_name = updateElsHeight)]
    pub fn update_els_height(&self) -> Result<(), JsValue> {
        self.engine()?.update_els_height()?;
        Ok(())
    }

    /// Register a callback run with the layout state after widths change
    #[wasm_bindgen(js_name = onColumns)]
    pub fn on_columns(&mut self, callback: Function) -> Result<(), JsValue> {
        let observer = Callbacks::new()
            .on_columns(move |layout| call_with_state(&callback, layout))
            .into_handle();
        self.register(observer)
    }

    /// Register a callback run with the layout state after heights settle
    #[wasm_bindgen(js_name = onScrollable)]
    pub fn on_scrollable(&mut self, callback: Function) -> Result<(), JsValue> {
        let observer = Callbacks::new()
            .on_scrollable(move |layout| call_with_state(&callback, layout))
            .into_handle();
        self.register(observer)
    }

    /// Current layout state as a plain object
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let layout = self
            .layout
            .try_borrow()
            .map_err(|_| JsValue::from_str("layout busy"))?;
        serde_wasm_bindgen::to_value(layout.state())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Leaf columns with resolved widths (`realWidth`)
    pub fn columns(&self) -> Result<JsValue, JsValue> {
        let layout = self
            .layout
            .try_borrow()
            .map_err(|_| JsValue::from_str("layout busy"))?;
        serde_wasm_bindgen::to_value(&layout.columns())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}

impl LayoutView {
    fn engine(&self) -> Result<RefMut<'_, TableLayout>, JsValue> {
        self.layout
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("layout busy"))
    }

    fn register(&mut self, observer: ObserverHandle) -> Result<(), JsValue> {
        self.engine()?.add_observer(Rc::clone(&observer));
        self.observers.push(observer);
        Ok(())
    }
}

fn height_from_js(value: &JsValue) -> Result<Option<HeightValue>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(px) = value.as_f64() {
        return Ok(Some(HeightValue::Pixels(px)));
    }
    if let Some(css) = value.as_string() {
        return Ok(Some(HeightValue::Css(css)));
    }
    Err(JsValue::from_str("height must be a number or a string"))
}

fn call_with_state(callback: &Function, layout: &TableLayout) -> crate::error::Result<()> {
    let state = serde_wasm_bindgen::to_value(layout.state())
        .map_err(|e| LayoutError::Observer(e.to_string()))?;
    callback
        .call1(&JsValue::NULL, &state)
        .map(|_| ())
        .map_err(|e| LayoutError::Observer(format!("{e:?}")))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_height_from_js_values() {
        assert_eq!(height_from_js(&JsValue::UNDEFINED).unwrap(), None);
        assert_eq!(height_from_js(&JsValue::NULL).unwrap(), None);
        assert_eq!(
            height_from_js(&JsValue::from_f64(320.0)).unwrap(),
            Some(HeightValue::Pixels(320.0))
        );
        assert_eq!(
            height_from_js(&JsValue::from_str("50%")).unwrap(),
            Some(HeightValue::Css("50%".into()))
        );
    }

    #[wasm_bindgen_test]
    fn test_height_from_js_rejects_other_types() {
        assert!(height_from_js(&JsValue::TRUE).is_err());
        assert!(height_from_js(&js_sys::Object::new().into()).is_err());
    }
}
