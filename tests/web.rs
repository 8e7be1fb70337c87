//! Browser tests for the DOM binding.
//!
//! These tests run in a headless browser using wasm-bindgen-test.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

use table_layout::viewer::DomSurface;
use table_layout::{Attachment, Column, HeightProperty, LayoutView, Surface};

wasm_bindgen_test_configure!(run_in_browser);

const TABLE: &str = r#"
<div data-layout="table-wrapper">
  <div data-layout="header-wrapper" style="height:40px"><span data-layout="table-header"></span></div>
  <div data-layout="body-wrapper" style="height:200px"><div data-layout="table-body" style="height:200px"></div></div>
  <div data-layout="footer-wrapper" style="height:30px"></div>
</div>"#;

/// Build a 300x400 table root from `html`; attached to the body when `attach` is set
fn table_root(html: &str, attach: bool) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let root: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    root.style().set_property("width", "300px").unwrap();
    root.style().set_property("height", "400px").unwrap();
    root.set_inner_html(html);
    if attach {
        document.body().unwrap().append_child(&root).unwrap();
    }
    root
}

/// Resolve after a timer, letting queued microtasks run first
async fn settle() {
    let promise = Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 10)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn state_field(view: &LayoutView, field: &str) -> Option<f64> {
    let state: serde_json::Value = serde_wasm_bindgen::from_value(view.state().unwrap()).unwrap();
    state.get(field).and_then(serde_json::Value::as_f64)
}

// =============================================================================
// DOM SURFACE
// =============================================================================

#[wasm_bindgen_test]
fn test_detached_root() {
    let surface = DomSurface::new(table_root(TABLE, false));
    assert_eq!(surface.attachment(), Attachment::Detached);
}

#[wasm_bindgen_test]
fn test_measure_sections() {
    let root = table_root(TABLE, true);
    let surface = DomSurface::new(root.clone());

    assert_eq!(surface.attachment(), Attachment::Visible);
    let m = surface.measure();
    assert_eq!(m.client_width, 300.0);
    assert_eq!(m.client_height, 400.0);
    assert_eq!(m.header_wrapper, Some(40.0));
    assert!(!m.header_hidden);
    assert_eq!(m.footer_wrapper, Some(30.0));
    assert_eq!(m.append_wrapper, None);
    assert_eq!(m.body_wrapper_scroll_height, Some(200.0));
    root.remove();
}

#[wasm_bindgen_test]
fn test_hidden_wrapper() {
    let root = table_root(
        r#"<div data-layout="table-wrapper" style="display:none"></div>"#,
        true,
    );
    let surface = DomSurface::new(root.clone());
    assert_eq!(surface.attachment(), Attachment::Hidden);
    root.remove();
}

#[wasm_bindgen_test]
fn test_missing_header() {
    let root = table_root(
        r#"<div data-layout="table-wrapper"><div data-layout="body-wrapper"></div></div>"#,
        true,
    );
    let m = DomSurface::new(root.clone()).measure();
    assert_eq!(m.header_wrapper, None);
    assert!(m.header_hidden);
    root.remove();
}

#[wasm_bindgen_test]
fn test_header_hidden_by_ancestor() {
    let root = table_root(
        r#"<div data-layout="table-wrapper">
             <div data-layout="header-wrapper" style="height:40px">
               <span style="display:none"><span data-layout="table-header"></span></span>
             </div>
           </div>"#,
        true,
    );
    let m = DomSurface::new(root.clone()).measure();
    assert!(m.header_hidden);
    root.remove();
}

#[wasm_bindgen_test]
fn test_apply_height_writes_style() {
    let root = table_root(TABLE, false);
    let mut surface = DomSurface::new(root.clone());
    surface.apply_height(HeightProperty::MaxHeight, "50%");
    assert_eq!(root.style().get_property_value("max-height").unwrap(), "50%");
}

// =============================================================================
// LAYOUT VIEW
// =============================================================================

fn columns() -> JsValue {
    serde_wasm_bindgen::to_value(&vec![
        Column::new("a").with_min_width(80.0),
        Column::new("b").with_width(100.0),
        Column::new("c").with_min_width(60.0),
    ])
    .unwrap()
}

#[wasm_bindgen_test]
fn test_view_lays_out_columns() {
    let root = table_root(TABLE, true);
    let view = LayoutView::new(root.clone(), columns(), JsValue::UNDEFINED).unwrap();

    view.do_layout().unwrap();
    let leaves: serde_json::Value = serde_wasm_bindgen::from_value(view.columns().unwrap()).unwrap();
    assert_eq!(leaves[0]["realWidth"].as_f64(), Some(115.0));
    assert_eq!(leaves[2]["realWidth"].as_f64(), Some(85.0));
    assert_eq!(state_field(&view, "tableHeight"), Some(400.0));
    root.remove();
}

#[wasm_bindgen_test]
fn test_view_callbacks_receive_state() {
    let root = table_root(TABLE, true);
    let mut view = LayoutView::new(root.clone(), columns(), JsValue::UNDEFINED).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |state: JsValue| {
        sink.borrow_mut().push(state);
    });
    let function: Function = callback.as_ref().unchecked_ref::<Function>().clone();
    view.on_scrollable(function).unwrap();

    view.set_height(JsValue::from_f64(400.0)).unwrap();
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(state_field(&view, "bodyHeight"), Some(331.0));
    // Later frame retries may still call back after this test returns
    callback.forget();
    root.remove();
}

#[wasm_bindgen_test]
async fn test_deferred_height_applies_after_attach() {
    let root = table_root(TABLE, false);
    let view = LayoutView::new(root.clone(), columns(), JsValue::UNDEFINED).unwrap();

    view.set_height(JsValue::from_str("400px")).unwrap();
    assert_eq!(state_field(&view, "height"), None);
    assert_eq!(state_field(&view, "bodyHeight"), None);

    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .body()
        .unwrap()
        .append_child(&root)
        .unwrap();
    settle().await;

    assert_eq!(state_field(&view, "height"), Some(400.0));
    assert_eq!(state_field(&view, "bodyHeight"), Some(331.0));
    root.remove();
}
