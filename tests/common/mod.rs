//! Common test utilities for table-layout integration tests.
//!
//! - `FakeSurface`: a scriptable rendering surface shared between the test
//!   and the engine
//! - `Recorder`: an observer that logs every event it receives
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use table_layout::{
    Attachment, Column, ColumnStore, HeightProperty, LayoutConfig, LayoutEvent, LayoutObserver,
    LayoutState, Measurements, Surface, TableLayout,
};

// ============================================================================
// Fake surface
// ============================================================================

/// Mutable state behind a [`FakeSurface`]
#[derive(Debug, Clone)]
pub struct FakeState {
    pub interactive: bool,
    pub attachment: Attachment,
    pub measurements: Measurements,
    /// Every style write, in order
    pub styles: Vec<(HeightProperty, String)>,
}

/// Scriptable surface; clones share state so tests can change it after
/// handing a clone to the engine.
#[derive(Debug, Clone)]
pub struct FakeSurface(Rc<RefCell<FakeState>>);

impl FakeSurface {
    pub fn new(attachment: Attachment, measurements: Measurements) -> Self {
        Self(Rc::new(RefCell::new(FakeState {
            interactive: true,
            attachment,
            measurements,
            styles: Vec::new(),
        })))
    }

    /// Attached and visible, with [`standard_measurements`]
    pub fn visible() -> Self {
        Self::new(Attachment::Visible, standard_measurements())
    }

    /// Not attached yet; will measure [`standard_measurements`] once attached
    pub fn detached() -> Self {
        Self::new(Attachment::Detached, standard_measurements())
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.0.borrow_mut());
    }

    pub fn attach(&self) {
        self.update(|s| s.attachment = Attachment::Visible);
    }

    pub fn styles(&self) -> Vec<(HeightProperty, String)> {
        self.0.borrow().styles.clone()
    }
}

impl Surface for FakeSurface {
    fn is_interactive(&self) -> bool {
        self.0.borrow().interactive
    }

    fn attachment(&self) -> Attachment {
        self.0.borrow().attachment
    }

    fn measure(&self) -> Measurements {
        self.0.borrow().measurements.clone()
    }

    fn apply_height(&mut self, property: HeightProperty, css: &str) {
        self.0.borrow_mut().styles.push((property, css.to_string()));
    }
}

/// 300x400 table with a 40px header, no footer, and 200px of body content
pub fn standard_measurements() -> Measurements {
    Measurements {
        client_width: 300.0,
        client_height: 400.0,
        header_wrapper: Some(40.0),
        header_hidden: false,
        footer_wrapper: None,
        append_wrapper: None,
        body_scroll_height: Some(200.0),
        body_wrapper_scroll_height: Some(200.0),
    }
}

// ============================================================================
// Columns and engine
// ============================================================================

/// Flexible (min 80), declared 100, flexible (min 60)
pub fn three_columns() -> Vec<Column> {
    vec![
        Column::new("a").with_min_width(80.0),
        Column::new("b").with_width(100.0),
        Column::new("c").with_min_width(60.0),
    ]
}

pub fn build_layout(surface: &FakeSurface, columns: Vec<Column>) -> TableLayout {
    build_layout_with(surface, columns, LayoutConfig::default())
}

pub fn build_layout_with(
    surface: &FakeSurface,
    columns: Vec<Column>,
    config: LayoutConfig,
) -> TableLayout {
    TableLayout::builder()
        .table(surface.clone())
        .store(ColumnStore::new(columns))
        .config(config)
        .build()
        .expect("layout should build")
}

// ============================================================================
// Recording observer
// ============================================================================

/// Shared log of (observer name, event)
pub type EventLog = Rc<RefCell<Vec<(String, LayoutEvent)>>>;

/// Observer that records events and the state it saw
pub struct Recorder {
    name: String,
    log: EventLog,
    pub states: Vec<(LayoutEvent, LayoutState)>,
    /// Return an error from every hook
    pub fail: bool,
}

impl Recorder {
    pub fn new(name: &str, log: &EventLog) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            name: name.to_string(),
            log: Rc::clone(log),
            states: Vec::new(),
            fail: false,
        }))
    }

    fn record(&mut self, event: LayoutEvent, layout: &TableLayout) -> table_layout::Result<()> {
        self.log.borrow_mut().push((self.name.clone(), event));
        self.states.push((event, layout.state().clone()));
        if self.fail {
            return Err(table_layout::LayoutError::Observer(format!(
                "{} failed",
                self.name
            )));
        }
        Ok(())
    }

    /// Scroll-y values seen on `scrollable` events
    pub fn scroll_y_history(&self) -> Vec<bool> {
        self.states
            .iter()
            .filter(|(event, _)| *event == LayoutEvent::Scrollable)
            .map(|(_, state)| state.scroll_y)
            .collect()
    }

    pub fn count(&self, event: LayoutEvent) -> usize {
        self.states.iter().filter(|(e, _)| *e == event).count()
    }
}

impl LayoutObserver for Recorder {
    fn on_columns_change(&mut self, layout: &TableLayout) -> table_layout::Result<()> {
        self.record(LayoutEvent::Columns, layout)
    }

    fn on_scrollable_change(&mut self, layout: &TableLayout) -> table_layout::Result<()> {
        self.record(LayoutEvent::Scrollable, layout)
    }
}

pub fn new_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Register a recorder and return it
pub fn observe(layout: &mut TableLayout, name: &str, log: &EventLog) -> Rc<RefCell<Recorder>> {
    let recorder = Recorder::new(name, log);
    let handle = Rc::clone(&recorder);
    layout.add_observer(handle);
    recorder
}
