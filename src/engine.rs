//! The table layout engine.
//!
//! `TableLayout` owns the layout state and coordinates:
//! - Width distribution whenever columns, `fit`, or the container change
//! - Height settling passes, including deferred retries
//! - Applying configured heights to the surface
//! - Notifying observers after each completed pass

use std::fmt;

use serde::Deserialize;

use crate::error::{LayoutError, Result};
use crate::layout::{
    distribute, update_scroll_y, HeightResolver, ResolveContext, ResolveOutcome, ResolverPhase,
};
use crate::observer::{LayoutEvent, ObserverHandle, ObserverRegistry};
use crate::scheduler::{ManualScheduler, Scheduler, Task, TaskQueue, Tick};
use crate::surface::{Attachment, Measurements, Surface, TableLayoutMode};
use crate::types::{parse_height, Column, ColumnStore, HeightProperty, HeightValue, LayoutState};

/// Named layout options.
///
/// Every field is optional; unknown names are ignored. Layout cell values
/// (`height`, `headerHeight`, ...) replace the initial value of that cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub fit: Option<bool>,
    pub show_header: Option<bool>,
    pub table_layout: Option<TableLayoutMode>,
    pub gutter_width: Option<f64>,
    pub height: Option<HeightValue>,
    pub scroll_x: Option<bool>,
    pub scroll_y: Option<bool>,
    pub body_width: Option<f64>,
    pub fixed_width: Option<f64>,
    pub right_fixed_width: Option<f64>,
    pub table_height: Option<f64>,
    pub header_height: Option<f64>,
    pub append_height: Option<f64>,
    pub footer_height: Option<f64>,
    pub viewport_height: Option<f64>,
    pub body_height: Option<f64>,
    pub body_scroll_height: Option<f64>,
    pub fixed_body_height: Option<f64>,
}

impl LayoutConfig {
    /// Decode options from a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn apply_to(&self, state: &mut LayoutState) {
        fn set<T: Clone>(cell: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                cell.clone_from(value);
            }
        }

        set(&mut state.height, &self.height);
        set(&mut state.body_width, &self.body_width);
        set(&mut state.fixed_width, &self.fixed_width);
        set(&mut state.right_fixed_width, &self.right_fixed_width);
        set(&mut state.table_height, &self.table_height);
        set(&mut state.header_height, &self.header_height);
        set(&mut state.append_height, &self.append_height);
        set(&mut state.footer_height, &self.footer_height);
        set(&mut state.viewport_height, &self.viewport_height);
        set(&mut state.body_height, &self.body_height);
        set(&mut state.fixed_body_height, &self.fixed_body_height);
        if let Some(scroll_x) = self.scroll_x {
            state.scroll_x = scroll_x;
        }
        if let Some(scroll_y) = self.scroll_y {
            state.scroll_y = scroll_y;
        }
        if let Some(height) = self.body_scroll_height {
            state.body_scroll_height = height;
        }
        if let Some(gutter) = self.gutter_width {
            state.gutter_width = gutter;
        }
    }
}

/// Builder for [`TableLayout`]. A table surface and a column store are required.
#[derive(Default)]
pub struct TableLayoutBuilder {
    table: Option<Box<dyn Surface>>,
    store: Option<ColumnStore>,
    scheduler: Option<Box<dyn Scheduler>>,
    config: LayoutConfig,
}

impl TableLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendering surface of the owning table
    #[must_use]
    pub fn table(mut self, surface: impl Surface + 'static) -> Self {
        self.table = Some(Box::new(surface));
        self
    }

    /// Backing column store
    #[must_use]
    pub fn store(mut self, store: ColumnStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Hook told when deferred work is queued (defaults to [`ManualScheduler`])
    #[must_use]
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    #[must_use]
    pub fn config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine
    ///
    /// # Errors
    /// Returns `MissingTable` or `MissingStore` if either was not supplied.
    pub fn build(self) -> Result<TableLayout> {
        let surface = self.table.ok_or(LayoutError::MissingTable)?;
        let store = self.store.ok_or(LayoutError::MissingStore)?;

        let mut state = LayoutState::default();
        self.config.apply_to(&mut state);

        Ok(TableLayout {
            state,
            store,
            surface,
            scheduler: self
                .scheduler
                .unwrap_or_else(|| Box::new(ManualScheduler)),
            tasks: TaskQueue::new(),
            resolver: HeightResolver::new(),
            observers: ObserverRegistry::new(),
            fit: self.config.fit.unwrap_or(true),
            show_header: self.config.show_header.unwrap_or(true),
            table_layout: self.config.table_layout.unwrap_or_default(),
            is_finish: false,
        })
    }
}

/// Layout engine for one table
pub struct TableLayout {
    state: LayoutState,
    store: ColumnStore,
    surface: Box<dyn Surface>,
    scheduler: Box<dyn Scheduler>,
    tasks: TaskQueue,
    resolver: HeightResolver,
    observers: ObserverRegistry,
    fit: bool,
    show_header: bool,
    table_layout: TableLayoutMode,
    /// A height was applied synchronously; deferred applies are stale
    is_finish: bool,
}

impl TableLayout {
    pub fn builder() -> TableLayoutBuilder {
        TableLayoutBuilder::new()
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn store(&self) -> &ColumnStore {
        &self.store
    }

    /// Flattened leaf columns with their resolved widths
    pub fn columns(&self) -> Vec<Column> {
        self.store.leaves()
    }

    /// Resolved width of a leaf column
    pub fn resolved_width(&self, key: &str) -> Option<f64> {
        self.store.get(key).and_then(|c| c.resolved_width)
    }

    pub fn fit(&self) -> bool {
        self.fit
    }

    pub fn show_header(&self) -> bool {
        self.show_header
    }

    pub fn table_layout(&self) -> TableLayoutMode {
        self.table_layout
    }

    pub fn is_finish(&self) -> bool {
        self.is_finish
    }

    pub fn resolver_phase(&self) -> ResolverPhase {
        self.resolver.phase()
    }

    /// Number of tasks waiting for `tick`
    pub fn pending(&self, tick: Tick) -> usize {
        self.tasks.pending(tick)
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    // ------------------------------------------------------------------
    // Heights
    // ------------------------------------------------------------------

    /// Set the table height
    pub fn set_height(&mut self, value: Option<HeightValue>) -> Result<()> {
        self.set_height_property(value, HeightProperty::Height)
    }

    /// Set the table max-height
    pub fn set_max_height(&mut self, value: Option<HeightValue>) -> Result<()> {
        self.set_height_property(value, HeightProperty::MaxHeight)
    }

    /// Apply a height to `property` on the table root and re-settle heights.
    ///
    /// Non-interactive surfaces ignore this. A value that arrives before the
    /// table is attached is applied on a later microtask, unless a
    /// synchronous apply happens first.
    pub fn set_height_property(
        &mut self,
        value: Option<HeightValue>,
        property: HeightProperty,
    ) -> Result<()> {
        if !self.surface.is_interactive() {
            return Ok(());
        }
        match value {
            Some(value) if self.surface.attachment() == Attachment::Detached => {
                log::debug!("table not attached, deferring {property}");
                self.defer(Tick::Microtask, Task::ApplyHeight { value, property });
                Ok(())
            }
            value => {
                self.is_finish = true;
                self.apply_height(value.as_ref(), property)
            }
        }
    }

    fn apply_height(&mut self, value: Option<&HeightValue>, property: HeightProperty) -> Result<()> {
        match value.and_then(parse_height) {
            Some(height) => {
                let css = height.to_css();
                self.state.height = Some(height);
                self.surface.apply_height(property, &css);
                self.update_els_height()
            }
            None => {
                // Configured without a value: the height cell becomes zero
                self.state.height = Some(HeightValue::Pixels(0.0));
                Ok(())
            }
        }
    }

    /// Start a new height settling pass
    pub fn update_els_height(&mut self) -> Result<()> {
        if !self.surface.is_interactive() {
            return Ok(());
        }
        self.resolver.begin();
        self.resolve_heights()
    }

    fn resolve_heights(&mut self) -> Result<()> {
        let attachment = self.surface.attachment();
        let measured = match attachment {
            Attachment::Visible => self.surface.measure(),
            Attachment::Detached | Attachment::Hidden => Measurements::default(),
        };
        let ctx = ResolveContext {
            show_header: self.show_header,
            table_layout: self.table_layout,
            column_count: self.store.len(),
        };

        match self
            .resolver
            .resolve(&mut self.state, attachment, &measured, &ctx)
        {
            ResolveOutcome::Deferred(tick) => {
                self.defer(tick, Task::UpdateHeights);
                Ok(())
            }
            ResolveOutcome::Aborted(_) => Ok(()),
            ResolveOutcome::Committed { frame_retry, .. } => {
                if frame_retry {
                    self.defer(Tick::Frame, Task::UpdateHeights);
                }
                self.notify_observers(LayoutEvent::Scrollable)
            }
        }
    }

    /// Recompute vertical overflow from the body wrapper. Returns true if it changed.
    pub fn update_scroll_y(&mut self) -> bool {
        let scroll_height = match self.surface.attachment() {
            Attachment::Detached => None,
            Attachment::Hidden | Attachment::Visible => {
                self.surface.measure().body_wrapper_scroll_height
            }
        };
        update_scroll_y(&mut self.state, scroll_height)
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Redistribute column widths over the container's client width
    pub fn update_columns_width(&mut self) -> Result<()> {
        if !self.surface.is_interactive() {
            return Ok(());
        }
        let content_width = self.surface.measure().client_width;
        let result = distribute(&self.store.leaves(), content_width, self.fit);

        for (column, width) in self.store.leaves_mut().into_iter().zip(&result.widths) {
            column.resolved_width = *width;
        }
        self.state.scroll_x = result.scroll_x;
        self.state.body_width = Some(result.body_width);
        self.state.fixed_width = result.fixed_width;
        self.state.right_fixed_width = result.right_fixed_width;

        log::trace!(
            "columns distributed over {content_width}px: body={} scroll_x={}",
            result.body_width,
            result.scroll_x
        );

        self.notify_observers(LayoutEvent::Columns)
    }

    /// Redistribute widths, then re-settle heights
    pub fn do_layout(&mut self) -> Result<()> {
        self.update_columns_width()?;
        self.update_els_height()
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) -> Result<()> {
        self.store.set_columns(columns);
        self.do_layout()
    }

    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.store.push(column);
        self.do_layout()
    }

    /// Remove a column (leaf or group) by key
    pub fn remove_column(&mut self, key: &str) -> Result<Column> {
        let removed = self
            .store
            .remove(key)
            .ok_or_else(|| LayoutError::UnknownColumn(key.to_string()))?;
        self.do_layout()?;
        Ok(removed)
    }

    /// Change a column's declared width; `None` makes it flexible
    pub fn resize_column(&mut self, key: &str, width: Option<f64>) -> Result<()> {
        let column = self
            .store
            .get_mut(key)
            .ok_or_else(|| LayoutError::UnknownColumn(key.to_string()))?;
        column.declared_width = width;
        self.do_layout()
    }

    /// Change a column's minimum width
    pub fn set_min_width(&mut self, key: &str, min_width: Option<f64>) -> Result<()> {
        let column = self
            .store
            .get_mut(key)
            .ok_or_else(|| LayoutError::UnknownColumn(key.to_string()))?;
        column.min_width = min_width;
        self.do_layout()
    }

    pub fn set_fit(&mut self, fit: bool) -> Result<()> {
        self.fit = fit;
        self.do_layout()
    }

    /// Show or hide the header row
    pub fn set_show_header(&mut self, show_header: bool) -> Result<()> {
        self.show_header = show_header;
        self.update_els_height()
    }

    // ------------------------------------------------------------------
    // Deferred work
    // ------------------------------------------------------------------

    /// Run every task queued for `tick`.
    ///
    /// Tasks queued while the batch runs wait for the next drain. If a task
    /// fails, the rest of the batch is queued again before the error returns.
    pub fn run_pending(&mut self, tick: Tick) -> Result<()> {
        let mut batch = self.tasks.take(tick).into_iter();
        while let Some(task) = batch.next() {
            if let Err(e) = self.run_task(task) {
                for rest in batch {
                    self.defer(tick, rest);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::UpdateHeights => self.resolve_heights(),
            Task::ApplyHeight { value, property } => {
                if self.is_finish {
                    log::debug!("dropping stale deferred {property}");
                    return Ok(());
                }
                if self.surface.attachment() == Attachment::Detached {
                    self.defer(Tick::Microtask, Task::ApplyHeight { value, property });
                    return Ok(());
                }
                self.apply_height(Some(&value), property)
            }
        }
    }

    fn defer(&mut self, tick: Tick, task: Task) {
        if self.tasks.push(tick, task) {
            self.scheduler.wake(tick);
        }
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn add_observer(&mut self, observer: ObserverHandle) {
        self.observers.register(observer);
    }

    /// Returns false if the observer was not registered
    pub fn remove_observer(&mut self, observer: &ObserverHandle) -> bool {
        self.observers.unregister(observer)
    }

    pub fn notify_observers(&self, event: LayoutEvent) -> Result<()> {
        self.observers.notify(event, self)
    }

    /// Notify by event name
    ///
    /// # Errors
    /// `UnknownEvent` for names other than `columns` and `scrollable`.
    pub fn notify_observers_named(&self, event: &str) -> Result<()> {
        self.observers.notify_named(event, self)
    }
}

impl fmt::Debug for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableLayout")
            .field("state", &self.state)
            .field("store", &self.store)
            .field("tasks", &self.tasks)
            .field("resolver", &self.resolver)
            .field("observers", &self.observers)
            .field("fit", &self.fit)
            .field("show_header", &self.show_header)
            .field("table_layout", &self.table_layout)
            .field("is_finish", &self.is_finish)
            .finish_non_exhaustive()
    }
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

    struct StaticSurface(Measurements);

    impl Surface for StaticSurface {
        fn attachment(&self) -> Attachment {
            Attachment::Visible
        }

        fn measure(&self) -> Measurements {
            self.0.clone()
        }

        fn apply_height(&mut self, _property: HeightProperty, _css: &str) {}
    }

    #[test]
    fn test_missing_table() {
        let err = TableLayout::builder()
            .store(ColumnStore::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::MissingTable));
        assert_eq!(err.to_string(), "Table is required for Table Layout");
    }

    #[test]
    fn test_missing_store() {
        let err = TableLayout::builder()
            .table(StaticSurface(Measurements::default()))
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::MissingStore));
        assert_eq!(err.to_string(), "Store is required for Table Layout");
    }

    #[test]
    fn test_defaults() {
        let layout = TableLayout::builder()
            .table(StaticSurface(Measurements::default()))
            .store(ColumnStore::default())
            .build()
            .unwrap();
        assert!(layout.fit());
        assert!(layout.show_header());
        assert_eq!(layout.table_layout(), TableLayoutMode::Fixed);
        assert_eq!(layout.state().header_height, Some(44.0));
        assert_eq!(layout.state().footer_height, Some(44.0));
        assert_eq!(layout.state().height, None);
        assert_eq!(layout.resolver_phase(), ResolverPhase::Idle);
    }

    #[test]
    fn test_config_from_json() {
        let config = LayoutConfig::from_json(
            r#"{"fit":false,"showHeader":false,"gutterWidth":17,"headerHeight":50,"height":"60%","unknownOption":1}"#,
        )
        .unwrap();
        let layout = TableLayout::builder()
            .table(StaticSurface(Measurements::default()))
            .store(ColumnStore::default())
            .config(config)
            .build()
            .unwrap();
        assert!(!layout.fit());
        assert!(!layout.show_header());
        assert_eq!(layout.state().gutter_width, 17.0);
        assert_eq!(layout.state().header_height, Some(50.0));
        assert_eq!(layout.state().height, Some(HeightValue::Css("60%".into())));
        assert_eq!(layout.state().footer_height, Some(44.0));
    }

    #[test]
    fn test_invalid_config() {
        let err = LayoutConfig::from_json(r#"{"fit":"yes"}"#).unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
    }
}
