//! table-layout - column and height layout for table widgets
//!
//! Computes pixel layout for a table with one header row, one scrollable
//! body, an optional footer and an optional append slot:
//! - Column widths: fixed vs. flexible, left/right pinned groups, horizontal overflow
//! - Section heights: header, body, footer, append slot, viewport, vertical overflow
//! - Deferred settling passes while the table is not yet measurable
//! - Observer notification after every completed pass
//!
//! # Usage (Rust)
//!
//! ```rust,ignore
//! use table_layout::{Column, ColumnStore, TableLayout};
//!
//! let mut layout = TableLayout::builder()
//!     .table(surface)
//!     .store(ColumnStore::new(vec![Column::new("name"), Column::new("age").with_width(80.0)]))
//!     .build()?;
//! layout.do_layout()?;
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { LayoutView } from 'table-layout';
//! await init();
//! const view = new LayoutView(root, columns, { fit: true });
//! view.onColumns(() => render(view));
//! view.setHeight(400);
//! ```

pub mod engine;
pub mod error;
pub mod layout;
pub mod observer;
pub mod scheduler;
pub mod surface;
pub mod types;

// Browser binding (DOM surface, requestAnimationFrame scheduling)
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use engine::{LayoutConfig, TableLayout, TableLayoutBuilder};
pub use error::{LayoutError, Result};
pub use layout::{HeightResolver, ResolveOutcome, ResolverPhase, WidthDistribution};
pub use observer::{Callbacks, LayoutEvent, LayoutObserver, ObserverHandle, ObserverRegistry};
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskQueue, Tick};
pub use surface::{Attachment, Measurements, Surface, TableLayoutMode};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::LayoutView;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
