//! Layout state shared by the width distributor and the height resolver.

use serde::Serialize;

use super::HeightValue;

/// Default header and footer height (px) before anything is measured.
pub const DEFAULT_SECTION_HEIGHT: f64 = 44.0;

/// Mutable layout cells owned by the engine.
///
/// `None` means "never computed", which is distinct from a computed zero.
/// The width distributor writes `scroll_x`, `body_width`, `fixed_width` and
/// `right_fixed_width`; the height resolver writes the height cells and
/// `scroll_y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    /// Configured table height (`None` until a height is requested)
    pub height: Option<HeightValue>,
    /// Columns overflow the container horizontally
    pub scroll_x: bool,
    /// Body overflows vertically
    pub scroll_y: bool,
    pub body_width: Option<f64>,
    /// Total width of left-pinned columns
    pub fixed_width: Option<f64>,
    /// Total width of right-pinned columns
    pub right_fixed_width: Option<f64>,
    /// Client height of the table root
    pub table_height: Option<f64>,
    pub header_height: Option<f64>,
    pub append_height: Option<f64>,
    pub footer_height: Option<f64>,
    /// Table height minus the horizontal scrollbar
    pub viewport_height: Option<f64>,
    /// Table height minus header and footer
    pub body_height: Option<f64>,
    pub body_scroll_height: f64,
    /// Body height minus the horizontal scrollbar
    pub fixed_body_height: Option<f64>,
    /// Space reserved for a scrollbar on this platform
    pub gutter_width: f64,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            height: None,
            scroll_x: false,
            scroll_y: false,
            body_width: None,
            fixed_width: None,
            right_fixed_width: None,
            table_height: None,
            header_height: Some(DEFAULT_SECTION_HEIGHT),
            append_height: Some(0.0),
            footer_height: Some(DEFAULT_SECTION_HEIGHT),
            viewport_height: None,
            body_height: None,
            body_scroll_height: 0.0,
            fixed_body_height: None,
            gutter_width: 0.0,
        }
    }
}

impl LayoutState {
    /// True once a height has been configured for the table
    pub fn has_height(&self) -> bool {
        self.height.is_some()
    }
}
