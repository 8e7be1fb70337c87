//! Boundary to the rendering surface the table is drawn on.
//!
//! The engine never touches elements directly. It asks the surface whether
//! the table is mounted, takes a [`Measurements`] snapshot per settling pass,
//! and hands computed style values back through [`Surface::apply_height`].

use serde::{Deserialize, Serialize};

use crate::types::HeightProperty;

/// Mount state of the table root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attachment {
    /// Root element not attached yet; measurements are meaningless
    #[default]
    Detached,
    /// Attached but the wrapper is `display: none`
    Hidden,
    Visible,
}

/// One snapshot of the box metrics the height resolver reads.
///
/// Wrapper heights are `None` when the corresponding element does not exist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Measurements {
    /// `clientWidth` of the table root
    pub client_width: f64,
    /// `clientHeight` of the table root
    pub client_height: f64,
    /// `offsetHeight` of the header wrapper
    pub header_wrapper: Option<f64>,
    /// Header row is hidden through itself or an ancestor
    pub header_hidden: bool,
    /// `offsetHeight` of the footer wrapper
    pub footer_wrapper: Option<f64>,
    /// `offsetHeight` of the append slot wrapper
    pub append_wrapper: Option<f64>,
    /// `scrollHeight` of the body table
    pub body_scroll_height: Option<f64>,
    /// `scrollHeight` of the body wrapper
    pub body_wrapper_scroll_height: Option<f64>,
}

/// Table-layout mode of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayoutMode {
    /// Column widths come from this engine; headers must be measured
    #[default]
    Fixed,
    /// The browser sizes columns from content
    Auto,
}

/// A measurement-capable rendering surface
pub trait Surface {
    /// False in non-interactive contexts (server-side rendering); layout is skipped
    fn is_interactive(&self) -> bool {
        true
    }

    fn attachment(&self) -> Attachment;

    /// Read the current box metrics
    fn measure(&self) -> Measurements;

    /// Write a height style property on the table root
    fn apply_height(&mut self, property: HeightProperty, css: &str);
}
