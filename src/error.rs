//! Structured error types for table-layout.
//!
//! Only programming and construction mistakes surface as errors. A surface
//! that is not yet measurable is never an error; the height resolver simply
//! retries later.

/// All errors that can occur while building or driving a table layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The owning table (rendering surface) was not supplied.
    #[error("Table is required for Table Layout")]
    MissingTable,

    /// The backing column store was not supplied.
    #[error("Store is required for Table Layout")]
    MissingStore,

    /// An event name that no observer hook exists for.
    #[error("Table Layout don't have event {0}.")]
    UnknownEvent(String),

    /// A column key that is not present in the store.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Layout configuration could not be decoded.
    #[error("Invalid layout config: {0}")]
    Config(#[from] serde_json::Error),

    /// An observer hook failed; dispatch stops at the first failure.
    #[error("Observer failed: {0}")]
    Observer(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

#[cfg(target_arch = "wasm32")]
impl From<LayoutError> for wasm_bindgen::JsValue {
    fn from(e: LayoutError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
