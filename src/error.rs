//! Structured error types for calview.
//!
//! Layout computation itself never fails — every geometry path produces a
//! numeric result. Errors surface only at the configuration boundary.

/// All errors that can occur while configuring and running the layout engine.
#[derive(Debug, thiserror::Error)]
pub enum CalviewError {
    /// Unknown IANA timezone name.
    #[error("Invalid timezone: {0}")]
    Timezone(String),

    /// Caller contract violation in the view configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An event accessor could not produce an instant.
    #[error("Event accessor failed: {0}")]
    Accessor(String),

    /// Unparseable date input at the JSON boundary.
    #[error("Invalid date: {0}")]
    Date(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CalviewError>;

impl From<String> for CalviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for CalviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<CalviewError> for wasm_bindgen::JsValue {
    fn from(e: CalviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
