//! Error types for kb-builder
//!
//! Data-quality problems (OCR garbage, short or malformed records) are filtered
//! rather than reported here. What remains are structural failures: bad
//! configuration and I/O.

use thiserror::Error;

/// Main error type for knowledge base operations
#[derive(Error, Debug)]
pub enum KbError {
    /// Text processing errors
    #[error("Text processing error: {0}")]
    TextProcessing(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for knowledge base operations
pub type Result<T> = std::result::Result<T, KbError>;
