//! Report generation errors.
//!
//! Only structural problems surface here. Per-field formatting failures are
//! rendered as "N/A" through [`crate::datetime::FieldText`] and never become
//! errors; page overflow is handled by pagination.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("Non-finite value for {field}: {value}")]
    NonFinite { field: String, value: f64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Canvas error: {0}")]
    Canvas(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
