//! Error types for the clinlookup library.
//!
//! `ClinError` covers I/O, parsing and transport problems. Resolution
//! outcomes (no hits, wrong gene) are not errors; see [`crate::Failure`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for clinlookup operations.
#[derive(Debug, Error)]
pub enum ClinError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading an Excel workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// A required input column is absent.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no rows to query.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed or returned a non-success status.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Response parsed as JSON but lacked the expected structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for clinlookup operations.
pub type Result<T> = std::result::Result<T, ClinError>;
