//! Error types for the cityload conversion pipeline.
//!
//! - [`CsvError`] - Reading, decoding and projecting input rows
//! - [`DocumentError`] - Building, writing back and checking JSON documents
//! - [`ConvertError`] - Top-level conversion errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading the delimited input.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input bytes could not be decoded exactly.
    #[error("Failed to decode input: {0}")]
    EncodingError(String),

    /// The csv reader rejected the input.
    #[error("Invalid CSV at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// A row is too short for the column layout.
    #[error("Malformed row at line {line}: found {found} fields, need at least {required}")]
    MalformedRow {
        line: u64,
        found: usize,
        required: usize,
    },

    /// Header mode is on but a required column is not in the header row.
    #[error("Header row has no '{0}' column")]
    MissingColumn(String),

    /// Header mode is on but the input has no rows at all.
    #[error("No header row found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Document Errors
// =============================================================================

/// Errors on the JSON side of the conversion.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is not an array.
    #[error("Document must be a JSON array, found {0}")]
    NotAnArray(&'static str),

    /// An element does not have the city record shape.
    #[error("Record {index}: {message}")]
    InvalidRecord { index: usize, message: String },
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::convert`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input side failed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Document side failed.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Output could not be written.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be read back.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
