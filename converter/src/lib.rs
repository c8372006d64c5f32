//! # Cityload - US cities CSV to JSON
//!
//! Cityload reads the comma-delimited cities dataset and writes it out as
//! one JSON array of city objects, keeping row order.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│ Projection  │────▶│  JSON File  │
//! │  (any enc)  │     │  (csv rows) │     │ (7 columns) │     │  (atomic)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cityload::{convert, ConvertOptions};
//! use std::path::Path;
//!
//! let summary = convert(
//!     Path::new("assets/uscities.csv"),
//!     Path::new("cities.json"),
//!     &ConvertOptions::default(),
//! ).unwrap();
//! println!("Converted {} cities", summary.record_count);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - City record and column layout
//! - [`parser`] - CSV reading with encoding detection
//! - [`transform`] - Projection and the conversion pipeline
//! - [`document`] - JSON document writing and checking
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Input
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod document;

pub mod logs;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConvertError, ConvertResult, CsvError, DocumentError};

pub use models::{CityRecord, ColumnLayout, FIELD_NAMES};

pub use parser::{decode_content, detect_encoding, parse_bytes, parse_file, ParsedInput};

pub use transform::{convert, convert_bytes, project_rows, ConvertOptions, ConvertSummary};

pub use document::{check_value, parse_document, read_document, to_document, write_document};
