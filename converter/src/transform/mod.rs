//! Transformation module.
//!
//! - Projection: source rows to city records
//! - Pipeline: file to file conversion

pub mod projection;
pub mod pipeline;

pub use projection::{layout_for, project_input, project_rows};
pub use pipeline::*;
