//! JSON document handling.
//!
//! The output document is a top-level array of objects, each with exactly
//! the keys in [`FIELD_NAMES`] and string values.
//!
//! # Example
//!
//! ```rust,ignore
//! use cityload::document::{parse_document, to_document};
//!
//! let records = parse_document(r#"[{"name":"Austin","state_id":"TX",...}]"#)?;
//! let again = to_document(&records, false)?;
//! ```

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{ConvertError, ConvertResult, DocumentError, DocumentResult};
use crate::models::{CityRecord, FIELD_NAMES};

/// Serialize records into a document.
///
/// Keys follow [`FIELD_NAMES`] order, so the same records always produce
/// the same bytes.
pub fn to_document(records: &[CityRecord], pretty: bool) -> DocumentResult<String> {
    let document = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    Ok(document)
}

/// Write a document to `path`, replacing any existing file.
///
/// The content lands in a temporary file next to the target first and is
/// then renamed over it, so a failed write never leaves a truncated
/// document. An existing target keeps its permissions, and a symlinked
/// `path` is written through to the file it points at. New files get
/// mode 0644 (less the umask) on unix.
pub fn write_document(path: &Path, document: &str) -> ConvertResult<()> {
    let write_err = |source: std::io::Error| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path).map_err(write_err)?,
        _ => path.to_path_buf(),
    };
    let existing = fs::metadata(&target).ok().map(|meta| meta.permissions());

    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".cityload-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }

    let mut file = builder.tempfile_in(dir).map_err(write_err)?;
    if let Some(permissions) = existing {
        file.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    file.write_all(document.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    file.persist(&target).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Check that a JSON value has the document shape.
pub fn check_value(value: &Value) -> DocumentResult<usize> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(DocumentError::NotAnArray(type_name(other))),
    };

    for (index, item) in items.iter().enumerate() {
        let invalid = |message: String| DocumentError::InvalidRecord { index, message };

        let obj = item
            .as_object()
            .ok_or_else(|| invalid(format!("expected an object, found {}", type_name(item))))?;

        for key in FIELD_NAMES {
            match obj.get(key) {
                None => return Err(invalid(format!("missing key '{}'", key))),
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(invalid(format!(
                        "key '{}' must be a string, found {}",
                        key,
                        type_name(other)
                    )))
                }
            }
        }

        if let Some(extra) = obj.keys().find(|k| !FIELD_NAMES.contains(&k.as_str())) {
            return Err(invalid(format!("unexpected key '{}'", extra)));
        }
    }

    Ok(items.len())
}

/// Parse document text into records, checking its shape first.
pub fn parse_document(content: &str) -> DocumentResult<Vec<CityRecord>> {
    let value: Value = serde_json::from_str(content)?;
    check_value(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Load a document from disk.
pub fn read_document(path: &Path) -> ConvertResult<Vec<CityRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_document(&content)?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
