//! Delimited-text reader with encoding auto-detection.
//!
//! Turns raw input bytes into an ordered list of rows. No city-specific
//! logic here; projection happens in [`crate::transform`].

use csv::{Position, ReaderBuilder, StringRecord};
use encoding_rs::Encoding;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::transform::pipeline::ConvertOptions;

/// Rows read from one input, with metadata.
#[derive(Debug, Clone)]
pub struct ParsedInput {
    /// Header row, only set when header mode is on
    pub headers: Option<StringRecord>,
    /// Data rows in file order
    pub rows: Vec<StringRecord>,
    /// Detected encoding
    pub encoding: String,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 (which includes plain ASCII) short-circuits; anything else
/// goes through chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-15" => "iso-8859-15".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// A byte order mark is dropped. Labels `encoding_rs` does not know, and
/// bytes that are invalid in the encoding, are errors: values must come
/// out exactly as written.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let name = encoding.to_string();
    let label = chardet::charset2encoding(&name);
    let codec = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| CsvError::EncodingError(format!("unsupported encoding '{}'", encoding)))?;

    // `decode` sniffs and strips a BOM before decoding.
    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(CsvError::EncodingError(format!(
            "input is not valid {}",
            codec.name()
        )));
    }

    Ok(text.into_owned())
}

/// Split decoded content into rows.
///
/// Rows may have differing lengths; short rows are reported by the
/// projection step, which knows how many fields it needs. A blank line is
/// kept as a row with no fields, so it fails projection like any other
/// short row.
pub fn parse_rows(content: &str, options: &ConvertOptions) -> CsvResult<(Option<StringRecord>, Vec<StringRecord>)> {
    let bytes = content.as_bytes();
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();

    loop {
        let start = reader.position().clone();
        let more = reader.read_record(&mut record)?;

        // The reader skips blank lines on its way to the next record.
        let from = start.byte() as usize;
        let to = reader.position().byte() as usize;
        let after_cr = from > 0 && bytes[from - 1] == b'\r';
        push_blank_lines(&mut rows, &bytes[from..to], after_cr, start.line());

        if !more {
            break;
        }
        rows.push(record.clone());
    }

    let headers = if options.has_header {
        if rows.is_empty() {
            return Err(CsvError::NoHeaders);
        }
        Some(rows.remove(0))
    } else {
        None
    };

    Ok((headers, rows))
}

/// Push an empty row for each line terminator at the start of `raw`.
///
/// `raw` begins where the previous record ended. When that record ended
/// on `\r`, a leading `\n` belongs to it and is not a blank line.
fn push_blank_lines(rows: &mut Vec<StringRecord>, raw: &[u8], after_cr: bool, line: u64) {
    let mut i = 0;
    let mut line = line;
    if after_cr && raw.first() == Some(&b'\n') {
        i = 1;
        line += 1;
    }

    while i < raw.len() {
        match raw[i] {
            b'\r' => {
                i += 1;
                if raw.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => i += 1,
            _ => break,
        }

        let mut position = Position::new();
        position.set_line(line);
        let mut blank = StringRecord::new();
        blank.set_position(Some(position));
        rows.push(blank);
        line += 1;
    }
}

/// Parse raw input bytes with encoding auto-detection.
pub fn parse_bytes(bytes: &[u8], options: &ConvertOptions) -> CsvResult<ParsedInput> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let (headers, rows) = parse_rows(&content, options)?;

    Ok(ParsedInput {
        headers,
        rows,
        encoding,
    })
}

/// Read and parse an input file.
pub fn parse_file(path: &Path, options: &ConvertOptions) -> CsvResult<ParsedInput> {
    let bytes = std::fs::read(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_bytes(&bytes, options)
}
