//! High-level conversion API: CSV file in, JSON document out.
//!
//! # Example
//!
//! ```rust,ignore
//! use cityload::{convert, ConvertOptions};
//! use std::path::Path;
//!
//! let summary = convert(
//!     Path::new("assets/uscities.csv"),
//!     Path::new("cities.json"),
//!     &ConvertOptions::default(),
//! )?;
//! println!("Wrote {} cities", summary.record_count);
//! ```

use std::path::{Path, PathBuf};

use super::projection::project_input;
use crate::document::{to_document, write_document};
use crate::error::ConvertResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::CityRecord;
use crate::parser::{parse_bytes, parse_file, ParsedInput};

/// Options for a conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Field delimiter byte
    pub delimiter: u8,

    /// Treat the first row as a header and resolve columns by name.
    /// Off by default: every row, including the first, is a city.
    pub has_header: bool,

    /// Pretty-print the output document
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: false,
            pretty: false,
        }
    }
}

/// What a conversion did
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoding: String,
    pub record_count: usize,
    pub bytes_written: usize,
}

/// Convert a CSV file into a JSON document at `output`.
///
/// The whole input is read and projected before anything is written. If
/// any row is malformed the call fails and `output` is left as it was.
pub fn convert(input: &Path, output: &Path, options: &ConvertOptions) -> ConvertResult<ConvertSummary> {
    log_info(format!("📖 Reading {}", input.display()));
    let parsed = parse_file(input, options)?;
    log_parsed(&parsed);

    let records = project_input(&parsed)?;
    log_success(format!("Projected {} city records", records.len()));

    let document = to_document(&records, options.pretty)?;
    write_document(output, &document)?;
    log_success(format!("💾 Wrote {} ({} bytes)", output.display(), document.len()));

    Ok(ConvertSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        encoding: parsed.encoding,
        record_count: records.len(),
        bytes_written: document.len(),
    })
}

/// Convert CSV bytes into records, without touching the filesystem.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> ConvertResult<Vec<CityRecord>> {
    let parsed = parse_bytes(bytes, options)?;
    Ok(project_input(&parsed)?)
}

fn log_parsed(parsed: &ParsedInput) {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Read {} rows", parsed.rows.len()));

    match parsed.headers {
        Some(ref headers) => {
            log_info("📋 Header columns:");
            for (i, col) in headers.iter().enumerate() {
                log_info_indent(format!("[{:2}] {}", i, col), 1);
            }
        }
        None => {
            if parsed.rows.first().is_some_and(looks_like_header) {
                log_warning("First row looks like a header; it is kept as a city (use --header to skip it)");
            }
        }
    }
}

/// Population is the last column read; a header row has text there.
fn looks_like_header(row: &csv::StringRecord) -> bool {
    row.get(8)
        .is_some_and(|v| !v.trim().is_empty() && v.trim().parse::<f64>().is_err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConvertError, CsvError};
    use serde_json::{json, Value};

    const SPRINGFIELD: &str = "Springfield,,IL,Illinois,Sangamon County,Sangamon,39.78,-89.65,117352\n";

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.delimiter, b',');
        assert!(!opts.has_header);
        assert!(!opts.pretty);
    }

    #[test]
    fn test_springfield_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("uscities.csv");
        let output = dir.path().join("cities.json");
        std::fs::write(&input, SPRINGFIELD).unwrap();

        let summary = convert(&input, &output, &ConvertOptions::default()).unwrap();
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.encoding, "utf-8");

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written,
            json!([{
                "name": "Springfield",
                "state_id": "IL",
                "state_name": "Illinois",
                "county_name": "Sangamon",
                "lat": "39.78",
                "lng": "-89.65",
                "population": "117352"
            }])
        );
    }

    #[test]
    fn test_short_row_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("uscities.csv");
        let output = dir.path().join("cities.json");
        std::fs::write(&input, format!("{}a,b,c,d,e\n", SPRINGFIELD)).unwrap();

        let err = convert(&input, &output, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Csv(CsvError::MalformedRow { line: 2, found: 5, required: 9 })
        ));
        assert!(!output.exists());

        std::fs::write(&output, "previous").unwrap();
        convert(&input, &output, &ConvertOptions::default()).unwrap_err();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn test_empty_input_gives_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        let output = dir.path().join("cities.json");
        std::fs::write(&input, "").unwrap();

        let summary = convert(&input, &output, &ConvertOptions::default()).unwrap();
        assert_eq!(summary.record_count, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
    }

    #[test]
    fn test_missing_input_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cities.json");

        let err = convert(&dir.path().join("missing.csv"), &output, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Csv(CsvError::Io { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_header_row_kept_by_default() {
        let csv = format!(
            "city,city_ascii,state_id,state_name,county_fips,county_name,lat,lng,population\n{}",
            SPRINGFIELD
        );
        let records = convert_bytes(csv.as_bytes(), &ConvertOptions::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "city");
        assert_eq!(records[0].population, "population");
        assert!(looks_like_header(&csv::StringRecord::from(vec![
            "city", "", "", "", "", "", "", "", "population"
        ])));
    }

    #[test]
    fn test_blank_line_fails_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("uscities.csv");
        let output = dir.path().join("cities.json");
        std::fs::write(&input, "A,,AA,Alpha,,Ac,1,2,3\n\nB,,BB,Beta,,Bc,4,5,6\n").unwrap();

        let err = convert(&input, &output, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Csv(CsvError::MalformedRow { line: 2, found: 0, required: 9 })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_cyrillic_input_is_not_mangled() {
        let mut csv = Vec::new();
        for _ in 0..20 {
            // "Москва,,MO,Московская область,,Москва,55.75,37.61,12655050" in Windows-1251
            csv.extend_from_slice(&[
                204, 238, 241, 234, 226, 224, 44, 44, 77, 79, 44, 204, 238, 241, 234, 238, 226, 241,
                234, 224, 255, 32, 238, 225, 235, 224, 241, 242, 252, 44, 44, 204, 238, 241, 234, 226,
                224,
            ]);
            csv.extend_from_slice(b",55.75,37.61,12655050\n");
        }

        match convert_bytes(&csv, &ConvertOptions::default()) {
            Ok(records) => {
                assert_eq!(records.len(), 20);
                assert!(!records[0].name.contains('\u{FFFD}'));
                assert!(!records[0].state_name.contains('\u{FFFD}'));
            }
            Err(err) => assert!(matches!(err, ConvertError::Csv(CsvError::EncodingError(_)))),
        }
    }

    #[test]
    fn test_header_mode_resolves_by_name() {
        let csv = "population,name,state_id,state_name,county_name,lat,lng\n117352,Springfield,IL,Illinois,Sangamon,39.78,-89.65\n";
        let opts = ConvertOptions {
            has_header: true,
            ..ConvertOptions::default()
        };
        let records = convert_bytes(csv.as_bytes(), &opts).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Springfield");
        assert_eq!(records[0].population, "117352");
        assert_eq!(records[0].lng, "-89.65");
    }

    #[test]
    fn test_pretty_output_parses_to_same_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("uscities.csv");
        let compact = dir.path().join("compact.json");
        let pretty = dir.path().join("pretty.json");
        std::fs::write(&input, SPRINGFIELD.repeat(3)).unwrap();

        convert(&input, &compact, &ConvertOptions::default()).unwrap();
        let opts = ConvertOptions {
            pretty: true,
            ..ConvertOptions::default()
        };
        convert(&input, &pretty, &opts).unwrap();

        let a = crate::document::read_document(&compact).unwrap();
        let b = crate::document::read_document(&pretty).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a, b);
    }
}
