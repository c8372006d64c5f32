//! Row projection: source rows to [`CityRecord`]s.

use csv::StringRecord;

use crate::error::CsvResult;
use crate::models::{CityRecord, ColumnLayout};
use crate::parser::ParsedInput;

/// Project every row through `layout`, keeping input order.
///
/// Fails on the first row that is too short; nothing is returned for the
/// rows before it.
pub fn project_rows(rows: &[StringRecord], layout: &ColumnLayout) -> CsvResult<Vec<CityRecord>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let line = row.position().map(|p| p.line()).unwrap_or(i as u64 + 1);
            CityRecord::from_row(row, layout, line)
        })
        .collect()
}

/// Pick the layout for a parsed input: by header name when a header row
/// was read, positional otherwise.
pub fn layout_for(parsed: &ParsedInput) -> CsvResult<ColumnLayout> {
    match parsed.headers {
        Some(ref headers) => ColumnLayout::from_headers(headers),
        None => Ok(ColumnLayout::positional()),
    }
}

/// Project a parsed input into city records.
pub fn project_input(parsed: &ParsedInput) -> CsvResult<Vec<CityRecord>> {
    let layout = layout_for(parsed)?;
    project_rows(&parsed.rows, &layout)
}
