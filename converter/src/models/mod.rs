//! Domain models for the conversion.
//!
//! - [`CityRecord`] - One projected city row with the seven output keys
//! - [`ColumnLayout`] - Where each output key is read from in a source row

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{CsvError, CsvResult};

/// Output keys, in serialization order.
pub const FIELD_NAMES: [&str; 7] = [
    "name",
    "state_id",
    "state_name",
    "county_name",
    "lat",
    "lng",
    "population",
];

// =============================================================================
// City Record
// =============================================================================

/// A city projected out of one input row.
///
/// Values are kept verbatim as text. `lat`, `lng` and `population` are
/// not parsed; whatever the source row holds is what the document gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityRecord {
    pub name: String,
    pub state_id: String,
    pub state_name: String,
    pub county_name: String,
    pub lat: String,
    pub lng: String,
    pub population: String,
}

impl CityRecord {
    /// Project a source row through `layout`.
    ///
    /// `line` is the 1-based line the row came from and is only used for
    /// error reporting.
    pub fn from_row(row: &StringRecord, layout: &ColumnLayout, line: u64) -> CsvResult<Self> {
        let required = layout.required_fields();
        if row.len() < required {
            return Err(CsvError::MalformedRow {
                line,
                found: row.len(),
                required,
            });
        }

        // Length checked above, every index is in range.
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();

        Ok(Self {
            name: field(layout.name),
            state_id: field(layout.state_id),
            state_name: field(layout.state_name),
            county_name: field(layout.county_name),
            lat: field(layout.lat),
            lng: field(layout.lng),
            population: field(layout.population),
        })
    }
}

// =============================================================================
// Column Layout
// =============================================================================

/// Source column index for each output key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub state_id: usize,
    pub state_name: usize,
    pub county_name: usize,
    pub lat: usize,
    pub lng: usize,
    pub population: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::positional()
    }
}

impl ColumnLayout {
    /// The fixed layout of the uscities dataset: columns 0, 2, 3, 5, 6, 7, 8.
    pub const fn positional() -> Self {
        Self {
            name: 0,
            state_id: 2,
            state_name: 3,
            county_name: 5,
            lat: 6,
            lng: 7,
            population: 8,
        }
    }

    /// Resolve the layout by column name from a header row.
    ///
    /// The city name column is accepted as either `city` or `name`.
    /// Header names are compared after trimming, case-insensitively.
    pub fn from_headers(headers: &StringRecord) -> CsvResult<Self> {
        let find = |candidates: &[&str]| -> CsvResult<usize> {
            headers
                .iter()
                .position(|h| {
                    let h = h.trim();
                    candidates.iter().any(|c| h.eq_ignore_ascii_case(c))
                })
                .ok_or_else(|| CsvError::MissingColumn(candidates[0].to_string()))
        };

        Ok(Self {
            name: find(&["city", "name"])?,
            state_id: find(&["state_id"])?,
            state_name: find(&["state_name"])?,
            county_name: find(&["county_name"])?,
            lat: find(&["lat"])?,
            lng: find(&["lng"])?,
            population: find(&["population"])?,
        })
    }

    /// Minimum number of fields a row needs under this layout.
    pub fn required_fields(&self) -> usize {
        [
            self.name,
            self.state_id,
            self.state_name,
            self.county_name,
            self.lat,
            self.lng,
            self.population,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}
