//! Dataset Module
//!
//! Records, the merged lookup table, and the spreadsheet files behind them.
//!
//! ## Responsibilities
//! - Read the mandatory base workbook and the optional overlay workbook
//! - Validate the `Cidade` / `Estado` / `CEP` column schema
//! - Compute normalized lookup keys for every row
//! - Write the overlay workbook back to disk
//!
//! ## Table Layout
//! ```text
//! ┌──────────────────────┐
//! │ base rows            │  (cep.xlsx, file order)
//! ├──────────────────────┤
//! │ overlay rows         │  (user_ceps.xlsx, file order)
//! ├──────────────────────┤
//! │ session rows         │  (saved since the last load)
//! └──────────────────────┘
//! ```
//! Lookups return the first match, so earlier segments win.

mod loader;
mod schema;
pub mod xlsx;

pub use loader::{load_tables, read_overlay, DatasetPaths};
pub use schema::{missing_from_all, Column, HeaderMap, REQUIRED_COLUMNS};

use crate::normalize::{normalize_city, normalize_state};

/// A City/State → CEP record as stored in the spreadsheets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Record {
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Where a table row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Mandatory base workbook
    Base,
    /// Overlay workbook as it was on disk at load time
    Overlay,
    /// Saved through the service since the last load
    Session,
}

/// A record plus its lookup keys.
///
/// Keys are derived on construction and never written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    record: Record,
    city_key: String,
    state_key: String,
    source: Source,
}

impl NormalizedRecord {
    pub fn new(record: Record, source: Source) -> Self {
        let city_key = normalize_city(&record.city);
        let state_key = normalize_state(&record.state);
        Self {
            record,
            city_key,
            state_key,
            source,
        }
    }

    /// Exact key equality on both columns
    pub fn matches(&self, city_key: &str, state_key: &str) -> bool {
        self.city_key == city_key && self.state_key == state_key
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn city_key(&self) -> &str {
        &self.city_key
    }

    pub fn state_key(&self) -> &str {
        &self.state_key
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// Ordered, append-only sequence of normalized rows
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<NormalizedRecord>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row at the end (lowest lookup priority)
    pub fn push(&mut self, row: NormalizedRecord) {
        self.rows.push(row);
    }

    /// First row whose keys equal the given keys, in table order
    pub fn find(&self, city_key: &str, state_key: &str) -> Option<&NormalizedRecord> {
        self.rows.iter().find(|row| row.matches(city_key, state_key))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows that came from the given source
    pub fn count_from(&self, source: Source) -> usize {
        self.rows.iter().filter(|row| row.source == source).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRecord> {
        self.rows.iter()
    }
}

impl Extend<NormalizedRecord> for Table {
    fn extend<I: IntoIterator<Item = NormalizedRecord>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}
