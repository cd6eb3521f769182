//! Dataset loader
//!
//! Builds the merged lookup table from the base and overlay workbooks.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CepError, Result};

use super::xlsx::{self, Sheet};
use super::{missing_from_all, HeaderMap, NormalizedRecord, Record, Source, Table};

/// Locations of the two workbooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    /// Mandatory base dataset
    pub base: PathBuf,

    /// Optional overlay dataset (user submissions)
    pub overlay: PathBuf,
}

impl DatasetPaths {
    pub fn new(base: impl Into<PathBuf>, overlay: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            overlay: overlay.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_path, &config.overlay_path)
    }
}

/// Load base + overlay into one normalized table
///
/// Steps:
/// 1. Read the base workbook (must exist)
/// 2. Read the overlay workbook (absent = empty, canonical columns)
/// 3. Check the two headers together provide every required column
/// 4. Append base rows, then overlay rows, computing keys for each
///
/// A column missing from one sheet but present in the other reads as empty
/// text for that sheet's rows.
pub fn load_tables(paths: &DatasetPaths) -> Result<Table> {
    // Step 1: Base dataset is mandatory
    if !paths.base.exists() {
        return Err(CepError::MissingBaseFile {
            path: absolute(&paths.base),
        });
    }
    let base = xlsx::read_sheet(&paths.base)?;

    // Step 2: Overlay is optional
    let overlay = if paths.overlay.exists() {
        xlsx::read_sheet(&paths.overlay)?
    } else {
        Sheet::default()
    };

    // Step 3: Columns are checked on the concatenated result
    let base_map = HeaderMap::resolve(&base.header);
    let overlay_map = overlay_header(&overlay);
    let missing = missing_from_all(&[base_map, overlay_map]);
    if !missing.is_empty() {
        return Err(CepError::MissingColumns {
            missing: missing.iter().map(|c| c.header().to_string()).collect(),
        });
    }

    // Step 4: Concatenate in source order
    let mut table = Table::new();
    table.extend(
        base.rows
            .iter()
            .map(|row| NormalizedRecord::new(base_map.record(row), Source::Base)),
    );
    table.extend(
        overlay
            .rows
            .iter()
            .map(|row| NormalizedRecord::new(overlay_map.record(row), Source::Overlay)),
    );

    tracing::debug!(
        "Loaded {} rows ({} base, {} overlay)",
        table.len(),
        base.rows.len(),
        overlay.rows.len()
    );

    Ok(table)
}

/// Read the overlay workbook as plain records (for appending and rewriting)
///
/// The file is rewritten with the canonical header, so extra columns are
/// not carried over and absent required columns come back as empty text.
pub fn read_overlay(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let sheet = xlsx::read_sheet(path)?;
    let map = overlay_header(&sheet);
    Ok(sheet.rows.iter().map(|row| map.record(row)).collect())
}

/// An overlay with no header row has the layout this service writes
fn overlay_header(sheet: &Sheet) -> HeaderMap {
    if sheet.header.is_empty() {
        HeaderMap::canonical()
    } else {
        HeaderMap::resolve(&sheet.header)
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
