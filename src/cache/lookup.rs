//! Lookup cache implementation
//!
//! `Arc<Table>` snapshots behind a parking_lot RwLock, with a separate writer
//! mutex for loads and appends.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::dataset::{load_tables, DatasetPaths, NormalizedRecord, Record, Source, Table};
use crate::error::{CepError, Result};

use super::{CacheStatus, LoadState};

/// In-memory lookup table shared by all request threads
///
/// ## Concurrency:
/// - `state`: RwLock held only to clone or replace the snapshot
/// - `write_lock`: serializes loads and appends, so concurrent saves are
///   totally ordered and none is lost
pub struct LookupCache {
    /// Workbooks the table is built from
    paths: DatasetPaths,

    /// Current load outcome
    state: RwLock<LoadState>,

    /// Held for the whole of a load or append
    write_lock: Mutex<()>,
}

impl LookupCache {
    /// Create an unloaded cache; nothing is read until the first load
    pub fn new(paths: DatasetPaths) -> Self {
        Self {
            paths,
            state: RwLock::new(LoadState::Unloaded),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the table, or return the cached one
    ///
    /// With `force_reload == false` a Ready table is returned unchanged.
    /// Otherwise the workbooks are read again and the result replaces the
    /// previous state, discarding appends that were never persisted.
    pub fn load(&self, force_reload: bool) -> Result<Arc<Table>> {
        if !force_reload {
            if let Some(table) = self.ready_table() {
                return Ok(table);
            }
        }

        let _write_guard = self.write_lock.lock();

        // Another thread may have finished a load while we waited
        if !force_reload {
            if let Some(table) = self.ready_table() {
                return Ok(table);
            }
        }

        self.load_locked()
    }

    /// Find the first row matching both keys
    ///
    /// Returns:
    /// - `Ok(Some(record))`: match found (earliest row wins)
    /// - `Ok(None)`: no row has these keys
    /// - `Err(DatasetUnavailable)`: the table could not be loaded
    pub fn search(&self, city_key: &str, state_key: &str) -> Result<Option<Record>> {
        let table = self.load(false).map_err(unavailable)?;
        Ok(table.find(city_key, state_key).map(|row| row.record().clone()))
    }

    /// Append a row and publish it to subsequent searches
    ///
    /// Loads the table first if it is not Ready. Returns the new row count.
    pub fn append(&self, row: NormalizedRecord) -> Result<usize> {
        let _write_guard = self.write_lock.lock();

        if self.ready_table().is_none() {
            self.load_locked().map_err(unavailable)?;
        }

        let mut state = self.state.write();
        match &mut *state {
            LoadState::Ready(table) => {
                // Copies only when a reader still holds the previous snapshot
                let table = Arc::make_mut(table);
                table.push(row);
                Ok(table.len())
            }
            // load_locked just stored Ready, and the writer lock is held
            LoadState::Unloaded | LoadState::Failed(_) => Err(CepError::DatasetUnavailable(
                "table not loaded".to_string(),
            )),
        }
    }

    /// Current load outcome and row counts
    pub fn status(&self) -> CacheStatus {
        match &*self.state.read() {
            LoadState::Unloaded => CacheStatus::Unloaded,
            LoadState::Ready(table) => CacheStatus::Ready {
                rows: table.len(),
                base_rows: table.count_from(Source::Base),
                overlay_rows: table.count_from(Source::Overlay),
                session_rows: table.count_from(Source::Session),
            },
            LoadState::Failed(reason) => CacheStatus::Failed {
                reason: reason.clone(),
            },
        }
    }

    /// Whether a table is currently available
    pub fn is_ready(&self) -> bool {
        self.ready_table().is_some()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn ready_table(&self) -> Option<Arc<Table>> {
        match &*self.state.read() {
            LoadState::Ready(table) => Some(Arc::clone(table)),
            LoadState::Unloaded | LoadState::Failed(_) => None,
        }
    }

    /// Run the loader and record the outcome (writer lock must be held)
    fn load_locked(&self) -> Result<Arc<Table>> {
        match load_tables(&self.paths) {
            Ok(table) => {
                let table = Arc::new(table);
                *self.state.write() = LoadState::Ready(Arc::clone(&table));
                tracing::info!("Dataset loaded: {} rows", table.len());
                Ok(table)
            }
            Err(e) => {
                *self.state.write() = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

fn unavailable(err: CepError) -> CepError {
    match err {
        CepError::DatasetUnavailable(_) => err,
        other => CepError::DatasetUnavailable(other.to_string()),
    }
}
