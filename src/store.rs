//! Record Store
//!
//! Accepts user-submitted records.
//!
//! ## Two-phase save
//! 1. Memory: the record is appended to the lookup cache and is visible to
//!    searches right away
//! 2. Disk: the overlay workbook is re-read, extended and atomically replaced
//!
//! A failed disk phase never undoes the memory phase; it only changes the
//! outcome from `Durable` to `MemoryOnly`. Both phases run under one lock, so
//! concurrent saves reach the file in the order they reached memory.

use std::path::PathBuf;

use parking_lot::Mutex;

use crate::cache::LookupCache;
use crate::dataset::xlsx::write_records;
use crate::dataset::{read_overlay, NormalizedRecord, Record, Source};
use crate::error::{CepError, Result};

/// Reply text when the overlay file was written
pub const MSG_SAVED: &str = "CEP salvo com sucesso!";

/// Reply text when only the in-memory table has the record
pub const MSG_SAVED_IN_MEMORY: &str = "CEP salvo em memória.";

/// Reply text when a field is missing
pub const MSG_REQUIRED_FIELDS: &str = "Cidade, estado e CEP são obrigatórios.";

/// How far a save got
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// In memory and in the overlay workbook
    Durable,

    /// In memory only; lost on restart or forced reload
    MemoryOnly { reason: String },
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// The record as stored (trimmed, city/state upper-cased)
    pub record: Record,

    pub persistence: Persistence,
}

impl SaveOutcome {
    pub fn persisted(&self) -> bool {
        self.persistence == Persistence::Durable
    }

    /// User-facing message for this outcome
    pub fn message(&self) -> &'static str {
        if self.persisted() {
            MSG_SAVED
        } else {
            MSG_SAVED_IN_MEMORY
        }
    }
}

/// Appends submitted records to the cache and the overlay workbook
pub struct RecordStore {
    /// Overlay workbook path
    overlay_path: PathBuf,

    /// Held from the in-memory append through the overlay write, so the file
    /// receives rows in the same order as the table
    persist_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(overlay_path: impl Into<PathBuf>) -> Self {
        Self {
            overlay_path: overlay_path.into(),
            persist_lock: Mutex::new(()),
        }
    }

    /// Trim and check the three fields, producing the record to store
    pub fn validate(city: &str, state: &str, postal_code: &str) -> Result<Record> {
        let city = city.trim();
        let state = state.trim();
        let postal_code = postal_code.trim();

        if city.is_empty() || state.is_empty() || postal_code.is_empty() {
            return Err(CepError::Validation(MSG_REQUIRED_FIELDS.to_string()));
        }

        Ok(Record::new(
            city.to_uppercase(),
            state.to_uppercase(),
            postal_code,
        ))
    }

    /// Save a record
    ///
    /// Steps:
    /// 1. Validate (nothing is touched on failure)
    /// 2. Append to the cache (loads it first if needed)
    /// 3. Persist to the overlay workbook, tolerating failure
    ///
    /// The persistence lock is held across steps 2 and 3, so rows reach the
    /// overlay file in the order they were appended in memory.
    pub fn save(
        &self,
        cache: &LookupCache,
        city: &str,
        state: &str,
        postal_code: &str,
    ) -> Result<SaveOutcome> {
        // Step 1: Validate
        let record = Self::validate(city, state, postal_code)?;

        let _persist_guard = self.persist_lock.lock();

        // Step 2: Memory
        let rows = cache.append(NormalizedRecord::new(record.clone(), Source::Session))?;
        tracing::debug!(
            "Appended {}/{} -> {} ({} rows)",
            record.city,
            record.state,
            record.postal_code,
            rows
        );

        // Step 3: Disk
        let persistence = match self.append_to_overlay(&record) {
            Ok(()) => Persistence::Durable,
            Err(e) => {
                tracing::warn!(
                    "Could not write {}: {}",
                    self.overlay_path.display(),
                    e
                );
                Persistence::MemoryOnly {
                    reason: e.to_string(),
                }
            }
        };

        Ok(SaveOutcome {
            record,
            persistence,
        })
    }

    /// Append one record to the overlay workbook (persistence lock must be held)
    ///
    /// The file on disk is authoritative: it is re-read each time, so rows
    /// held only in memory are not written by a later save.
    fn append_to_overlay(&self, record: &Record) -> Result<()> {
        let mut records = read_overlay(&self.overlay_path).map_err(persistence)?;
        records.push(record.clone());
        write_records(&self.overlay_path, &records).map_err(persistence)?;

        tracing::trace!(
            "Overlay {} now has {} rows",
            self.overlay_path.display(),
            records.len()
        );
        Ok(())
    }
}

fn persistence(err: CepError) -> CepError {
    match err {
        CepError::Persistence(_) => err,
        other => CepError::Persistence(other.to_string()),
    }
}
