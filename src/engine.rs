//! Engine Module
//!
//! The core service object that coordinates all components.
//!
//! ## Responsibilities
//! - Load the dataset on startup without aborting on failure
//! - Normalize search inputs and query the lookup cache
//! - Route saves through the record store
//! - Forced reloads

use std::path::PathBuf;

use crate::cache::{CacheStatus, LookupCache};
use crate::config::Config;
use crate::dataset::{DatasetPaths, Record};
use crate::error::Result;
use crate::normalize::{normalize_city, normalize_state};
use crate::protocol::{Command, ReloadReply, Reply, SaveReply, SearchReply};
use crate::store::{RecordStore, SaveOutcome};

/// The lookup service
///
/// ## Concurrency Model
///
/// - **Searches**: clone the current table snapshot, then scan without locks
/// - **Saves / reloads**: serialized by the cache's writer lock
/// - **Overlay writes**: serialized by the record store's persistence lock
///
/// All methods take `&self`; share the engine across threads with `Arc`.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Merged base + overlay table
    cache: LookupCache,

    /// Overlay persistence
    store: RecordStore,
}

impl Engine {
    /// Create an engine and attempt the initial load
    ///
    /// A dataset that cannot be loaded does not fail this call: the error is
    /// logged, the cache records it, and every lookup or save retries.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let cache = LookupCache::new(DatasetPaths::from_config(&config));
        let store = RecordStore::new(&config.overlay_path);

        match cache.load(true) {
            Ok(table) => {
                tracing::info!(
                    "Datasets ready: {} rows from {} + {}",
                    table.len(),
                    config.base_path.display(),
                    config.overlay_path.display()
                );
            }
            Err(e) => {
                tracing::warn!("Failed to load datasets at startup: {}", e);
            }
        }

        Ok(Self {
            config,
            cache,
            store,
        })
    }

    /// Open with explicit dataset paths (convenience method)
    ///
    /// Uses default config with the specified workbooks
    pub fn open_paths(base: impl Into<PathBuf>, overlay: impl Into<PathBuf>) -> Result<Self> {
        let config = Config::builder()
            .base_path(base)
            .overlay_path(overlay)
            .build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Search { city, state } => {
                let reply = match self.search(&city, &state)? {
                    Some(record) => SearchReply::found(record.postal_code),
                    None => SearchReply::not_found(),
                };
                Ok(Reply::Search(reply))
            }
            Command::Save {
                city,
                state,
                postal_code,
            } => {
                let outcome = self.save(&city, &state, &postal_code)?;
                Ok(Reply::Save(SaveReply::saved(&outcome)))
            }
            Command::Reload => {
                let rows = self.reload()?;
                Ok(Reply::Reload(ReloadReply::reloaded(rows)))
            }
        }
    }

    /// Look up a city/state
    ///
    /// City matching ignores case and diacritics; state matching ignores case.
    /// The first matching row wins (base before overlay, earlier before later).
    pub fn search(&self, city: &str, state: &str) -> Result<Option<Record>> {
        let city_key = normalize_city(city);
        let state_key = normalize_state(state);

        let hit = self.cache.search(&city_key, &state_key)?;
        tracing::debug!("search {}/{}: {}", city_key, state_key, hit.is_some());
        Ok(hit)
    }

    /// Save a record: memory first, then best-effort to the overlay file
    pub fn save(&self, city: &str, state: &str, postal_code: &str) -> Result<SaveOutcome> {
        self.store.save(&self.cache, city, state, postal_code)
    }

    /// Re-read both workbooks, returning the new row count
    ///
    /// Rows saved in memory but never written to the overlay are dropped.
    pub fn reload(&self) -> Result<usize> {
        let table = self.cache.load(true)?;
        tracing::info!("Datasets reloaded: {} rows", table.len());
        Ok(table.len())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Current cache state
    pub fn status(&self) -> CacheStatus {
        self.cache.status()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
