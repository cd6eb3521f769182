//! Lookup Cache Module
//!
//! Process-wide holder of the merged, normalized table.
//!
//! ## Responsibilities
//! - Track whether the dataset loaded (explicit load state)
//! - Serve searches from an immutable snapshot
//! - Serialize appends and reloads behind one writer lock
//!
//! ## Snapshot Model
//! Readers clone an `Arc<Table>` under a brief read lock and scan it without
//! holding any lock, so a search never sees a half-built table. Writers hold
//! the writer mutex and publish the next table version in place.

mod lookup;

pub use lookup::LookupCache;

use std::sync::Arc;

use crate::dataset::Table;

/// Outcome of the most recent load attempt
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Nothing attempted yet
    Unloaded,

    /// Table available for lookups
    Ready(Arc<Table>),

    /// Last load failed; the next lookup or save retries
    Failed(String),
}

/// Summary of the cache for status reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    Unloaded,
    Ready {
        rows: usize,
        base_rows: usize,
        overlay_rows: usize,
        session_rows: usize,
    },
    Failed {
        reason: String,
    },
}
