//! # CEP Lookup
//!
//! A small HTTP service that finds the Brazilian postal code (CEP) of a
//! city/state pair:
//! - Spreadsheet-backed dataset (mandatory base + optional overlay)
//! - Case- and accent-insensitive city matching
//! - User submissions visible immediately, persisted best effort
//! - Snapshot reads, serialized writes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │             (acceptor + worker thread pool)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │             (search / save / reload)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ RecordStore │─────────▶│ LookupCache │
//!   │  (overlay)  │  append  │ (snapshots) │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │ load
//!          ▼                        ▼
//!   ┌─────────────────────────────────────┐
//!   │     Dataset (cep.xlsx + overlay)    │
//!   └─────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod cache;
pub mod dataset;
pub mod engine;
pub mod network;
pub mod normalize;
pub mod protocol;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use cache::CacheStatus;
pub use config::Config;
pub use dataset::Record;
pub use engine::Engine;
pub use error::{CepError, Result};
pub use store::{Persistence, SaveOutcome};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the service
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
