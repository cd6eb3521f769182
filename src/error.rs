//! Error types for the CEP lookup service
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using CepError
pub type Result<T> = std::result::Result<T, CepError>;

/// Unified error type for CEP lookup operations
#[derive(Debug, Error)]
pub enum CepError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Dataset Errors
    // -------------------------------------------------------------------------
    #[error("Base dataset not found: {}", path.display())]
    MissingBaseFile { path: PathBuf },

    #[error("Required columns not found: {}. Expected: Cidade, Estado, CEP", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Spreadsheet error in {}: {reason}", path.display())]
    Spreadsheet { path: PathBuf, reason: String },

    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CepError {
    /// Whether this error means the dataset itself could not be loaded
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            CepError::MissingBaseFile { .. }
                | CepError::MissingColumns { .. }
                | CepError::Spreadsheet { .. }
        )
    }
}
