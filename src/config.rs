//! Configuration for the CEP lookup service
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CepError, Result};

/// Main configuration for a service instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Dataset Configuration
    // -------------------------------------------------------------------------
    /// Mandatory base spreadsheet (`Cidade`, `Estado`, `CEP` columns)
    pub base_path: PathBuf,

    /// Overlay spreadsheet where submitted records are appended.
    /// Optional on load; created on the first successful save.
    pub overlay_path: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    /// Number of request worker threads
    pub worker_threads: usize,

    /// Largest accepted request body (bytes)
    pub max_body_bytes: usize,

    /// How often the acceptor wakes up to check for shutdown (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("cep.xlsx"),
            overlay_path: PathBuf::from("user_ceps.xlsx"),
            listen_addr: "127.0.0.1:5000".to_string(),
            worker_threads: 8,
            max_body_bytes: 16 * 1024, // 16 KB
            poll_interval_ms: 100,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(CepError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(CepError::Config(
                "max_body_bytes must be greater than 0".to_string(),
            ));
        }
        if self.base_path == self.overlay_path {
            return Err(CepError::Config(format!(
                "base and overlay must be different files ({})",
                self.base_path.display()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the base dataset path
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_path = path.into();
        self
    }

    /// Set the overlay dataset path
    pub fn overlay_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.overlay_path = path.into();
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the maximum request body size (in bytes)
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    /// Set the acceptor poll interval (in milliseconds)
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
