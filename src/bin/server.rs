//! CEP Lookup Server Binary
//!
//! Starts the HTTP server.

use std::sync::Arc;

use cep_lookup::network::Server;
use cep_lookup::{CacheStatus, Config, Engine};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// CEP Lookup Server
#[derive(Parser, Debug)]
#[command(name = "cep-server")]
#[command(about = "Look up Brazilian postal codes by city and state")]
#[command(version)]
struct Args {
    /// Base dataset (.xlsx with Cidade, Estado, CEP columns)
    #[arg(short, long, default_value = "cep.xlsx")]
    base: String,

    /// Overlay dataset where submitted records are saved
    #[arg(short, long, default_value = "user_ceps.xlsx")]
    overlay: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    listen: String,

    /// Number of request worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Maximum request body size in KB
    #[arg(long, default_value = "16")]
    max_body_kb: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cep_lookup=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("CEP Lookup Server v{}", cep_lookup::VERSION);
    tracing::info!("Base dataset: {}", args.base);
    tracing::info!("Overlay dataset: {}", args.overlay);

    // Build config from args
    let config = Config::builder()
        .base_path(&args.base)
        .overlay_path(&args.overlay)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_body_bytes(args.max_body_kb * 1024)
        .build();

    // Open engine (a missing dataset is logged, not fatal)
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    if let CacheStatus::Failed { reason } = engine.status() {
        tracing::warn!("Serving without a dataset; lookups will retry: {}", reason);
    }

    // Start server
    let server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
