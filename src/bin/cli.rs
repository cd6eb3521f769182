//! CEP Lookup CLI
//!
//! Command-line access to the datasets without running the server.

use cep_lookup::{CacheStatus, Engine};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// CEP Lookup CLI
#[derive(Parser, Debug)]
#[command(name = "cep-cli")]
#[command(about = "Query and extend the CEP spreadsheets")]
struct Args {
    /// Base dataset
    #[arg(short, long, default_value = "cep.xlsx")]
    base: String,

    /// Overlay dataset
    #[arg(short, long, default_value = "user_ceps.xlsx")]
    overlay: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up the CEP of a city
    Search {
        /// City name (case and accents ignored)
        cidade: String,

        /// State code, e.g. SP
        estado: String,
    },

    /// Add a record to the overlay dataset
    Add {
        cidade: String,
        estado: String,
        cep: String,
    },

    /// Load both datasets and report row counts
    Check,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let engine = match Engine::open_paths(&args.base, &args.overlay) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let code = match args.command {
        Commands::Search { cidade, estado } => match engine.search(&cidade, &estado) {
            Ok(Some(record)) => {
                println!("{}", record.postal_code);
                0
            }
            Ok(None) => {
                eprintln!("CEP não encontrado.");
                1
            }
            Err(e) => {
                eprintln!("error: {}", e);
                2
            }
        },
        Commands::Add {
            cidade,
            estado,
            cep,
        } => match engine.save(&cidade, &estado, &cep) {
            Ok(outcome) if outcome.persisted() => {
                println!("{}", outcome.message());
                0
            }
            Ok(outcome) => {
                // Nothing outlives this process, so a memory-only save is a failure here
                eprintln!("{} ({:?})", outcome.message(), outcome.persistence);
                1
            }
            Err(e) => {
                eprintln!("error: {}", e);
                2
            }
        },
        Commands::Check => match engine.status() {
            CacheStatus::Ready {
                rows,
                base_rows,
                overlay_rows,
                ..
            } => {
                println!("{} rows ({} base, {} overlay)", rows, base_rows, overlay_rows);
                0
            }
            CacheStatus::Failed { reason } => {
                eprintln!("error: {}", reason);
                2
            }
            CacheStatus::Unloaded => {
                eprintln!("error: dataset not loaded");
                2
            }
        },
    };

    std::process::exit(code);
}
