//! # PitchLens CLI (`pitchlens`)
//!
//! ## Usage
//!
//! ```bash
//! pitchlens --config ./config/pitchlens.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pitchlens init` | Create the SQLite database and schema |
//! | `pitchlens analyze <deck.pdf>` | Process a local deck and store the result |
//! | `pitchlens get <id>` | Print a stored pitch |
//! | `pitchlens compare <id>...` | Print several pitches side by side |
//! | `pitchlens serve` | Start the HTTP API |
//!
//! `analyze`, `get`, and `compare` accept `--json`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pitchlens::{cli, config, logging, server};

/// PitchLens: pitch-deck section extraction, narrative analysis, and
/// comparison.
#[derive(Parser)]
#[command(name = "pitchlens", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/pitchlens.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Extract, segment, enrich, and analyze a local PDF deck.
    Analyze {
        /// Path to the deck; must end in `.pdf`.
        path: PathBuf,
        /// Print the stored record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a stored pitch by ID.
    Get {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Print the headline fields of several pitches.
    Compare {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let cfg = config::load_config(&args.config)?;

    logging::init_logging(&cfg.logging)?;

    match args.command {
        Commands::Init => cli::run_init(&cfg).await?,
        Commands::Analyze { path, json } => cli::run_analyze(&cfg, &path, json).await?,
        Commands::Get { id, json } => cli::run_get(&cfg, &id, json).await?,
        Commands::Compare { ids, json } => cli::run_compare(&cfg, &ids, json).await?,
        Commands::Serve => server::run_server(&cfg).await?,
    }

    Ok(())
}
