//! # Express Entry Draws CLI (`eedraws`)
//!
//! The `eedraws` binary syncs the IRCC Express Entry feed into a local
//! snapshot, queries it, and serves it over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! eedraws --config ./config/eedraws.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `eedraws sync` | Fetch the upstream feed, normalize it, and replace the snapshot |
//! | `eedraws list` | List draws, most recent first |
//! | `eedraws latest` | Show the most recent draw |
//! | `eedraws get <id>` | Show a draw by round number |
//! | `eedraws stats` | Print CRS and invitation statistics |
//! | `eedraws serve` | Start the HTTP API |
//!
//! ## Examples
//!
//! ```bash
//! # Scheduled refresh (e.g. from cron)
//! eedraws sync --config ./config/eedraws.toml
//!
//! # Ingest a previously downloaded feed
//! eedraws sync --from-file ./ee_rounds_123_en.json
//!
//! # French-language draws in 2025
//! eedraws list --year 2025 --category french
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use express_entry_draws::{config, draws, ingest, server, stats};

/// Express Entry Draws — local snapshot and query API for Canadian
/// Express Entry rounds.
#[derive(Parser)]
#[command(
    name = "eedraws",
    about = "Express Entry Draws — local snapshot and query API for Canadian Express Entry rounds",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/eedraws.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the upstream feed and replace the local snapshot.
    ///
    /// Entries that fail validation are dropped and counted. A payload
    /// without a `rounds` array aborts the run and leaves the existing
    /// snapshot untouched.
    Sync {
        /// Read the payload from a local JSON file instead of fetching it.
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Normalize and report counts without writing the snapshot.
        #[arg(long)]
        dry_run: bool,
    },

    /// List draws, most recent first.
    List {
        /// Only draws whose date starts with this prefix (e.g. `2025`).
        #[arg(long)]
        year: Option<String>,

        /// Case-insensitive substring of the category (e.g. `french`, `CEC`).
        #[arg(long)]
        category: Option<String>,

        /// Maximum number of draws to show (positive integer).
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,

        /// Print the API response body instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent draw.
    Latest {
        #[arg(long)]
        json: bool,
    },

    /// Show a draw by round number.
    Get {
        /// Round number.
        #[arg(allow_hyphen_values = true)]
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Print statistics over the snapshot.
    Stats {
        /// Restrict to draws whose date starts with this prefix.
        #[arg(long)]
        year: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sync { from_file, dry_run } => {
            ingest::run_sync(&cfg, from_file.as_deref(), dry_run).await?;
        }
        Commands::List {
            year,
            category,
            limit,
            json,
        } => {
            draws::run_list(&cfg, year, category, limit, json).await?;
        }
        Commands::Latest { json } => {
            draws::run_latest(&cfg, json).await?;
        }
        Commands::Get { id, json } => {
            draws::run_get(&cfg, &id, json).await?;
        }
        Commands::Stats { year, json } => {
            stats::run_stats(&cfg, year, json).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
