//! meatbar - meat bar consumption tracker
//!
//! Records who ate which meat bar when, and reports increasing-consumption
//! streaks and the busiest day of each month. Also serves the same operations
//! over HTTP, and exposes recording and listing as MCP tools over stdio.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/meatbar/data.db (~/.local/share/meatbar/data.db)
//! - Logs: $XDG_STATE_HOME/meatbar/meatbar.<date>.log
//! - Config: $XDG_CONFIG_HOME/meatbar/config.toml (~/.config/meatbar/config.toml)

mod mcp;
mod output;
mod server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use meatbar_core::{load_csv, Config, Database, Tracker};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meatbar")]
#[command(about = "Track meat bar consumption and find eating streaks")]
#[command(version)]
struct Args {
    /// Database file (default: from config, then XDG data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Record a consumption
    Add {
        /// Name of the person (e.g. Bob)
        person: String,
        /// Type of meat bar (e.g. beef, bison, lamb)
        #[arg(value_name = "TYPE")]
        bar_type: String,
        /// ISO-8601 date or date-time (e.g. 2025-01-01T12:00:00Z)
        eaten_at: String,
    },
    /// List everyone who has eaten a bar
    People,
    /// List every recorded consumption
    Consumptions,
    /// Show runs of days with increasing consumption
    Streaks,
    /// Show the busiest day of each month
    MonthlyMost,
    /// Bulk-load a CSV file with header person,meat-bar-type,date
    Load {
        /// Path to the CSV file
        path: PathBuf,
    },
    /// Serve the add_consumption and get_all_users tools to an MCP client over stdio
    Mcp,
    /// Serve the HTTP API
    Serve {
        /// Interface to bind (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: from config or PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;

    let _log_guard =
        meatbar_core::logging::init(&config.logging).context("failed to initialize logging")?;

    if let Some(db) = args.db {
        config.database.path = Some(db);
    }

    let db_path = config.database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let format = args.format;

    match args.command {
        Command::Add {
            person,
            bar_type,
            eaten_at,
        } => {
            let id = Tracker::new(db)
                .add_consumption(&person, &bar_type, &eaten_at)
                .context("error adding consumption")?;
            output::print_added(id, format)?;
        }
        Command::People => {
            let people = Tracker::new(db)
                .list_people()
                .context("error getting people")?;
            output::print_people(&people, format)?;
        }
        Command::Consumptions => {
            let events = Tracker::new(db)
                .list_events()
                .context("error getting consumptions")?;
            output::print_consumptions(&events, format)?;
        }
        Command::Streaks => {
            let streaks = Tracker::new(db)
                .detect_streaks()
                .context("error computing streaks")?;
            output::print_streaks(&streaks, format)?;
        }
        Command::MonthlyMost => {
            let peaks = Tracker::new(db)
                .monthly_most_eaten()
                .context("error computing monthly peaks")?;
            output::print_monthly_peaks(&peaks, format)?;
        }
        Command::Load { path } => {
            let report = load_csv(&db, &path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            output::print_load_report(&report, format)?;
        }
        Command::Mcp => {
            mcp::McpServer::new(Tracker::new(db))
                .run_stdio()
                .context("MCP server failed")?;
        }
        Command::Serve { host, port } => {
            config
                .apply_env_overrides()
                .context("invalid server configuration")?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(server::serve(Tracker::new(db), &config.server))?;
        }
    }

    Ok(())
}
