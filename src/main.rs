/// Main entry point for the habit ledger MCP server
///
/// This file sets up logging, parses command line arguments, and starts the
/// MCP server. Requests arrive as JSON-RPC over stdin/stdout, so all logs go
/// to stderr.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use habit_ledger::{
    HabitStore, HabitTrackerServer, MemorySlots, StoreConfig, DEFAULT_SLOT_KEY,
};

const APP_DIR: &str = "habit_ledger";
const DB_FILE: &str = "habits.db";

/// Pick a writable directory for the database file
///
/// Tries the home, data and config directories, then the working
/// directory, and falls back to the temp directory.
fn default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(format!(".{}", APP_DIR))),
        dirs::data_dir().map(|p| p.join(APP_DIR)),
        dirs::config_dir().map(|p| p.join(APP_DIR)),
        std::env::current_dir().ok().map(|p| p.join(format!(".{}", APP_DIR))),
    ];

    for dir in candidates.iter().flatten() {
        if std::fs::create_dir_all(dir).is_err() {
            continue;
        }
        let probe = dir.join(".write_probe");
        if std::fs::write(&probe, b"ok").is_ok() {
            let _ = std::fs::remove_file(&probe);
            return Ok(dir.join(DB_FILE));
        }
    }

    let dir = std::env::temp_dir().join(APP_DIR);
    std::fs::create_dir_all(&dir)?;

    tracing::warn!("Using temporary directory for database: {}", dir.display());
    Ok(dir.join(DB_FILE))
}

/// Command line arguments for the habit ledger
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Name of the slot the habit collection is stored under
    #[arg(long, default_value = DEFAULT_SLOT_KEY)]
    slot: String,

    /// Keep habits in memory only; nothing is written to disk
    #[arg(long, conflicts_with = "database")]
    ephemeral: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_ledger={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting habit ledger");

    let config = StoreConfig::with_slot(args.slot);

    if args.ephemeral {
        info!("Running with in-memory storage");
        let store = HabitStore::new(MemorySlots::new(), config);
        HabitTrackerServer::with_store(store).run().await?;
    } else {
        let db_path = match args.database {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                path
            }
            None => default_database_path()?,
        };

        info!("Using database at: {}", db_path.display());

        let server = HabitTrackerServer::new(db_path, config).await?;
        server.run().await?;
    }

    info!("Habit ledger shutdown complete");
    Ok(())
}
