/// Main entry point for the habit streaks MCP server
///
/// This file loads configuration, sets up logging, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_streaks::{AnalyticsEngine, Config, HabitTrackerServer};

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|p| p.join(".habit_streaks")),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|p| p.join("habit_streaks")),
        // 3. Current working directory (last resort)
        std::env::current_dir().ok().map(|p| p.join(".habit_streaks")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_err() {
            continue;
        }
        // Test if we can write to this directory
        let test_file = potential_path.join(".test_write");
        if std::fs::write(&test_file, "test").is_ok() {
            let _ = std::fs::remove_file(&test_file);
            return Ok(potential_path.join("habits.db"));
        }
    }

    // Ultimate fallback: use a temporary directory
    let temp_path = std::env::temp_dir().join("habit_streaks");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join("habits.db"))
}

/// Command line arguments for the habit streaks MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses the config file or a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

/// Flags win, then RUST_LOG, then the config file
fn log_filter(args: &Args, config: &Config) -> EnvFilter {
    let flag_level = if args.verbose {
        Some("debug")
    } else if args.debug {
        Some("info")
    } else {
        None
    };

    if let Some(level) = flag_level {
        return EnvFilter::new(format!("habit_streaks={}", level));
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = config.logging.level.as_deref().unwrap_or("warn");
    EnvFilter::new(format!("habit_streaks={}", level))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logging is not up yet, so config errors go straight to stderr via `?`
    let config = Config::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&args, &config))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting habit streaks MCP server");

    let db_path = match args.database.or_else(|| config.database.clone()) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = HabitTrackerServer::new(db_path)
        .await?
        .with_analytics(AnalyticsEngine::with_config(config.analytics));

    // Handles JSON-RPC communication over stdin/stdout until stdin closes
    server.run().await?;

    info!("Habit streaks MCP server shutdown complete");
    Ok(())
}
