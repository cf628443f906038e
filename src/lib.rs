/// Public library interface for the habit streaks MCP server
///
/// This module exports the server implementation plus the streak engine,
/// storage and aggregation types so other applications and tests can use
/// them directly.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod clock;
pub mod config;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::AnalyticsEngine;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AnalyticsConfig, Config, ConfigError};
pub use domain::*;
pub use storage::{HabitStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Main habit tracker server that implements the MCP protocol
///
/// Owns the SQLite store, the analytics engine and the clock that decides
/// what "today" is for every request.
pub struct HabitTrackerServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
    clock: Box<dyn Clock + Send + Sync>,
}

impl HabitTrackerServer {
    /// Create a new habit tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing habit streaks server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::from_storage(storage))
    }

    /// Server backed by a throwaway in-memory database
    pub fn in_memory() -> Result<Self, ServerError> {
        Ok(Self::from_storage(SqliteStorage::in_memory()?))
    }

    fn from_storage(storage: SqliteStorage) -> Self {
        Self {
            storage,
            analytics: AnalyticsEngine::new(),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used to decide "today"
    pub fn with_clock<C: Clock + Send + Sync + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the analytics engine, e.g. one built from a config file
    pub fn with_analytics(mut self, analytics: AnalyticsEngine) -> Self {
        self.analytics = analytics;
        self
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let habits = self.storage.list_habits(None, true)?;
        tracing::info!("Server started successfully, found {} active habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    /// Today's date according to the server clock
    pub fn today(&self) -> LogDate {
        self.clock.today()
    }
}
