//! MCP tools for habit management
//!
//! This module contains the operations that MCP clients can call. Each tool
//! takes deserialized params, works against a `HabitStorage`, and returns a
//! serializable response carrying a human-readable `message`.

pub mod checkin;
pub mod create;
pub mod list;
pub mod stats;
pub mod status;
pub mod update;

// Re-export tool functions for easy access
pub use checkin::*;
pub use create::*;
pub use list::*;
pub use stats::*;
pub use status::*;
pub use update::*;

use thiserror::Error;

use crate::domain::{DomainError, HabitId, LogDate};
use crate::storage::StorageError;

/// Errors a tool call can fail with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Parse a habit ID argument
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidArgument("habit_id is required".to_string()));
    }
    HabitId::from_string(raw)
        .map_err(|_| ToolError::InvalidArgument(format!("'{}' is not a valid habit ID", raw)))
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to `today`
pub(crate) fn parse_date_or(raw: Option<&str>, today: LogDate) -> Result<LogDate, ToolError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(LogDate::parse(s)?),
        None => Ok(today),
    }
}

/// Treat a blank optional string as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// "day" or "days"
pub(crate) fn plural_days(n: u32) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}
