//! Storage layer for persisting habits and their daily logs
//!
//! This module handles all database operations using SQLite. The streak
//! engine never touches storage directly; the analytics layer loads logs
//! through this interface and writes the cached streak values back.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::domain::{Category, Habit, HabitId, HabitLog, LogDate};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("No log for habit {habit_id} on {date}")]
    LogNotFound { habit_id: String, date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits and logs
///
/// Implementations must keep at most one log per (habit, date).
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Update an existing habit's editable fields
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit (soft delete - mark as inactive)
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits, newest first, with optional filtering
    fn list_habits(
        &self,
        category: Option<Category>,
        active_only: bool,
    ) -> Result<Vec<Habit>, StorageError>;

    /// Flip a habit's completion for a day
    ///
    /// The first toggle on a date creates a completed log; later toggles flip
    /// it in place. Returns the log as stored afterwards.
    fn toggle_completion(&self, habit_id: &HabitId, date: LogDate) -> Result<HabitLog, StorageError>;

    /// Set or clear the note on a day's log, creating an incomplete log if needed
    fn set_note(
        &self,
        habit_id: &HabitId,
        date: LogDate,
        note: Option<String>,
    ) -> Result<HabitLog, StorageError>;

    /// Get the log for one habit on one day
    fn get_log(&self, habit_id: &HabitId, date: LogDate) -> Result<Option<HabitLog>, StorageError>;

    /// Get logs for a habit, newest first
    fn get_logs_for_habit(
        &self,
        habit_id: &HabitId,
        limit: Option<u32>,
    ) -> Result<Vec<HabitLog>, StorageError>;

    /// Get every log dated within `[start, end]`
    fn get_logs_by_date_range(
        &self,
        start: LogDate,
        end: LogDate,
    ) -> Result<Vec<HabitLog>, StorageError>;

    /// Get every log
    fn get_all_logs(&self) -> Result<Vec<HabitLog>, StorageError>;

    /// Write recomputed streak values onto the habit row
    fn update_cached_streaks(
        &self,
        habit_id: &HabitId,
        current_streak: u32,
        longest_streak: u32,
    ) -> Result<(), StorageError>;
}
