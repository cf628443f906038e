//! Domain module containing the core entities and the streak engine
//!
//! This module defines the entities (Habit, HabitLog), the calendar-day type
//! every computation is expressed in, and the pure streak functions that turn
//! a habit's log history into streak metrics.

pub mod date;
pub mod habit;
pub mod log;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use date::*;
pub use habit::*;
pub use log::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
