//! HabitLog entity: one habit on one calendar day
//!
//! A log row is created the first time a habit is toggled on a date and is
//! flipped in place afterwards. Unchecking never deletes the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId, LogDate, LogId};

/// Longest note accepted on a log
pub const MAX_NOTE_LEN: usize = 500;

/// The record of a habit on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: LogId,
    pub habit_id: HabitId,
    /// Which day this log is for
    pub date: LogDate,
    /// Whether the habit was satisfied that day
    pub completed: bool,
    /// Informational counter; streak math never reads it
    pub completed_count: u32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HabitLog {
    /// Create a log in the given state
    ///
    /// `completed_count` follows the toggle convention: 1 when completed,
    /// 0 otherwise.
    pub fn new(habit_id: HabitId, date: LogDate, completed: bool) -> Self {
        let now = Utc::now();
        Self {
            id: LogId::new(),
            habit_id,
            date,
            completed,
            completed_count: u32::from(completed),
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a note, rejecting ones that are too long
    pub fn with_note(mut self, note: Option<String>) -> Result<Self, DomainError> {
        Self::validate_note(&note)?;
        self.note = note;
        Ok(self)
    }

    /// Check if this log has a non-blank note
    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Validate the optional note field
    pub fn validate_note(note: &Option<String>) -> Result<(), DomainError> {
        if let Some(text) = note {
            if text.chars().count() > MAX_NOTE_LEN {
                return Err(DomainError::InvalidValue {
                    message: format!("Notes cannot be longer than {} characters", MAX_NOTE_LEN),
                });
            }
        }
        Ok(())
    }
}

/// Anything the streak engine can read a day and a completion flag from
pub trait DayRecord {
    fn day(&self) -> LogDate;
    fn is_completed(&self) -> bool;
}

impl DayRecord for HabitLog {
    fn day(&self) -> LogDate {
        self.date
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl<T: DayRecord> DayRecord for &T {
    fn day(&self) -> LogDate {
        (**self).day()
    }

    fn is_completed(&self) -> bool {
        (**self).is_completed()
    }
}

impl DayRecord for (LogDate, bool) {
    fn day(&self) -> LogDate {
        self.0
    }

    fn is_completed(&self) -> bool {
        self.1
    }
}
