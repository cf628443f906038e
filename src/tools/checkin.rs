//! Daily check-in tools
//!
//! habit_toggle flips a habit's completion for one day and habit_note
//! attaches a note to it. Both recompute the habit's cached streaks before
//! returning.

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsEngine;
use crate::domain::{streak_message, HabitLog, LogDate, StreakStats};
use crate::storage::HabitStorage;
use crate::tools::{non_blank, parse_date_or, parse_habit_id, plural_days, ToolError};

/// Parameters for toggling a habit
#[derive(Debug, Default, Deserialize)]
pub struct ToggleHabitParams {
    pub habit_id: String,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub log: HabitLog,
    pub streak: StreakStats,
    pub message: String,
}

/// Parameters for attaching a note to a day
#[derive(Debug, Default, Deserialize)]
pub struct NoteParams {
    pub habit_id: String,
    pub date: Option<String>,
    /// Empty or missing clears the note
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub log: HabitLog,
    pub message: String,
}

fn reject_future(date: LogDate, today: LogDate) -> Result<(), ToolError> {
    if date > today {
        return Err(ToolError::InvalidArgument(format!(
            "Cannot check in on {}, which is after today ({})",
            date, today
        )));
    }
    Ok(())
}

/// Toggle a habit's completion and refresh its streak cache
pub fn toggle_habit<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: LogDate,
    params: ToggleHabitParams,
) -> Result<ToggleHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_date_or(params.date.as_deref(), today)?;
    reject_future(date, today)?;

    let habit = storage.get_habit(&habit_id)?;
    let log = storage.toggle_completion(&habit_id, date)?;
    let streak = analytics.recompute_streaks(storage, &habit_id, today)?;

    let message = if date == today {
        format!(
            "{} {}\n{}",
            if log.completed { "✅" } else { "↩️" },
            habit.name,
            streak_message(streak.current_streak, log.completed)
        )
    } else {
        format!(
            "{} {} on {}. Current streak: {} {}",
            if log.completed { "✅ Marked" } else { "↩️ Unmarked" },
            habit.name,
            date,
            streak.current_streak,
            plural_days(streak.current_streak)
        )
    };

    Ok(ToggleHabitResponse {
        log,
        streak,
        message,
    })
}

/// Set or clear a day's note
///
/// A day without a log gets an incomplete one carrying the note, so the
/// streak cache is refreshed here too.
pub fn note_habit<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: LogDate,
    params: NoteParams,
) -> Result<NoteResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_date_or(params.date.as_deref(), today)?;
    reject_future(date, today)?;

    let note = non_blank(params.note).map(|n| n.trim().to_string());
    HabitLog::validate_note(&note)?;

    let habit = storage.get_habit(&habit_id)?;
    let log = storage.set_note(&habit_id, date, note)?;
    analytics.recompute_streaks(storage, &habit_id, today)?;

    let message = if log.has_note() {
        format!("📝 Saved note for {} on {}", habit.name, date)
    } else {
        format!("📝 Cleared note for {} on {}", habit.name, date)
    };

    Ok(NoteResponse { log, message })
}
