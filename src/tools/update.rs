//! Tools for updating, archiving and deleting existing habits
//!
//! This module implements the habit_update and habit_delete MCP tools.
//! Both leave the habit's log history untouched.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Frequency, Habit, HabitUpdate};
use crate::storage::HabitStorage;
use crate::tools::{non_blank, parse_habit_id, ToolError};

/// Parameters for updating an existing habit
///
/// An empty `description` or `icon` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub frequency: Option<String>,
    pub target_frequency: Option<u32>,
    pub color: Option<String>,
    pub icon: Option<String>,
    /// `false` archives the habit, `true` restores it
    pub is_active: Option<bool>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Parameters for deleting a habit
#[derive(Debug, Deserialize)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub habit_id: String,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let changes = HabitUpdate {
        name: params.name,
        description: params.description.map(Some),
        category: non_blank(params.category)
            .map(|raw| Category::parse(&raw))
            .transpose()?,
        frequency: non_blank(params.frequency)
            .map(|raw| Frequency::parse(&raw))
            .transpose()?,
        target_frequency: params.target_frequency,
        color: params.color,
        icon: params.icon.map(Some),
        is_active: params.is_active,
    };

    let was_active = habit.is_active;
    habit.update(changes)?;
    storage.update_habit(&habit)?;

    let message = match (was_active, habit.is_active) {
        (true, false) => format!("📦 Archived habit '{}'", habit.name),
        (false, true) => format!("▶️ Restored habit '{}'", habit.name),
        _ => format!("✅ Updated habit '{}'", habit.name),
    };

    Ok(UpdateHabitResponse { habit, message })
}

/// Soft delete a habit; its logs are kept
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;
    storage.delete_habit(&habit_id)?;
    tracing::info!("Deleted habit '{}' ({})", habit.name, habit_id);

    Ok(DeleteHabitResponse {
        habit_id: habit_id.to_string(),
        message: format!("🗑️ Deleted habit '{}'", habit.name),
    })
}
