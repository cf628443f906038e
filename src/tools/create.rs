//! Tool for creating new habits
//!
//! This module implements the habit_create MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Frequency, Habit};
use crate::storage::HabitStorage;
use crate::tools::{non_blank, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Default, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to "other"
    pub category: Option<String>,
    /// "daily" (default) or "weekly"
    pub frequency: Option<String>,
    /// Completions per day or per week; defaults to 1
    pub target_frequency: Option<u32>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let category = match non_blank(params.category) {
        Some(raw) => Category::parse(&raw)?,
        None => Category::default(),
    };
    let frequency = match non_blank(params.frequency) {
        Some(raw) => Frequency::parse(&raw)?,
        None => Frequency::default(),
    };

    let habit = Habit::new(
        params.name,
        params.description,
        category,
        frequency,
        params.target_frequency.unwrap_or(1),
        non_blank(params.color),
        params.icon,
    )?;

    storage.create_habit(&habit)?;
    tracing::info!("Created habit '{}' ({})", habit.name, habit.id);

    let message = format!(
        "✅ Created habit '{}' ({}, {})! Ready to start your streak!\nHabit ID: {}",
        habit.name,
        habit.category.display_name(),
        habit.schedule_display(),
        habit.id
    );

    Ok(CreateHabitResponse { habit, message })
}
