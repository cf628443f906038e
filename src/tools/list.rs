/// Tool for listing habits
///
/// This module implements the habit_list MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Habit, StreakTier};
use crate::storage::HabitStorage;
use crate::tools::{non_blank, plural_days, ToolError};

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize)]
pub struct ListHabitsParams {
    pub category: Option<String>,
    /// Defaults to true
    pub active_only: Option<bool>,
    /// "created" (default, newest first), "name", "streak" or "longest"
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub category: Category,
    pub schedule: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub tier: StreakTier,
    pub is_active: bool,
}

impl From<&Habit> for HabitSummary {
    fn from(habit: &Habit) -> Self {
        Self {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            icon: habit.icon.clone(),
            category: habit.category,
            schedule: habit.schedule_display(),
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            tier: StreakTier::from_streak(habit.current_streak),
            is_active: habit.is_active,
        }
    }
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub total_habits: u32,
    pub active_habits: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortBy {
    Created,
    Name,
    Streak,
    Longest,
}

impl SortBy {
    fn parse(raw: Option<String>) -> Result<Self, ToolError> {
        match non_blank(raw).map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("created") | Some("created_at") => Ok(SortBy::Created),
            Some("name") => Ok(SortBy::Name),
            Some("streak") | Some("current_streak") => Ok(SortBy::Streak),
            Some("longest") | Some("longest_streak") => Ok(SortBy::Longest),
            Some(other) => Err(ToolError::InvalidArgument(format!(
                "Invalid sort_by '{}'. Valid options: created, name, streak, longest",
                other
            ))),
        }
    }

    fn apply(self, habits: &mut [Habit]) {
        match self {
            // Storage already returns newest first
            SortBy::Created => {}
            SortBy::Name => habits.sort_by_key(|h| h.name.to_lowercase()),
            SortBy::Streak => habits.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
            SortBy::Longest => habits.sort_by(|a, b| b.longest_streak.cmp(&a.longest_streak)),
        }
    }
}

/// List habits using the provided storage
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let category = non_blank(params.category)
        .map(|raw| Category::parse(&raw))
        .transpose()?;
    let sort_by = SortBy::parse(params.sort_by)?;

    let mut habits = storage.list_habits(category, params.active_only.unwrap_or(true))?;
    sort_by.apply(&mut habits);

    let summaries: Vec<HabitSummary> = habits.iter().map(HabitSummary::from).collect();
    let total_habits = summaries.len() as u32;
    let active_habits = summaries.iter().filter(|h| h.is_active).count() as u32;

    let message = if summaries.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let lines = summaries
            .iter()
            .map(|h| {
                format!(
                    "{} **{}** ({}, {})\n   🔥 Streak: {} {} | Best: {} | {}{}\n   ID: {}",
                    h.icon.as_deref().unwrap_or("🎯"),
                    h.name,
                    h.category.display_name(),
                    h.schedule,
                    h.current_streak,
                    plural_days(h.current_streak),
                    h.longest_streak,
                    h.tier.label(),
                    if h.is_active { "" } else { " | 📦 archived" },
                    h.habit_id
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "📋 **Habits** ({} total, {} active)\n\n{}",
            total_habits, active_habits, lines
        )
    };

    Ok(ListHabitsResponse {
        habits: summaries,
        total_habits,
        active_habits,
        message,
    })
}
