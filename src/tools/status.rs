/// Tool for the daily check-in view
///
/// This module implements the habit_status MCP tool: every active habit's
/// state on one day, plus weekly target progress for weekly habits.

use serde::{Deserialize, Serialize};

use crate::analytics::{
    daily_status, group_logs_by_habit, weekly_progress, AnalyticsEngine, WeeklyProgress,
};
use crate::domain::LogDate;
use crate::storage::HabitStorage;
use crate::tools::{parse_date_or, plural_days, ToolError};

/// Parameters for checking habit status
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

/// Information about a single habit's status
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    pub habit_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub completed: bool,
    pub note: Option<String>,
    pub current_streak: u32,
    /// Only present for weekly habits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly: Option<WeeklyProgress>,
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub date: LogDate,
    pub habits: Vec<HabitStatus>,
    pub completed_count: u32,
    pub total: u32,
    pub message: String,
}

/// Get the check-in view for one day
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: LogDate,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let date = parse_date_or(params.date.as_deref(), today)?;
    let week = analytics.week_bounds(date);

    let habits = storage.list_habits(None, true)?;
    // The week always contains the requested day
    let logs = storage.get_logs_by_date_range(week.start, week.end)?;
    let logs_by_habit = group_logs_by_habit(logs);

    let statuses: Vec<HabitStatus> = daily_status(&habits, &logs_by_habit, date)
        .into_iter()
        .map(|status| {
            let habit_logs = logs_by_habit
                .get(&status.habit.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            HabitStatus {
                habit_id: status.habit.id.to_string(),
                weekly: weekly_progress(&status.habit, habit_logs, week.start, week.end),
                name: status.habit.name,
                icon: status.habit.icon,
                completed: status.is_completed_today,
                note: status.today_log.and_then(|log| log.note),
                current_streak: status.habit.current_streak,
            }
        })
        .collect();

    let total = statuses.len() as u32;
    let completed_count = statuses.iter().filter(|s| s.completed).count() as u32;

    let message = if statuses.is_empty() {
        "No active habits. Create your first habit to get started!".to_string()
    } else {
        let lines = statuses
            .iter()
            .map(|s| {
                let mut line = format!(
                    "{} {} {} (🔥 {} {})",
                    if s.completed { "✅" } else { "⬜" },
                    s.icon.as_deref().unwrap_or("🎯"),
                    s.name,
                    s.current_streak,
                    plural_days(s.current_streak)
                );
                if let Some(weekly) = &s.weekly {
                    line.push_str(&format!(
                        "\n   This week: {}/{}{}",
                        weekly.completed_count,
                        weekly.target,
                        if weekly.goal_met { " 🎉 goal met" } else { "" }
                    ));
                }
                if let Some(note) = &s.note {
                    line.push_str(&format!("\n   📝 {}", note));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "📊 {}: {} of {} habits done\n\n{}",
            date, completed_count, total, lines
        )
    };

    Ok(StatusResponse {
        date,
        habits: statuses,
        completed_count,
        total,
        message,
    })
}
