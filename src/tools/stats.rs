//! Analytics tools: dashboard stats, heatmap, habit detail and streak repair
//!
//! This module implements the habit_stats, habit_heatmap, habit_detail and
//! habit_recalculate MCP tools.

use serde::{Deserialize, Serialize};

use crate::analytics::{
    best_habits, AnalyticsEngine, DayStats, HabitDetailStats, OverallStats, RecalculationSummary,
};
use crate::domain::{streak_message, LogDate};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, plural_days, HabitSummary, ToolError};

/// Number of habits shown in the "best habits" section
const BEST_HABITS_LIMIT: usize = 3;

/// Longest heatmap a client may ask for
const MAX_HEATMAP_DAYS: u32 = 366;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: OverallStats,
    pub best_habits: Vec<HabitSummary>,
    pub message: String,
}

/// Parameters for the heatmap
#[derive(Debug, Default, Deserialize)]
pub struct HeatmapParams {
    /// Days to cover, ending today
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub days: Vec<DayStats>,
    pub message: String,
}

/// Parameters for one habit's detail view
#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: HabitDetailStats,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub summary: RecalculationSummary,
    pub message: String,
}

/// Dashboard stats over the active habits
pub fn get_overall_stats<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: LogDate,
) -> Result<StatsResponse, ToolError> {
    let stats = analytics.overview(storage, today)?;
    let habits = storage.list_habits(None, true)?;
    let best: Vec<HabitSummary> = best_habits(&habits, BEST_HABITS_LIMIT)
        .into_iter()
        .filter(|h| h.current_streak > 0)
        .map(HabitSummary::from)
        .collect();

    let mut message = format!(
        "📊 **Overview**\n\
         - Today: {}/{} done\n\
         - Best streak: {} {}\n\
         - Total completions: {}\n\
         - Last {} days: {}%\n\
         - Last {} days: {}%",
        stats.completed_today,
        stats.total_today,
        stats.best_streak,
        plural_days(stats.best_streak),
        stats.total_completions,
        analytics.config().weekly_window_days,
        stats.weekly_completion_rate,
        analytics.config().monthly_window_days,
        stats.monthly_completion_rate,
    );
    if !best.is_empty() {
        message.push_str("\n\n🏆 **Top streaks**");
        for habit in &best {
            message.push_str(&format!(
                "\n- {} {} {}",
                habit.tier.emoji(),
                habit.name,
                habit.current_streak
            ));
        }
    }

    Ok(StatsResponse {
        stats,
        best_habits: best,
        message,
    })
}

/// Calendar heatmap over the active habits
pub fn get_heatmap<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: LogDate,
    params: HeatmapParams,
) -> Result<HeatmapResponse, ToolError> {
    if let Some(days) = params.days {
        if !(1..=MAX_HEATMAP_DAYS).contains(&days) {
            return Err(ToolError::InvalidArgument(format!(
                "days must be between 1 and {}, got {}",
                MAX_HEATMAP_DAYS, days
            )));
        }
    }

    let days = analytics.heatmap(storage, today, params.days)?;
    let message = render_heatmap(&days);

    Ok(HeatmapResponse { days, message })
}

/// Text heatmap: one row per week, one glyph per day
fn render_heatmap(days: &[DayStats]) -> String {
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return "No days to show".to_string();
    };

    let rows = days
        .chunks(7)
        .map(|week| {
            let cells: String = week.iter().map(|day| day.level.glyph()).collect();
            format!("{}  {}", week[0].date, cells)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let active = days.iter().filter(|day| day.completed > 0).count();
    format!(
        "🗓️ Activity from {} to {} ({} of {} days active)\n\n{}",
        first.date,
        last.date,
        active,
        days.len(),
        rows
    )
}

/// Detail view for one habit
pub fn get_habit_detail<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: LogDate,
    params: DetailParams,
) -> Result<DetailResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;
    let detail = analytics.habit_detail(storage, &habit, today)?;

    let completed_today = detail
        .recent_days
        .last()
        .is_some_and(|day| day.date == today && day.completed);
    let history: String = detail
        .recent_days
        .iter()
        .map(|day| if day.completed { '█' } else { '·' })
        .collect();

    let message = format!(
        "{} **{}** ({})\n\
         {} {}: {} {} current, {} best\n\
         Completed {} times, {}% of logged days\n\
         Last {} days: {}% {}\n\
         {}",
        habit.icon.as_deref().unwrap_or("🎯"),
        habit.name,
        habit.schedule_display(),
        detail.tier.emoji(),
        detail.tier.label(),
        detail.streak.current_streak,
        plural_days(detail.streak.current_streak),
        detail.streak.longest_streak,
        detail.streak.total_completions,
        detail.streak.completion_rate,
        detail.window.len_days(),
        detail.window_completion_rate,
        history,
        streak_message(detail.streak.current_streak, completed_today),
    );

    Ok(DetailResponse { detail, message })
}

/// Rebuild every habit's cached streaks from its logs
pub fn recalculate_streaks<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: LogDate,
) -> Result<RecalculateResponse, ToolError> {
    let summary = analytics.recalculate_all(storage, today)?;
    let message = format!(
        "🔄 Checked {} habits, corrected {}",
        summary.habits_checked, summary.habits_updated
    );
    Ok(RecalculateResponse { summary, message })
}
