//! Dashboard rollups across habits
//!
//! Everything here is computed from the habit list and the logs passed in.
//! Logs of habits that are not in the list are ignored, and each habit
//! contributes at most one completion per day.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::analytics::heatmap::{heatmap_level, HeatmapLevel};
use crate::config::AnalyticsConfig;
use crate::domain::streak::rounded_percentage;
use crate::domain::{
    completed_dates, DateRange, Habit, HabitId, HabitLog, LogDate, StreakStats, StreakTier,
};

/// Lengths of the rolling windows behind the weekly and monthly rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    pub weekly_days: u32,
    pub monthly_days: u32,
}

impl Default for StatsWindows {
    fn default() -> Self {
        Self {
            weekly_days: 7,
            monthly_days: 30,
        }
    }
}

impl From<&AnalyticsConfig> for StatsWindows {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            weekly_days: config.weekly_window_days,
            monthly_days: config.monthly_window_days,
        }
    }
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    pub total_habits: u32,
    pub completed_today: u32,
    pub total_today: u32,
    pub best_streak: u32,
    pub total_completions: u32,
    pub weekly_completion_rate: u8,
    pub monthly_completion_rate: u8,
}

/// Completion across all habits on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub date: LogDate,
    pub completed: u32,
    pub total: u32,
    pub percentage: u8,
    pub level: HeatmapLevel,
}

/// Completion over an arbitrary inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    pub range: DateRange,
    pub total_possible: u32,
    pub completed: u32,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCompletion {
    pub date: LogDate,
    pub completed: bool,
}

/// Everything shown on a single habit's detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitDetailStats {
    pub habit_id: HabitId,
    pub name: String,
    pub streak: StreakStats,
    pub tier: StreakTier,
    pub window: DateRange,
    /// Share of the window's days that were completed
    pub window_completion_rate: u8,
    /// One entry per window day, oldest first
    pub recent_days: Vec<DayCompletion>,
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Completed days per listed habit
fn completed_days_by_habit<'a>(
    habits: &'a [Habit],
    logs: &[HabitLog],
) -> HashMap<&'a HabitId, BTreeSet<LogDate>> {
    let mut by_habit: HashMap<&HabitId, Vec<&HabitLog>> =
        habits.iter().map(|h| (&h.id, Vec::new())).collect();
    for log in logs {
        if let Some(bucket) = by_habit.get_mut(&log.habit_id) {
            bucket.push(log);
        }
    }

    by_habit
        .into_iter()
        .map(|(id, logs)| (id, completed_dates(&logs)))
        .collect()
}

fn completions_in(days_by_habit: &HashMap<&HabitId, BTreeSet<LogDate>>, range: DateRange) -> u64 {
    if range.is_empty() {
        return 0;
    }
    days_by_habit
        .values()
        .map(|days| days.range(range.start..=range.end).count() as u64)
        .sum()
}

/// Dashboard rollup using the default 7 and 30 day windows
pub fn overall_stats(habits: &[Habit], all_logs: &[HabitLog], today: LogDate) -> OverallStats {
    overall_stats_with(habits, all_logs, today, StatsWindows::default())
}

/// Dashboard rollup with explicit window lengths
///
/// `best_streak` is the highest longest-streak among the habits. Rates are
/// completions in the window divided by `habits * window_days`, clamped to
/// 100, and 0 with no habits.
pub fn overall_stats_with(
    habits: &[Habit],
    all_logs: &[HabitLog],
    today: LogDate,
    windows: StatsWindows,
) -> OverallStats {
    let days_by_habit = completed_days_by_habit(habits, all_logs);
    let habit_count = habits.len() as u64;

    let completed_today = days_by_habit
        .values()
        .filter(|days| days.contains(&today))
        .count();
    let total_completions: usize = days_by_habit.values().map(BTreeSet::len).sum();
    let best_streak = habits.iter().map(|h| h.longest_streak).max().unwrap_or(0);

    let rate = |window_days: u32| {
        let window = DateRange::ending_at(today, window_days);
        rounded_percentage(
            completions_in(&days_by_habit, window),
            habit_count * u64::from(window.len_days()),
        )
    };

    OverallStats {
        total_habits: count_u32(habits.len()),
        completed_today: count_u32(completed_today),
        total_today: count_u32(habits.len()),
        best_streak,
        total_completions: count_u32(total_completions),
        weekly_completion_rate: rate(windows.weekly_days),
        monthly_completion_rate: rate(windows.monthly_days),
    }
}

/// Per-day completion for the last `days` days ending at `today`, oldest first
///
/// Feeds both the trend chart and the calendar heatmap.
pub fn daily_breakdown(
    habits: &[Habit],
    logs: &[HabitLog],
    today: LogDate,
    days: u32,
) -> Vec<DayStats> {
    let days_by_habit = completed_days_by_habit(habits, logs);
    let total = count_u32(habits.len());

    DateRange::ending_at(today, days)
        .dates()
        .into_iter()
        .map(|date| {
            let completed = count_u32(
                days_by_habit
                    .values()
                    .filter(|done| done.contains(&date))
                    .count(),
            );
            DayStats {
                date,
                completed,
                total,
                percentage: rounded_percentage(u64::from(completed), u64::from(total)),
                level: heatmap_level(completed, total),
            }
        })
        .collect()
}

/// Completion over `[start, end]` across all given habits
pub fn completion_stats(
    habits: &[Habit],
    logs: &[HabitLog],
    start: LogDate,
    end: LogDate,
) -> CompletionStats {
    let range = DateRange::inclusive(start, end);
    let days_by_habit = completed_days_by_habit(habits, logs);
    let completed = completions_in(&days_by_habit, range);
    let total_possible = habits.len() as u64 * u64::from(range.len_days());

    CompletionStats {
        range,
        total_possible: u32::try_from(total_possible).unwrap_or(u32::MAX),
        completed: u32::try_from(completed).unwrap_or(u32::MAX),
        percentage: rounded_percentage(completed, total_possible),
    }
}

/// Streaks and recent history for one habit
///
/// Streaks come straight from the logs rather than the habit's cached
/// columns.
pub fn habit_detail_stats(
    habit: &Habit,
    logs: &[HabitLog],
    today: LogDate,
    days: u32,
) -> HabitDetailStats {
    let own_logs: Vec<&HabitLog> = logs.iter().filter(|log| log.habit_id == habit.id).collect();
    let streak = StreakStats::calculate(habit.id.clone(), &own_logs, today);
    let completed = completed_dates(&own_logs);

    let window = DateRange::ending_at(today, days);
    let recent_days: Vec<DayCompletion> = window
        .dates()
        .into_iter()
        .map(|date| DayCompletion {
            date,
            completed: completed.contains(&date),
        })
        .collect();
    let done_in_window = recent_days.iter().filter(|day| day.completed).count() as u64;

    HabitDetailStats {
        habit_id: habit.id.clone(),
        name: habit.name.clone(),
        tier: streak.tier(),
        streak,
        window,
        window_completion_rate: rounded_percentage(done_in_window, u64::from(window.len_days())),
        recent_days,
    }
}

/// Habits with the longest current streaks, best first
///
/// Ties keep their input order.
pub fn best_habits(habits: &[Habit], limit: usize) -> Vec<&Habit> {
    let mut ranked: Vec<&Habit> = habits.iter().collect();
    ranked.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
    ranked.truncate(limit);
    ranked
}
