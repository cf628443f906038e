//! Per-day check-in view and weekly targets
//!
//! These projections take the logs they are given at face value. They never
//! read a clock and never decide week boundaries on their own.

use std::collections::HashMap;

use chrono::Weekday;
use serde::Serialize;

use crate::domain::{completed_dates, DateRange, Habit, HabitId, HabitLog, LogDate};

/// One habit's state on the requested day
#[derive(Debug, Clone, Serialize)]
pub struct DailyHabitStatus {
    pub habit: Habit,
    pub is_completed_today: bool,
    /// The log for the requested day, if one exists
    pub today_log: Option<HabitLog>,
}

/// Progress towards a weekly habit's target within one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyProgress {
    pub completed_count: u32,
    pub target: u32,
    pub goal_met: bool,
    pub week: DateRange,
}

impl WeeklyProgress {
    /// Completions still needed this week
    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.completed_count)
    }
}

/// Group logs by the habit they belong to, keeping input order
pub fn group_logs_by_habit(logs: Vec<HabitLog>) -> HashMap<HabitId, Vec<HabitLog>> {
    let mut grouped: HashMap<HabitId, Vec<HabitLog>> = HashMap::new();
    for log in logs {
        grouped.entry(log.habit_id.clone()).or_default().push(log);
    }
    grouped
}

/// Check-in state of every habit on `date`
///
/// A habit without a log on that day is simply not completed. If a habit has
/// several logs for the day the last one wins.
pub fn daily_status(
    habits: &[Habit],
    logs_by_habit: &HashMap<HabitId, Vec<HabitLog>>,
    date: LogDate,
) -> Vec<DailyHabitStatus> {
    habits
        .iter()
        .map(|habit| {
            let today_log = logs_by_habit
                .get(&habit.id)
                .and_then(|logs| logs.iter().rev().find(|log| log.date == date))
                .cloned();

            DailyHabitStatus {
                habit: habit.clone(),
                is_completed_today: today_log.as_ref().is_some_and(|log| log.completed),
                today_log,
            }
        })
        .collect()
}

/// Completed days of a weekly habit within `[week_start, week_end]`
///
/// Returns `None` for daily habits. Logs belonging to other habits are
/// ignored.
pub fn weekly_progress(
    habit: &Habit,
    logs: &[HabitLog],
    week_start: LogDate,
    week_end: LogDate,
) -> Option<WeeklyProgress> {
    if !habit.is_weekly() {
        return None;
    }

    let week = DateRange::inclusive(week_start, week_end);
    let own_logs: Vec<&HabitLog> = logs.iter().filter(|log| log.habit_id == habit.id).collect();
    let completed_count = completed_dates(&own_logs)
        .into_iter()
        .filter(|day| week.contains(*day))
        .count();
    let completed_count = u32::try_from(completed_count).unwrap_or(u32::MAX);

    Some(WeeklyProgress {
        completed_count,
        target: habit.target_frequency,
        goal_met: completed_count >= habit.target_frequency,
        week,
    })
}

/// The calendar week containing `date` for a given first weekday
pub fn week_bounds(date: LogDate, week_start: Weekday) -> DateRange {
    DateRange::week_of(date, week_start)
}
