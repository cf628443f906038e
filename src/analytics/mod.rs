//! Analytics engine for streak bookkeeping and dashboard rollups
//!
//! The submodules hold the pure aggregation functions. `AnalyticsEngine`
//! is the stateful side: it loads logs from storage, runs the streak engine
//! and writes the cached streak values back onto the habit.

pub mod heatmap;
pub mod overview;
pub mod status;

pub use heatmap::*;
pub use overview::*;
pub use status::*;

use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::domain::{DateRange, Habit, HabitId, HabitLog, LogDate, StreakStats};
use crate::storage::{HabitStorage, StorageError};

/// Outcome of a batch streak repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RecalculationSummary {
    pub habits_checked: u32,
    /// Habits whose cached values were stale and got rewritten
    pub habits_updated: u32,
}

/// Analytics engine for processing habit data
///
/// Holds the calendar policy (week start, window lengths) that the pure
/// aggregation functions deliberately leave to their callers.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Create a new analytics engine with default windows
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// The week containing `date` under the configured week start
    pub fn week_bounds(&self, date: LogDate) -> DateRange {
        week_bounds(date, self.config.week_start)
    }

    /// Recompute one habit's streaks from its logs and persist the cache
    ///
    /// Called after every change to the habit's logs.
    pub fn recompute_streaks<S: HabitStorage>(
        &self,
        storage: &S,
        habit_id: &HabitId,
        today: LogDate,
    ) -> Result<StreakStats, StorageError> {
        let logs = storage.get_logs_for_habit(habit_id, None)?;
        let stats = StreakStats::calculate(habit_id.clone(), &logs, today);

        storage.update_cached_streaks(habit_id, stats.current_streak, stats.longest_streak)?;
        tracing::debug!(
            "Recomputed streaks for {}: current {}, longest {}",
            habit_id,
            stats.current_streak,
            stats.longest_streak
        );

        Ok(stats)
    }

    /// Bring every habit's cached streaks back in line with its logs
    ///
    /// Only stale rows are written, so running it twice in a row changes
    /// nothing the second time.
    pub fn recalculate_all<S: HabitStorage>(
        &self,
        storage: &S,
        today: LogDate,
    ) -> Result<RecalculationSummary, StorageError> {
        let mut summary = RecalculationSummary::default();

        for mut habit in storage.list_habits(None, false)? {
            let logs = storage.get_logs_for_habit(&habit.id, None)?;
            let stats = StreakStats::calculate(habit.id.clone(), &logs, today);
            summary.habits_checked += 1;

            if habit.set_cached_streaks(stats.current_streak, stats.longest_streak) {
                storage.update_cached_streaks(&habit.id, habit.current_streak, habit.longest_streak)?;
                summary.habits_updated += 1;
            }
        }

        tracing::info!(
            "Recalculated streaks: {} checked, {} updated",
            summary.habits_checked,
            summary.habits_updated
        );
        Ok(summary)
    }

    /// Dashboard numbers over the active habits
    pub fn overview<S: HabitStorage>(
        &self,
        storage: &S,
        today: LogDate,
    ) -> Result<OverallStats, StorageError> {
        let habits = storage.list_habits(None, true)?;
        // Lifetime completions need the full history, not just the windows
        let logs = storage.get_all_logs()?;
        Ok(overall_stats_with(
            &habits,
            &logs,
            today,
            StatsWindows::from(&self.config),
        ))
    }

    /// Per-day breakdown for the calendar heatmap over the active habits
    pub fn heatmap<S: HabitStorage>(
        &self,
        storage: &S,
        today: LogDate,
        days: Option<u32>,
    ) -> Result<Vec<DayStats>, StorageError> {
        let days = days.unwrap_or(self.config.heatmap_days);
        let habits = storage.list_habits(None, true)?;
        let logs = self.logs_ending_at(storage, today, days)?;
        Ok(daily_breakdown(&habits, &logs, today, days))
    }

    /// Detail view for one habit over the configured window
    pub fn habit_detail<S: HabitStorage>(
        &self,
        storage: &S,
        habit: &Habit,
        today: LogDate,
    ) -> Result<HabitDetailStats, StorageError> {
        let logs = storage.get_logs_for_habit(&habit.id, None)?;
        Ok(habit_detail_stats(habit, &logs, today, self.config.detail_days))
    }

    fn logs_ending_at<S: HabitStorage>(
        &self,
        storage: &S,
        today: LogDate,
        days: u32,
    ) -> Result<Vec<HabitLog>, StorageError> {
        let range = DateRange::ending_at(today, days);
        if range.is_empty() {
            return Ok(Vec::new());
        }
        storage.get_logs_by_date_range(range.start, range.end)
    }
}
