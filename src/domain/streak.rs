//! Streak calculation
//!
//! Pure functions that reduce one habit's day-level logs to streak metrics.
//! Every function takes "today" explicitly (where it needs it) and never reads
//! a clock, so results are deterministic for a fixed input.
//!
//! Duplicate logs for the same day should not exist; if they do, the last one
//! in input order decides that day's state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{is_consecutive_day, DayRecord, HabitId, LogDate};

/// Each logged day's final state, last occurrence wins
fn day_states<L: DayRecord>(logs: &[L]) -> BTreeMap<LogDate, bool> {
    let mut states = BTreeMap::new();
    for log in logs {
        states.insert(log.day(), log.is_completed());
    }
    states
}

/// Days on which the habit was completed, ascending
pub fn completed_dates<L: DayRecord>(logs: &[L]) -> BTreeSet<LogDate> {
    day_states(logs)
        .into_iter()
        .filter_map(|(day, completed)| completed.then_some(day))
        .collect()
}

/// Length of the run of completed days ending today
///
/// If today has not been completed yet the run may end yesterday instead:
/// one grace day, never more, so an unchecked "today" does not break the
/// streak before the day is over.
pub fn current_streak<L: DayRecord>(logs: &[L], today: LogDate) -> u32 {
    let completed = completed_dates(logs);
    if completed.is_empty() {
        return 0;
    }

    let mut cursor = if completed.contains(&today) {
        Some(today)
    } else {
        today.pred()
    };

    let mut streak = 0;
    while let Some(day) = cursor.filter(|d| completed.contains(d)) {
        streak += 1;
        cursor = day.pred();
    }
    streak
}

/// Longest run of consecutive completed days ever recorded
///
/// Independent of today and of input order.
pub fn longest_streak<L: DayRecord>(logs: &[L]) -> u32 {
    let completed = completed_dates(logs);
    let mut days = completed.iter().copied();

    let Some(mut previous) = days.next() else {
        return 0;
    };

    let mut longest = 1;
    let mut run = 1;
    for day in days {
        if is_consecutive_day(previous, day) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
        previous = day;
    }
    longest
}

/// Share of logged days that were completed, as a rounded percentage
///
/// Empty input yields 0. Halves round up.
pub fn completion_rate<L: DayRecord>(logs: &[L]) -> u8 {
    let states = day_states(logs);
    let completed = states.values().filter(|&&c| c).count() as u64;
    rounded_percentage(completed, states.len() as u64)
}

/// `round(100 * part / whole)` clamped to 0..=100, with 0 for an empty whole
pub(crate) fn rounded_percentage(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (200 * part + whole) / (2 * whole);
    pct.min(100) as u8
}

/// All streak statistics for one habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    /// Which habit this streak data is for
    pub habit_id: HabitId,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Days marked completed, all time
    pub total_completions: u32,
    /// Percentage of logged days that were completed (0-100)
    pub completion_rate: u8,
    /// Most recent completed day, if any
    pub last_completed: Option<LogDate>,
}

impl StreakStats {
    /// Create a streak record with zero values for a habit with no history
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            current_streak: 0,
            longest_streak: 0,
            total_completions: 0,
            completion_rate: 0,
            last_completed: None,
        }
    }

    /// Calculate every statistic from the habit's logs
    pub fn calculate<L: DayRecord>(habit_id: HabitId, logs: &[L], today: LogDate) -> Self {
        let completed = completed_dates(logs);

        Self {
            habit_id,
            current_streak: current_streak(logs, today),
            longest_streak: longest_streak(logs),
            total_completions: u32::try_from(completed.len()).unwrap_or(u32::MAX),
            completion_rate: completion_rate(logs),
            last_completed: completed.last().copied(),
        }
    }

    /// The streak is alive if the habit was completed today or yesterday
    pub fn is_active(&self, today: LogDate) -> bool {
        match self.last_completed {
            Some(last) => {
                let days_since = last.days_until(today);
                (0..=1).contains(&days_since)
            }
            None => false,
        }
    }

    pub fn tier(&self) -> StreakTier {
        StreakTier::from_streak(self.current_streak)
    }
}

/// Display tier for a current streak length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTier {
    NoStreak,
    GettingStarted,
    BuildingMomentum,
    OnARoll,
    Impressive,
    Incredible,
    Legendary,
}

impl StreakTier {
    pub fn from_streak(current_streak: u32) -> Self {
        match current_streak {
            0 => StreakTier::NoStreak,
            1..=2 => StreakTier::GettingStarted,
            3..=6 => StreakTier::BuildingMomentum,
            7..=13 => StreakTier::OnARoll,
            14..=29 => StreakTier::Impressive,
            30..=99 => StreakTier::Incredible,
            _ => StreakTier::Legendary,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StreakTier::NoStreak => "No streak",
            StreakTier::GettingStarted => "Getting started",
            StreakTier::BuildingMomentum => "Building momentum",
            StreakTier::OnARoll => "On a roll!",
            StreakTier::Impressive => "Impressive!",
            StreakTier::Incredible => "Incredible!",
            StreakTier::Legendary => "Legendary!",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            StreakTier::NoStreak => "💤",
            StreakTier::GettingStarted => "🌱",
            StreakTier::BuildingMomentum => "🌿",
            StreakTier::OnARoll => "🔥",
            StreakTier::Impressive => "⚡",
            StreakTier::Incredible => "🏆",
            StreakTier::Legendary => "👑",
        }
    }
}

/// Get a motivational message for the current streak
///
/// While today is still open the message nudges towards checking in;
/// once it is done, milestone days get their own message.
pub fn streak_message(current_streak: u32, today_completed: bool) -> String {
    if current_streak == 0 {
        return "Start your streak today! 💪".to_string();
    }

    if !today_completed {
        if current_streak == 1 {
            return "Complete today to keep your streak going!".to_string();
        }
        return format!(
            "Don't break your {}-day streak! Complete today's habit.",
            current_streak
        );
    }

    match current_streak {
        1 => "Day 1 done! Come back tomorrow to build your streak! 🌱".to_string(),
        3 => "3 days in a row! You're building a habit! 🌿".to_string(),
        7 => "A whole week! You're on fire! 🔥".to_string(),
        14 => "Two weeks strong! This is becoming second nature! ⚡".to_string(),
        21 => "21 days! They say it takes 21 days to form a habit! 🎯".to_string(),
        30 => "30-day streak! You're unstoppable! 🏆".to_string(),
        50 => "50 days! Half way to 100! Keep going! 💫".to_string(),
        100 => "100 DAYS! You're a habit master! 👑".to_string(),
        n if n > 100 => format!("{} days! You're legendary! 👑", n),
        n => format!("{} days and counting! Keep it up! 🔥", n),
    }
}
