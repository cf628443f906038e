//! Core types and enums used throughout the domain layer
//!
//! This module defines the identifier newtypes plus the Category and
//! Frequency enums shared by Habit, HabitLog and the aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a log ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a habit log row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogId(pub Uuid);

impl LogId {
    /// Generate a new random log ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a log ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Categories for grouping habits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Exercise, sleep, water intake
    Health,
    /// Work tasks, learning at work
    Productivity,
    /// Meditation, journaling
    Mindfulness,
    /// Specific workouts
    Fitness,
    /// Reading, courses
    Learning,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Health,
        Category::Productivity,
        Category::Mindfulness,
        Category::Fitness,
        Category::Learning,
        Category::Other,
    ];

    /// Storage and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Productivity => "productivity",
            Category::Mindfulness => "mindfulness",
            Category::Fitness => "fitness",
            Category::Learning => "learning",
            Category::Other => "other",
        }
    }

    /// Get the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Productivity => "Productivity",
            Category::Mindfulness => "Mindfulness",
            Category::Fitness => "Fitness",
            Category::Learning => "Learning",
            Category::Other => "Other",
        }
    }

    /// Parse a category name, case-insensitively
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                DomainError::InvalidCategory(format!(
                    "'{}'. Valid options: health, productivity, mindfulness, fitness, learning, other",
                    s
                ))
            })
    }
}

/// How often a habit should be performed
///
/// Daily habits build day streaks. Weekly habits additionally carry a weekly
/// target (the habit's `target_frequency`) that is checked per calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }

    /// Parse a frequency name, case-insensitively
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(DomainError::InvalidFrequency(format!(
                "'{}'. Valid options: daily, weekly",
                s
            ))),
        }
    }
}
