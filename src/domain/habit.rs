//! Habit entity and related functionality
//!
//! This module defines the Habit struct that represents something the user
//! wants to do regularly, along with its validation rules and the cached
//! streak fields the owning service keeps in sync with the logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, DomainError, Frequency, HabitId};

/// Colour assigned to habits created without one
pub const DEFAULT_COLOR: &str = "#6366f1";

/// A habit represents something the user wants to do regularly
///
/// `current_streak` and `longest_streak` are a denormalized cache. The habit's
/// logs are the source of truth and the cache must always equal what the
/// streak engine derives from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read 30 minutes")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    pub category: Category,
    pub frequency: Frequency,
    /// Completions expected per period: per day for daily habits, per week
    /// for weekly ones
    pub target_frequency: u32,
    /// Hex colour such as "#FF5733"
    pub color: String,
    /// Optional emoji icon
    pub icon: Option<String>,
    /// Inactive habits are archived or soft deleted; their logs are kept
    pub is_active: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by [`Habit::update`]
///
/// `None` leaves a field untouched. For the optional text fields the inner
/// `None` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Category>,
    pub frequency: Option<Frequency>,
    pub target_frequency: Option<u32>,
    pub color: Option<String>,
    pub icon: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// Names and descriptions are trimmed; a missing colour falls back to
    /// [`DEFAULT_COLOR`].
    pub fn new(
        name: String,
        description: Option<String>,
        category: Category,
        frequency: Frequency,
        target_frequency: u32,
        color: Option<String>,
        icon: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.trim().to_string();
        let description = normalize_optional(description);
        let color = color.unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let icon = normalize_optional(icon);

        Self::validate_name(&name)?;
        Self::validate_description(&description)?;
        Self::validate_target_frequency(target_frequency)?;
        Self::validate_color(&color)?;
        Self::validate_icon(&icon)?;

        let now = Utc::now();
        Ok(Self {
            id: HabitId::new(),
            name,
            description,
            category,
            frequency,
            target_frequency,
            color,
            icon,
            is_active: true,
            current_streak: 0,
            longest_streak: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update, validating every new value before any is applied
    pub fn update(&mut self, changes: HabitUpdate) -> Result<(), DomainError> {
        let name = changes.name.map(|n| n.trim().to_string());
        let description = changes.description.map(normalize_optional);
        let icon = changes.icon.map(normalize_optional);

        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_description) = description {
            Self::validate_description(new_description)?;
        }
        if let Some(target) = changes.target_frequency {
            Self::validate_target_frequency(target)?;
        }
        if let Some(ref new_color) = changes.color {
            Self::validate_color(new_color)?;
        }
        if let Some(ref new_icon) = icon {
            Self::validate_icon(new_icon)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(frequency) = changes.frequency {
            self.frequency = frequency;
        }
        if let Some(target) = changes.target_frequency {
            self.target_frequency = target;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        if let Some(new_icon) = icon {
            self.icon = new_icon;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Overwrite the cached streak fields, returning whether they changed
    pub fn set_cached_streaks(&mut self, current: u32, longest: u32) -> bool {
        let changed = self.current_streak != current || self.longest_streak != longest;
        self.current_streak = current;
        self.longest_streak = longest;
        changed
    }

    /// Whether this habit is tracked against a weekly target
    pub fn is_weekly(&self) -> bool {
        self.frequency == Frequency::Weekly
    }

    /// e.g. "daily", "3x per week"
    pub fn schedule_display(&self) -> String {
        match self.frequency {
            Frequency::Daily if self.target_frequency == 1 => "daily".to_string(),
            Frequency::Daily => format!("{}x per day", self.target_frequency),
            Frequency::Weekly => format!("{}x per week", self.target_frequency),
        }
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name is required".to_string(),
            ));
        }
        if name.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name must be less than 100 characters".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_target_frequency(target: u32) -> Result<(), DomainError> {
        if !(1..=10).contains(&target) {
            return Err(DomainError::InvalidValue {
                message: format!("Target must be between 1 and 10, got {}", target),
            });
        }
        Ok(())
    }

    /// Colours are `#` followed by exactly six hex digits
    fn validate_color(color: &str) -> Result<(), DomainError> {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(DomainError::InvalidValue {
                message: format!("Invalid color format '{}', expected #RRGGBB", color),
            });
        }
        Ok(())
    }

    fn validate_icon(icon: &Option<String>) -> Result<(), DomainError> {
        if let Some(icon) = icon {
            if icon.chars().count() > 16 {
                return Err(DomainError::InvalidValue {
                    message: "Icon cannot be longer than 16 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Trim optional text, mapping blank strings to `None`
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
