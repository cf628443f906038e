//! Heatmap bucketing
//!
//! A day's cross-habit completion ratio is reduced to one of five intensity
//! levels. Thresholds are compared with integer arithmetic only, so a ratio
//! sitting exactly on a boundary always lands in the upper bucket.

use serde::{Serialize, Serializer};

/// Intensity bucket for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum HeatmapLevel {
    /// Nothing completed, or nothing to complete
    None = 0,
    /// Below 25%
    Low = 1,
    /// 25% up to 50%
    Moderate = 2,
    /// 50% up to 75%
    Good = 3,
    /// 75% and above
    Full = 4,
}

impl HeatmapLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn description(self) -> &'static str {
        match self {
            HeatmapLevel::None => "No activity",
            HeatmapLevel::Low => "Low activity",
            HeatmapLevel::Moderate => "Moderate activity",
            HeatmapLevel::Good => "Good activity",
            HeatmapLevel::Full => "Excellent activity",
        }
    }

    /// Single-character cell used by the text heatmap
    pub fn glyph(self) -> char {
        match self {
            HeatmapLevel::None => '·',
            HeatmapLevel::Low => '░',
            HeatmapLevel::Moderate => '▒',
            HeatmapLevel::Good => '▓',
            HeatmapLevel::Full => '█',
        }
    }
}

impl Serialize for HeatmapLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Bucket `completed` out of `total` into a heatmap level
///
/// Total over every input: a zero total is level 0, and a count above the
/// total is treated as full.
pub fn heatmap_level(completed: u32, total: u32) -> HeatmapLevel {
    if total == 0 || completed == 0 {
        return HeatmapLevel::None;
    }

    let c = u64::from(completed);
    let t = u64::from(total);

    if 4 * c < t {
        HeatmapLevel::Low
    } else if 2 * c < t {
        HeatmapLevel::Moderate
    } else if 4 * c < 3 * t {
        HeatmapLevel::Good
    } else {
        HeatmapLevel::Full
    }
}
