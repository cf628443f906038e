//! Calendar-day type used by every streak computation
//!
//! A `LogDate` is a timezone-free calendar day. Its only text form is the
//! zero-padded `YYYY-MM-DD` string, which sorts in calendar order; internally
//! it wraps `chrono::NaiveDate` so all arithmetic is calendar aware (month
//! ends, year ends, leap days).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single calendar day with no time-of-day or timezone attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogDate(NaiveDate);

impl LogDate {
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a date from its components, rejecting impossible days
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DomainError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                DomainError::InvalidDate(format!("{:04}-{:02}-{:02} does not exist", year, month, day))
            })
    }

    /// Parse the canonical `YYYY-MM-DD` form
    ///
    /// Non-canonical spellings (`2024-1-5`, surrounding whitespace) are
    /// rejected rather than coerced.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let parsed = NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|e| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date: {}", s, e)))?;

        if parsed.format(DATE_FORMAT).to_string() != s {
            return Err(DomainError::InvalidDate(format!(
                "'{}' must be zero-padded as YYYY-MM-DD",
                s
            )));
        }

        Ok(Self(parsed))
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// The day before, `None` only at the end of the representable range
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The day after
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn add_days(self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }

    pub fn sub_days(self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }

    /// Signed number of days from `self` to `other`
    pub fn days_until(self, other: LogDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for LogDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for LogDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for LogDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LogDate::parse(&raw).map_err(de::Error::custom)
    }
}

/// True iff `later` is exactly one calendar day after `earlier`
pub fn is_consecutive_day(earlier: LogDate, later: LogDate) -> bool {
    earlier.succ() == Some(later)
}

/// String form of [`is_consecutive_day`] for callers holding raw dates
pub fn is_consecutive_day_str(earlier: &str, later: &str) -> Result<bool, DomainError> {
    Ok(is_consecutive_day(LogDate::parse(earlier)?, LogDate::parse(later)?))
}

/// An inclusive run of calendar days
///
/// A range whose end precedes its start is empty; it contains nothing and
/// has zero days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: LogDate,
    pub end: LogDate,
}

impl DateRange {
    pub fn inclusive(start: LogDate, end: LogDate) -> Self {
        Self { start, end }
    }

    /// The last `days` days ending at `end`, oldest first
    pub fn ending_at(end: LogDate, days: u32) -> Self {
        if days == 0 {
            // An empty range anchored at `end`
            return match end.succ() {
                Some(after) => Self { start: after, end },
                None => Self { start: end, end: end.pred().unwrap_or(end) },
            };
        }
        let start = end.sub_days(u64::from(days - 1)).unwrap_or(end);
        Self { start, end }
    }

    /// The calendar week containing `date`, starting on `week_start`
    pub fn week_of(date: LogDate, week_start: Weekday) -> Self {
        let offset = (7 + date.weekday().num_days_from_monday()
            - week_start.num_days_from_monday())
            % 7;
        let start = date.sub_days(u64::from(offset)).unwrap_or(date);
        let end = start.add_days(6).unwrap_or(start);
        Self { start, end }
    }

    pub fn contains(&self, date: LogDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of days covered
    pub fn len_days(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            u32::try_from(self.start.days_until(self.end) + 1).unwrap_or(u32::MAX)
        }
    }

    /// Every day in the range, oldest first
    pub fn dates(&self) -> Vec<LogDate> {
        (0..self.len_days())
            .filter_map(|offset| self.start.add_days(u64::from(offset)))
            .collect()
    }
}
