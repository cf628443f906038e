//! Source of "today"
//!
//! Streak functions never read a clock. The server asks a `Clock` once per
//! request and passes the date down explicitly.

use chrono::Local;

use crate::domain::LogDate;

/// Provides the current calendar day
pub trait Clock {
    fn today(&self) -> LogDate;
}

/// The local calendar date of the machine running the server
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> LogDate {
        LogDate::from_naive(Local::now().date_naive())
    }
}

/// A clock pinned to one day, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub LogDate);

impl Clock for FixedClock {
    fn today(&self) -> LogDate {
        self.0
    }
}
