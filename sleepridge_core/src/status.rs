//! Point-in-time sleep status lookup.

use crate::SleepInterval;
use chrono::NaiveDateTime;
use std::fmt;

/// Whether the subject was asleep at a given instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepStatus {
    Sleeping,
    NotSleeping,
}

impl SleepStatus {
    pub fn is_sleeping(self) -> bool {
        self == SleepStatus::Sleeping
    }
}

impl fmt::Display for SleepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepStatus::Sleeping => f.write_str("sleeping"),
            SleepStatus::NotSleeping => f.write_str("not sleeping"),
        }
    }
}

/// Check whether `at` falls strictly inside any of `intervals`.
///
/// Linear scan that stops at the first covering interval. Interval sets are
/// bounded by one session per day, so no index is kept.
pub fn check_status<'a, I>(at: NaiveDateTime, intervals: I) -> SleepStatus
where
    I: IntoIterator<Item = &'a SleepInterval>,
{
    if intervals.into_iter().any(|interval| interval.contains(at)) {
        SleepStatus::Sleeping
    } else {
        SleepStatus::NotSleeping
    }
}
