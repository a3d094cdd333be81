//! Core domain types for sleepridge.
//!
//! This module defines the values that flow through the pipeline:
//! - Sleep intervals parsed from the activity log
//! - Day indices used as the ridge row key
//! - Grid samples handed to the renderer

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Activity label that marks a sleep row in the log
pub const SLEEP_ACTIVITY: &str = "Sleep";

/// Hours covered by one row of the ridge plot
pub const HOURS_PER_DAY: f64 = 24.0;

// ============================================================================
// Intervals
// ============================================================================

/// A single sleep session taken from the activity log.
///
/// `start < end` is expected but not enforced; an inverted interval simply
/// never contains any instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SleepInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SleepInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// True if `at` lies strictly between start and end
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start < at && at < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Day index of the interval's start relative to `reference`
    pub fn day_index(&self, reference: NaiveDate) -> i64 {
        day_index(self.start, reference)
    }
}

/// Whole calendar days between the timestamp's date and `reference`.
///
/// Plain date arithmetic, no time zone or DST awareness.
pub fn day_index(at: NaiveDateTime, reference: NaiveDate) -> i64 {
    (at.date() - reference).num_days()
}

// ============================================================================
// Samples
// ============================================================================

/// One asleep observation on the daily grid.
///
/// `hour_offset` is normally within `[0, 24]`; boundary padding pushes it
/// into `[-1, 0)` and `(24, 25]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub day: i64,
    pub hour_offset: f64,
}

impl Sample {
    pub fn new(day: i64, hour_offset: f64) -> Self {
        Self { day, hour_offset }
    }
}
