//! Activity log loading.
//!
//! Reads the exported activity CSV and keeps only the sleep rows as typed
//! intervals. Non-sleep rows are dropped before their timestamps are looked
//! at, so junk in unrelated activities never fails a run.

use crate::{Error, Result, SleepInterval, SLEEP_ACTIVITY};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const START_COLUMN: &str = "Date and Time";
const END_COLUMN: &str = "End Time";

/// chrono's `%Y` also takes 1-2 digit years; anything earlier than this came
/// from a two-digit year and must fall through to the `%y` layouts
const MIN_FOUR_DIGIT_YEAR: i32 = 1000;

/// Date-time layouts tried in order when parsing log timestamps
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %H:%M:%S%.f",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m/%d/%y"];

/// A row of the activity log; unknown columns are ignored
#[derive(Debug, Deserialize)]
struct ActivityRow {
    #[serde(rename = "Activity")]
    activity: String,
    #[serde(rename = "Date and Time", default)]
    start: Option<String>,
    #[serde(rename = "End Time", default)]
    end: Option<String>,
}

impl ActivityRow {
    fn is_sleep(&self) -> bool {
        self.activity == SLEEP_ACTIVITY
    }

    fn into_interval(self, line: u64) -> Result<SleepInterval> {
        let start = parse_column(self.start, START_COLUMN, line)?;
        let end = parse_column(self.end, END_COLUMN, line)?;
        Ok(SleepInterval::new(start, end))
    }
}

fn parse_column(value: Option<String>, column: &'static str, line: u64) -> Result<NaiveDateTime> {
    let value = value.unwrap_or_default();
    parse_timestamp(&value).ok_or(Error::Timestamp {
        line,
        column,
        value,
    })
}

/// Parse a log timestamp, inferring the layout.
///
/// Offsets in RFC 3339 input are dropped and the wall-clock time kept, since
/// every other layout is already local wall-clock time. Two-digit years map
/// to 1969-2068.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .find(|dt| dt.year() >= MIN_FOUR_DIGIT_YEAR)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .find(|date| date.year() >= MIN_FOUR_DIGIT_YEAR)
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Load all sleep intervals from the activity log at `path`
///
/// Intervals are returned in file order.
pub fn load_sleep_intervals(path: &Path) -> Result<Vec<SleepInterval>> {
    tracing::debug!("Reading activity log {:?}", path);
    let file = File::open(path)?;
    read_sleep_intervals(file)
}

/// Read sleep intervals from any CSV source with a header row
pub fn read_sleep_intervals<R: Read>(source: R) -> Result<Vec<SleepInterval>> {
    let (intervals, skipped) = read_rows(source)?;
    tracing::info!(
        "Loaded {} sleep intervals, skipped {} other activities",
        intervals.len(),
        skipped
    );
    Ok(intervals)
}

/// Sleep intervals plus the number of non-sleep rows passed over
fn read_rows<R: Read>(source: R) -> Result<(Vec<SleepInterval>, usize)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);
    let headers = reader.headers()?.clone();

    let mut intervals = Vec::new();
    let mut skipped = 0usize;
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: ActivityRow = record.deserialize(Some(&headers))?;

        if !row.is_sleep() {
            skipped += 1;
            continue;
        }

        intervals.push(row.into_interval(line)?);
    }

    Ok((intervals, skipped))
}
