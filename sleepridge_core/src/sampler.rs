//! Daily grid sampler.
//!
//! Turns sparse sleep intervals into dense per-day "was asleep" samples on a
//! fixed time-of-day grid. The samples are density-estimation input only:
//! order carries no meaning and repeats act as weight.
//!
//! Each day only considers intervals that start on the previous, same or
//! next calendar day. That catches sessions crossing midnight but truncates
//! anything longer than two days, so such intervals are reported with a
//! warning.

use crate::{check_status, Error, Result, Sample, SleepInterval, HOURS_PER_DAY};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Longest interval the three-day window covers without truncation
const MAX_WINDOWED_HOURS: i64 = 48;

/// Width of the synthetic padding emitted past midnight boundaries
const PADDING_HOURS: f64 = 1.0;

/// Grid sampler parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SamplerParams {
    /// Day 0; sampled days are `1..=num_days` after it
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,

    #[serde(default = "default_num_days")]
    pub num_days: u32,

    /// Grid resolution in hours
    #[serde(default = "default_step_hours")]
    pub step_hours: f64,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            num_days: default_num_days(),
            step_hours: default_step_hours(),
        }
    }
}

fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 7, 31).expect("2021-07-31 is a valid date")
}

fn default_num_days() -> u32 {
    100
}

fn default_step_hours() -> f64 {
    0.25
}

impl SamplerParams {
    pub fn validate(&self) -> Result<()> {
        if !self.step_hours.is_finite() || self.step_hours <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "step_hours must be a positive number, got {}",
                self.step_hours
            )));
        }
        Ok(())
    }
}

/// Time-of-day grid `0, step, 2*step, ...` up to `24 + step` (exclusive).
///
/// When `step` divides 24 the last point is exactly 24.
fn hour_grid(step: f64) -> impl Iterator<Item = f64> {
    arange(0.0, HOURS_PER_DAY + step, step)
}

/// Evenly spaced values from `start` towards `stop` (exclusive), `step` may be negative
fn arange(start: f64, stop: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..count).map(move |i| start + i as f64 * step)
}

fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

fn is_end_of_day(hour: f64) -> bool {
    (hour - HOURS_PER_DAY).abs() < 1e-9
}

/// Build the per-day asleep sample set for days `1..=num_days`.
///
/// When the subject is asleep at exactly midnight at the start of a day,
/// extra samples at `[-1, 0)` are added for that day; asleep at the end of
/// the day adds samples at `(24, 25]`. This keeps a kernel density estimate
/// clipped to `[0, 24]` from tapering off at the edges.
pub fn build_dataset(intervals: &[SleepInterval], params: &SamplerParams) -> Result<Vec<Sample>> {
    params.validate()?;

    let step = params.step_hours;
    let origin = params.reference_date.and_time(NaiveTime::MIN);

    for interval in intervals {
        if interval.duration() > Duration::hours(MAX_WINDOWED_HOURS) {
            tracing::warn!(
                "Sleep interval {} -> {} spans more than two days and will be truncated",
                interval.start,
                interval.end
            );
        }
    }

    let indexed: Vec<(i64, &SleepInterval)> = intervals
        .iter()
        .map(|interval| (interval.day_index(params.reference_date), interval))
        .collect();

    let mut samples = Vec::new();

    for day in 1..=i64::from(params.num_days) {
        let window: Vec<&SleepInterval> = indexed
            .iter()
            .filter(|(start_day, _)| (day - 1..=day + 1).contains(start_day))
            .map(|(_, interval)| *interval)
            .collect();

        if window.is_empty() {
            continue;
        }

        let midnight = origin + Duration::days(day);
        let before = samples.len();

        for hour in hour_grid(step) {
            let at = midnight + hours_to_duration(hour);
            if !check_status(at, window.iter().copied()).is_sleeping() {
                continue;
            }

            samples.push(Sample::new(day, hour));

            if hour == 0.0 {
                samples.extend(arange(-PADDING_HOURS, 0.0, step).map(|h| Sample::new(day, h)));
            } else if is_end_of_day(hour) {
                samples.extend(
                    arange(HOURS_PER_DAY + PADDING_HOURS, HOURS_PER_DAY, -step)
                        .map(|h| Sample::new(day, h)),
                );
            }
        }

        tracing::trace!("Day {}: {} samples", day, samples.len() - before);
    }

    tracing::debug!(
        "Built {} samples over {} days at {}h resolution",
        samples.len(),
        params.num_days,
        step
    );

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::collections::BTreeSet;

    fn at(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").unwrap()
    }

    fn params(num_days: u32) -> SamplerParams {
        SamplerParams {
            num_days,
            ..SamplerParams::default()
        }
    }

    fn hours_for(samples: &[Sample], day: i64) -> Vec<f64> {
        let mut hours: Vec<f64> = samples
            .iter()
            .filter(|s| s.day == day)
            .map(|s| s.hour_offset)
            .collect();
        hours.sort_by(|a, b| a.partial_cmp(b).unwrap());
        hours
    }

    fn days(samples: &[Sample]) -> BTreeSet<i64> {
        samples.iter().map(|s| s.day).collect()
    }

    fn sorted(mut samples: Vec<Sample>) -> Vec<(i64, f64)> {
        samples.sort_by(|a, b| {
            a.day
                .cmp(&b.day)
                .then(a.hour_offset.partial_cmp(&b.hour_offset).unwrap())
        });
        samples.into_iter().map(|s| (s.day, s.hour_offset)).collect()
    }

    #[test]
    fn test_default_params() {
        let params = SamplerParams::default();
        assert_eq!(params.reference_date, NaiveDate::from_ymd_opt(2021, 7, 31).unwrap());
        assert_eq!(params.num_days, 100);
        assert_eq!(params.step_hours, 0.25);
    }

    #[test]
    fn test_hour_grid_includes_both_ends() {
        let grid: Vec<f64> = hour_grid(0.25).collect();
        assert_eq!(grid.len(), 97);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[96], 24.0);

        // A step that does not divide 24 overshoots like numpy's arange
        let grid: Vec<f64> = hour_grid(5.0).collect();
        assert_eq!(grid, vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0]);
    }

    #[test]
    fn test_night_crossing_midnight() {
        crate::logging::init_test();

        let intervals = vec![SleepInterval::new(at("2021-07-31 23:00"), at("2021-08-01 07:00"))];
        let samples = build_dataset(&intervals, &params(100)).unwrap();

        // Day 0 (the evening part) is never sampled, day 1 gets the morning
        assert_eq!(days(&samples), BTreeSet::from([1]));

        let hours = hours_for(&samples, 1);
        let expected: Vec<f64> = arange(-1.0, 7.0, 0.25).collect();
        assert_eq!(hours, expected);
        assert_eq!(hours.first(), Some(&-1.0));
        assert_eq!(hours.last(), Some(&6.75));
    }

    #[test]
    fn test_leading_padding_when_asleep_at_midnight() {
        let intervals = vec![SleepInterval::new(at("2021-08-01 22:00"), at("2021-08-02 06:00"))];
        let samples = build_dataset(&intervals, &params(5)).unwrap();

        let day2 = hours_for(&samples, 2);
        let padding: Vec<f64> = day2.iter().copied().filter(|h| *h < 0.0).collect();
        assert_eq!(padding, vec![-1.0, -0.75, -0.5, -0.25]);
        assert!(day2.contains(&0.0));
    }

    #[test]
    fn test_trailing_padding_when_asleep_at_end_of_day() {
        let intervals = vec![SleepInterval::new(at("2021-08-01 22:00"), at("2021-08-02 06:00"))];
        let samples = build_dataset(&intervals, &params(5)).unwrap();

        let day1 = hours_for(&samples, 1);
        let padding: Vec<f64> = day1.iter().copied().filter(|h| *h > 24.0).collect();
        assert_eq!(padding, vec![24.25, 24.5, 24.75, 25.0]);
        assert_eq!(day1.iter().filter(|h| **h >= 22.0 && **h <= 24.0).count(), 8);
        assert!(!day1.contains(&22.0));
    }

    #[test]
    fn test_no_padding_without_midnight_sleep() {
        let intervals = vec![SleepInterval::new(at("2021-08-01 13:00"), at("2021-08-01 15:00"))];
        let samples = build_dataset(&intervals, &params(5)).unwrap();
        assert!(samples.iter().all(|s| (0.0..=24.0).contains(&s.hour_offset)));
        assert_eq!(hours_for(&samples, 1).len(), 7);
    }

    #[test]
    fn test_single_night_in_three_day_run() {
        let intervals = vec![SleepInterval::new(at("2021-08-01 00:00"), at("2021-08-01 08:00"))];
        let samples = build_dataset(&intervals, &params(3)).unwrap();

        // The window reaches days 0..=2, but only day 1 overlaps the interval
        assert_eq!(days(&samples), BTreeSet::from([1]));

        // Midnight is the start endpoint, so no sample or padding there
        let hours = hours_for(&samples, 1);
        let expected: Vec<f64> = arange(0.25, 8.0, 0.25).collect();
        assert_eq!(hours, expected);
        assert_eq!(hours.len(), 31);
    }

    #[test]
    fn test_long_interval_truncated_by_window() {
        let intervals = vec![SleepInterval::new(at("2021-07-31 12:00"), at("2021-08-04 12:00"))];
        let samples = build_dataset(&intervals, &params(5)).unwrap();

        // Starts on day 0, so day 2 onwards never has it in the window
        assert_eq!(days(&samples), BTreeSet::from([1]));
        assert_eq!(hours_for(&samples, 1).len(), 97 + 4 + 4);
    }

    #[test]
    fn test_interval_outside_window_ignored() {
        let intervals = vec![SleepInterval::new(at("2021-08-10 01:00"), at("2021-08-10 05:00"))];
        let samples = build_dataset(&intervals, &params(3)).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let intervals = vec![
            SleepInterval::new(at("2021-07-31 23:00"), at("2021-08-01 07:00")),
            SleepInterval::new(at("2021-08-01 13:00"), at("2021-08-01 14:30")),
            SleepInterval::new(at("2021-08-01 21:30"), at("2021-08-02 06:15")),
        ];
        let first = build_dataset(&intervals, &params(10)).unwrap();
        let second = build_dataset(&intervals, &params(10)).unwrap();
        assert!(!first.is_empty());
        assert_eq!(sorted(first), sorted(second));
    }

    #[test]
    fn test_zero_days_is_empty() {
        let intervals = vec![SleepInterval::new(at("2021-08-01 00:00"), at("2021-08-01 08:00"))];
        assert!(build_dataset(&intervals, &params(0)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_step_rejected() {
        let intervals = vec![SleepInterval::new(at("2021-08-01 00:00"), at("2021-08-01 08:00"))];
        for step in [0.0, -0.25, f64::NAN, f64::INFINITY] {
            let params = SamplerParams {
                step_hours: step,
                ..SamplerParams::default()
            };
            let err = build_dataset(&intervals, &params).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_coarser_step() {
        let intervals = vec![SleepInterval::new(at("2021-08-01 00:30"), at("2021-08-01 03:30"))];
        let params = SamplerParams {
            num_days: 2,
            step_hours: 1.0,
            ..SamplerParams::default()
        };
        let samples = build_dataset(&intervals, &params).unwrap();
        assert_eq!(hours_for(&samples, 1), vec![1.0, 2.0, 3.0]);
    }
}
