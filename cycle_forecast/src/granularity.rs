//! Time granularities and calendar resampling
//!
//! Cycles are extracted at three granularities derived from the same daily
//! history: daily (short), weekly last-value (medium) and monthly
//! last-value (long). Each granularity carries its own period search
//! bounds, analog lookback length and turning-point spacing.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time granularity at which a cycle is extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Daily data
    Short,
    /// Weekly data, last observation per week
    Medium,
    /// Monthly data, last observation per month
    Long,
}

impl Granularity {
    /// All granularities, short to long
    pub const ALL: [Granularity; 3] = [Granularity::Short, Granularity::Medium, Granularity::Long];

    /// Calendar days represented by one native unit
    pub fn days_per_unit(&self) -> f64 {
        match self {
            Granularity::Short => 1.0,
            Granularity::Medium => 7.0,
            Granularity::Long => 30.0,
        }
    }

    /// Dominant-period search bounds, in native units
    pub fn period_bounds(&self) -> (f64, f64) {
        match self {
            Granularity::Short => (10.0, 60.0),
            Granularity::Medium => (4.0, 40.0),
            Granularity::Long => (6.0, 24.0),
        }
    }

    /// Number of cycle periods covered by the analog lookback window
    pub fn lookback_periods(&self) -> f64 {
        match self {
            Granularity::Short | Granularity::Medium => 2.0,
            Granularity::Long => 1.5,
        }
    }

    /// Minimum observations required after resampling and cleaning
    pub fn min_observations(&self) -> usize {
        match self {
            Granularity::Short => 252,
            Granularity::Medium => 52,
            Granularity::Long => 24,
        }
    }

    /// Minimum sample spacing between detected forecast turning points
    pub fn turn_spacing(&self) -> usize {
        match self {
            Granularity::Short => 5,
            Granularity::Medium => 10,
            Granularity::Long => 20,
        }
    }

    /// Lowercase label used in messages and serialized output
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Short => "short",
            Granularity::Medium => "medium",
            Granularity::Long => "long",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Last observation per ISO week (Monday through Sunday bins)
pub fn resample_weekly(dates: &[NaiveDate], values: &[f64]) -> (Vec<NaiveDate>, Vec<f64>) {
    resample_last(dates, values, |d| {
        let week = d.iso_week();
        (week.year(), week.week())
    })
}

/// Last observation per calendar month
pub fn resample_monthly(dates: &[NaiveDate], values: &[f64]) -> (Vec<NaiveDate>, Vec<f64>) {
    resample_last(dates, values, |d| (d.year(), d.month()))
}

fn resample_last<K: PartialEq>(
    dates: &[NaiveDate],
    values: &[f64],
    key: impl Fn(&NaiveDate) -> K,
) -> (Vec<NaiveDate>, Vec<f64>) {
    let mut out_dates: Vec<NaiveDate> = Vec::new();
    let mut out_values: Vec<f64> = Vec::new();

    for (date, value) in dates.iter().zip(values.iter()) {
        let same_bin = out_dates
            .last()
            .map(|last| key(last) == key(date))
            .unwrap_or(false);
        if same_bin {
            *out_dates.last_mut().unwrap() = *date;
            *out_values.last_mut().unwrap() = *value;
        } else {
            out_dates.push(*date);
            out_values.push(*value);
        }
    }

    (out_dates, out_values)
}

/// Re-express a coarse series on a daily calendar by forward-filling.
///
/// Every daily date takes the value of the latest coarse observation at or
/// before it; days before the first coarse observation take the first
/// value, so the output never contains gaps.
pub fn forward_fill_to_daily(
    coarse_dates: &[NaiveDate],
    coarse_values: &[f64],
    daily_dates: &[NaiveDate],
) -> Vec<f64> {
    if coarse_dates.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(daily_dates.len());
    let mut idx = 0usize;
    for date in daily_dates {
        while idx + 1 < coarse_dates.len() && coarse_dates[idx + 1] <= *date {
            idx += 1;
        }
        if coarse_dates[idx] <= *date {
            out.push(coarse_values[idx]);
        } else {
            out.push(coarse_values[0]);
        }
    }
    out
}
