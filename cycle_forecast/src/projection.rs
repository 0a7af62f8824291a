//! Forward projection and ensemble bounds
//!
//! Each analog match contributes the cycle values that actually followed
//! its window. The ensemble combines those continuations into a mean path
//! with robust upper and lower bounds.

use crate::matching::AnalogMatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// What followed one matched historical window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    /// Correlation of the originating match
    pub correlation: f64,
    /// Cycle values observed immediately after the matched window
    pub values: Vec<f64>,
    /// First date of the matched window
    pub start_date: NaiveDate,
    /// First date after the matched window
    pub end_date: NaiveDate,
}

impl Projection {
    /// Number of forward samples available
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the projection carries any samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extract the forward continuation of each match, up to `forecast_days`
/// samples.
///
/// Matches near the end of history yield shorter projections; they are
/// truncated, never padded.
pub fn project_from_matches(
    cycle: &[f64],
    dates: &[NaiveDate],
    matches: &[AnalogMatch],
    forecast_days: usize,
) -> Vec<Projection> {
    let mut projections = Vec::with_capacity(matches.len());

    for m in matches {
        let available = cycle.len().saturating_sub(m.end_idx);
        if available == 0 {
            continue;
        }
        let take = forecast_days.min(available);
        projections.push(Projection {
            correlation: m.correlation,
            values: cycle[m.end_idx..m.end_idx + take].to_vec(),
            start_date: dates[m.start_idx],
            end_date: dates[m.end_idx],
        });
    }

    projections
}

/// Mean forecast with robust bounds across normalized projections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleBounds {
    /// Elementwise mean across projections
    pub mean: Vec<f64>,
    /// Second-highest value per step (highest with fewer than 3 members)
    pub upper: Vec<f64>,
    /// Second-lowest value per step (lowest with fewer than 3 members)
    pub lower: Vec<f64>,
}

/// Combine projections into a mean forecast and second-most-extreme
/// bounds.
///
/// All projections are truncated to the shortest member and divided by
/// `norm_factor` so they are comparable in scale to the recently observed
/// cycle. Discarding the single most extreme member per direction keeps
/// one outlier analog from dominating the band; with fewer than three
/// members the plain extremes are used so the bounds still bracket the
/// mean. Returns `None`, never a degenerate zero curve, when no
/// projection carries samples.
pub fn ensemble_bounds(projections: &[Projection], norm_factor: f64) -> Option<EnsembleBounds> {
    if projections.is_empty() {
        return None;
    }
    let min_len = projections.iter().map(|p| p.len()).min()?;
    if min_len == 0 {
        return None;
    }

    let rows: Vec<Vec<f64>> = projections
        .iter()
        .map(|p| p.values[..min_len].iter().map(|v| v / norm_factor).collect())
        .collect();

    let mut mean = Vec::with_capacity(min_len);
    let mut upper = Vec::with_capacity(min_len);
    let mut lower = Vec::with_capacity(min_len);

    for step in 0..min_len {
        let mut column: Vec<f64> = rows.iter().map(|row| row[step]).collect();
        column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        mean.push(column.iter().mean());
        if column.len() >= 3 {
            lower.push(column[1]);
            upper.push(column[column.len() - 2]);
        } else {
            lower.push(column[0]);
            upper.push(column[column.len() - 1]);
        }
    }

    Some(EnsembleBounds { mean, upper, lower })
}
