//! Historical analog pattern search
//!
//! Scans a cycle series for past windows whose shape most closely
//! resembles the most recent window of the same length. Matches feed the
//! projection step: what followed a matched window becomes one candidate
//! future path.

use cycle_math::stats;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A historical window structurally similar to the most recent window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalogMatch {
    /// First index of the matched window
    pub start_idx: usize,
    /// One past the last index of the matched window
    pub end_idx: usize,
    /// Pearson correlation with the recent window, in [-1, 1]
    pub correlation: f64,
}

/// Find up to `n_matches` mutually non-overlapping historical windows most
/// similar to the most recent window of the cycle series.
///
/// The lookback window spans `period_days * lookback_periods` samples.
/// Candidates ending within `period_days * min_gap_periods` samples of the
/// present are excluded, as are selected pairs whose starts are closer
/// than that gap. Windows are compared after normalization to zero mean
/// and unit variance; a NaN correlation (zero-variance window) ranks as
/// -1. Returns an empty list, never an error, when history is too short.
pub fn find_pattern_matches(
    cycle: &[f64],
    period_days: f64,
    lookback_periods: f64,
    n_matches: usize,
    min_gap_periods: f64,
) -> Vec<AnalogMatch> {
    let lookback = (period_days * lookback_periods) as usize;
    if lookback == 0 || cycle.len() < lookback * 2 {
        return Vec::new();
    }

    let recent = &cycle[cycle.len() - lookback..];
    let recent_norm = stats::normalize(recent);

    let min_gap = (period_days * min_gap_periods) as usize;
    let search_end = cycle.len().saturating_sub(lookback + min_gap);
    if search_end <= lookback {
        return Vec::new();
    }

    let mut candidates: Vec<AnalogMatch> = Vec::with_capacity(search_end - lookback);
    for i in lookback..search_end {
        let window_norm = stats::normalize(&cycle[i - lookback..i]);
        let correlation = match stats::pearson(&recent_norm, &window_norm) {
            Ok(c) if c.is_finite() => c,
            _ => -1.0,
        };
        candidates.push(AnalogMatch {
            start_idx: i - lookback,
            end_idx: i,
            correlation,
        });
    }

    // Stable sort keeps repeated runs deterministic for equal correlations
    candidates.sort_by(|a, b| {
        b.correlation
            .partial_cmp(&a.correlation)
            .unwrap_or(Ordering::Equal)
    });

    let mut selected: Vec<AnalogMatch> = Vec::with_capacity(n_matches);
    for candidate in candidates {
        let overlaps = selected
            .iter()
            .any(|s| candidate.start_idx.abs_diff(s.start_idx) < min_gap);
        if !overlaps {
            selected.push(candidate);
        }
        if selected.len() >= n_matches {
            break;
        }
    }

    selected
}
