//! Turning point detection on forecast curves

use chrono::NaiveDate;
use cycle_math::peaks;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a turning point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnKind {
    /// Local maximum
    Peak,
    /// Local minimum
    Trough,
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnKind::Peak => write!(f, "peak"),
            TurnKind::Trough => write!(f, "trough"),
        }
    }
}

/// A labeled local extremum of a mean forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningPoint {
    /// Forecast date of the extremum
    pub date: NaiveDate,
    /// Forecast value at the extremum
    pub amplitude: f64,
    /// Peak or trough
    pub kind: TurnKind,
}

/// Locate peaks and troughs of a mean forecast.
///
/// `min_distance` is the minimum sample spacing between detected turns of
/// the same kind; it guards against labeling noise-level wiggles. An
/// empty or monotonic forecast yields empty lists, not an error.
pub fn find_turning_points(
    forecast: &[f64],
    dates: &[NaiveDate],
    min_distance: usize,
) -> (Vec<TurningPoint>, Vec<TurningPoint>) {
    if forecast.is_empty() || forecast.len() != dates.len() {
        return (Vec::new(), Vec::new());
    }

    let peak_indices = peaks::find_peaks(forecast, min_distance);
    let negated: Vec<f64> = forecast.iter().map(|v| -v).collect();
    let trough_indices = peaks::find_peaks(&negated, min_distance);

    let peaks = peak_indices
        .into_iter()
        .map(|i| TurningPoint {
            date: dates[i],
            amplitude: forecast[i],
            kind: TurnKind::Peak,
        })
        .collect();
    let troughs = trough_indices
        .into_iter()
        .map(|i| TurningPoint {
            date: dates[i],
            amplitude: forecast[i],
            kind: TurnKind::Trough,
        })
        .collect();

    (peaks, troughs)
}
