//! Structured diagnostic events
//!
//! Non-fatal conditions that a forecast run can encounter. They are
//! collected alongside the result and logged through the `log` facade, so
//! callers can choose to display, record or fail on them; they are never
//! silently folded into a plausible-looking number.

use crate::granularity::Granularity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal condition observed while building a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// The analog search returned no historical windows; the affected
    /// granularity's forecast is undefined rather than zero.
    NoAnalogsFound {
        granularity: Granularity,
        period_days: f64,
        series_len: usize,
    },
    /// The trailing cycle range collapsed to zero, so projections were
    /// scaled with a neutral unit divisor instead.
    DegenerateRange { granularity: Granularity },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoAnalogsFound {
                granularity,
                period_days,
                series_len,
            } => write!(
                f,
                "no analog patterns found for {} cycle (period {:.1}d, {} samples)",
                granularity, period_days, series_len
            ),
            Diagnostic::DegenerateRange { granularity } => write!(
                f,
                "degenerate cycle range for {} granularity, using unit scale",
                granularity
            ),
        }
    }
}
