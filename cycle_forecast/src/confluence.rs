//! Cross-granularity confluence detection
//!
//! Turning points from different granularities that land within a short
//! date window and share direction are treated as higher-confidence
//! signals. Detection is first-found over date-ordered turn lists; it
//! deliberately does not search for the globally closest alignment.

use crate::turning::{TurnKind, TurningPoint};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Leading peaks and troughs per granularity considered for confluence
pub const TURNS_PER_GRANULARITY: usize = 3;

/// Aligned short and medium turning points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairConfluence {
    /// Shared direction of the aligned turns
    pub kind: TurnKind,
    /// Midpoint of the contributing dates
    pub date: NaiveDate,
    /// Days between the contributing turns
    pub days_apart: i64,
    /// Short-cycle turn date
    pub short_date: NaiveDate,
    /// Medium-cycle turn date
    pub medium_date: NaiveDate,
}

/// Aligned short, medium and long turning points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripleConfluence {
    /// Shared direction of the aligned turns
    pub kind: TurnKind,
    /// Centroid of the contributing dates
    pub date: NaiveDate,
    /// Largest pairwise gap among the contributing turns
    pub max_days_apart: i64,
    /// Short-cycle turn date
    pub short_date: NaiveDate,
    /// Medium-cycle turn date
    pub medium_date: NaiveDate,
    /// Long-cycle turn date
    pub long_date: NaiveDate,
}

/// Confluence findings across the three granularities; both entries are
/// independently nullable and absence is a common, valid outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceReport {
    /// Short + medium alignment
    pub short_medium: Option<PairConfluence>,
    /// Short + medium + long alignment
    pub triple: Option<TripleConfluence>,
}

/// Merge the first few peaks and troughs into one date-ordered turn list
pub fn leading_turns(
    peaks: &[TurningPoint],
    troughs: &[TurningPoint],
    limit: usize,
) -> Vec<TurningPoint> {
    let mut turns: Vec<TurningPoint> = peaks
        .iter()
        .take(limit)
        .chain(troughs.iter().take(limit))
        .copied()
        .collect();
    turns.sort_by_key(|t| t.date);
    turns
}

/// Detect pairwise and triple confluence within a tolerance window.
///
/// Inputs are date-ordered turn lists per granularity. The first
/// same-direction pair (short + medium) whose dates fall within
/// `window_days` wins; likewise the first same-direction triple whose
/// every pairwise gap fits the window. Midpoints use whole-day
/// arithmetic.
pub fn find_confluence(
    short: &[TurningPoint],
    medium: &[TurningPoint],
    long: &[TurningPoint],
    window_days: i64,
) -> ConfluenceReport {
    let mut report = ConfluenceReport::default();

    'pair: for s in short {
        for m in medium {
            let days_apart = day_gap(s.date, m.date);
            if days_apart <= window_days && s.kind == m.kind {
                let offset = m.date.signed_duration_since(s.date).num_days() / 2;
                report.short_medium = Some(PairConfluence {
                    kind: s.kind,
                    date: s.date + Duration::days(offset),
                    days_apart,
                    short_date: s.date,
                    medium_date: m.date,
                });
                break 'pair;
            }
        }
    }

    'triple: for s in short {
        for m in medium {
            for l in long {
                let sm = day_gap(s.date, m.date);
                let sl = day_gap(s.date, l.date);
                let ml = day_gap(m.date, l.date);

                if sm <= window_days
                    && sl <= window_days
                    && ml <= window_days
                    && s.kind == m.kind
                    && m.kind == l.kind
                {
                    let offset = (m.date.signed_duration_since(s.date).num_days()
                        + l.date.signed_duration_since(s.date).num_days())
                        / 3;
                    report.triple = Some(TripleConfluence {
                        kind: s.kind,
                        date: s.date + Duration::days(offset),
                        max_days_apart: sm.max(sl).max(ml),
                        short_date: s.date,
                        medium_date: m.date,
                        long_date: l.date,
                    });
                    break 'triple;
                }
            }
        }
    }

    report
}

fn day_gap(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days().abs()
}
