//! Parallel multi-instrument batch driver
//!
//! Each instrument's pipeline is independent, so a batch fans out over a
//! worker pool sized to the available cores. Failures are recorded per
//! instrument and never abort the rest of the batch.

use crate::data::PriceHistoryProvider;
use crate::forecast::{forecast_instrument_as_of, ForecastConfig, InstrumentForecast};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of one instrument in a batch run
#[derive(Debug, Serialize)]
pub enum BatchOutcome {
    /// The pipeline completed
    Forecast(Box<InstrumentForecast>),
    /// The pipeline failed; the reason is recorded and the batch continues
    Failed {
        /// Stringified pipeline error
        error: String,
    },
    /// Cancelled before the computation started
    Cancelled,
}

/// One row of a batch result, keyed by instrument
#[derive(Debug, Serialize)]
pub struct BatchRecord {
    /// Instrument identifier
    pub instrument: String,
    /// What happened for this instrument
    pub outcome: BatchOutcome,
}

impl BatchRecord {
    /// The completed forecast, when there is one
    pub fn forecast(&self) -> Option<&InstrumentForecast> {
        match &self.outcome {
            BatchOutcome::Forecast(f) => Some(f),
            _ => None,
        }
    }
}

/// Run the full pipeline for many instruments on a worker pool.
///
/// Results come back in input order, one record per instrument. Setting
/// `cancel` skips instruments whose computation has not started yet;
/// already-completed results are unaffected.
pub fn forecast_batch<P>(
    provider: &P,
    instruments: &[String],
    as_of: NaiveDate,
    config: &ForecastConfig,
    cancel: &AtomicBool,
) -> Vec<BatchRecord>
where
    P: PriceHistoryProvider + Sync,
{
    instruments
        .par_iter()
        .map(|instrument| {
            if cancel.load(Ordering::Relaxed) {
                return BatchRecord {
                    instrument: instrument.clone(),
                    outcome: BatchOutcome::Cancelled,
                };
            }
            match forecast_instrument_as_of(provider, instrument, as_of, config) {
                Ok(forecast) => BatchRecord {
                    instrument: instrument.clone(),
                    outcome: BatchOutcome::Forecast(Box::new(forecast)),
                },
                Err(err) => {
                    log::error!("Failed to generate forecast for {}: {}", instrument, err);
                    BatchRecord {
                        instrument: instrument.clone(),
                        outcome: BatchOutcome::Failed {
                            error: err.to_string(),
                        },
                    }
                }
            }
        })
        .collect()
}
