//! Multi-granularity cycle extraction
//!
//! Splits the daily log-price history into detrended cyclical residuals at
//! daily, weekly and monthly resolution, locates each granularity's
//! dominant period with a wavelet scan and rebuilds the cycle at that
//! period. Coarse cycles are re-expressed on the daily calendar so the
//! three granularities can be compared and combined downstream.

use crate::data::PriceSeries;
use crate::error::{CycleError, Result};
use crate::granularity::{self, Granularity};
use chrono::NaiveDate;
use cycle_math::{filters, wavelet};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Smoothing strength of the trend filter
const HP_LAMBDA: f64 = 1600.0;
/// Number of wavelet scales sampled between the period bounds
const N_SCALES: usize = 100;

/// Extracted cyclical component for one granularity
#[derive(Debug, Clone, Serialize)]
pub struct CycleComponent {
    /// Granularity the cycle was extracted at
    pub granularity: Granularity,
    /// Dominant period in native units (days, weeks or months)
    pub period: f64,
    /// Dominant period normalized to calendar days
    pub period_days: f64,
    /// Standard deviation of the reconstructed cycle
    pub amplitude: f64,
    /// Dates of the resampled series the cycle was extracted from
    pub native_dates: Vec<NaiveDate>,
    /// Cyclical residual at native resolution
    pub detrended: Vec<f64>,
    /// Reconstructed cycle re-expressed on the daily index
    pub cycle_daily: Vec<f64>,
}

/// Cycles for all three granularities over a shared daily calendar
#[derive(Debug, Clone, Serialize)]
pub struct MultiGranularityCycles {
    /// Daily calendar shared by the `cycle_daily` series
    pub dates: Vec<NaiveDate>,
    /// Daily cycle
    pub short: CycleComponent,
    /// Weekly cycle
    pub medium: CycleComponent,
    /// Monthly cycle
    pub long: CycleComponent,
}

impl MultiGranularityCycles {
    /// Component for a granularity
    pub fn component(&self, granularity: Granularity) -> &CycleComponent {
        match granularity {
            Granularity::Short => &self.short,
            Granularity::Medium => &self.medium,
            Granularity::Long => &self.long,
        }
    }
}

/// Extract short, medium and long cycles from the trailing
/// `lookback_days` observations of a price history.
pub fn extract_cycles(series: &PriceSeries, lookback_days: usize) -> Result<MultiGranularityCycles> {
    let recent = series.tail(lookback_days);
    let log_price = recent.log_price();
    let dates = recent.dates().to_vec();

    if log_price.len() < Granularity::Short.min_observations() {
        return Err(CycleError::InsufficientData {
            granularity: Granularity::Short,
            required: Granularity::Short.min_observations(),
            actual: log_price.len(),
        });
    }

    let short = extract_component(Granularity::Short, &dates, &log_price, &dates)?;

    let (weekly_dates, weekly_values) = granularity::resample_weekly(&dates, &log_price);
    if weekly_values.len() < Granularity::Medium.min_observations() {
        return Err(CycleError::InsufficientData {
            granularity: Granularity::Medium,
            required: Granularity::Medium.min_observations(),
            actual: weekly_values.len(),
        });
    }
    let medium = extract_component(Granularity::Medium, &weekly_dates, &weekly_values, &dates)?;

    let (monthly_dates, monthly_values) = granularity::resample_monthly(&dates, &log_price);
    if monthly_values.len() < Granularity::Long.min_observations() {
        return Err(CycleError::InsufficientData {
            granularity: Granularity::Long,
            required: Granularity::Long.min_observations(),
            actual: monthly_values.len(),
        });
    }
    let long = extract_component(Granularity::Long, &monthly_dates, &monthly_values, &dates)?;

    Ok(MultiGranularityCycles {
        dates,
        short,
        medium,
        long,
    })
}

fn extract_component(
    granularity: Granularity,
    native_dates: &[NaiveDate],
    log_values: &[f64],
    daily_dates: &[NaiveDate],
) -> Result<CycleComponent> {
    let (_trend, detrended) = filters::hodrick_prescott(log_values, HP_LAMBDA)?;

    let (min_period, max_period) = granularity.period_bounds();
    let scales = wavelet::linspace(
        wavelet::period_to_scale(min_period),
        wavelet::period_to_scale(max_period),
        N_SCALES,
    );
    let cwt = wavelet::cwt_morlet(&detrended, &scales)?;
    let best_idx = cwt.best_scale_index();
    let period = cwt.periods[best_idx];

    let cycle = wavelet::reconstruct_cycle(&cwt, best_idx)?;
    let amplitude = cycle.iter().population_std_dev();

    log::debug!(
        "{} cycle: period {:.1} native units, amplitude {:.5}",
        granularity,
        period,
        amplitude
    );

    let cycle_daily = match granularity {
        Granularity::Short => cycle.clone(),
        _ => granularity::forward_fill_to_daily(native_dates, &cycle, daily_dates),
    };

    Ok(CycleComponent {
        granularity,
        period,
        period_days: period * granularity.days_per_unit(),
        amplitude,
        native_dates: native_dates.to_vec(),
        detrended,
        cycle_daily,
    })
}
