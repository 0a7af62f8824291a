//! End-to-end cycle forecast pipeline
//!
//! Wires the stages together for one instrument: fetch with a shrinking
//! lookback ladder, extract cycles per granularity, search analogs,
//! project and ensemble, label turning points and detect confluence.

use crate::confluence::{self, ConfluenceReport, TURNS_PER_GRANULARITY};
use crate::cycles::{extract_cycles, CycleComponent, MultiGranularityCycles};
use crate::data::{PriceHistoryProvider, PriceSeries};
use crate::diagnostics::Diagnostic;
use crate::error::{CycleError, Result};
use crate::granularity::Granularity;
use crate::matching::{find_pattern_matches, AnalogMatch};
use crate::projection::{ensemble_bounds, project_from_matches, Projection};
use crate::turning::{find_turning_points, TurningPoint};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Shorter lookbacks tried when the preferred fetch cannot be satisfied
const FALLBACK_LOOKBACK_YEARS: [i64; 3] = [15, 10, 5];
/// Minimum history accepted from any fetch (three trading years)
const MIN_FETCH_OBSERVATIONS: usize = 3 * 252;
/// Trading days per year, used to convert the lookback to observations
const TRADING_DAYS_PER_YEAR: usize = 252;

/// Tunable parameters of a forecast request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Calendar days to project forward
    pub forecast_days: usize,
    /// Preferred years of history to fetch
    pub lookback_years: i64,
    /// Maximum analog windows per granularity
    pub n_matches: usize,
    /// Minimum gap between analog starts, in cycle periods
    pub min_gap_periods: f64,
    /// Tolerance window for confluence detection, calendar days
    pub confluence_window_days: i64,
    /// Trailing window used for display scaling, trading days
    pub display_lookback_days: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            forecast_days: 180,
            lookback_years: 20,
            n_matches: 5,
            min_gap_periods: 1.0,
            confluence_window_days: 3,
            display_lookback_days: 252,
        }
    }
}

/// Forecast for one granularity
#[derive(Debug, Clone, Serialize)]
pub struct GranularityForecast {
    /// Granularity this forecast belongs to
    pub granularity: Granularity,
    /// Selected analog windows, best correlation first
    pub matches: Vec<AnalogMatch>,
    /// Forward continuations of the matches
    pub projections: Vec<Projection>,
    /// Mean forecast; `None` when no analog history was found
    pub mean_forecast: Option<Vec<f64>>,
    /// Second-highest path per step; `None` alongside the mean
    pub upper_bound: Option<Vec<f64>>,
    /// Second-lowest path per step; `None` alongside the mean
    pub lower_bound: Option<Vec<f64>>,
    /// Usable forecast length in days
    pub forecast_len: usize,
    /// Dates of the forecast samples
    pub forecast_dates: Vec<NaiveDate>,
    /// Detected forecast peaks
    pub peaks: Vec<TurningPoint>,
    /// Detected forecast troughs
    pub troughs: Vec<TurningPoint>,
    /// Dates of the trailing cycle history kept for display
    pub hist_dates: Vec<NaiveDate>,
    /// Trailing cycle history kept for display
    pub hist_cycle: Vec<f64>,
    /// Divisor that puts projections on the recent cycle's scale
    pub norm_factor: f64,
}

/// Complete forecast result for one instrument
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentForecast {
    /// Instrument identifier
    pub instrument: String,
    /// Date of the last observed close
    pub last_date: NaiveDate,
    /// Last observed close price
    pub last_close: f64,
    /// Requested forecast horizon in days
    pub forecast_days: usize,
    /// Extracted cycles per granularity
    pub cycles: MultiGranularityCycles,
    /// Short-cycle forecast
    pub short: GranularityForecast,
    /// Medium-cycle forecast
    pub medium: GranularityForecast,
    /// Long-cycle forecast
    pub long: GranularityForecast,
    /// Cross-granularity confluence findings
    pub confluence: ConfluenceReport,
    /// Non-fatal conditions encountered while forecasting
    pub diagnostics: Vec<Diagnostic>,
}

impl InstrumentForecast {
    /// Forecast for a granularity
    pub fn forecast(&self, granularity: Granularity) -> &GranularityForecast {
        match granularity {
            Granularity::Short => &self.short,
            Granularity::Medium => &self.medium,
            Granularity::Long => &self.long,
        }
    }

    /// Serialize the forecast to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CycleError::Data(format!("Cannot serialize forecast: {}", e)))
    }
}

/// Build a complete cycle forecast for one instrument as of today.
pub fn forecast_instrument<P: PriceHistoryProvider + ?Sized>(
    provider: &P,
    instrument: &str,
    config: &ForecastConfig,
) -> Result<InstrumentForecast> {
    forecast_instrument_as_of(provider, instrument, Utc::now().date_naive(), config)
}

/// Build a complete cycle forecast for one instrument as of a given date.
pub fn forecast_instrument_as_of<P: PriceHistoryProvider + ?Sized>(
    provider: &P,
    instrument: &str,
    as_of: NaiveDate,
    config: &ForecastConfig,
) -> Result<InstrumentForecast> {
    let series = fetch_with_fallback(provider, instrument, as_of, config)?;

    let lookback_days = TRADING_DAYS_PER_YEAR * config.lookback_years.max(1) as usize;
    let recent = series.tail(lookback_days);
    let cycles = extract_cycles(&recent, lookback_days)?;

    let forecast_start = recent.last_date() + Duration::days(1);
    let forecast_dates: Vec<NaiveDate> = (0..config.forecast_days)
        .map(|i| forecast_start + Duration::days(i as i64))
        .collect();

    let mut diagnostics = Vec::new();
    let short = forecast_granularity(
        cycles.component(Granularity::Short),
        &cycles.dates,
        &forecast_dates,
        config,
        &mut diagnostics,
    );
    let medium = forecast_granularity(
        cycles.component(Granularity::Medium),
        &cycles.dates,
        &forecast_dates,
        config,
        &mut diagnostics,
    );
    let long = forecast_granularity(
        cycles.component(Granularity::Long),
        &cycles.dates,
        &forecast_dates,
        config,
        &mut diagnostics,
    );

    let confluence = confluence::find_confluence(
        &confluence::leading_turns(&short.peaks, &short.troughs, TURNS_PER_GRANULARITY),
        &confluence::leading_turns(&medium.peaks, &medium.troughs, TURNS_PER_GRANULARITY),
        &confluence::leading_turns(&long.peaks, &long.troughs, TURNS_PER_GRANULARITY),
        config.confluence_window_days,
    );

    Ok(InstrumentForecast {
        instrument: instrument.to_string(),
        last_date: recent.last_date(),
        last_close: recent.last_close(),
        forecast_days: config.forecast_days,
        cycles,
        short,
        medium,
        long,
        confluence,
        diagnostics,
    })
}

fn forecast_granularity(
    component: &CycleComponent,
    dates: &[NaiveDate],
    forecast_dates: &[NaiveDate],
    config: &ForecastConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> GranularityForecast {
    let granularity = component.granularity;
    let cycle = &component.cycle_daily;

    let matches = find_pattern_matches(
        cycle,
        component.period_days,
        granularity.lookback_periods(),
        config.n_matches,
        config.min_gap_periods,
    );
    if matches.is_empty() {
        let diagnostic = Diagnostic::NoAnalogsFound {
            granularity,
            period_days: component.period_days,
            series_len: cycle.len(),
        };
        log::warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }

    let projections = project_from_matches(cycle, dates, &matches, config.forecast_days);

    let hist_len = config.display_lookback_days.min(cycle.len());
    let hist_cycle = cycle[cycle.len() - hist_len..].to_vec();
    let hist_dates = dates[dates.len() - hist_len..].to_vec();

    let mut norm_factor = hist_cycle.iter().abs_max();
    if !norm_factor.is_finite() || norm_factor <= 0.0 {
        let diagnostic = Diagnostic::DegenerateRange { granularity };
        log::warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
        norm_factor = 1.0;
    }

    let bounds = ensemble_bounds(&projections, norm_factor);
    let (mean_forecast, upper_bound, lower_bound, forecast_len) = match bounds {
        Some(b) => {
            let len = b.mean.len();
            (Some(b.mean), Some(b.upper), Some(b.lower), len)
        }
        None => (None, None, None, 0),
    };

    let (peaks, troughs) = match &mean_forecast {
        Some(mean) if forecast_len > 0 => find_turning_points(
            mean,
            &forecast_dates[..forecast_len],
            granularity.turn_spacing(),
        ),
        _ => (Vec::new(), Vec::new()),
    };

    GranularityForecast {
        granularity,
        matches,
        projections,
        mean_forecast,
        upper_bound,
        lower_bound,
        forecast_len,
        forecast_dates: forecast_dates[..forecast_len].to_vec(),
        peaks,
        troughs,
        hist_dates,
        hist_cycle,
        norm_factor,
    }
}

fn fetch_with_fallback<P: PriceHistoryProvider + ?Sized>(
    provider: &P,
    instrument: &str,
    as_of: NaiveDate,
    config: &ForecastConfig,
) -> Result<PriceSeries> {
    let mut ladder = vec![config.lookback_years.max(1)];
    for years in FALLBACK_LOOKBACK_YEARS {
        if years < config.lookback_years {
            ladder.push(years);
        }
    }

    let mut short_series: Option<PriceSeries> = None;
    let mut last_err: Option<CycleError> = None;

    for years in ladder {
        let start = as_of - Duration::days(365 * years);
        match provider.fetch(instrument, start, as_of) {
            Ok(series) if series.len() >= MIN_FETCH_OBSERVATIONS => {
                log::debug!(
                    "fetched {} observations for {} with {}y lookback",
                    series.len(),
                    instrument,
                    years
                );
                return Ok(series);
            }
            Ok(series) => {
                short_series = Some(series);
            }
            Err(err) => {
                log::debug!("fetch for {} with {}y lookback failed: {}", instrument, years, err);
                last_err = Some(err);
            }
        }
    }

    if let Some(series) = short_series {
        return Err(CycleError::InsufficientData {
            granularity: Granularity::Short,
            required: MIN_FETCH_OBSERVATIONS,
            actual: series.len(),
        });
    }
    Err(last_err
        .unwrap_or_else(|| CycleError::Fetch(format!("No price history available for {}", instrument))))
}
