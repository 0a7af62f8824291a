use chrono::Duration;
use cycle_forecast::synthetic::SyntheticSeries;
use cycle_forecast::{
    forecast_batch, forecast_instrument_as_of, BatchOutcome, CycleError, ForecastConfig,
    Granularity, MemoryProvider,
};
use std::f64::consts::PI;
use std::sync::atomic::AtomicBool;

const INJECTED_PERIOD: f64 = 45.0;
const INJECTED_AMPLITUDE: f64 = 0.05;

/// Fraction of a cycle at the given period that survives the trend filter
fn trend_filter_pass_through(period: f64, lambda: f64) -> f64 {
    let omega = 2.0 * PI / period;
    let x = 4.0 * lambda * (1.0 - omega.cos()).powi(2);
    x / (1.0 + x)
}

fn provider_with(instrument: &str, days: usize, seed: u64) -> MemoryProvider {
    let (dates, closes) = SyntheticSeries {
        days,
        cycle_period: INJECTED_PERIOD,
        cycle_amplitude: INJECTED_AMPLITUDE,
        seed,
        ..SyntheticSeries::default()
    }
    .generate();
    let mut provider = MemoryProvider::new();
    provider.insert(instrument, dates, closes);
    provider
}

#[test]
fn test_full_forecast_workflow() {
    let (dates, closes) = SyntheticSeries::default().generate();
    let as_of = *dates.last().unwrap();
    let mut provider = MemoryProvider::new();
    provider.insert("CL", dates, closes);

    let config = ForecastConfig::default();
    let forecast = forecast_instrument_as_of(&provider, "CL", as_of, &config).unwrap();

    assert_eq!(forecast.instrument, "CL");
    assert_eq!(forecast.last_date, as_of);
    assert!(forecast.last_close > 0.0);

    // The injected 45-day cycle dominates the daily scan
    let short_period = forecast.cycles.short.period;
    assert!(
        (short_period - INJECTED_PERIOD).abs() <= 2.0,
        "selected period {} too far from {}",
        short_period,
        INJECTED_PERIOD
    );

    // The recovered amplitude is consistent with what the trend filter
    // lets through at that period
    let expected = INJECTED_AMPLITUDE * trend_filter_pass_through(INJECTED_PERIOD, 1600.0);
    let amplitude = forecast.cycles.short.amplitude;
    assert!(
        (amplitude - expected).abs() <= 0.3 * expected,
        "amplitude {} outside 30% of {}",
        amplitude,
        expected
    );

    // Twenty years of history produce analog matches and a usable forecast
    let short = forecast.forecast(Granularity::Short);
    assert!(!short.matches.is_empty());
    assert!(short.matches.len() <= config.n_matches);

    let mean = short.mean_forecast.as_ref().expect("mean forecast expected");
    let upper = short.upper_bound.as_ref().unwrap();
    let lower = short.lower_bound.as_ref().unwrap();
    assert_eq!(mean.len(), short.forecast_len);
    assert!(short.forecast_len > 0);
    assert_eq!(short.forecast_dates.len(), short.forecast_len);
    assert_eq!(short.forecast_dates[0], as_of + Duration::days(1));

    for i in 0..short.forecast_len {
        assert!(upper[i] + 1e-9 >= mean[i], "upper < mean at step {}", i);
        assert!(mean[i] + 1e-9 >= lower[i], "mean < lower at step {}", i);
    }

    // A 45-day cycle turns at least once inside the forecast window
    assert!(!short.peaks.is_empty() || !short.troughs.is_empty());

    assert!(short.norm_factor > 0.0);
    assert_eq!(short.hist_cycle.len(), config.display_lookback_days);

    // All granularities carry a component within their configured bounds
    for granularity in Granularity::ALL {
        let component = forecast.cycles.component(granularity);
        let (min_period, max_period) = granularity.period_bounds();
        assert!(component.period >= min_period && component.period <= max_period);
    }

    let json = forecast.to_json().unwrap();
    assert!(json.contains("\"CL\""));
}

#[test]
fn test_insufficient_history_names_granularity_and_count() {
    let provider = provider_with("NG", 100, 7);
    let config = ForecastConfig::default();
    let as_of = SyntheticSeries::default().start + Duration::days(400);

    let err = forecast_instrument_as_of(&provider, "NG", as_of, &config).unwrap_err();
    match err {
        CycleError::InsufficientData {
            granularity,
            actual,
            ..
        } => {
            assert_eq!(granularity, Granularity::Short);
            assert_eq!(actual, 100);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_instrument_fails_with_fetch_error() {
    let provider = MemoryProvider::new();
    let config = ForecastConfig::default();
    let as_of = SyntheticSeries::default().start + Duration::days(400);

    let err = forecast_instrument_as_of(&provider, "ZZ", as_of, &config).unwrap_err();
    assert!(matches!(err, CycleError::Fetch(_)));
}

#[test]
fn test_batch_records_failures_without_aborting() {
    let (dates, closes) = SyntheticSeries {
        days: 252 * 8,
        seed: 1,
        ..SyntheticSeries::default()
    }
    .generate();
    let as_of = *dates.last().unwrap();

    let mut provider = MemoryProvider::new();
    provider.insert("CL", dates, closes);
    let (dates2, closes2) = SyntheticSeries {
        days: 252 * 8,
        cycle_period: 28.0,
        seed: 2,
        ..SyntheticSeries::default()
    }
    .generate();
    provider.insert("GC", dates2, closes2);

    let instruments = vec!["CL".to_string(), "ZZ".to_string(), "GC".to_string()];
    let config = ForecastConfig::default();
    let cancel = AtomicBool::new(false);

    let records = forecast_batch(&provider, &instruments, as_of, &config, &cancel);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].instrument, "CL");
    assert_eq!(records[1].instrument, "ZZ");
    assert_eq!(records[2].instrument, "GC");

    assert!(records[0].forecast().is_some());
    assert!(records[2].forecast().is_some());
    match &records[1].outcome {
        BatchOutcome::Failed { error } => assert!(!error.is_empty()),
        other => panic!("expected failure record, got {:?}", other),
    }
}

#[test]
fn test_cancelled_batch_skips_remaining_instruments() {
    let provider = provider_with("CL", 252 * 8, 3);
    let instruments = vec!["CL".to_string(), "GC".to_string()];
    let config = ForecastConfig::default();
    let cancel = AtomicBool::new(true);

    let records = forecast_batch(
        &provider,
        &instruments,
        SyntheticSeries::default().start + Duration::days(3000),
        &config,
        &cancel,
    );
    assert_eq!(records.len(), 2);
    for record in &records {
        assert!(matches!(record.outcome, BatchOutcome::Cancelled));
    }
}
