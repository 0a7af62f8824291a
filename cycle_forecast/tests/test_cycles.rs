use cycle_forecast::cycles::extract_cycles;
use cycle_forecast::synthetic::SyntheticSeries;
use cycle_forecast::{CycleError, Granularity, PriceSeries};

fn synthetic_series(days: usize, period: f64, amplitude: f64) -> PriceSeries {
    let (dates, closes) = SyntheticSeries {
        days,
        cycle_period: period,
        cycle_amplitude: amplitude,
        noise_std: 0.0005,
        ..SyntheticSeries::default()
    }
    .generate();
    PriceSeries::new(dates, closes).unwrap()
}

#[test]
fn test_injected_period_is_recovered() {
    let series = synthetic_series(252 * 6, 30.0, 0.02);
    let cycles = extract_cycles(&series, 252 * 6).unwrap();

    // The daily scan must land within two trading days of the injected
    // 30-day cycle
    assert!(
        (cycles.short.period - 30.0).abs() <= 2.0,
        "selected period {} too far from 30",
        cycles.short.period
    );
}

#[test]
fn test_selected_periods_respect_bounds() {
    let series = synthetic_series(252 * 6, 30.0, 0.02);
    let cycles = extract_cycles(&series, 252 * 6).unwrap();

    for granularity in Granularity::ALL {
        let component = cycles.component(granularity);
        let (min_period, max_period) = granularity.period_bounds();
        assert!(
            component.period >= min_period && component.period <= max_period,
            "{} period {} outside [{}, {}]",
            granularity,
            component.period,
            min_period,
            max_period
        );
        assert!(
            (component.period_days - component.period * granularity.days_per_unit()).abs() < 1e-9
        );
    }
}

#[test]
fn test_cycles_share_the_daily_calendar() {
    let series = synthetic_series(252 * 6, 30.0, 0.02);
    let cycles = extract_cycles(&series, 252 * 6).unwrap();

    let n = cycles.dates.len();
    assert_eq!(cycles.short.cycle_daily.len(), n);
    assert_eq!(cycles.medium.cycle_daily.len(), n);
    assert_eq!(cycles.long.cycle_daily.len(), n);

    // Native resolutions are coarser for medium and long
    assert!(cycles.medium.native_dates.len() < n);
    assert!(cycles.long.native_dates.len() < cycles.medium.native_dates.len());
}

#[test]
fn test_amplitude_is_positive_and_finite() {
    let series = synthetic_series(252 * 6, 30.0, 0.02);
    let cycles = extract_cycles(&series, 252 * 6).unwrap();

    for granularity in Granularity::ALL {
        let component = cycles.component(granularity);
        assert!(
            component.amplitude > 0.0 && component.amplitude.is_finite(),
            "{} amplitude {}",
            granularity,
            component.amplitude
        );
        assert!(component.cycle_daily.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_trailing_window_is_used() {
    let series = synthetic_series(252 * 6, 30.0, 0.02);
    let cycles = extract_cycles(&series, 252 * 3).unwrap();
    assert_eq!(cycles.dates.len(), 252 * 3);
    assert_eq!(*cycles.dates.last().unwrap(), series.last_date());
}

#[test]
fn test_short_history_names_the_failing_granularity() {
    // 300 trading days clear the weekly minimum but span only ~14 months
    let series = synthetic_series(300, 30.0, 0.02);
    let err = extract_cycles(&series, 300).unwrap_err();
    match err {
        CycleError::InsufficientData {
            granularity,
            required,
            actual,
        } => {
            assert_eq!(granularity, Granularity::Long);
            assert_eq!(required, 24);
            assert!(actual < 24, "unexpected month count {}", actual);
        }
        other => panic!("unexpected error: {}", other),
    }
}
