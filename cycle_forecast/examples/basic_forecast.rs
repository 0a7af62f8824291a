use cycle_forecast::synthetic::SyntheticSeries;
use cycle_forecast::{forecast_instrument_as_of, ForecastConfig, Granularity, MemoryProvider};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Cycle Forecast: Basic Example");
    println!("=============================\n");

    // Create sample data: fifteen years of daily closes with an embedded
    // 45-day cycle
    println!("Creating sample price history...");
    let (dates, closes) = SyntheticSeries {
        days: 252 * 15,
        ..SyntheticSeries::default()
    }
    .generate();
    let as_of = *dates.last().unwrap();

    let mut provider = MemoryProvider::new();
    provider.insert("CL", dates, closes);
    println!("Sample data created: 15 years of daily closes\n");

    // Build the forecast
    println!("Extracting cycles and building the forecast...");
    let config = ForecastConfig::default();
    let forecast = forecast_instrument_as_of(&provider, "CL", as_of, &config)?;

    println!(
        "Last close: {:.2} on {}\n",
        forecast.last_close, forecast.last_date
    );

    for granularity in Granularity::ALL {
        let component = forecast.cycles.component(granularity);
        let result = forecast.forecast(granularity);

        println!(
            "{} cycle: period {:.1} days, amplitude {:.5}",
            granularity, component.period_days, component.amplitude
        );
        println!("  analogs found: {}", result.matches.len());
        match &result.mean_forecast {
            Some(mean) => {
                println!("  forecast length: {} days", mean.len());
                if let Some(peak) = result.peaks.first() {
                    println!("  next peak: {} ({:.3})", peak.date, peak.amplitude);
                }
                if let Some(trough) = result.troughs.first() {
                    println!("  next trough: {} ({:.3})", trough.date, trough.amplitude);
                }
            }
            None => println!("  insufficient historical patterns"),
        }
        println!();
    }

    match &forecast.confluence.short_medium {
        Some(pair) => println!(
            "Short+medium confluence: {} around {} (±{}d)",
            pair.kind, pair.date, pair.days_apart
        ),
        None => println!("No short+medium confluence"),
    }
    match &forecast.confluence.triple {
        Some(triple) => println!(
            "Triple confluence: {} around {} (±{}d)",
            triple.kind, triple.date, triple.max_days_apart
        ),
        None => println!("No triple confluence"),
    }

    for diagnostic in &forecast.diagnostics {
        println!("note: {}", diagnostic);
    }

    Ok(())
}
