use cycle_forecast::synthetic::SyntheticSeries;
use cycle_forecast::{forecast_batch, BatchOutcome, ForecastConfig, MemoryProvider};
use std::sync::atomic::AtomicBool;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Cycle Forecast: Batch Example");
    println!("=============================\n");

    // Three instruments with different embedded cycles, plus one with no
    // data at all to show per-instrument failure handling
    let specs = [("CL", 45.0, 1u64), ("GC", 28.0, 2), ("SI", 60.0, 3)];

    let mut provider = MemoryProvider::new();
    let mut as_of = None;
    for (instrument, period, seed) in specs {
        let (dates, closes) = SyntheticSeries {
            days: 252 * 10,
            cycle_period: period,
            seed,
            ..SyntheticSeries::default()
        }
        .generate();
        as_of = Some(*dates.last().unwrap());
        provider.insert(instrument, dates, closes);
    }
    let as_of = as_of.unwrap();

    let instruments: Vec<String> = ["CL", "GC", "SI", "MISSING"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    println!("Forecasting {} instruments in parallel...\n", instruments.len());
    let config = ForecastConfig::default();
    let cancel = AtomicBool::new(false);
    let records = forecast_batch(&provider, &instruments, as_of, &config, &cancel);

    println!("{:<10} {:<12} {:<10} {}", "instrument", "short cycle", "analogs", "confluence");
    for record in &records {
        match &record.outcome {
            BatchOutcome::Forecast(forecast) => {
                let confluence = match &forecast.confluence.short_medium {
                    Some(pair) => format!("{} {}", pair.kind, pair.date),
                    None => "none".to_string(),
                };
                println!(
                    "{:<10} {:<12.1} {:<10} {}",
                    record.instrument,
                    forecast.cycles.short.period_days,
                    forecast.short.matches.len(),
                    confluence
                );
            }
            BatchOutcome::Failed { error } => {
                println!("{:<10} failed: {}", record.instrument, error);
            }
            BatchOutcome::Cancelled => {
                println!("{:<10} cancelled", record.instrument);
            }
        }
    }

    Ok(())
}
