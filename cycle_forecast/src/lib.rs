//! # Cycle Forecast
//!
//! A Rust library for multi-granularity cycle extraction and analog-based
//! forecasting of a single instrument's daily close-price history.
//!
//! ## Features
//!
//! - Price history ingestion with validation (CSV and in-memory providers)
//! - Detrending with a Hodrick-Prescott trend filter
//! - Dominant-period search with a Morlet continuous wavelet transform
//! - Cycle reconstruction at daily, weekly and monthly granularity
//! - Historical analog matching and ensemble projection with robust bounds
//! - Turning-point labeling and cross-granularity confluence detection
//! - Parallel batch forecasting with cancellation
//!
//! ## Quick Start
//!
//! ```no_run
//! use cycle_forecast::{forecast_instrument, ForecastConfig, Granularity, MemoryProvider};
//! use cycle_forecast::synthetic::SyntheticSeries;
//!
//! fn main() -> cycle_forecast::Result<()> {
//!     // Register a price history (tests and demos use synthetic data)
//!     let (dates, closes) = SyntheticSeries::default().generate();
//!     let mut provider = MemoryProvider::new();
//!     provider.insert("CL", dates, closes);
//!
//!     // Build the forecast
//!     let config = ForecastConfig::default();
//!     let forecast = forecast_instrument(&provider, "CL", &config)?;
//!
//!     let short = forecast.forecast(Granularity::Short);
//!     println!(
//!         "short cycle: {:.1} days, {} analogs, {} peaks",
//!         forecast.cycles.short.period_days,
//!         short.matches.len(),
//!         short.peaks.len()
//!     );
//!     if let Some(pair) = forecast.confluence.short_medium {
//!         println!("confluence: {} around {}", pair.kind, pair.date);
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod confluence;
pub mod cycles;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod forecast;
pub mod granularity;
pub mod matching;
pub mod projection;
pub mod synthetic;
pub mod turning;

// Re-export commonly used types
pub use crate::batch::{forecast_batch, BatchOutcome, BatchRecord};
pub use crate::confluence::{ConfluenceReport, PairConfluence, TripleConfluence};
pub use crate::cycles::{CycleComponent, MultiGranularityCycles};
pub use crate::data::{CsvProvider, MemoryProvider, PriceHistoryProvider, PriceSeries};
pub use crate::diagnostics::Diagnostic;
pub use crate::error::{CycleError, Result};
pub use crate::forecast::{
    forecast_instrument, forecast_instrument_as_of, ForecastConfig, GranularityForecast,
    InstrumentForecast,
};
pub use crate::granularity::Granularity;
pub use crate::turning::{TurnKind, TurningPoint};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
