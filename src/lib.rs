//! Workspace facade re-exporting the cycle forecasting crates.

pub use cycle_forecast;
pub use cycle_math;
