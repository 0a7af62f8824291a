//! Error types for the cycle_forecast crate

use crate::granularity::Granularity;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the cycle_forecast crate
#[derive(Debug, Error)]
pub enum CycleError {
    /// Price history unavailable or the fetch failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Too few observations at a granularity after cleaning and resampling
    #[error(
        "Insufficient data for {granularity} granularity: need {required} observations, have {actual}"
    )]
    InsufficientData {
        granularity: Granularity,
        required: usize,
        actual: usize,
    },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    Data(String),

    /// Error from the numeric kernels
    #[error("Math error: {0}")]
    Math(#[from] cycle_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, CycleError>;

impl From<PolarsError> for CycleError {
    fn from(err: PolarsError) -> Self {
        CycleError::Polars(err.to_string())
    }
}
