//! # Cycle Math
//!
//! Numeric kernels for cycle analysis of financial time series.
//! This crate provides the spectral and filtering building blocks used by
//! the forecasting pipeline: trend extraction, continuous wavelet
//! transforms, peak detection and window statistics.

use thiserror::Error;

// Kernel modules
pub mod filters;
pub mod peaks;
pub mod stats;
pub mod wavelet;

/// Errors that can occur in cycle-related calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for cycle math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
