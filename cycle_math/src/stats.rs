//! Window statistics used by the matching and ensembling steps

use crate::{MathError, Result};

/// Floor added to standard deviations before dividing, so that a flat
/// window normalizes to zeros instead of NaN.
const STD_FLOOR: f64 = 1e-10;

/// Arithmetic mean of a slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance of a slice
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a slice
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Rescale a window to zero mean and unit variance.
///
/// A near-constant window comes back as zeros rather than NaN; the
/// correlation of such a window against anything is then 0, which callers
/// rank below any genuine match.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let s = std_dev(values) + STD_FLOOR;
    values.iter().map(|v| (v - m) / s).collect()
}

/// Pearson correlation of two equally sized windows.
///
/// Returns an error on a length mismatch or empty input. The result can be
/// NaN when either window has zero variance and was not normalized first.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MathError::InvalidInput(format!(
            "Window lengths differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot correlate empty windows".to_string(),
        ));
    }

    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    Ok(cov / (var_a.sqrt() * var_b.sqrt()))
}
