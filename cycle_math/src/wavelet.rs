//! Continuous wavelet transform
//!
//! Morlet CWT used for the dominant-period search, plus the
//! Gaussian-weighted reconstruction of a single cycle from the
//! coefficient planes.

use crate::{stats, MathError, Result};
use std::f64::consts::PI;

/// Morlet central frequency used throughout the crate.
pub const OMEGA0: f64 = 6.0;

/// Conversion factor between wavelet scale and period:
/// `period = scale * fourier_factor()`.
pub fn fourier_factor() -> f64 {
    4.0 * PI / OMEGA0
}

/// Convert a period in sample units to a wavelet scale.
pub fn period_to_scale(period: f64) -> f64 {
    period / fourier_factor()
}

/// Convert a wavelet scale to a period in sample units.
pub fn scale_to_period(scale: f64) -> f64 {
    scale * fourier_factor()
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Coefficient planes of a continuous wavelet transform.
///
/// Rows are scales, columns are time samples. `power` is the squared
/// modulus of the complex coefficients.
#[derive(Debug, Clone)]
pub struct CwtResult {
    /// Wavelet scales, one per row
    pub scales: Vec<f64>,
    /// Periods corresponding to the scales, in sample units
    pub periods: Vec<f64>,
    /// Real part of the coefficients
    pub real: Vec<Vec<f64>>,
    /// Imaginary part of the coefficients
    pub imag: Vec<Vec<f64>>,
    /// Wavelet power, |coefficient|^2
    pub power: Vec<Vec<f64>>,
}

impl CwtResult {
    /// Time-averaged power per scale
    pub fn average_power(&self) -> Vec<f64> {
        self.power
            .iter()
            .map(|row| stats::mean(row))
            .collect()
    }

    /// Index of the scale with the highest time-averaged power.
    ///
    /// This is a ranking heuristic, not a significance test: it only says
    /// which scale is most energetic.
    pub fn best_scale_index(&self) -> usize {
        let avg = self.average_power();
        let mut best = 0;
        for (i, p) in avg.iter().enumerate() {
            if *p > avg[best] {
                best = i;
            }
        }
        best
    }
}

/// Continuous wavelet transform of `signal` with a complex Morlet wavelet
/// at unit sampling step.
///
/// Each scale's kernel oscillates at the period given by
/// `scale_to_period`, under a Gaussian envelope of width `scale` samples,
/// truncated at four envelope widths. Coefficients are normalized so a
/// sinusoid produces the same response magnitude at every scale.
pub fn cwt_morlet(signal: &[f64], scales: &[f64]) -> Result<CwtResult> {
    let n = signal.len();
    if n < 2 {
        return Err(MathError::InsufficientData(format!(
            "Wavelet transform needs at least 2 samples, got {}",
            n
        )));
    }
    if scales.is_empty() {
        return Err(MathError::InvalidInput("No scales supplied".to_string()));
    }
    if scales.iter().any(|s| !(*s > 0.0) || !s.is_finite()) {
        return Err(MathError::InvalidInput(
            "Scales must be positive and finite".to_string(),
        ));
    }
    if signal.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Signal contains non-finite values".to_string(),
        ));
    }

    let mut real = Vec::with_capacity(scales.len());
    let mut imag = Vec::with_capacity(scales.len());
    let mut power = Vec::with_capacity(scales.len());

    for &scale in scales {
        let omega = 2.0 * PI / scale_to_period(scale);
        let half = (4.0 * scale).ceil() as i64;
        let norm = PI.powf(-0.25) / scale;

        let mut row_re = vec![0.0; n];
        let mut row_im = vec![0.0; n];
        let mut row_pw = vec![0.0; n];

        for b in 0..n as i64 {
            let lo = (b - half).max(0);
            let hi = (b + half).min(n as i64 - 1);

            let mut re = 0.0;
            let mut im = 0.0;
            for t in lo..=hi {
                let dt = (t - b) as f64;
                let u = dt / scale;
                let env = (-0.5 * u * u).exp() * signal[t as usize];
                let phase = omega * dt;
                re += env * phase.cos();
                im -= env * phase.sin();
            }
            re *= norm;
            im *= norm;

            let b = b as usize;
            row_re[b] = re;
            row_im[b] = im;
            row_pw[b] = re * re + im * im;
        }

        real.push(row_re);
        imag.push(row_im);
        power.push(row_pw);
    }

    Ok(CwtResult {
        scales: scales.to_vec(),
        periods: scales.iter().map(|s| scale_to_period(*s)).collect(),
        real,
        imag,
        power,
    })
}

/// Rebuild a single real-valued cycle from the coefficient planes.
///
/// Sums the real coefficient parts across all scales under a Gaussian
/// weight centered on `best_idx` (sigma = number of scales / 6), then
/// rescales the result so its variance matches the average power at the
/// best scale. The blend smooths out scale-selection noise; the rescale
/// guards against normalization artifacts of the transform itself.
pub fn reconstruct_cycle(cwt: &CwtResult, best_idx: usize) -> Result<Vec<f64>> {
    let n_scales = cwt.scales.len();
    if best_idx >= n_scales {
        return Err(MathError::InvalidInput(format!(
            "Scale index {} out of range ({} scales)",
            best_idx, n_scales
        )));
    }
    let n = cwt.real[0].len();

    let sigma = n_scales as f64 / 6.0;
    let mut reconstructed = vec![0.0; n];
    for (i, row) in cwt.real.iter().enumerate() {
        let distance = (i as f64 - best_idx as f64).abs();
        let weight = (-(distance * distance) / (2.0 * sigma * sigma)).exp();
        for (acc, v) in reconstructed.iter_mut().zip(row.iter()) {
            *acc += v * weight;
        }
    }

    let scale_power = stats::mean(&cwt.power[best_idx]);
    let current_power = stats::variance(&reconstructed);
    if current_power > 0.0 && scale_power > 0.0 {
        let factor = (scale_power / current_power).sqrt();
        for v in reconstructed.iter_mut() {
            *v *= factor;
        }
    }

    Ok(reconstructed)
}
