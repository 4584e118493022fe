//! Spectral shape descriptors (centroid, bandwidth, rolloff, flatness)
//!
//! Each descriptor is computed per STFT frame and summarized over time.

use rubin_common::analysis::SpectralFeatures;

/// Fraction of cumulative magnitude that defines the rolloff frequency
pub const ROLLOFF_PERCENT: f64 = 0.85;

/// Power floor for flatness so silent bins don't take log(0)
const FLATNESS_AMIN: f64 = 1e-10;

/// Per-frame shape descriptors, summarized over time by [`finish`](Self::finish)
#[derive(Debug, Clone)]
pub struct SpectralAccumulator<'a> {
    frequencies: &'a [f32],
    centroids: Vec<f64>,
    bandwidths: Vec<f64>,
    rolloffs: Vec<f64>,
    flatnesses: Vec<f64>,
}

impl<'a> SpectralAccumulator<'a> {
    pub fn new(frequencies: &'a [f32]) -> Self {
        Self {
            frequencies,
            centroids: Vec::new(),
            bandwidths: Vec::new(),
            rolloffs: Vec::new(),
            flatnesses: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: &[f32]) {
        let c = centroid(frame, self.frequencies);
        self.centroids.push(c);
        self.bandwidths.push(bandwidth(frame, self.frequencies, c));
        self.rolloffs.push(rolloff(frame, self.frequencies));
        self.flatnesses.push(flatness(frame));
    }

    pub fn finish(&self) -> SpectralFeatures {
        SpectralFeatures {
            centroid_mean: mean(&self.centroids),
            centroid_std: std_dev(&self.centroids),
            bandwidth_mean: mean(&self.bandwidths),
            rolloff_mean: mean(&self.rolloffs),
            flatness_mean: mean(&self.flatnesses),
        }
    }
}

/// Magnitude-weighted mean frequency; 0.0 for a silent frame
fn centroid(frame: &[f32], freqs: &[f32]) -> f64 {
    let total: f64 = frame.iter().map(|&m| m as f64).sum();
    if total <= 0.0 {
        return 0.0;
    }
    frame
        .iter()
        .zip(freqs)
        .map(|(&m, &f)| m as f64 * f as f64)
        .sum::<f64>()
        / total
}

/// Second-order spread around the centroid
fn bandwidth(frame: &[f32], freqs: &[f32], centroid: f64) -> f64 {
    let total: f64 = frame.iter().map(|&m| m as f64).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let variance: f64 = frame
        .iter()
        .zip(freqs)
        .map(|(&m, &f)| (m as f64 / total) * (f as f64 - centroid).powi(2))
        .sum();
    variance.sqrt()
}

/// Lowest frequency below which `ROLLOFF_PERCENT` of the magnitude lies
fn rolloff(frame: &[f32], freqs: &[f32]) -> f64 {
    let total: f64 = frame.iter().map(|&m| m as f64).sum();
    let threshold = ROLLOFF_PERCENT * total;

    let mut cumulative = 0.0;
    for (&m, &f) in frame.iter().zip(freqs) {
        cumulative += m as f64;
        if cumulative >= threshold {
            return f as f64;
        }
    }
    freqs.last().copied().unwrap_or(0.0) as f64
}

/// Geometric over arithmetic mean of the power spectrum
///
/// A silent frame is floored everywhere and therefore perfectly flat (1.0).
fn flatness(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let n = frame.len() as f64;
    let powers = frame.iter().map(|&m| (m as f64 * m as f64).max(FLATNESS_AMIN));

    let (log_sum, sum) = powers.fold((0.0, 0.0), |(log_sum, sum), p| (log_sum + p.ln(), sum + p));
    let geometric = (log_sum / n).exp();
    let arithmetic = sum / n;
    geometric / arithmetic
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}
