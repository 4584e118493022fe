//! Timbral (MFCC) and harmonic (chroma) summaries
//!
//! MFCCs: 128-band Slaney mel filterbank over the power spectrum, log
//! compression with an 80 dB dynamic-range clamp, orthonormal DCT-II.
//! Chroma: power summed per pitch class, max-normalized per frame.

use rubin_common::analysis::{TimbreFeatures, CHROMA_BINS, MFCC_COEFFICIENTS};
use std::f64::consts::PI;

/// Mel bands feeding the DCT
pub const MEL_BANDS: usize = 128;

const POWER_AMIN: f64 = 1e-10;
const TOP_DB: f64 = 80.0;

/// Slaney mel scale: linear below 1 kHz, logarithmic above
fn hz_to_mel(hz: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    let min_log_mel = MIN_LOG_HZ / F_SP;
    let log_step = 6.4f64.ln() / 27.0;

    if hz >= MIN_LOG_HZ {
        min_log_mel + (hz / MIN_LOG_HZ).ln() / log_step
    } else {
        hz / F_SP
    }
}

fn mel_to_hz(mel: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    let min_log_mel = MIN_LOG_HZ / F_SP;
    let log_step = 6.4f64.ln() / 27.0;

    if mel >= min_log_mel {
        MIN_LOG_HZ * (log_step * (mel - min_log_mel)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular, area-normalized mel filters: `weights[band][bin]`
fn mel_filterbank(sample_rate: u32, fft_freqs: &[f32], n_mels: usize) -> Vec<Vec<f64>> {
    let max_mel = hz_to_mel(sample_rate as f64 / 2.0);
    let edges: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(max_mel * i as f64 / (n_mels + 1) as f64))
        .collect();

    (0..n_mels)
        .map(|m| {
            let (lower_edge, center, upper_edge) = (edges[m], edges[m + 1], edges[m + 2]);
            let norm = 2.0 / (upper_edge - lower_edge);
            fft_freqs
                .iter()
                .map(|&f| {
                    let f = f as f64;
                    let rising = (f - lower_edge) / (center - lower_edge);
                    let falling = (upper_edge - f) / (upper_edge - center);
                    rising.min(falling).max(0.0) * norm
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II, first `n_out` coefficients
fn dct_ortho(input: &[f64], n_out: usize) -> Vec<f64> {
    let n = input.len() as f64;
    (0..n_out)
        .map(|k| {
            let sum: f64 = input
                .iter()
                .enumerate()
                .map(|(m, &x)| x * (PI / n * (m as f64 + 0.5) * k as f64).cos())
                .sum();
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            sum * scale
        })
        .collect()
}

/// Pitch class (C = 0) nearest to `hz`, using A4 = 440 Hz
fn pitch_class(hz: f64) -> usize {
    let midi = 69.0 + 12.0 * (hz / 440.0).log2();
    (midi.round() as i64).rem_euclid(12) as usize
}

/// Streams magnitude frames into MFCC and chroma summaries
///
/// The 80 dB clamp is relative to the loudest cell of the whole signal, so
/// log-mel rows are kept until [`finish`](Self::finish). Chroma is reduced
/// as frames arrive.
#[derive(Debug, Clone)]
pub struct TimbreAccumulator {
    filters: Vec<Vec<f64>>,
    /// DC carries no pitch
    classes: Vec<Option<usize>>,
    log_mel: Vec<f32>,
    peak_db: f64,
    chroma_sums: [f64; CHROMA_BINS],
    frames: usize,
}

impl TimbreAccumulator {
    pub fn new(sample_rate: u32, frequencies: &[f32]) -> Self {
        Self {
            filters: mel_filterbank(sample_rate, frequencies, MEL_BANDS),
            classes: frequencies
                .iter()
                .map(|&f| (f > 0.0).then(|| pitch_class(f as f64)))
                .collect(),
            log_mel: Vec::new(),
            peak_db: f64::NEG_INFINITY,
            chroma_sums: [0.0; CHROMA_BINS],
            frames: 0,
        }
    }

    pub fn push(&mut self, frame: &[f32]) {
        for weights in &self.filters {
            let energy: f64 = weights
                .iter()
                .zip(frame)
                .map(|(&w, &m)| w * (m as f64) * (m as f64))
                .sum();
            let db = 10.0 * energy.max(POWER_AMIN).log10();
            self.peak_db = self.peak_db.max(db);
            self.log_mel.push(db as f32);
        }

        let mut chroma = [0.0f64; CHROMA_BINS];
        for (&magnitude, class) in frame.iter().zip(&self.classes) {
            if let Some(class) = class {
                chroma[*class] += (magnitude as f64) * (magnitude as f64);
            }
        }
        let max = chroma.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            for (sum, value) in self.chroma_sums.iter_mut().zip(chroma) {
                *sum += value / max;
            }
        }

        self.frames += 1;
    }

    /// Mean of the first `n_mfcc` coefficients over all frames
    pub fn mfcc_means(&self, n_mfcc: usize) -> Vec<f64> {
        let floor = self.peak_db - TOP_DB;
        let mut sums = vec![0.0; n_mfcc];
        let mut row = Vec::with_capacity(MEL_BANDS);

        for frame in self.log_mel.chunks_exact(self.filters.len().max(1)) {
            row.clear();
            row.extend(frame.iter().map(|&db| (db as f64).max(floor)));
            for (sum, coefficient) in sums.iter_mut().zip(dct_ortho(&row, n_mfcc)) {
                *sum += coefficient;
            }
        }

        let count = self.frames.max(1) as f64;
        sums.into_iter().map(|sum| sum / count).collect()
    }

    /// Mean max-normalized chroma over all frames
    pub fn chroma_means(&self) -> Vec<f64> {
        let count = self.frames.max(1) as f64;
        self.chroma_sums.iter().map(|sum| sum / count).collect()
    }

    pub fn finish(&self) -> TimbreFeatures {
        TimbreFeatures {
            mfcc_means: self.mfcc_means(MFCC_COEFFICIENTS),
            chroma_means: self.chroma_means(),
        }
    }
}
