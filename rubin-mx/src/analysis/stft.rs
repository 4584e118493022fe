//! Short-time Fourier transform
//!
//! Frames are centered: the signal is treated as zero-padded by half a frame
//! on both sides, so a signal of `n` samples yields `1 + n / hop` frames and
//! even an empty signal yields one (silent) frame.
//!
//! Frames are streamed to a visitor one at a time and never collected, so
//! memory stays at one frame regardless of signal length.

use realfft::{RealFftPlanner, RealToComplex};
use std::f32::consts::PI;
use std::sync::Arc;
use tracing::error;

/// Periodic Hann window
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / size as f32).cos())
        .collect()
}

/// Center frequency of each FFT bin: `k * sample_rate / frame_length`
pub fn fft_frequencies(sample_rate: u32, frame_length: usize) -> Vec<f32> {
    let resolution = sample_rate as f32 / frame_length as f32;
    (0..=frame_length / 2).map(|k| k as f32 * resolution).collect()
}

/// Number of centered frames for a signal of `len` samples
pub fn num_frames(len: usize, frame_length: usize, hop_length: usize) -> usize {
    let padded = len + 2 * (frame_length / 2);
    if padded < frame_length {
        0
    } else {
        (padded - frame_length) / hop_length + 1
    }
}

/// Visit each centered frame of `samples`, zero-filled past either edge
///
/// Returns the number of frames visited.
pub(crate) fn for_each_frame(
    samples: &[f32],
    frame_length: usize,
    hop_length: usize,
    mut visit: impl FnMut(&[f32]),
) -> usize {
    let pad = frame_length / 2;
    let count = num_frames(samples.len(), frame_length, hop_length);
    let mut frame = vec![0.0f32; frame_length];

    for t in 0..count {
        // Frame t covers padded[t*hop .. t*hop + frame_length]
        let start = t * hop_length;
        for (i, slot) in frame.iter_mut().enumerate() {
            *slot = (start + i)
                .checked_sub(pad)
                .and_then(|index| samples.get(index))
                .copied()
                .unwrap_or(0.0);
        }
        visit(&frame);
    }
    count
}

/// Magnitude STFT plan for one sample rate and framing
pub struct Stft {
    frame_length: usize,
    hop_length: usize,
    window: Vec<f32>,
    fft: Arc<dyn RealToComplex<f32>>,
    frequencies: Vec<f32>,
}

impl Stft {
    pub fn new(sample_rate: u32, frame_length: usize, hop_length: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        Self {
            frame_length,
            hop_length,
            window: hann_window(frame_length),
            fft: planner.plan_fft_forward(frame_length),
            frequencies: fft_frequencies(sample_rate, frame_length),
        }
    }

    /// Frequency axis shared by every magnitude frame
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Stream the magnitude spectrum of each frame of a mono signal
    ///
    /// Each slice holds `frame_length / 2 + 1` bins and is only valid for
    /// the duration of the call. Returns the number of frames.
    pub fn process(&self, samples: &[f32], mut visit: impl FnMut(&[f32])) -> usize {
        let mut input = self.fft.make_input_vec();
        let mut spectrum = self.fft.make_output_vec();
        let mut magnitudes = vec![0.0f32; spectrum.len()];

        for_each_frame(samples, self.frame_length, self.hop_length, |frame| {
            for ((slot, &sample), &w) in input.iter_mut().zip(frame).zip(&self.window) {
                *slot = sample * w;
            }

            match self.fft.process(&mut input, &mut spectrum) {
                Ok(()) => {
                    for (m, c) in magnitudes.iter_mut().zip(&spectrum) {
                        *m = c.norm();
                    }
                }
                Err(e) => {
                    // Buffers come from the plan itself, so this is unreachable in practice
                    error!("FFT processing failed: {}", e);
                    magnitudes.fill(0.0);
                }
            }
            visit(&magnitudes);
        })
    }
}
