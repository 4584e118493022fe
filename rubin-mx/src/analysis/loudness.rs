//! Frame RMS statistics and RMS-based dynamic range

use super::spectral::mean;
use super::stft::for_each_frame;
use rubin_common::analysis::LoudnessFeatures;

/// Root-mean-square of each centered, unwindowed frame
pub fn frame_rms(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    let mut rms = Vec::new();
    for_each_frame(samples, frame_length, hop_length, |frame| {
        let power: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
        rms.push((power / frame_length as f64).sqrt());
    });
    rms
}

/// `20 * log10(max / min)`, or 0.0 unless both are positive
pub fn dynamic_range_db(rms_max: f64, rms_min: f64) -> f64 {
    if rms_max > 0.0 && rms_min > 0.0 {
        20.0 * (rms_max / rms_min).log10()
    } else {
        0.0
    }
}

pub fn loudness_features(samples: &[f32], frame_length: usize, hop_length: usize) -> LoudnessFeatures {
    let rms = frame_rms(samples, frame_length, hop_length);

    let rms_max = rms.iter().copied().fold(0.0, f64::max);
    let rms_min = rms.iter().copied().reduce(f64::min).unwrap_or(0.0);

    LoudnessFeatures {
        rms_mean: mean(&rms),
        rms_max,
        rms_min,
        dynamic_range_db: dynamic_range_db(rms_max, rms_min),
    }
}
