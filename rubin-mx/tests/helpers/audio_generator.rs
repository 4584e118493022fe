//! Deterministic test signals

use std::f32::consts::PI;
use std::path::Path;

/// `seconds` of a sine at `freq` Hz, peak `amplitude`
pub fn sine(freq: f32, seconds: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let n = (seconds * sample_rate as f32) as usize;
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Independent sines on left and right
pub fn stereo_sine(left_freq: f32, right_freq: f32, seconds: f32, sample_rate: u32) -> (Vec<f32>, Vec<f32>) {
    (
        sine(left_freq, seconds, sample_rate, 0.5),
        sine(right_freq, seconds, sample_rate, 0.5),
    )
}

pub fn silence(seconds: f32, sample_rate: u32) -> Vec<f32> {
    vec![0.0; (seconds * sample_rate as f32) as usize]
}

/// Uniform white noise in [-amplitude, amplitude] from a fixed xorshift seed
pub fn noise(seconds: f32, sample_rate: u32, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut state = seed.max(1);
    (0..(seconds * sample_rate as f32) as usize)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            amplitude * (state as f32 / u32::MAX as f32 * 2.0 - 1.0)
        })
        .collect()
}

/// Write 16-bit stereo PCM
pub fn write_wav(path: &Path, left: &[f32], right: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for (&l, &r) in left.iter().zip(right) {
        writer.write_sample((l.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        writer.write_sample((r.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
