use super::{frames_for, AudioClient, CaptureError};
use crate::analysis::AudioBuffer;
use hound::{SampleFormat, WavReader};
use std::path::PathBuf;
use tracing::debug;

/// Reads the opening `duration` seconds of a WAV file
///
/// Integer samples are scaled to [-1, 1]. The file's sample rate must match
/// the requested one; no resampling is done.
pub struct WavFileClient {
    path: PathBuf,
}

impl WavFileClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AudioClient for WavFileClient {
    fn name(&self) -> &'static str {
        "wav"
    }

    fn capture(&self, duration: f64, sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
        let mut reader = WavReader::open(&self.path)?;
        let spec = reader.spec();

        if spec.sample_rate != sample_rate {
            return Err(CaptureError::SampleRateMismatch {
                requested: sample_rate,
                actual: spec.sample_rate,
            });
        }

        let channels = spec.channels.max(1) as usize;
        let limit = frames_for(duration, sample_rate) * channels;

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .take(limit)
                .collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .take(limit)
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let mut planar = vec![Vec::with_capacity(interleaved.len() / channels); channels];
        for frame in interleaved.chunks_exact(channels) {
            for (channel, &sample) in planar.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        debug!(
            path = %self.path.display(),
            channels,
            frames = planar[0].len(),
            "Read WAV capture"
        );

        Ok(AudioBuffer::from_channels(planar)?)
    }
}
