//! Validated multichannel sample buffer
//!
//! Construction is the only place buffer shape is checked. Once an
//! [`AudioBuffer`] exists, analysis on it cannot fail.

use thiserror::Error;

/// Malformed buffer shape
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("buffer has no channels")]
    NoChannels,

    #[error("channel {channel} has {actual} samples, expected {expected}")]
    RaggedChannels {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("interleaved stereo data has an odd sample count ({0})")]
    OddInterleavedLength(usize),
}

/// Planar (channels, samples) buffer of f32 samples nominally in [-1, 1]
///
/// Always holds at least two channels: mono input is duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build from planar channels
    ///
    /// A single channel is duplicated into identical left and right
    /// channels. All channels must have the same length.
    pub fn from_channels(mut channels: Vec<Vec<f32>>) -> Result<Self, BufferError> {
        let expected = channels.first().ok_or(BufferError::NoChannels)?.len();

        for (channel, samples) in channels.iter().enumerate() {
            if samples.len() != expected {
                return Err(BufferError::RaggedChannels {
                    channel,
                    expected,
                    actual: samples.len(),
                });
            }
        }

        if channels.len() == 1 {
            let duplicate = channels[0].clone();
            channels.push(duplicate);
        }

        Ok(Self { channels })
    }

    /// Single channel, duplicated to stereo
    pub fn mono(samples: Vec<f32>) -> Self {
        Self {
            channels: vec![samples.clone(), samples],
        }
    }

    pub fn stereo(left: Vec<f32>, right: Vec<f32>) -> Result<Self, BufferError> {
        Self::from_channels(vec![left, right])
    }

    /// De-interleave `L R L R ...` samples
    pub fn from_interleaved_stereo(samples: &[f32]) -> Result<Self, BufferError> {
        if samples.len() % 2 != 0 {
            return Err(BufferError::OddInterleavedLength(samples.len()));
        }

        let left = samples.iter().step_by(2).copied().collect();
        let right = samples.iter().skip(1).step_by(2).copied().collect();
        Ok(Self {
            channels: vec![left, right],
        })
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn num_samples(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn left(&self) -> &[f32] {
        &self.channels[0]
    }

    pub fn right(&self) -> &[f32] {
        &self.channels[1]
    }

    /// Per-sample average of all channels
    pub fn mono_mix(&self) -> Vec<f32> {
        let scale = 1.0 / self.channels.len() as f32;
        (0..self.num_samples())
            .map(|i| self.channels.iter().map(|ch| ch[i]).sum::<f32>() * scale)
            .collect()
    }
}
