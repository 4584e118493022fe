use super::{decode_interleaved_f32, frames_for, AudioClient, CaptureError};
use crate::analysis::AudioBuffer;
use std::io::{self, Read};
use std::sync::Mutex;

/// Reads interleaved little-endian f32 stereo from a byte stream
///
/// Intended for piped input such as
/// `ffmpeg -i mix.wav -f f32le -ac 2 - | rubin-mx --capture stdin`.
/// A short read is zero-padded to the requested length.
pub struct StdinAudioClient {
    reader: Mutex<Box<dyn Read + Send>>,
}

impl StdinAudioClient {
    pub fn new() -> Self {
        Self::from_reader(io::stdin())
    }

    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Mutex::new(Box::new(reader)),
        }
    }
}

impl Default for StdinAudioClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioClient for StdinAudioClient {
    fn name(&self) -> &'static str {
        "stdin"
    }

    fn capture(&self, duration: f64, sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
        let wanted = frames_for(duration, sample_rate) * 2;
        let mut raw = Vec::with_capacity(wanted * 4);

        {
            let mut reader = self
                .reader
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "stdin reader lock poisoned"))?;
            reader.by_ref().take((wanted * 4) as u64).read_to_end(&mut raw)?;
        }

        if raw.is_empty() {
            return Err(CaptureError::NoData("stdin"));
        }

        let mut samples = decode_interleaved_f32(&raw);
        samples.resize(wanted, 0.0);
        Ok(AudioBuffer::from_interleaved_stereo(&samples)?)
    }
}
