//! Audio capture sources
//!
//! A capture client blocks until it has `duration` seconds of audio (or the
//! source runs dry) and returns a validated [`AudioBuffer`]. Handlers call
//! clients from `spawn_blocking`.

mod stdin;
mod system;
mod tcp;
mod wav;

pub use stdin::StdinAudioClient;
pub use system::CpalAudioClient;
pub use tcp::TcpAudioClient;
pub use wav::WavFileClient;

use crate::analysis::{AudioBuffer, BufferError};
use crate::config::{CaptureConfig, CaptureSource};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no audio data available from {0}")]
    NoData(&'static str),

    #[error("stream ended early: {0}")]
    Truncated(String),

    #[error("malformed audio: {0}")]
    Format(String),

    #[error("audio device error: {0}")]
    Device(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("source is {actual} Hz but {requested} Hz was requested")]
    SampleRateMismatch { requested: u32, actual: u32 },
}

impl From<BufferError> for CaptureError {
    fn from(err: BufferError) -> Self {
        CaptureError::Format(err.to_string())
    }
}

impl From<hound::Error> for CaptureError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => CaptureError::Io(io),
            other => CaptureError::Format(other.to_string()),
        }
    }
}

/// Source of captured stereo audio
pub trait AudioClient: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Capture `duration` seconds at `sample_rate`
    fn capture(&self, duration: f64, sample_rate: u32) -> Result<AudioBuffer, CaptureError>;
}

/// Frames (sample pairs) needed for `duration` seconds
pub(crate) fn frames_for(duration: f64, sample_rate: u32) -> usize {
    (duration * sample_rate as f64).max(0.0) as usize
}

/// Decode interleaved little-endian f32 stereo, dropping any trailing partial frame
pub(crate) fn decode_interleaved_f32(bytes: &[u8]) -> Vec<f32> {
    const FRAME_BYTES: usize = 2 * 4;
    let whole = bytes.len() - bytes.len() % FRAME_BYTES;
    bytes[..whole]
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Build the client selected in configuration
pub fn client_from_config(config: &CaptureConfig) -> Result<Arc<dyn AudioClient>, CaptureError> {
    let client: Arc<dyn AudioClient> = match config.source {
        CaptureSource::System => Arc::new(CpalAudioClient::new(config.device.clone())),
        CaptureSource::Stdin => Arc::new(StdinAudioClient::new()),
        CaptureSource::Tcp => {
            let timeout = Duration::try_from_secs_f64(config.tcp_timeout_secs).map_err(|_| {
                CaptureError::Format(format!("invalid tcp_timeout_secs: {}", config.tcp_timeout_secs))
            })?;
            Arc::new(TcpAudioClient::new(&config.tcp_host, config.tcp_port).with_timeout(timeout))
        }
        CaptureSource::Wav => {
            let path = config.wav_path.clone().ok_or_else(|| {
                CaptureError::Format("capture source is wav but no wav_path is configured".to_string())
            })?;
            Arc::new(WavFileClient::new(path))
        }
    };

    info!(source = client.name(), "Capture client ready");
    Ok(client)
}
