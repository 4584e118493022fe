use super::{frames_for, AudioClient, CaptureError};
use crate::analysis::AudioBuffer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, SampleRate, StreamConfig};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Extra time past the requested duration before a silent device is abandoned
const STALL_GRACE: Duration = Duration::from_secs(5);

const CHANNELS: u16 = 2;

/// Messages from the realtime input callback to the capturing thread
#[derive(Debug)]
pub(crate) enum InputEvent {
    Samples(Vec<f32>),
    Failed(String),
}

/// Records from a system input device (a loopback device such as BlackHole
/// or VB-Audio, or a plain line input)
///
/// The device is opened per capture with a 2-channel f32 stream at the
/// requested rate, so nothing touches audio hardware until the first
/// capture.
pub struct CpalAudioClient {
    /// Input device name; `None` uses the host default
    device_name: Option<String>,
}

impl CpalAudioClient {
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    /// Names of the input devices on the default host
    pub fn list_devices() -> Result<Vec<String>, CaptureError> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| CaptureError::Device(format!("failed to enumerate input devices: {}", e)))?
            .filter_map(|device| device.name().ok())
            .collect();
        Ok(devices)
    }

    fn open_device(&self) -> Result<Device, CaptureError> {
        let host = cpal::default_host();

        match &self.device_name {
            Some(name) => host
                .input_devices()
                .map_err(|e| CaptureError::Device(format!("failed to enumerate input devices: {}", e)))?
                .find(|device| device.name().ok().as_deref() == Some(name.as_str()))
                .ok_or_else(|| CaptureError::Device(format!("input device '{}' not found", name))),
            None => host
                .default_input_device()
                .ok_or_else(|| CaptureError::Device("no default input device".to_string())),
        }
    }

    /// Check that the device offers stereo f32 input at `sample_rate`
    fn stream_config(device: &Device, sample_rate: u32) -> Result<StreamConfig, CaptureError> {
        let supported = device
            .supported_input_configs()
            .map_err(|e| CaptureError::Device(format!("failed to query input configs: {}", e)))?
            .any(|config| {
                config.channels() == CHANNELS
                    && config.sample_format() == SampleFormat::F32
                    && config.min_sample_rate().0 <= sample_rate
                    && config.max_sample_rate().0 >= sample_rate
            });

        if !supported {
            return Err(CaptureError::Device(format!(
                "device does not offer 2-channel f32 input at {} Hz",
                sample_rate
            )));
        }

        Ok(StreamConfig {
            channels: CHANNELS,
            sample_rate: SampleRate(sample_rate),
            buffer_size: BufferSize::Default,
        })
    }
}

/// Gather `frames` interleaved stereo frames from the input callback
///
/// A gap longer than `stall_timeout` between deliveries ends the capture:
/// with nothing received it is `NoData`, otherwise `Truncated`.
pub(crate) fn collect_frames(
    events: &Receiver<InputEvent>,
    frames: usize,
    stall_timeout: Duration,
) -> Result<Vec<f32>, CaptureError> {
    let wanted = frames * CHANNELS as usize;
    let mut interleaved = Vec::with_capacity(wanted);

    while interleaved.len() < wanted {
        match events.recv_timeout(stall_timeout) {
            Ok(InputEvent::Samples(chunk)) => {
                let room = wanted - interleaved.len();
                interleaved.extend_from_slice(&chunk[..chunk.len().min(room)]);
            }
            Ok(InputEvent::Failed(message)) => return Err(CaptureError::Stream(message)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                if interleaved.is_empty() {
                    return Err(CaptureError::NoData("system"));
                }
                return Err(CaptureError::Truncated(format!(
                    "input stalled after {} of {} frames",
                    interleaved.len() / CHANNELS as usize,
                    frames
                )));
            }
        }
    }
    Ok(interleaved)
}

impl AudioClient for CpalAudioClient {
    fn name(&self) -> &'static str {
        "system"
    }

    fn capture(&self, duration: f64, sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
        let frames = frames_for(duration, sample_rate);
        let device = self.open_device()?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let config = Self::stream_config(&device, sample_rate)?;

        let (tx, rx) = mpsc::channel();
        let error_tx = tx.clone();
        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Receiver gone means the capture already finished
                    let _ = tx.send(InputEvent::Samples(data.to_vec()));
                },
                move |err| {
                    let _ = error_tx.send(InputEvent::Failed(err.to_string()));
                },
                None,
            )
            .map_err(|e| CaptureError::Stream(format!("failed to build input stream: {}", e)))?;
        stream
            .play()
            .map_err(|e| CaptureError::Stream(format!("failed to start input stream: {}", e)))?;

        info!(device = %device_name, duration, sample_rate, "Recording from input device");
        let stall_timeout = Duration::try_from_secs_f64(duration)
            .unwrap_or_default()
            .saturating_add(STALL_GRACE);
        let result = collect_frames(&rx, frames, stall_timeout);

        if let Err(e) = stream.pause() {
            warn!("Failed to pause input stream: {}", e);
        }
        drop(stream);

        let interleaved = result?;
        debug!(frames = interleaved.len() / CHANNELS as usize, "Input capture complete");
        Ok(AudioBuffer::from_interleaved_stereo(&interleaved)?)
    }
}
