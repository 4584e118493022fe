//! Capture client that plays back a fixed buffer

use rubin_mx::analysis::AudioBuffer;
use rubin_mx::capture::{AudioClient, CaptureError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Returns its buffer (or a scripted failure) on every capture
pub struct FakeAudioClient {
    buffer: Mutex<Option<AudioBuffer>>,
    captures: AtomicUsize,
    last_request: Mutex<Option<(f64, u32)>>,
}

impl FakeAudioClient {
    pub fn new(buffer: AudioBuffer) -> Self {
        Self {
            buffer: Mutex::new(Some(buffer)),
            captures: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Client whose every capture fails with `NoData`
    pub fn empty() -> Self {
        Self {
            buffer: Mutex::new(None),
            captures: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn mono(samples: Vec<f32>) -> Self {
        Self::new(AudioBuffer::mono(samples))
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(f64, u32)> {
        *self.last_request.lock().unwrap()
    }

    pub fn replace(&self, buffer: AudioBuffer) {
        *self.buffer.lock().unwrap() = Some(buffer);
    }
}

impl AudioClient for FakeAudioClient {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn capture(&self, duration: f64, sample_rate: u32) -> Result<AudioBuffer, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((duration, sample_rate));
        self.buffer
            .lock()
            .unwrap()
            .clone()
            .ok_or(CaptureError::NoData("fake"))
    }
}
