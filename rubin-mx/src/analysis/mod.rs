//! Feature extraction
//!
//! Pure, deterministic measurement of a captured buffer. Everything here is
//! synchronous and free of shared state.

pub mod band_energy;
pub mod buffer;
pub mod extractor;
pub mod loudness;
pub mod spectral;
pub mod stereo;
pub mod stft;
pub mod timbre;

/// STFT frame length in samples
pub const FRAME_LENGTH: usize = 2048;

/// STFT hop length in samples
pub const HOP_LENGTH: usize = 512;

pub use band_energy::{band_energies, band_energy, MeanSpectrum};
pub use buffer::{AudioBuffer, BufferError};
pub use extractor::{analyze, FeatureExtractor};
pub use stft::Stft;
