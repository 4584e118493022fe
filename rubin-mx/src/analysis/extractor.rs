//! Feature extractor: one buffer in, one [`AudioAnalysis`] out

use super::band_energy::{band_energies, MeanSpectrum};
use super::buffer::AudioBuffer;
use super::loudness::loudness_features;
use super::spectral::SpectralAccumulator;
use super::stereo::stereo_features;
use super::stft::Stft;
use super::timbre::TimbreAccumulator;
use super::{FRAME_LENGTH, HOP_LENGTH};
use rubin_common::analysis::AudioAnalysis;
use tracing::debug;

/// STFT framing shared by every frame-based measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureExtractor {
    pub frame_length: usize,
    pub hop_length: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            frame_length: FRAME_LENGTH,
            hop_length: HOP_LENGTH,
        }
    }
}

impl FeatureExtractor {
    pub fn new(frame_length: usize, hop_length: usize) -> Self {
        assert!(frame_length > 0 && hop_length > 0, "frame and hop length must be positive");
        Self {
            frame_length,
            hop_length,
        }
    }

    /// Measure a buffer captured at `sample_rate`
    ///
    /// The STFT of the mono mix runs once; each magnitude frame feeds the
    /// spectral, timbral and band-energy accumulators and is then dropped.
    pub fn analyze(&self, buffer: &AudioBuffer, sample_rate: u32) -> AudioAnalysis {
        assert!(sample_rate > 0, "sample rate must be positive");

        let mono = buffer.mono_mix();
        let stft = Stft::new(sample_rate, self.frame_length, self.hop_length);
        let frequencies = stft.frequencies();

        let mut spectral = SpectralAccumulator::new(frequencies);
        let mut timbre = TimbreAccumulator::new(sample_rate, frequencies);
        let mut spectrum = MeanSpectrum::new(frequencies.len());
        let frames = stft.process(&mono, |magnitudes| {
            spectral.push(magnitudes);
            timbre.push(magnitudes);
            spectrum.push(magnitudes);
        });

        let analysis = AudioAnalysis {
            spectral: spectral.finish(),
            timbre: timbre.finish(),
            loudness: loudness_features(&mono, self.frame_length, self.hop_length),
            frequency_bands: band_energies(&spectrum.finish(), frequencies),
            stereo: stereo_features(buffer.left(), buffer.right()),
            sample_rate,
            duration: buffer.num_samples() as f64 / sample_rate as f64,
            num_channels: buffer.num_channels(),
        };

        debug!(
            duration = analysis.duration,
            frames,
            centroid = analysis.spectral.centroid_mean,
            rms_mean = analysis.loudness.rms_mean,
            dynamic_range_db = analysis.loudness.dynamic_range_db,
            width = analysis.stereo.width,
            "Analyzed buffer"
        );

        analysis
    }
}

/// Analyze with the default framing
pub fn analyze(buffer: &AudioBuffer, sample_rate: u32) -> AudioAnalysis {
    FeatureExtractor::default().analyze(buffer, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubin_common::analysis::{CHROMA_BINS, MFCC_COEFFICIENTS};

    #[test]
    fn test_mono_buffer_reports_two_channels() {
        let samples: Vec<f32> = (0..22050).map(|i| ((i as f32) * 0.05).sin() * 0.3).collect();
        let analysis = analyze(&AudioBuffer::mono(samples), 44100);

        assert_eq!(analysis.num_channels, 2);
        assert!((analysis.duration - 0.5).abs() < 1e-12);
        assert_eq!(analysis.timbre.mfcc_means.len(), MFCC_COEFFICIENTS);
        assert_eq!(analysis.timbre.chroma_means.len(), CHROMA_BINS);
        assert!(analysis.stereo.width < 0.01);
    }

    #[test]
    fn test_empty_buffer_is_safe() {
        let analysis = analyze(&AudioBuffer::mono(Vec::new()), 44100);
        assert_eq!(analysis.duration, 0.0);
        assert_eq!(analysis.loudness.dynamic_range_db, 0.0);
        assert_eq!(analysis.stereo.correlation, 1.0);
        assert_eq!(analysis.frequency_bands.total(), 0.0);
    }

    #[test]
    #[should_panic(expected = "sample rate")]
    fn test_zero_sample_rate_is_a_contract_violation() {
        analyze(&AudioBuffer::mono(vec![0.0; 16]), 0);
    }
}
