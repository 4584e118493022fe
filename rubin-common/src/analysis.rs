//! Analysis records produced by the feature extractor
//!
//! An [`AudioAnalysis`] is built once per captured buffer and never mutated.
//! All fields serialize to JSON so the records can be returned to clients
//! and diffed as snapshots.

use crate::bands::Band;
use serde::{Deserialize, Serialize};

/// Number of MFCC coefficients in [`TimbreFeatures::mfcc_means`]
pub const MFCC_COEFFICIENTS: usize = 13;

/// Number of pitch classes in [`TimbreFeatures::chroma_means`]
pub const CHROMA_BINS: usize = 12;

/// Spectral shape statistics over the mono mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralFeatures {
    /// Mean spectral centroid (Hz)
    pub centroid_mean: f64,
    /// Standard deviation of the spectral centroid (Hz)
    pub centroid_std: f64,
    /// Mean spectral bandwidth (Hz)
    pub bandwidth_mean: f64,
    /// Mean 85% rolloff frequency (Hz)
    pub rolloff_mean: f64,
    /// Mean spectral flatness (0 = tonal, 1 = noise-like)
    pub flatness_mean: f64,
}

/// Timbral and harmonic summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimbreFeatures {
    /// Per-coefficient MFCC means, `MFCC_COEFFICIENTS` long
    pub mfcc_means: Vec<f64>,
    /// Per-pitch-class chroma means (C first), `CHROMA_BINS` long
    pub chroma_means: Vec<f64>,
}

/// Frame RMS statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudnessFeatures {
    pub rms_mean: f64,
    pub rms_max: f64,
    pub rms_min: f64,
    /// `20*log10(rms_max/rms_min)`, 0.0 when either is zero
    pub dynamic_range_db: f64,
}

/// Mean magnitude-spectrum energy per band
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBandEnergy {
    pub sub_bass: f64,
    pub bass: f64,
    pub low_mid: f64,
    pub mid: f64,
    pub upper_mid: f64,
    pub presence: f64,
    pub brilliance: f64,
}

impl FrequencyBandEnergy {
    /// Energy measured for `band`
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::SubBass => self.sub_bass,
            Band::Bass => self.bass,
            Band::LowMid => self.low_mid,
            Band::Mid => self.mid,
            Band::UpperMid => self.upper_mid,
            Band::Presence => self.presence,
            Band::Brilliance => self.brilliance,
        }
    }

    /// Build from a per-band measurement function
    pub fn from_fn(mut energy: impl FnMut(Band) -> f64) -> Self {
        Self {
            sub_bass: energy(Band::SubBass),
            bass: energy(Band::Bass),
            low_mid: energy(Band::LowMid),
            mid: energy(Band::Mid),
            upper_mid: energy(Band::UpperMid),
            presence: energy(Band::Presence),
            brilliance: energy(Band::Brilliance),
        }
    }

    /// `(band, energy)` pairs, lowest band first
    pub fn iter(&self) -> impl Iterator<Item = (Band, f64)> + '_ {
        Band::ALL.into_iter().map(move |band| (band, self.get(band)))
    }

    /// Sum of all band energies
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, energy)| energy).sum()
    }
}

/// Stereo image measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StereoFeatures {
    /// Side energy over total energy: 0 = mono, 1 = fully out of phase
    pub width: f64,
    /// -1 = hard left, 0 = centered, 1 = hard right
    pub balance: f64,
    /// Pearson correlation of left and right
    pub correlation: f64,
}

/// Complete analysis of one captured buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAnalysis {
    pub spectral: SpectralFeatures,
    pub timbre: TimbreFeatures,
    pub loudness: LoudnessFeatures,
    pub frequency_bands: FrequencyBandEnergy,
    pub stereo: StereoFeatures,
    pub sample_rate: u32,
    /// Seconds (`sample_count / sample_rate`)
    pub duration: f64,
    pub num_channels: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_energy_accessors_agree() {
        let energies = FrequencyBandEnergy::from_fn(|band| band as usize as f64 + 1.0);
        assert_eq!(energies.sub_bass, 1.0);
        assert_eq!(energies.brilliance, 7.0);
        assert_eq!(energies.get(Band::Mid), energies.mid);
        assert_eq!(energies.total(), 28.0);

        let bands: Vec<Band> = energies.iter().map(|(band, _)| band).collect();
        assert_eq!(bands, Band::ALL.to_vec());
    }

    #[test]
    fn test_band_energy_json_field_names() {
        let value = serde_json::to_value(FrequencyBandEnergy::default()).unwrap();
        for band in Band::ALL {
            assert!(value.get(band.name()).is_some(), "missing field {}", band);
        }
    }
}
