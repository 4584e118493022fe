//! Band energy: mean spectral magnitude inside a frequency interval

use rubin_common::analysis::FrequencyBandEnergy;

/// Mean magnitude of the bins whose frequency lies in `[low, high)`
///
/// Returns 0.0 when no bin falls inside the interval. `spectrum` and
/// `frequencies` must be parallel arrays of equal length.
pub fn band_energy(spectrum: &[f32], frequencies: &[f32], low: f64, high: f64) -> f64 {
    assert_eq!(
        spectrum.len(),
        frequencies.len(),
        "spectrum and frequency axis must have the same length"
    );

    let (sum, count) = spectrum
        .iter()
        .zip(frequencies)
        .filter(|&(_, &freq)| low <= freq as f64 && (freq as f64) < high)
        .fold((0.0f64, 0usize), |(sum, count), (&magnitude, _)| {
            (sum + magnitude as f64, count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Running per-bin mean of magnitude frames
#[derive(Debug, Clone)]
pub struct MeanSpectrum {
    sums: Vec<f64>,
    frames: usize,
}

impl MeanSpectrum {
    pub fn new(bins: usize) -> Self {
        Self {
            sums: vec![0.0; bins],
            frames: 0,
        }
    }

    pub fn push(&mut self, magnitudes: &[f32]) {
        for (sum, &magnitude) in self.sums.iter_mut().zip(magnitudes) {
            *sum += magnitude as f64;
        }
        self.frames += 1;
    }

    /// Per-bin magnitude averaged over all frames pushed so far
    pub fn finish(&self) -> Vec<f32> {
        let count = self.frames.max(1) as f64;
        self.sums.iter().map(|&sum| (sum / count) as f32).collect()
    }
}

/// Energy in each of the seven fixed bands of a time-averaged spectrum
///
/// Every frame contributes the same number of bins, so averaging the
/// time-averaged spectrum equals averaging over all (bin, frame) cells.
pub fn band_energies(mean_spectrum: &[f32], frequencies: &[f32]) -> FrequencyBandEnergy {
    FrequencyBandEnergy::from_fn(|band| {
        let (low, high) = band.frequency_range();
        band_energy(mean_spectrum, frequencies, low, high)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubin_common::bands::Band;

    #[test]
    fn test_mean_of_bins_in_range() {
        let spectrum = [1.0, 2.0, 3.0, 4.0, 5.0];
        let freqs = [0.0, 100.0, 200.0, 300.0, 400.0];

        // 100 and 200 are in [100, 300); 300 is excluded
        assert_eq!(band_energy(&spectrum, &freqs, 100.0, 300.0), 2.5);
        assert_eq!(band_energy(&spectrum, &freqs, 0.0, 1000.0), 3.0);
    }

    #[test]
    fn test_empty_interval_returns_zero() {
        let spectrum = [1.0, 2.0, 3.0];
        let freqs = [0.0, 100.0, 200.0];
        assert_eq!(band_energy(&spectrum, &freqs, 20000.0, 30000.0), 0.0);
        assert_eq!(band_energy(&spectrum, &freqs, 101.0, 199.0), 0.0);
        assert_eq!(band_energy(&[], &[], 20.0, 60.0), 0.0);
    }

    #[test]
    fn test_mean_spectrum_averages_frames() {
        let mut mean = MeanSpectrum::new(3);
        assert_eq!(mean.finish(), vec![0.0, 0.0, 0.0]);

        mean.push(&[1.0, 2.0, 3.0]);
        mean.push(&[3.0, 2.0, 1.0]);
        assert_eq!(mean.finish(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_band_energies_follow_band_ranges() {
        // 0, 40 Hz fall in sub_bass; 100 Hz in bass
        let freqs = [0.0, 40.0, 100.0];
        let energies = band_energies(&[9.0, 3.0, 5.0], &freqs);
        assert_eq!(energies.get(Band::SubBass), 3.0);
        assert_eq!(energies.get(Band::Bass), 5.0);
        assert_eq!(energies.get(Band::Brilliance), 0.0);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_mismatched_axis_is_a_contract_violation() {
        band_energy(&[1.0, 2.0], &[0.0], 0.0, 100.0);
    }
}
