//! Stereo image: width, balance and inter-channel correlation

use rubin_common::analysis::StereoFeatures;

fn mean_square(values: impl Iterator<Item = f64>) -> (f64, usize) {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v * v, count + 1));
    if count == 0 {
        (0.0, 0)
    } else {
        (sum / count as f64, count)
    }
}

/// Side-to-total energy ratio in [0, 1]; 0.0 for silence
pub fn width(left: &[f32], right: &[f32]) -> f64 {
    let pairs = || left.iter().zip(right).map(|(&l, &r)| (l as f64, r as f64));
    let (mid, _) = mean_square(pairs().map(|(l, r)| (l + r) / 2.0));
    let (side, _) = mean_square(pairs().map(|(l, r)| (l - r) / 2.0));

    let total = mid + side;
    if total > 0.0 {
        side / total
    } else {
        0.0
    }
}

/// Right-minus-left energy ratio in [-1, 1]; 0.0 for silence
pub fn balance(left: &[f32], right: &[f32]) -> f64 {
    let (left_energy, _) = mean_square(left.iter().map(|&s| s as f64));
    let (right_energy, _) = mean_square(right.iter().map(|&s| s as f64));

    let total = left_energy + right_energy;
    if total > 0.0 {
        (right_energy - left_energy) / total
    } else {
        0.0
    }
}

/// Pearson correlation of the two channels
///
/// Defined as 1.0 when either channel is constant or the buffer is empty.
pub fn correlation(left: &[f32], right: &[f32]) -> f64 {
    let n = left.len().min(right.len());
    if n == 0 {
        return 1.0;
    }

    let mean_l = left[..n].iter().map(|&s| s as f64).sum::<f64>() / n as f64;
    let mean_r = right[..n].iter().map(|&s| s as f64).sum::<f64>() / n as f64;

    let (mut covariance, mut var_l, mut var_r) = (0.0, 0.0, 0.0);
    for (&l, &r) in left.iter().zip(right) {
        let dl = l as f64 - mean_l;
        let dr = r as f64 - mean_r;
        covariance += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }

    if var_l <= 0.0 || var_r <= 0.0 {
        return 1.0;
    }
    (covariance / (var_l.sqrt() * var_r.sqrt())).clamp(-1.0, 1.0)
}

pub fn stereo_features(left: &[f32], right: &[f32]) -> StereoFeatures {
    StereoFeatures {
        width: width(left, right),
        balance: balance(left, right),
        correlation: correlation(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 44100.0).sin())
            .collect()
    }

    #[test]
    fn test_identical_channels() {
        let signal = sine(440.0, 4410);
        let features = stereo_features(&signal, &signal);
        assert!(features.width < 0.01);
        assert!(features.correlation > 0.99);
        assert!(features.balance.abs() < 1e-9);
    }

    #[test]
    fn test_inverted_channels_are_all_side() {
        let left = sine(440.0, 4410);
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        assert!((width(&left, &right) - 1.0).abs() < 1e-9);
        assert!((correlation(&left, &right) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hard_panned_balance() {
        let signal = sine(440.0, 4410);
        let silent = vec![0.0; signal.len()];
        assert!((balance(&silent, &signal) - 1.0).abs() < 1e-9);
        assert!((balance(&signal, &silent) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(stereo_features(&[], &[]), StereoFeatures {
            width: 0.0,
            balance: 0.0,
            correlation: 1.0,
        });

        let silent = vec![0.0; 100];
        let features = stereo_features(&silent, &silent);
        assert_eq!(features.width, 0.0);
        assert_eq!(features.balance, 0.0);
        assert_eq!(features.correlation, 1.0);

        // constant right channel has zero variance
        let left = sine(100.0, 100);
        assert_eq!(correlation(&left, &[0.3; 100]), 1.0);
    }
}
