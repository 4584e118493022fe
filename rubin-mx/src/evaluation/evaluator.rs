//! Score an analysis against a style profile
//!
//! Each constrained metric contributes one 0-100 component: 100 inside its
//! target range, falling by 50 points per half-span of deviation outside it.
//! The cohesion score is the mean of all contributed components.

use super::tables::{boost_suggestion, excess_category, reduction_suggestion};
use rubin_common::analysis::AudioAnalysis;
use rubin_common::{Band, EvaluationResult, Issue, Range, Severity, StyleProfile};
use std::collections::BTreeMap;
use tracing::debug;

/// Half-span used when a band or scalar target is degenerate (`high <= low`)
const DEFAULT_SPAN: f64 = 1.0;

/// Degenerate-span fallback for stereo width, which lives in [0, 1]
const WIDTH_SPAN: f64 = 0.1;

/// Component score for `value` against `target`
pub fn range_score(target: &Range, value: f64, fallback_span: f64) -> f64 {
    let span = target.half_span_or(fallback_span);
    (100.0 - (target.deviation(value) / span) * 50.0).max(0.0)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn severity_for(deviation: f64, span: f64) -> Severity {
    if deviation > 2.0 * span {
        Severity::High
    } else if deviation > span {
        Severity::Medium
    } else {
        Severity::Low
    }
}

pub fn evaluate(analysis: &AudioAnalysis, profile: &StyleProfile) -> EvaluationResult {
    let mut issues = Vec::new();
    let mut band_scores = BTreeMap::new();
    let mut components = Vec::new();

    for (band, actual) in analysis.frequency_bands.iter() {
        let Some(target) = profile.band_target(band) else {
            band_scores.insert(band, 100.0);
            continue;
        };

        let score = range_score(target, actual, DEFAULT_SPAN);
        band_scores.insert(band, round_to(score, 1));
        components.push(score);

        if let Some(issue) = band_issue(band, actual, target) {
            issues.push(issue);
        }
    }

    if let Some(target) = &profile.dynamic_range_db {
        let dr = analysis.loudness.dynamic_range_db;
        components.push(range_score(target, dr, DEFAULT_SPAN));

        if dr < target.low {
            issues.push(Issue::new(
                "over_compressed",
                Severity::Medium,
                None,
                format!(
                    "Dynamic range ({:.1} dB) is below target [{:.1}, {:.1}] dB",
                    dr, target.low, target.high
                ),
                "Reduce compression ratio or raise threshold to restore dynamics.",
            ));
        } else if dr > target.high {
            issues.push(Issue::new(
                "under_compressed",
                Severity::Low,
                None,
                format!(
                    "Dynamic range ({:.1} dB) exceeds target [{:.1}, {:.1}] dB",
                    dr, target.low, target.high
                ),
                "Apply gentle bus compression to tighten the dynamic range.",
            ));
        }
    }

    if let Some(target) = &profile.brightness {
        let centroid = analysis.spectral.centroid_mean;
        components.push(range_score(target, centroid, DEFAULT_SPAN));

        if centroid > target.high {
            issues.push(Issue::new(
                "harshness",
                Severity::Medium,
                Some(Band::UpperMid),
                format!(
                    "Spectral centroid ({:.0} Hz) is above target; the mix may sound harsh or brittle.",
                    centroid
                ),
                "Roll off highs with a low-pass or shelf EQ above 8 kHz.",
            ));
        } else if centroid < target.low {
            issues.push(Issue::new(
                "dullness",
                Severity::Medium,
                Some(Band::Presence),
                format!(
                    "Spectral centroid ({:.0} Hz) is below target; the mix may sound dull.",
                    centroid
                ),
                "Add a subtle high-shelf boost around 8-12 kHz for air.",
            ));
        }
    }

    if let Some(target) = &profile.stereo_width {
        let width = analysis.stereo.width;
        components.push(range_score(target, width, WIDTH_SPAN));

        if width > target.high {
            issues.push(Issue::new(
                "too_wide",
                Severity::Low,
                None,
                format!(
                    "Stereo width ({:.3}) exceeds target; mono compatibility may suffer.",
                    width
                ),
                "Narrow the stereo image on low-frequency elements; check mono compatibility.",
            ));
        } else if width < target.low {
            issues.push(Issue::new(
                "too_narrow",
                Severity::Low,
                None,
                format!("Stereo width ({:.3}) is below target; the mix may sound flat.", width),
                "Use subtle stereo widening on pads/reverbs, or pan elements further apart.",
            ));
        }
    }

    let cohesion_score = if components.is_empty() {
        100.0
    } else {
        round_to(components.iter().sum::<f64>() / components.len() as f64, 1)
    };

    debug!(
        style = %profile.name,
        cohesion_score,
        components = components.len(),
        issues = issues.len(),
        "Evaluated mix"
    );

    EvaluationResult {
        style: profile.name.clone(),
        cohesion_score,
        issues,
        band_scores,
    }
}

fn band_issue(band: Band, actual: f64, target: &Range) -> Option<Issue> {
    let deviation = target.deviation(actual);
    if deviation <= 0.0 {
        return None;
    }
    let severity = severity_for(deviation, target.half_span_or(DEFAULT_SPAN));

    let issue = if actual > target.high {
        Issue::new(
            excess_category(band),
            severity,
            Some(band),
            format!(
                "{} energy ({:.4}) exceeds target range [{:.4}, {:.4}]",
                band, actual, target.low, target.high
            ),
            reduction_suggestion(band),
        )
    } else {
        Issue::new(
            format!("thin_{}", band),
            severity,
            Some(band),
            format!(
                "{} energy ({:.4}) below target range [{:.4}, {:.4}]",
                band, actual, target.low, target.high
            ),
            boost_suggestion(band),
        )
    };
    Some(issue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubin_common::analysis::{
        FrequencyBandEnergy, LoudnessFeatures, SpectralFeatures, StereoFeatures, TimbreFeatures,
    };

    fn analysis_with(bands: FrequencyBandEnergy) -> AudioAnalysis {
        AudioAnalysis {
            spectral: SpectralFeatures {
                centroid_mean: 2500.0,
                centroid_std: 100.0,
                bandwidth_mean: 1500.0,
                rolloff_mean: 5000.0,
                flatness_mean: 0.05,
            },
            timbre: TimbreFeatures {
                mfcc_means: vec![0.0; 13],
                chroma_means: vec![0.0; 12],
            },
            loudness: LoudnessFeatures {
                rms_mean: 0.2,
                rms_max: 0.4,
                rms_min: 0.04,
                dynamic_range_db: 20.0,
            },
            frequency_bands: bands,
            stereo: StereoFeatures {
                width: 0.2,
                balance: 0.0,
                correlation: 0.8,
            },
            sample_rate: 44100,
            duration: 1.0,
            num_channels: 2,
        }
    }

    #[test]
    fn test_unconstrained_profile_scores_100() {
        let analysis = analysis_with(FrequencyBandEnergy::from_fn(|_| 5.0));
        let result = evaluate(&analysis, &StyleProfile::new("empty", ""));

        assert_eq!(result.cohesion_score, 100.0);
        assert!(result.issues.is_empty());
        assert_eq!(result.band_scores.len(), 7);
        assert!(result.band_scores.values().all(|&s| s == 100.0));
    }

    #[test]
    fn test_excess_band_severity_and_category() {
        let analysis = analysis_with(FrequencyBandEnergy::from_fn(|_| 5.0));
        // span 1.0: deviation 3.0 > 2 * span
        let profile = StyleProfile::new("p", "").with_band(Band::Bass, Range::new(0.0, 2.0));
        let result = evaluate(&analysis, &profile);

        assert_eq!(result.band_scores[&Band::Bass], 0.0);
        assert_eq!(result.cohesion_score, 0.0);
        assert_eq!(result.issues.len(), 1);
        let issue = &result.issues[0];
        assert_eq!(issue.category, "mud");
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.band, Some(Band::Bass));
        assert!(issue.message.contains("exceeds"));
    }

    #[test]
    fn test_thin_band_partial_score() {
        let analysis = analysis_with(FrequencyBandEnergy::from_fn(|_| 5.0));
        // span 2.0, deviation 1.0: score 75, severity low
        let profile = StyleProfile::new("p", "").with_band(Band::Mid, Range::new(6.0, 10.0));
        let result = evaluate(&analysis, &profile);

        assert_eq!(result.band_scores[&Band::Mid], 75.0);
        assert_eq!(result.cohesion_score, 75.0);
        assert_eq!(result.issues[0].category, "thin_mid");
        assert_eq!(result.issues[0].severity, Severity::Low);
    }

    #[test]
    fn test_degenerate_band_target_uses_unit_span() {
        let analysis = analysis_with(FrequencyBandEnergy::from_fn(|_| 5.0));
        let profile = StyleProfile::new("p", "").with_band(Band::Mid, Range::new(4.5, 4.5));
        let result = evaluate(&analysis, &profile);
        assert_eq!(result.band_scores[&Band::Mid], 75.0);
    }

    #[test]
    fn test_scalar_targets() {
        let analysis = analysis_with(FrequencyBandEnergy::default());
        let mut profile = StyleProfile::new("p", "");
        profile.dynamic_range_db = Some(Range::new(24.0, 30.0));
        profile.brightness = Some(Range::new(500.0, 1500.0));
        profile.stereo_width = Some(Range::new(0.0, 0.1));
        let result = evaluate(&analysis, &profile);

        let categories: Vec<&str> = result.issues.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, vec!["over_compressed", "harshness", "too_wide"]);
        assert_eq!(result.issues[1].band, Some(Band::UpperMid));
        assert!(result.cohesion_score < 100.0);
    }

    #[test]
    fn test_band_medium_severity() {
        let analysis = analysis_with(FrequencyBandEnergy {
            mid: 3.5,
            ..FrequencyBandEnergy::default()
        });
        // span 1.0, deviation 1.5: between one and two spans
        let profile = StyleProfile::new("p", "").with_band(Band::Mid, Range::new(0.0, 2.0));
        let result = evaluate(&analysis, &profile);

        assert_eq!(result.band_scores[&Band::Mid], 25.0);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].category, "masking");
        assert_eq!(result.issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_scalar_targets_low_side() {
        let mut analysis = analysis_with(FrequencyBandEnergy {
            mid: 3.5,
            ..FrequencyBandEnergy::default()
        });
        analysis.loudness.dynamic_range_db = 40.0;
        analysis.spectral.centroid_mean = 100.0;
        analysis.stereo.width = 0.0;

        let mut profile = StyleProfile::new("p", "").with_band(Band::Mid, Range::new(0.0, 2.0));
        profile.dynamic_range_db = Some(Range::new(0.0, 10.0));
        profile.brightness = Some(Range::new(1000.0, 2000.0));
        profile.stereo_width = Some(Range::new(0.2, 0.4));
        let result = evaluate(&analysis, &profile);

        let found: Vec<(&str, Severity)> = result
            .issues
            .iter()
            .map(|i| (i.category.as_str(), i.severity))
            .collect();
        assert_eq!(
            found,
            vec![
                ("masking", Severity::Medium),
                ("under_compressed", Severity::Low),
                ("dullness", Severity::Medium),
                ("too_narrow", Severity::Low),
            ]
        );
        assert_eq!(result.issues[2].band, Some(Band::Presence));
        // components 25, 0, 10, 0
        assert_eq!(result.cohesion_score, 8.8);
    }

    #[test]
    fn test_degenerate_width_target_uses_narrow_span() {
        let analysis = analysis_with(FrequencyBandEnergy::default());
        let mut profile = StyleProfile::new("p", "");
        profile.stereo_width = Some(Range::new(0.15, 0.15));
        // deviation 0.05 over span 0.1: 75
        let result = evaluate(&analysis, &profile);
        assert_eq!(result.cohesion_score, 75.0);
        assert_eq!(result.issues[0].category, "too_wide");
    }

    #[test]
    fn test_rms_target_is_not_scored() {
        let analysis = analysis_with(FrequencyBandEnergy::default());
        let mut profile = StyleProfile::new("p", "");
        profile.rms_mean = Some(Range::new(10.0, 20.0));
        let result = evaluate(&analysis, &profile);
        assert_eq!(result.cohesion_score, 100.0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(66.666, 1), 66.7);
        assert_eq!(round_to(0.1234567, 6), 0.123457);
    }
}
