//! Role classification and role/style fit for an isolated track

use super::evaluator::round_to;
use super::tables::{role_affinity, role_conflict_suggestion};
use rubin_common::analysis::AudioAnalysis;
use rubin_common::{AuditionResult, Band, Issue, Role, Severity, StyleProfile};
use std::collections::BTreeMap;
use tracing::debug;

/// Cumulative share of energy the dominant bands must reach
pub const DOMINANT_SHARE: f64 = 0.7;

/// Combined avoid-band share above which the fit score is penalized
pub const AVOID_PENALTY_THRESHOLD: f64 = 0.15;

/// Per-band share above which an avoid band is reported as a conflict
pub const CONFLICT_BAND_THRESHOLD: f64 = 0.10;

/// Multiple of a target's upper bound that counts as excessive for a style
const STYLE_EXCESS_FACTOR: f64 = 1.5;

/// Band energies as proportions of their total; all zero when silent
pub fn frequency_profile(analysis: &AudioAnalysis) -> BTreeMap<Band, f64> {
    let bands = &analysis.frequency_bands;
    let total = bands.total();
    bands
        .iter()
        .map(|(band, energy)| {
            let share = if total > 0.0 { energy / total } else { 0.0 };
            (band, share)
        })
        .collect()
}

/// Strongest bands until their cumulative share first reaches 70%
pub fn dominant_bands(profile: &BTreeMap<Band, f64>) -> Vec<Band> {
    let mut ranked: Vec<(Band, f64)> = profile
        .iter()
        .filter(|&(_, &share)| share > 0.0)
        .map(|(&band, &share)| (band, share))
        .collect();
    // stable: equal shares keep frequency order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut dominant = Vec::new();
    let mut cumulative = 0.0;
    for (band, share) in ranked {
        dominant.push(band);
        cumulative += share;
        if cumulative >= DOMINANT_SHARE {
            break;
        }
    }
    dominant
}

fn share(profile: &BTreeMap<Band, f64>, bands: &[Band]) -> f64 {
    bands.iter().map(|band| profile.get(band).copied().unwrap_or(0.0)).sum()
}

/// Inputs the role rules look at
pub struct RoleContext<'a> {
    pub analysis: &'a AudioAnalysis,
    pub profile: &'a BTreeMap<Band, f64>,
}

type RolePredicate = fn(&RoleContext<'_>) -> bool;

fn is_percussive(ctx: &RoleContext<'_>) -> bool {
    ctx.analysis.loudness.dynamic_range_db > 20.0
        && share(ctx.profile, &[Band::Presence, Band::Brilliance]) > 0.25
}

fn is_noisy(ctx: &RoleContext<'_>) -> bool {
    ctx.analysis.spectral.flatness_mean > 0.3
}

fn is_low_heavy(ctx: &RoleContext<'_>) -> bool {
    share(ctx.profile, &[Band::SubBass, Band::Bass]) > 0.5
}

fn is_even_and_wide(ctx: &RoleContext<'_>) -> bool {
    let max = ctx.profile.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = ctx.profile.values().copied().fold(f64::INFINITY, f64::min);
    max - min < 0.2 && ctx.analysis.stereo.width > 0.1
}

fn is_mid_focused(ctx: &RoleContext<'_>) -> bool {
    share(ctx.profile, &[Band::Mid, Band::UpperMid]) > 0.3
}

/// Ordered classification rules; the first matching predicate wins
pub const ROLE_RULES: &[(RolePredicate, Role)] = &[
    (is_percussive, Role::Percussion),
    (is_noisy, Role::Texture),
    (is_low_heavy, Role::Bass),
    (is_even_and_wide, Role::Pad),
    (is_mid_focused, Role::Lead),
];

/// Role when no rule matches
pub const DEFAULT_ROLE: Role = Role::Lead;

pub fn classify_role(analysis: &AudioAnalysis, profile: &BTreeMap<Band, f64>) -> Role {
    let ctx = RoleContext { analysis, profile };
    ROLE_RULES
        .iter()
        .find(|(matches, _)| matches(&ctx))
        .map(|(_, role)| role.clone())
        .unwrap_or(DEFAULT_ROLE)
}

/// Fit score for `role` plus any role-conflict issues
fn role_fit(role: &Role, profile: &BTreeMap<Band, f64>) -> (f64, Vec<Issue>) {
    let affinity = role_affinity(role);
    let mut components = vec![(share(profile, affinity.primary) * 200.0).min(100.0)];
    let mut issues = Vec::new();

    let avoid_sum = share(profile, affinity.avoid);
    if avoid_sum > AVOID_PENALTY_THRESHOLD {
        components.push((100.0 - (avoid_sum - AVOID_PENALTY_THRESHOLD) * 400.0).max(0.0));

        for &band in affinity.avoid {
            let band_share = profile.get(&band).copied().unwrap_or(0.0);
            if band_share > CONFLICT_BAND_THRESHOLD {
                issues.push(Issue::new(
                    "role_conflict",
                    Severity::Medium,
                    Some(band),
                    format!(
                        "{} track carries {:.0}% of its energy in {}, outside its usual range",
                        role,
                        band_share * 100.0,
                        band
                    ),
                    role_conflict_suggestion(role, band),
                ));
            }
        }
    }

    let fit = components.iter().sum::<f64>() / components.len() as f64;
    (fit, issues)
}

/// Dominant bands pushing well past the style's target for that band
fn style_issues(
    analysis: &AudioAnalysis,
    style: &StyleProfile,
    dominant: &[Band],
) -> Vec<Issue> {
    dominant
        .iter()
        .filter_map(|&band| {
            let target = style.band_target(band)?;
            let actual = analysis.frequency_bands.get(band);
            (actual > target.high * STYLE_EXCESS_FACTOR).then(|| {
                Issue::new(
                    "excess_for_style",
                    Severity::Low,
                    Some(band),
                    format!(
                        "{} energy ({:.4}) is well above the {} target of {:.4}",
                        band, actual, style.name, target.high
                    ),
                    format!(
                        "Pull this track's {} back so it sits inside the {} balance.",
                        band, style.name
                    ),
                )
            })
        })
        .collect()
}

/// Classify (or accept) a track's role and score how well it fits
///
/// An explicit `role` is used verbatim, including unrecognized names.
pub fn audition(analysis: &AudioAnalysis, style: &StyleProfile, role: Option<Role>) -> AuditionResult {
    let profile = frequency_profile(analysis);
    let dominant = dominant_bands(&profile);
    let role = role.unwrap_or_else(|| classify_role(analysis, &profile));

    let (fit, mut issues) = role_fit(&role, &profile);
    issues.extend(style_issues(analysis, style, &dominant));

    debug!(
        style = %style.name,
        role = %role,
        fit_score = fit,
        dominant = dominant.len(),
        "Auditioned track"
    );

    AuditionResult {
        style: style.name.clone(),
        role,
        fit_score: round_to(fit, 1),
        dominant_bands: dominant,
        frequency_profile: profile,
        issues,
    }
}
