//! Fixed lookup tables for issue categories and remedial advice
//!
//! Every table is a constant slice searched by key, with an explicit
//! fallback for keys it does not list.

use rubin_common::{Band, Role};

/// Issue category for energy above a band's target
const EXCESS_CATEGORY: &[(Band, &str)] = &[
    (Band::SubBass, "rumble"),
    (Band::Bass, "mud"),
    (Band::LowMid, "mud"),
    (Band::Mid, "masking"),
    (Band::UpperMid, "harshness"),
    (Band::Presence, "harshness"),
    (Band::Brilliance, "sibilance"),
];
const EXCESS_FALLBACK: &str = "excess";

const REDUCTION: &[(Band, &str)] = &[
    (Band::SubBass, "Apply a high-pass filter around 30-40 Hz to tame sub-bass rumble."),
    (Band::Bass, "Cut 2-3 dB in the 100-250 Hz range to reduce muddiness."),
    (Band::LowMid, "Dip the 250-500 Hz region to clear boxy buildup."),
    (Band::Mid, "Scoop 1-2 dB around 500-2000 Hz to reduce masking between elements."),
    (Band::UpperMid, "Attenuate 2-4 kHz to reduce harshness and listening fatigue."),
    (Band::Presence, "Tame 4-6 kHz with a gentle cut to soften presence-range aggression."),
    (Band::Brilliance, "Roll off above 10 kHz or de-ess vocals to control sibilance."),
];

const BOOST: &[(Band, &str)] = &[
    (Band::SubBass, "Boost sub-bass with a low shelf or saturator below 60 Hz."),
    (Band::Bass, "Add warmth with a gentle boost around 80-150 Hz."),
    (Band::LowMid, "A small lift around 300-400 Hz can add body to thin mixes."),
    (Band::Mid, "Boost midrange presence to help vocals and leads cut through."),
    (Band::UpperMid, "A lift around 2-4 kHz adds clarity and articulation."),
    (Band::Presence, "Boost 4-6 kHz for more definition and attack."),
    (Band::Brilliance, "Add a high shelf boost above 8 kHz for air and sparkle."),
];

/// Bands a role is expected to occupy and bands it should stay out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAffinity {
    pub primary: &'static [Band],
    pub avoid: &'static [Band],
}

const ROLE_AFFINITY: &[(&str, RoleAffinity)] = &[
    (
        "bass",
        RoleAffinity {
            primary: &[Band::SubBass, Band::Bass],
            avoid: &[Band::UpperMid, Band::Presence, Band::Brilliance],
        },
    ),
    (
        "lead",
        RoleAffinity {
            primary: &[Band::Mid, Band::UpperMid, Band::Presence],
            avoid: &[Band::SubBass],
        },
    ),
    (
        "pad",
        RoleAffinity {
            primary: &[Band::LowMid, Band::Mid],
            avoid: &[],
        },
    ),
    (
        "percussion",
        RoleAffinity {
            primary: &[Band::Presence, Band::Brilliance, Band::UpperMid],
            avoid: &[Band::SubBass],
        },
    ),
    (
        "texture",
        RoleAffinity {
            primary: &[Band::Mid, Band::Presence, Band::Brilliance],
            avoid: &[],
        },
    ),
];
const AFFINITY_FALLBACK: RoleAffinity = RoleAffinity {
    primary: &[Band::Mid],
    avoid: &[],
};

/// Advice for a role spilling into a band it should avoid
const ROLE_CONFLICT: &[((&str, Band), &str)] = &[
    (
        ("bass", Band::UpperMid),
        "Low-pass the bass around 2 kHz so its harmonics stay out of the upper mids.",
    ),
    (
        ("bass", Band::Presence),
        "Cut the bass above 4 kHz; presence-range buzz competes with leads and vocals.",
    ),
    (
        ("bass", Band::Brilliance),
        "Roll off bass top end above 6 kHz to keep it from fighting cymbals and air.",
    ),
    (
        ("lead", Band::SubBass),
        "High-pass the lead around 100-150 Hz to leave the sub range to the bass.",
    ),
    (
        ("percussion", Band::SubBass),
        "High-pass percussion around 40-60 Hz unless this is the kick drum.",
    ),
];

fn lookup<K: PartialEq + Copy, V: Copy>(table: &[(K, V)], key: K) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn excess_category(band: Band) -> &'static str {
    lookup(EXCESS_CATEGORY, band).unwrap_or(EXCESS_FALLBACK)
}

pub fn reduction_suggestion(band: Band) -> String {
    lookup(REDUCTION, band)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Reduce energy in the {} band.", band))
}

pub fn boost_suggestion(band: Band) -> String {
    lookup(BOOST, band)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Boost energy in the {} band.", band))
}

/// Affinity for `role`; unrecognized roles are expected to sit in the mids
pub fn role_affinity(role: &Role) -> RoleAffinity {
    lookup(ROLE_AFFINITY, role.as_str()).unwrap_or(AFFINITY_FALLBACK)
}

pub fn role_conflict_suggestion(role: &Role, band: Band) -> String {
    ROLE_CONFLICT
        .iter()
        .find(|((r, b), _)| *r == role.as_str() && *b == band)
        .map(|(_, text)| text.to_string())
        .unwrap_or_else(|| format!("Reduce {} energy so the {} part keeps to its range.", band, role))
}
