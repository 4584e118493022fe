//! Fixed frequency bands used for band-energy measurement and style targets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven fixed, non-overlapping analysis bands
///
/// Ordering follows frequency (sub-bass first), which is also the order
/// bands appear in serialized maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// 20-60 Hz
    SubBass,
    /// 60-250 Hz
    Bass,
    /// 250-500 Hz
    LowMid,
    /// 500-2000 Hz
    Mid,
    /// 2000-4000 Hz
    UpperMid,
    /// 4000-6000 Hz
    Presence,
    /// 6000-20000 Hz
    Brilliance,
}

impl Band {
    /// All bands, lowest first
    pub const ALL: [Band; 7] = [
        Band::SubBass,
        Band::Bass,
        Band::LowMid,
        Band::Mid,
        Band::UpperMid,
        Band::Presence,
        Band::Brilliance,
    ];

    /// Snake-case name used in profiles and JSON output
    pub fn name(self) -> &'static str {
        match self {
            Band::SubBass => "sub_bass",
            Band::Bass => "bass",
            Band::LowMid => "low_mid",
            Band::Mid => "mid",
            Band::UpperMid => "upper_mid",
            Band::Presence => "presence",
            Band::Brilliance => "brilliance",
        }
    }

    /// Half-open frequency interval `[low, high)` in Hz
    pub fn frequency_range(self) -> (f64, f64) {
        match self {
            Band::SubBass => (20.0, 60.0),
            Band::Bass => (60.0, 250.0),
            Band::LowMid => (250.0, 500.0),
            Band::Mid => (500.0, 2000.0),
            Band::UpperMid => (2000.0, 4000.0),
            Band::Presence => (4000.0, 6000.0),
            Band::Brilliance => (6000.0, 20000.0),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Band::ALL
            .into_iter()
            .find(|band| band.name() == s)
            .ok_or_else(|| format!("unknown frequency band: {}", s))
    }
}
