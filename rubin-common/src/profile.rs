//! Style profiles and target ranges
//!
//! A [`StyleProfile`] names the ranges a mix should fall into to sound like a
//! given style. Every target is optional: an absent target places no
//! constraint on its metric, which is different from a target of `[0, 0]`.
//!
//! On disk a profile is a JSON object:
//!
//! ```json
//! {
//!   "name": "ambient",
//!   "description": "Spacious, soft-edged textures",
//!   "frequency_balance": { "bass": { "low": 4.0, "high": 18.0 } },
//!   "dynamic_range_db": { "low": 6.0, "high": 20.0 }
//! }
//! ```

use crate::bands::Band;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// True iff `low <= value <= high`
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Distance from `value` to the interval, 0.0 inside
    pub fn deviation(&self, value: f64) -> f64 {
        if value < self.low {
            self.low - value
        } else if value > self.high {
            value - self.high
        } else {
            0.0
        }
    }

    /// Half the interval width, or `fallback` for a degenerate interval
    pub fn half_span_or(&self, fallback: f64) -> f64 {
        if self.high > self.low {
            (self.high - self.low) / 2.0
        } else {
            fallback
        }
    }
}

/// Named bundle of optional target ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub name: String,
    pub description: String,

    /// Band name → target energy range.
    ///
    /// Keyed by name rather than [`Band`] so profile files carrying band
    /// names this version does not know still load and round-trip.
    #[serde(default)]
    pub frequency_balance: BTreeMap<String, Range>,

    /// Target dynamic range (dB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_range_db: Option<Range>,

    /// Target spectral centroid (Hz)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<Range>,

    /// Target stereo width (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo_width: Option<Range>,

    /// Target RMS mean. Stored and round-tripped, not scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rms_mean: Option<Range>,
}

impl StyleProfile {
    /// Profile with no targets at all
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            frequency_balance: BTreeMap::new(),
            dynamic_range_db: None,
            brightness: None,
            stereo_width: None,
            rms_mean: None,
        }
    }

    /// Builder-style band target
    pub fn with_band(mut self, band: Band, range: Range) -> Self {
        self.frequency_balance.insert(band.name().to_string(), range);
        self
    }

    /// Target range for `band`, if the profile sets one
    pub fn band_target(&self, band: Band) -> Option<&Range> {
        self.frequency_balance.get(band.name())
    }

    /// Keys in `frequency_balance` that are not known band names
    pub fn unknown_bands(&self) -> Vec<&str> {
        self.frequency_balance
            .keys()
            .filter(|key| key.parse::<Band>().is_err())
            .map(String::as_str)
            .collect()
    }
}
