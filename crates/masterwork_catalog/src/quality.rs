//! # Quality Tiers
//!
//! A high quality craft is written as the base name followed by the
//! quality marker (`"Wintergreen Tea +1"`). The marker is presentation
//! only: both tiers share one catalog entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix marking the high quality variant of a name.
pub const QUALITY_MARKER: &str = " +1";

/// Outcome tier of a craft.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// Any successful result counts.
    #[default]
    Normal,
    /// Only the bonus high quality (+1) result counts.
    High,
}

impl QualityTier {
    /// Both tiers, normal first.
    pub const ALL: [Self; 2] = [Self::Normal, Self::High];

    /// Maps a high-quality flag onto a tier.
    #[inline]
    #[must_use]
    pub const fn from_high_quality(high_quality: bool) -> Self {
        if high_quality {
            Self::High
        } else {
            Self::Normal
        }
    }

    /// Returns true for the high quality tier.
    #[inline]
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// Index for per-tier tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::High => 1,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::High => f.write_str("high quality"),
        }
    }
}

/// Splits a trailing quality marker off a name.
///
/// Returns the base name and the tier the marker implied.
#[must_use]
pub fn strip_quality_marker(name: &str) -> (&str, QualityTier) {
    match name.strip_suffix(QUALITY_MARKER) {
        Some(base) => (base, QualityTier::High),
        None => (name, QualityTier::Normal),
    }
}

/// Returns true if the name carries the quality marker.
#[inline]
#[must_use]
pub fn has_quality_marker(name: &str) -> bool {
    name.ends_with(QUALITY_MARKER)
}
