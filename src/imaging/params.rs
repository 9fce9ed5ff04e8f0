//! Parameter types for the enhancement pipeline.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between callers (CLI, config file, library users) and the
//! pixel stages in [`tonal`](super::tonal) and
//! [`accessibility`](super::accessibility).
//!
//! ## Types
//!
//! - [`Adjustments`]: the full adjustment configuration, including the
//!   accessibility filter and the auto-enhance toggle.
//! - [`AccessibilityFilter`]: the optional post-transform filter. Unknown
//!   identifiers are kept verbatim and treated as a no-op.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Tonal adjustments requested for one image.
///
/// Defaults are the identity configuration: running the pipeline with
/// `Adjustments::default()` leaves the image untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Adjustments {
    /// Additive offset in normalized units (typically -1..1).
    pub brightness: f64,
    /// Multiplicative factor; 1.0 is identity. Also drives gamma correction.
    pub contrast: f64,
    /// Multiplicative factor on HSV saturation; 1.0 is identity.
    pub saturation: f64,
    /// Hue shift on the 0–180 half-circle scale.
    pub hue: f64,
    /// Exposure in stops (typically -3..3).
    pub exposure: f64,
    pub accessibility_filter: AccessibilityFilter,
    /// Derive brightness/contrast/saturation from the image's own metrics.
    pub auto_enhance: bool,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            hue: 0.0,
            exposure: 0.0,
            accessibility_filter: AccessibilityFilter::None,
            auto_enhance: false,
        }
    }
}

impl Adjustments {
    /// True when the HSV stage runs.
    ///
    /// A hue shift by a whole multiple of 180 is no shift.
    pub fn touches_color(&self) -> bool {
        self.saturation != 1.0 || (self.hue as f32).rem_euclid(180.0) != 0.0
    }
}

/// Post-transform accessibility filter.
///
/// Parsed from the identifiers used on the wire and in config files
/// (`high_contrast`, `colorblind_protanopia`, ...). Anything unrecognized
/// becomes [`AccessibilityFilter::Unrecognized`] and is applied as a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccessibilityFilter {
    #[default]
    None,
    HighContrast,
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Unrecognized(String),
}

impl AccessibilityFilter {
    /// Wire identifier, as accepted by [`FromStr`].
    pub fn id(&self) -> &str {
        match self {
            Self::None => "none",
            Self::HighContrast => "high_contrast",
            Self::Protanopia => "colorblind_protanopia",
            Self::Deuteranopia => "colorblind_deuteranopia",
            Self::Tritanopia => "colorblind_tritanopia",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable name for summaries; unknown kinds fall back to the raw
    /// identifier.
    pub fn display_name(&self) -> &str {
        match self {
            Self::None => "No",
            Self::HighContrast => "High Contrast",
            Self::Protanopia => "Protanopia Simulation",
            Self::Deuteranopia => "Deuteranopia Simulation",
            Self::Tritanopia => "Tritanopia Simulation",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Whether a filter was requested at all (including unknown ones).
    pub fn is_requested(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for AccessibilityFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "none" => Self::None,
            "high_contrast" => Self::HighContrast,
            "colorblind_protanopia" => Self::Protanopia,
            "colorblind_deuteranopia" => Self::Deuteranopia,
            "colorblind_tritanopia" => Self::Tritanopia,
            other => Self::Unrecognized(other.to_string()),
        })
    }
}

impl From<String> for AccessibilityFilter {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl From<AccessibilityFilter> for String {
    fn from(filter: AccessibilityFilter) -> Self {
        filter.id().to_string()
    }
}

impl fmt::Display for AccessibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
