//! Human-readable explanation of what the pipeline did.
//!
//! A [`Summary`] is an ordered list of clauses built from the metric deltas
//! between the original and processed image, the effective adjustments, and
//! the accessibility filter. It is never empty.
//!
//! | Order | Trigger | Clause |
//! |---|---|---|
//! | 1 | \|Δ sharpness\| > 50 | enhanced / softened sharpness |
//! | 2 | \|Δ contrast\| > 10 | increased / reduced contrast |
//! | 3 | \|Δ saturation\| > 20 | boosted / desaturated colors |
//! | 4 | brightness ≠ 0 | brightened / darkened by N levels |
//! | 5 | hue ≠ 0 | shifted hue by N degrees |
//! | 6 | exposure ≠ 0 | increased / decreased exposure by N stops |
//! | 7 | none of the above | subtle-enhancements fallback |
//! | 8 | filter requested | accessibility filter name |

use crate::imaging::{AccessibilityFilter, Adjustments, Metrics};
use std::fmt;

pub const SHARPNESS_THRESHOLD: f64 = 50.0;
pub const CONTRAST_THRESHOLD: f64 = 10.0;
pub const SATURATION_THRESHOLD: f64 = 20.0;

const FALLBACK: &str = "Applied subtle enhancements to improve overall image quality";

/// Ordered explanation clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    clauses: Vec<String>,
}

impl Summary {
    /// Separator used when the summary is rendered as one line.
    pub const SEPARATOR: &'static str = " • ";

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(Self::SEPARATOR))
    }
}

/// Build the summary. Pure and deterministic.
///
/// `effective` is the adjustment set after auto-enhance, so auto-derived
/// brightness shows up in the brightness clause.
pub fn explain(
    original: &Metrics,
    processed: &Metrics,
    effective: &Adjustments,
    filter: &AccessibilityFilter,
) -> Summary {
    let mut clauses = Vec::new();

    let sharpness = processed.sharpness - original.sharpness;
    if sharpness.abs() > SHARPNESS_THRESHOLD {
        clauses.push(if sharpness > 0.0 {
            "Enhanced image sharpness for clearer details".to_string()
        } else {
            "Softened image sharpness for smoother appearance".to_string()
        });
    }

    let contrast = processed.contrast - original.contrast;
    if contrast.abs() > CONTRAST_THRESHOLD {
        clauses.push(if contrast > 0.0 {
            "Increased contrast to make features more distinct".to_string()
        } else {
            "Reduced contrast for a more balanced look".to_string()
        });
    }

    let saturation = processed.saturation - original.saturation;
    if saturation.abs() > SATURATION_THRESHOLD {
        clauses.push(if saturation > 0.0 {
            "Boosted color saturation for more vibrant colors".to_string()
        } else {
            "Desaturated colors for a more muted, elegant tone".to_string()
        });
    }

    let brightness = effective.brightness;
    if brightness != 0.0 {
        clauses.push(if brightness > 0.0 {
            format!("Brightened the image by {brightness:.1} levels")
        } else {
            format!("Darkened the image by {:.1} levels", brightness.abs())
        });
    }

    if effective.hue != 0.0 {
        clauses.push(format!("Shifted color hue by {:.0} degrees", effective.hue));
    }

    let exposure = effective.exposure;
    if exposure != 0.0 {
        clauses.push(if exposure > 0.0 {
            format!("Increased exposure by {exposure:.1} stops")
        } else {
            format!("Decreased exposure by {:.1} stops", exposure.abs())
        });
    }

    if clauses.is_empty() {
        clauses.push(FALLBACK.to_string());
    }

    if filter.is_requested() {
        clauses.push(format!(
            "Applied {} accessibility filter",
            filter.display_name()
        ));
    }

    Summary { clauses }
}
