//! Auto-enhance heuristic: derive adjustments from the original image's own
//! statistics.
//!
//! Each rule is gated on the *original* measurement, never on the requested
//! values, and the rules touch disjoint fields so they cannot conflict.

use super::metrics::Measurement;
use super::params::Adjustments;

/// Mean luma below this counts as underexposed.
pub const DARK_THRESHOLD: f64 = 80.0;
/// Mean luma above this counts as overexposed.
pub const BRIGHT_THRESHOLD: f64 = 180.0;
/// Brightness nudge applied to under/overexposed images.
pub const BRIGHTNESS_STEP: f64 = 0.2;
/// Luma std below this counts as flat.
pub const LOW_CONTRAST_THRESHOLD: f64 = 30.0;
pub const MIN_AUTO_CONTRAST: f64 = 1.2;
/// Mean HSV saturation below this counts as muted.
pub const LOW_SATURATION_THRESHOLD: f64 = 100.0;
pub const MIN_AUTO_SATURATION: f64 = 1.1;

/// Effective adjustments for an image.
///
/// Returns `requested` unchanged unless `requested.auto_enhance` is set.
pub fn derive_adjustments(original: &Measurement, requested: &Adjustments) -> Adjustments {
    let mut effective = requested.clone();
    if !requested.auto_enhance {
        return effective;
    }

    if original.mean_brightness < DARK_THRESHOLD {
        effective.brightness += BRIGHTNESS_STEP;
    } else if original.mean_brightness > BRIGHT_THRESHOLD {
        effective.brightness -= BRIGHTNESS_STEP;
    }

    if original.metrics.contrast < LOW_CONTRAST_THRESHOLD {
        effective.contrast = requested.contrast.max(MIN_AUTO_CONTRAST);
    }

    if original.metrics.saturation < LOW_SATURATION_THRESHOLD {
        effective.saturation = requested.saturation.max(MIN_AUTO_SATURATION);
    }

    tracing::debug!(
        mean_brightness = original.mean_brightness,
        brightness = effective.brightness,
        contrast = effective.contrast,
        saturation = effective.saturation,
        "auto-enhance derived adjustments"
    );
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::metrics::Metrics;

    fn measurement(mean_brightness: f64, contrast: f64, saturation: f64) -> Measurement {
        Measurement {
            metrics: Metrics {
                sharpness: 0.0,
                brightness_balance: 0.0,
                contrast,
                saturation,
            },
            mean_brightness,
        }
    }

    fn auto() -> Adjustments {
        Adjustments {
            auto_enhance: true,
            ..Adjustments::default()
        }
    }

    #[test]
    fn disabled_returns_request_unchanged() {
        let requested = Adjustments {
            brightness: 0.3,
            ..Adjustments::default()
        };
        let effective = derive_adjustments(&measurement(0.0, 0.0, 0.0), &requested);
        assert_eq!(effective, requested);
    }

    #[test]
    fn dark_image_gains_brightness() {
        for requested_brightness in [-0.5, 0.0, 0.4] {
            let requested = Adjustments {
                brightness: requested_brightness,
                ..auto()
            };
            let effective = derive_adjustments(&measurement(40.0, 50.0, 150.0), &requested);
            assert_eq!(effective.brightness, requested_brightness + BRIGHTNESS_STEP);
        }
    }

    #[test]
    fn bright_image_loses_brightness() {
        let effective = derive_adjustments(&measurement(200.0, 50.0, 150.0), &auto());
        assert_eq!(effective.brightness, -BRIGHTNESS_STEP);
    }

    #[test]
    fn mid_brightness_untouched() {
        for mean in [80.0, 128.0, 180.0] {
            let effective = derive_adjustments(&measurement(mean, 50.0, 150.0), &auto());
            assert_eq!(effective.brightness, 0.0, "mean {mean}");
        }
    }

    #[test]
    fn flat_image_gets_contrast_floor() {
        let effective = derive_adjustments(&measurement(128.0, 10.0, 150.0), &auto());
        assert_eq!(effective.contrast, MIN_AUTO_CONTRAST);

        let requested = Adjustments {
            contrast: 1.5,
            ..auto()
        };
        let effective = derive_adjustments(&measurement(128.0, 10.0, 150.0), &requested);
        assert_eq!(effective.contrast, 1.5);
    }

    #[test]
    fn muted_image_gets_saturation_floor() {
        let effective = derive_adjustments(&measurement(128.0, 50.0, 20.0), &auto());
        assert_eq!(effective.saturation, MIN_AUTO_SATURATION);
        assert_eq!(effective.contrast, 1.0);
    }

    #[test]
    fn other_fields_pass_through() {
        let requested = Adjustments {
            hue: 30.0,
            exposure: -1.0,
            ..auto()
        };
        let effective = derive_adjustments(&measurement(10.0, 5.0, 5.0), &requested);
        assert_eq!(effective.hue, 30.0);
        assert_eq!(effective.exposure, -1.0);
        assert!(effective.auto_enhance);
    }
}
