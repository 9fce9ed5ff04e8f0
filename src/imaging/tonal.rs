//! Tonal adjustment pipeline.
//!
//! Stages run in a fixed order because every stage clamps and the next one
//! reads the clamped result:
//!
//! ```text
//! normalize → brightness → contrast → exposure → gamma → denormalize → saturation/hue
//! ```
//!
//! The float stages (brightness through gamma) act on each channel value
//! independently, so they are folded into a [`ToneCurve`] and applied through
//! a 256-entry lookup table. Saturation and hue go through the color model's
//! HSV conversion.
//!
//! Gamma correction is gated on `contrast != 1.0`, not on a toggle of its
//! own: a contrast change always brings its `1 / contrast` gamma with it.

use super::calculations::{
    clamp_unit, denormalize, exposure_gain, gamma_for_contrast, scale_saturation, shift_hue,
};
use super::color_model::ColorModel;
use super::params::Adjustments;
use image::RgbImage;
use rayon::prelude::*;

/// The float stages of the pipeline for one set of adjustments.
///
/// Disabled stages are `None`; applying the curve with every stage disabled
/// is exactly the identity on 8-bit values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    brightness: Option<f32>,
    contrast: Option<f32>,
    exposure_gain: Option<f32>,
    gamma: Option<f32>,
}

impl ToneCurve {
    pub fn new(adjustments: &Adjustments) -> Self {
        let contrast_active = adjustments.contrast != 1.0;
        Self {
            brightness: (adjustments.brightness != 0.0).then_some(adjustments.brightness as f32),
            contrast: contrast_active.then_some(adjustments.contrast as f32),
            exposure_gain: (adjustments.exposure != 0.0)
                .then(|| exposure_gain(adjustments.exposure)),
            gamma: contrast_active.then(|| gamma_for_contrast(adjustments.contrast)),
        }
    }

    /// True when no stage is active.
    pub fn is_identity(&self) -> bool {
        self.brightness.is_none()
            && self.contrast.is_none()
            && self.exposure_gain.is_none()
            && self.gamma.is_none()
    }

    /// Run the float stages on one normalized value.
    pub fn apply(&self, mut v: f32) -> f32 {
        if let Some(offset) = self.brightness {
            v = clamp_unit(v + offset);
        }
        if let Some(factor) = self.contrast {
            v = clamp_unit(v * factor);
        }
        if let Some(gain) = self.exposure_gain {
            v = clamp_unit(v * gain);
        }
        if let Some(gamma) = self.gamma {
            v = v.powf(gamma);
        }
        v
    }

    /// Lookup table from input level to output level.
    pub fn lut(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (level, out) in table.iter_mut().enumerate() {
            *out = denormalize(self.apply(level as f32 / 255.0));
        }
        table
    }
}

/// Apply the tonal pipeline (everything except the accessibility filter).
///
/// Total for any decoded image and any adjustment values: out-of-range
/// numbers are clamped or guarded, never rejected.
pub fn apply(model: &impl ColorModel, image: RgbImage, adjustments: &Adjustments) -> RgbImage {
    let image = apply_tone_curve(image, &ToneCurve::new(adjustments));
    if adjustments.touches_color() {
        apply_saturation_hue(model, &image, adjustments.saturation, adjustments.hue)
    } else {
        image
    }
}

/// Brightness, contrast, exposure, and gamma through a lookup table.
pub fn apply_tone_curve(mut image: RgbImage, curve: &ToneCurve) -> RgbImage {
    if curve.is_identity() {
        return image;
    }
    tracing::debug!(?curve, "applying tone curve");

    let lut = curve.lut();
    let buf: &mut [u8] = &mut image;
    buf.par_iter_mut().for_each(|v| *v = lut[*v as usize]);
    image
}

/// Scale saturation and rotate hue in HSV space.
pub fn apply_saturation_hue(
    model: &impl ColorModel,
    image: &RgbImage,
    saturation: f64,
    hue: f64,
) -> RgbImage {
    tracing::debug!(saturation, hue, "applying saturation/hue");

    let (saturation, hue) = (saturation as f32, hue as f32);
    let mut hsv = model.to_hsv(image);
    hsv.pixels_mut().par_iter_mut().for_each(|px| {
        px.s = scale_saturation(px.s, saturation);
        px.h = shift_hue(px.h, hue);
    });
    model.from_hsv(&hsv)
}
