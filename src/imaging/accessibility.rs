//! Accessibility filters, applied after all tonal math.
//!
//! - **High contrast**: CLAHE on the LAB lightness channel; chroma is kept.
//! - **Colorblind simulations**: single-pass channel substitution, one
//!   channel replaced by half of another. These are rough approximations,
//!   not colorimetric dichromacy models.
//!
//! `None` and unrecognized filters return the image untouched.

use super::calculations::half_channel;
use super::clahe::{ClaheParams, equalize};
use super::color_model::ColorModel;
use super::params::AccessibilityFilter;
use image::RgbImage;
use rayon::prelude::*;

const R: usize = 0;
const G: usize = 1;
const B: usize = 2;

/// Apply `filter` to `image`. Total over every filter value.
pub fn apply_filter(
    model: &impl ColorModel,
    image: RgbImage,
    filter: &AccessibilityFilter,
) -> RgbImage {
    match filter {
        AccessibilityFilter::None => image,
        AccessibilityFilter::HighContrast => high_contrast(model, &image, &ClaheParams::default()),
        AccessibilityFilter::Protanopia => substitute_channel(image, R, G),
        AccessibilityFilter::Deuteranopia => substitute_channel(image, G, B),
        AccessibilityFilter::Tritanopia => substitute_channel(image, B, G),
        AccessibilityFilter::Unrecognized(raw) => {
            tracing::warn!(filter = %raw, "unknown accessibility filter, leaving image unchanged");
            image
        }
    }
}

/// Equalize LAB lightness with CLAHE and convert back.
pub fn high_contrast(model: &impl ColorModel, image: &RgbImage, params: &ClaheParams) -> RgbImage {
    tracing::debug!(
        clip_limit = params.clip_limit,
        tiles = ?params.tiles,
        "applying high-contrast filter"
    );

    let mut lab = model.to_lab(image);
    let lightness = lab.plane(|p| p.l);
    let equalized = equalize(&lightness, params);
    lab.pixels_mut()
        .par_iter_mut()
        .zip(equalized.as_raw().par_iter())
        .for_each(|(px, &l)| px.l = l);
    model.from_lab(&lab)
}

/// Replace channel `target` with half of channel `source` in every pixel.
fn substitute_channel(mut image: RgbImage, target: usize, source: usize) -> RgbImage {
    tracing::debug!(target, source, "applying colorblind simulation");

    let buf: &mut [u8] = &mut image;
    buf.par_chunks_exact_mut(3)
        .for_each(|px| px[target] = half_channel(px[source]));
    image
}
