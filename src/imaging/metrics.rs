//! Perceptual metrics: sharpness, brightness balance, contrast, saturation.
//!
//! Computed once on the original image and once on the processed image; the
//! deltas feed the [summary generator](crate::explain).
//!
//! | Metric | Definition |
//! |---|---|
//! | `sharpness` | variance of the 3×3 Laplacian over the luma plane |
//! | `brightness_balance` | std of the 256-bin luma histogram ÷ mean bin count |
//! | `contrast` | std of luma values |
//! | `saturation` | mean HSV saturation (0–255) |
//!
//! All reductions run sequentially in f64, so repeated calls on the same
//! image return bit-identical values.

use super::calculations::{mean_and_std, reflect_101};
use super::color_model::ColorModel;
use super::rust_model::RustColorModel;
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

/// Perceptual statistics of one image state. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub sharpness: f64,
    pub brightness_balance: f64,
    pub contrast: f64,
    pub saturation: f64,
}

/// Metrics plus the mean luma, which only the auto-enhance heuristic reads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    pub metrics: Metrics,
    pub mean_brightness: f64,
}

/// Compute [`Metrics`] with the default [`RustColorModel`].
pub fn compute_metrics(image: &RgbImage) -> Metrics {
    measure(&RustColorModel, image).metrics
}

/// Compute metrics and mean luma through the given color model.
///
/// Total: an image without pixels measures as all zeros.
pub fn measure(model: &impl ColorModel, image: &RgbImage) -> Measurement {
    if image.width() == 0 || image.height() == 0 {
        return Measurement::default();
    }

    let gray = model.to_grayscale(image);
    let (mean_brightness, contrast) = mean_and_std(gray.as_raw().iter().map(|&v| v as f64));

    let hsv = model.to_hsv(image);
    let (saturation, _) = mean_and_std(hsv.pixels().iter().map(|p| p.s as f64));

    let metrics = Metrics {
        sharpness: laplacian_variance(&gray),
        brightness_balance: histogram_balance(&gray),
        contrast,
        saturation,
    };
    tracing::debug!(
        sharpness = metrics.sharpness,
        brightness_balance = metrics.brightness_balance,
        contrast = metrics.contrast,
        saturation = metrics.saturation,
        mean_brightness,
        "measured image"
    );

    Measurement {
        metrics,
        mean_brightness,
    }
}

/// Variance of the 4-neighbour Laplacian `[0,1,0; 1,-4,1; 0,1,0]`.
///
/// Every pixel contributes; borders are reflected (reflect-101) so a flat
/// image scores exactly zero.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let data = gray.as_raw();
    let at = |x: i64, y: i64| -> f64 {
        data[reflect_101(y, h) * w + reflect_101(x, w)] as f64
    };

    let responses = (0..h as i64).flat_map(|y| {
        (0..w as i64).map(move |x| {
            at(x, y - 1) + at(x, y + 1) + at(x - 1, y) + at(x + 1, y) - 4.0 * at(x, y)
        })
    });
    let (_, std) = mean_and_std(responses);
    std * std
}

/// Population std of the 256-bin luma histogram divided by the mean bin
/// count. A perfectly flat histogram scores 0.
pub fn histogram_balance(gray: &GrayImage) -> f64 {
    let mut bins = [0u64; 256];
    for &v in gray.as_raw() {
        bins[v as usize] += 1;
    }
    let (mean, std) = mean_and_std(bins.iter().map(|&c| c as f64));
    if mean == 0.0 { 0.0 } else { std / mean }
}
