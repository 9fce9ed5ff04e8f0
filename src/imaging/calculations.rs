//! Pure scalar math shared by the metrics, tonal, and filter stages.
//!
//! All functions here are pure and testable without any images.

/// Number of hue steps on the 8-bit hue wheel (a half circle, 2° per step).
pub const HUE_RANGE: f32 = 180.0;

/// Luma weighting (ITU-R BT.601) of an 8-bit RGB triple, rounded to u8.
///
/// # Examples
/// ```
/// # use photo_equalizer::imaging::calculations::luma;
/// assert_eq!(luma(255, 255, 255), 255);
/// assert_eq!(luma(255, 0, 0), 76);
/// assert_eq!(luma(0, 0, 0), 0);
/// ```
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}

/// Hard clamp into the normalized [0, 1] range.
///
/// NaN passes through; the final `as u8` cast turns it into 0.
pub fn clamp_unit(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Exposure multiplier for a number of stops: `2^stops`.
pub fn exposure_gain(stops: f64) -> f32 {
    2f64.powf(stops) as f32
}

/// Gamma exponent paired with a contrast factor.
///
/// `1 / contrast` for positive contrast, identity otherwise so a zero or
/// negative factor never divides.
pub fn gamma_for_contrast(contrast: f64) -> f32 {
    if contrast > 0.0 {
        (1.0 / contrast) as f32
    } else {
        1.0
    }
}

/// Map a normalized value back to 8 bits (rounded, saturating).
pub fn denormalize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Shift an 8-bit hue by `delta` steps and wrap into `[0, 180)`.
///
/// Negative results wrap around rather than going negative; the result is
/// truncated back to an integer step.
///
/// # Examples
/// ```
/// # use photo_equalizer::imaging::calculations::shift_hue;
/// assert_eq!(shift_hue(170, 20.0), 10);
/// assert_eq!(shift_hue(5, -10.0), 175);
/// assert_eq!(shift_hue(42, 180.0), 42);
/// ```
pub fn shift_hue(h: u8, delta: f32) -> u8 {
    let shifted = (h as f32 + delta).rem_euclid(HUE_RANGE);
    // rem_euclid can round up to exactly the modulus for tiny negatives
    if shifted >= HUE_RANGE { 0 } else { shifted as u8 }
}

/// Scale an 8-bit saturation value, clamped to [0, 255] and truncated.
pub fn scale_saturation(s: u8, factor: f32) -> u8 {
    (s as f32 * factor).clamp(0.0, 255.0) as u8
}

/// Half of a channel value, computed in the normalized domain and truncated.
///
/// Used by the colorblindness simulations (`target = source * 0.5`).
pub fn half_channel(source: u8) -> u8 {
    let v = source as f32 / 255.0 * 0.5;
    (v * 255.0) as u8
}

/// Population mean and standard deviation of a sample.
///
/// Returns `(0.0, 0.0)` for an empty sample. Accumulates sequentially in f64
/// so the result does not depend on thread scheduling.
pub fn mean_and_std<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0u64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for v in values {
        count += 1;
        sum += v;
        sum_sq += v * v;
    }
    if count == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64 - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

/// Reflect-101 border handling: `-1 → 1`, `n → n - 2`.
///
/// Single-element axes always map to index 0.
pub fn reflect_101(i: i64, n: usize) -> usize {
    let n = n as i64;
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}
