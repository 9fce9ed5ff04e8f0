//! Pure Rust color model: no native imaging libraries.
//!
//! ## Conventions
//!
//! | Conversion | Formula |
//! |---|---|
//! | Grayscale | BT.601 luma `0.299 R + 0.587 G + 0.114 B`, rounded |
//! | HSV | hue in half-degrees (0–180), S = (max − min) / max · 255, V = max |
//! | LAB | sRGB → linear → XYZ (D65) → CIELAB; L stretched to 0–255, a/b + 128 |
//!
//! Conversions run per pixel over rayon. Each pixel is independent, so the
//! output is identical regardless of thread count.

use super::calculations::luma;
use super::color_model::{ColorModel, Hsv, HsvImage, Lab, LabImage, PixelGrid};
use image::{GrayImage, RgbImage};
use rayon::prelude::*;

/// D65 reference white, X and Z components (Y = 1).
const WHITE_X: f32 = 0.950456;
const WHITE_Z: f32 = 1.088754;

/// CIE ε: below this the LAB transfer function is linear.
const LAB_EPSILON: f32 = 0.008856;
/// CIE κ.
const LAB_KAPPA: f32 = 903.3;

/// Pure Rust color model with 8-bit conventions.
///
/// See the [module docs](self) for the formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustColorModel;

impl RustColorModel {
    pub fn new() -> Self {
        Self
    }
}

impl ColorModel for RustColorModel {
    fn to_grayscale(&self, image: &RgbImage) -> GrayImage {
        let mut gray = GrayImage::new(image.width(), image.height());
        let out: &mut [u8] = &mut gray;
        out.par_iter_mut()
            .zip(image.as_raw().par_chunks_exact(3))
            .for_each(|(y, px)| *y = luma(px[0], px[1], px[2]));
        gray
    }

    fn to_hsv(&self, image: &RgbImage) -> HsvImage {
        let pixels: Vec<Hsv> = image
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| rgb_to_hsv(px[0], px[1], px[2]))
            .collect();
        PixelGrid::from_raw_parts(image.width(), image.height(), pixels)
    }

    fn from_hsv(&self, image: &HsvImage) -> RgbImage {
        let mut rgb = RgbImage::new(image.width(), image.height());
        let out: &mut [u8] = &mut rgb;
        out.par_chunks_exact_mut(3)
            .zip(image.pixels().par_iter())
            .for_each(|(dst, &hsv)| dst.copy_from_slice(&hsv_to_rgb(hsv)));
        rgb
    }

    fn to_lab(&self, image: &RgbImage) -> LabImage {
        let pixels: Vec<Lab> = image
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| rgb_to_lab(px[0], px[1], px[2]))
            .collect();
        PixelGrid::from_raw_parts(image.width(), image.height(), pixels)
    }

    fn from_lab(&self, image: &LabImage) -> RgbImage {
        let mut rgb = RgbImage::new(image.width(), image.height());
        let out: &mut [u8] = &mut rgb;
        out.par_chunks_exact_mut(3)
            .zip(image.pixels().par_iter())
            .for_each(|(dst, &lab)| dst.copy_from_slice(&lab_to_rgb(lab)));
        rgb
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// =============================================================================
// HSV
// =============================================================================

fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    let s = if v == 0 {
        0
    } else {
        to_u8(diff * 255.0 / v as f32)
    };

    let h = if diff == 0.0 {
        0
    } else {
        let raw = if v == r {
            (gf - bf) * 30.0 / diff
        } else if v == g {
            60.0 + (bf - rf) * 30.0 / diff
        } else {
            120.0 + (rf - gf) * 30.0 / diff
        };
        let mut h = (raw + 0.5).floor() as i32;
        if h < 0 {
            h += 180;
        }
        h.clamp(0, 179) as u8
    };

    Hsv { h, s, v }
}

fn hsv_to_rgb(hsv: Hsv) -> [u8; 3] {
    let s = hsv.s as f32 / 255.0;
    let v = hsv.v as f32 / 255.0;
    if s == 0.0 {
        let c = to_u8(v * 255.0);
        return [c, c, c];
    }

    let h = hsv.h as f32 * (6.0 / 180.0);
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_u8(r * 255.0), to_u8(g * 255.0), to_u8(b * 255.0)]
}

// =============================================================================
// LAB
// =============================================================================

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_f_inv(f: f32) -> f32 {
    let cube = f * f * f;
    if cube > LAB_EPSILON {
        cube
    } else {
        (f - 16.0 / 116.0) / 7.787
    }
}

fn rgb_to_lab(r: u8, g: u8, b: u8) -> Lab {
    let r = srgb_to_linear(r as f32 / 255.0);
    let g = srgb_to_linear(g as f32 / 255.0);
    let b = srgb_to_linear(b as f32 / 255.0);

    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / WHITE_X;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / WHITE_Z;

    let l = if y > LAB_EPSILON {
        116.0 * y.cbrt() - 16.0
    } else {
        LAB_KAPPA * y
    };
    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    let a = 500.0 * (fx - fy);
    let bb = 200.0 * (fy - fz);

    Lab {
        l: to_u8(l * 255.0 / 100.0),
        a: to_u8(a + 128.0),
        b: to_u8(bb + 128.0),
    }
}

fn lab_to_rgb(lab: Lab) -> [u8; 3] {
    let l = lab.l as f32 * 100.0 / 255.0;
    let a = lab.a as f32 - 128.0;
    let b = lab.b as f32 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let y = if l > LAB_KAPPA * LAB_EPSILON {
        fy * fy * fy
    } else {
        l / LAB_KAPPA
    };
    let x = lab_f_inv(fy + a / 500.0) * WHITE_X;
    let z = lab_f_inv(fy - b / 200.0) * WHITE_Z;

    let r = 3.240479 * x - 1.537150 * y - 0.498535 * z;
    let g = -0.969256 * x + 1.875991 * y + 0.041556 * z;
    let bl = 0.055648 * x - 0.204043 * y + 1.057311 * z;

    let encode = |c: f32| to_u8(linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0);
    [encode(r), encode(g), encode(bl)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_image, solid_image};

    // =========================================================================
    // HSV
    // =========================================================================

    #[test]
    fn hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv { h: 0, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv { h: 60, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv { h: 120, s: 255, v: 255 });
    }

    #[test]
    fn hsv_gray_has_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv(128, 128, 128), Hsv { h: 0, s: 0, v: 128 });
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv { h: 0, s: 0, v: 0 });
    }

    #[test]
    fn hsv_hue_stays_below_180() {
        // Magenta-ish reds sit just below the wrap point
        let hsv = rgb_to_hsv(255, 0, 10);
        assert!(hsv.h >= 170 && hsv.h < 180, "hue {}", hsv.h);
    }

    #[test]
    fn hsv_roundtrip_primaries_exact() {
        for rgb in [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0], [90, 90, 90]] {
            let hsv = rgb_to_hsv(rgb[0], rgb[1], rgb[2]);
            assert_eq!(hsv_to_rgb(hsv), rgb);
        }
    }

    #[test]
    fn hsv_roundtrip_is_close() {
        let image = gradient_image(64, 64);
        let model = RustColorModel::new();
        let back = model.from_hsv(&model.to_hsv(&image));
        for (a, b) in image.as_raw().iter().zip(back.as_raw()) {
            assert!((*a as i32 - *b as i32).abs() <= 6, "{a} vs {b}");
        }
    }

    // =========================================================================
    // LAB
    // =========================================================================

    #[test]
    fn lab_white_and_black() {
        let white = rgb_to_lab(255, 255, 255);
        assert_eq!(white.l, 255);
        assert!((white.a as i32 - 128).abs() <= 1);
        assert!((white.b as i32 - 128).abs() <= 1);

        let black = rgb_to_lab(0, 0, 0);
        assert_eq!(black, Lab { l: 0, a: 128, b: 128 });
    }

    #[test]
    fn lab_roundtrip_is_close() {
        let image = gradient_image(48, 48);
        let model = RustColorModel::new();
        let back = model.from_lab(&model.to_lab(&image));
        for (a, b) in image.as_raw().iter().zip(back.as_raw()) {
            assert!((*a as i32 - *b as i32).abs() <= 8, "{a} vs {b}");
        }
    }

    #[test]
    fn lab_gray_roundtrip_exact_enough() {
        let model = RustColorModel::new();
        for v in [0u8, 30, 128, 200, 255] {
            let image = solid_image(2, 2, [v, v, v]);
            let back = model.from_lab(&model.to_lab(&image));
            for c in back.as_raw() {
                assert!((*c as i32 - v as i32).abs() <= 1, "{v} -> {c}");
            }
        }
    }

    // =========================================================================
    // grayscale
    // =========================================================================

    #[test]
    fn grayscale_uses_luma_weights() {
        let model = RustColorModel::new();
        let gray = model.to_grayscale(&solid_image(3, 2, [255, 0, 0]));
        assert_eq!(gray.dimensions(), (3, 2));
        assert!(gray.as_raw().iter().all(|&y| y == 76));
    }

    #[test]
    fn conversions_preserve_dimensions() {
        let model = RustColorModel::new();
        let image = gradient_image(7, 5);
        let hsv = model.to_hsv(&image);
        assert_eq!((hsv.width(), hsv.height()), (7, 5));
        let lab = model.to_lab(&image);
        assert_eq!(lab.pixels().len(), 35);
        assert_eq!(model.from_lab(&lab).dimensions(), (7, 5));
    }
}
