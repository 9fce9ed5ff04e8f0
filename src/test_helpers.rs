//! Shared test utilities for the photo-equalizer test suite.
//!
//! Provides synthetic image builders and small assertion helpers used by the
//! metrics, tonal, filter, and end-to-end tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let image = gradient_image(200, 200);
//! let gray = solid_image(200, 200, [128, 128, 128]);
//! assert_same_pixels(&gray, &gray.clone());
//! ```

use image::{Rgb, RgbImage};

// =========================================================================
// Image builders
// =========================================================================

/// Every pixel set to `rgb`.
pub fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}

/// Red ramps along x, green along y, blue is the midpoint of the two.
///
/// Mirrors the gradient the service's integration script uploads.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    let scale = |v: u32, n: u32| -> u8 {
        if n <= 1 {
            0
        } else {
            (v * 255 / (n - 1)) as u8
        }
    };
    RgbImage::from_fn(width, height, |x, y| {
        let r = scale(x, width);
        let g = scale(y, height);
        Rgb([r, g, ((r as u16 + g as u16) / 2) as u8])
    })
}

/// Black/white checkerboard with square cells of `cell` pixels.
pub fn checkerboard_image(width: u32, height: u32, cell: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

/// Low-contrast, muted image: values stay within a narrow band.
pub fn flat_muted_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let base = 110 + ((x + y) % 8) as u8;
        Rgb([base, base + 4, base + 2])
    })
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert two images are byte-identical, reporting the first mismatch.
pub fn assert_same_pixels(actual: &RgbImage, expected: &RgbImage) {
    assert_eq!(
        actual.dimensions(),
        expected.dimensions(),
        "image dimensions differ"
    );
    if let Some((i, (a, e))) = actual
        .as_raw()
        .iter()
        .zip(expected.as_raw())
        .enumerate()
        .find(|(_, (a, e))| a != e)
    {
        let pixel = i / 3;
        let (x, y) = (pixel as u32 % actual.width(), pixel as u32 / actual.width());
        panic!("pixel ({x}, {y}) channel {} differs: {a} != {e}", i % 3);
    }
}
