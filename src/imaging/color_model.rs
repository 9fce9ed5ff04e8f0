//! Color model trait and the non-RGB image types it produces.
//!
//! The [`ColorModel`] trait defines the five conversions the pipeline needs:
//! grayscale, RGB ↔ HSV, and RGB ↔ LAB. The arithmetic stages only ever talk
//! to this trait, so they stay independent of how the conversions are done.
//!
//! The production implementation is
//! [`RustColorModel`](super::rust_model::RustColorModel), which reproduces
//! the classic 8-bit conventions (hue on a 0–180 scale, LAB lightness
//! stretched to 0–255, a/b offset by 128).

use image::{GrayImage, Luma, RgbImage};

/// One 8-bit HSV pixel. `h` is in `[0, 180)`, `s` and `v` in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// One 8-bit LAB pixel. `l` is lightness scaled to `[0, 255]`, `a` and `b`
/// are offset by 128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lab {
    pub l: u8,
    pub a: u8,
    pub b: u8,
}

/// Row-major planar image of non-RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid<P> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

pub type HsvImage = PixelGrid<Hsv>;
pub type LabImage = PixelGrid<Lab>;

impl<P> PixelGrid<P> {
    /// Wrap a pixel vector. Returns `None` when the length does not match
    /// `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<P>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap a pixel vector produced one-per-pixel from an image of the same
    /// dimensions.
    pub(crate) fn from_raw_parts(width: u32, height: u32, pixels: Vec<P>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    /// Extract one 8-bit channel as a grayscale plane of the same size.
    pub fn plane(&self, channel: impl Fn(&P) -> u8) -> GrayImage {
        let width = self.width as usize;
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([channel(&self.pixels[y as usize * width + x as usize])])
        })
    }
}

/// Trait for color model adapters.
///
/// Every implementation must provide all five conversions so the pipeline is
/// adapter-agnostic. Implementations must be pure: no shared buffers between
/// calls, so concurrent requests can share one adapter.
pub trait ColorModel: Sync {
    /// Single-channel luma plane.
    fn to_grayscale(&self, image: &RgbImage) -> GrayImage;

    /// RGB → 8-bit HSV.
    fn to_hsv(&self, image: &RgbImage) -> HsvImage;

    /// 8-bit HSV → RGB.
    fn from_hsv(&self, image: &HsvImage) -> RgbImage;

    /// RGB → 8-bit LAB.
    fn to_lab(&self, image: &RgbImage) -> LabImage;

    /// 8-bit LAB → RGB.
    fn from_lab(&self, image: &LabImage) -> RgbImage;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::RustColorModel;
    use std::sync::Mutex;

    /// Adapter that delegates to [`RustColorModel`] and records every call.
    /// Uses Mutex (not RefCell) so it is Sync like the trait requires.
    #[derive(Default)]
    pub struct RecordingModel {
        inner: RustColorModel,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RecordedOp {
        ToGrayscale,
        ToHsv,
        FromHsv,
        ToLab,
        FromLab,
    }

    impl RecordingModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    impl ColorModel for RecordingModel {
        fn to_grayscale(&self, image: &RgbImage) -> GrayImage {
            self.record(RecordedOp::ToGrayscale);
            self.inner.to_grayscale(image)
        }

        fn to_hsv(&self, image: &RgbImage) -> HsvImage {
            self.record(RecordedOp::ToHsv);
            self.inner.to_hsv(image)
        }

        fn from_hsv(&self, image: &HsvImage) -> RgbImage {
            self.record(RecordedOp::FromHsv);
            self.inner.from_hsv(image)
        }

        fn to_lab(&self, image: &RgbImage) -> LabImage {
            self.record(RecordedOp::ToLab);
            self.inner.to_lab(image)
        }

        fn from_lab(&self, image: &LabImage) -> RgbImage {
            self.record(RecordedOp::FromLab);
            self.inner.from_lab(image)
        }
    }

    #[test]
    fn pixel_grid_rejects_wrong_length() {
        assert!(PixelGrid::from_pixels(2, 2, vec![Hsv::default(); 3]).is_none());
        let grid = PixelGrid::from_pixels(2, 2, vec![Hsv::default(); 4]).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.pixels().len(), 4);
    }

    #[test]
    fn plane_keeps_row_major_layout() {
        let pixels = (0..6u8)
            .map(|i| Lab {
                l: i * 10,
                a: 128,
                b: 128,
            })
            .collect();
        let grid = PixelGrid::from_pixels(3, 2, pixels).unwrap();
        let plane = grid.plane(|p| p.l);
        assert_eq!(plane.dimensions(), (3, 2));
        assert_eq!(plane.as_raw(), &vec![0, 10, 20, 30, 40, 50]);
        assert_eq!(plane.get_pixel(2, 0).0, [20]);
        assert_eq!(plane.get_pixel(0, 1).0, [30]);
    }

    #[test]
    fn recording_model_records_in_order() {
        let model = RecordingModel::new();
        let image = RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));

        let hsv = model.to_hsv(&image);
        model.from_hsv(&hsv);
        model.to_grayscale(&image);

        assert_eq!(
            model.get_operations(),
            vec![
                RecordedOp::ToHsv,
                RecordedOp::FromHsv,
                RecordedOp::ToGrayscale
            ]
        );
    }
}
