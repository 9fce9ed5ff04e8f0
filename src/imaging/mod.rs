//! Pixel-level image processing, in pure Rust on top of the `image` crate.
//!
//! | Stage | Module | Conversions used |
//! |---|---|---|
//! | **Measure** | [`metrics`] | grayscale, HSV |
//! | **Auto-enhance** | [`auto_enhance`] | none (reads a [`Measurement`]) |
//! | **Tone** | [`tonal`] | HSV (only for saturation/hue) |
//! | **Accessibility** | [`accessibility`] | LAB (only for high contrast) |
//!
//! The module is split into:
//! - **Calculations**: pure scalar math (unit testable without images)
//! - **Parameters**: data structures describing the requested adjustments
//! - **Color model**: [`ColorModel`] trait + [`RustColorModel`]
//! - **Stages**: metrics, auto-enhance, tonal, CLAHE, accessibility filters

pub mod accessibility;
pub mod auto_enhance;
pub mod calculations;
pub mod clahe;
pub mod color_model;
pub mod metrics;
mod params;
pub mod rust_model;
pub mod tonal;

pub use color_model::{ColorModel, Hsv, HsvImage, Lab, LabImage, PixelGrid};
pub use metrics::{Measurement, Metrics, compute_metrics, measure};
pub use params::{AccessibilityFilter, Adjustments};
pub use rust_model::RustColorModel;
