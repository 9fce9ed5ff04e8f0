//! # Photo Equalizer
//!
//! Perceptual photo enhancement with plain-language explanations. An image
//! goes through a fixed pipeline of tonal adjustments and an optional
//! accessibility filter, and every run reports what changed, backed by
//! before/after metrics.
//!
//! # Pipeline
//!
//! ```text
//! 1. Measure        original  →  Metrics (+ mean brightness)
//! 2. Auto-enhance   Metrics   →  effective Adjustments (only when requested)
//! 3. Tone           brightness → contrast → exposure → gamma → saturation/hue
//! 4. Filter         high contrast (CLAHE on LAB lightness) or colorblind simulation
//! 5. Measure        processed →  Metrics
//! 6. Explain        both Metrics + Adjustments → Summary
//! ```
//!
//! Every stage is a pure function of its inputs. Per-pixel work runs on
//! rayon, but all reductions are sequential, so results do not depend on the
//! thread count.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`enhance`] | End-to-end pipeline, byte-level decode/encode, `EnhancementReport` |
//! | [`explain`] | Ordered summary clauses from metric deltas and adjustments |
//! | [`imaging`] | Color model, metrics, auto-enhance, tone curve, CLAHE, filters |
//! | [`config`] | Layered TOML configuration: stock defaults → file → CLI flags |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Color Conversions Behind a Trait
//!
//! The stages never convert colors themselves; they ask a
//! [`imaging::ColorModel`] for grayscale, HSV, or LAB planes. The production
//! [`imaging::RustColorModel`] follows the classic 8-bit conventions (hue on a
//! 0–180 scale, LAB lightness stretched to 0–255). Tests substitute a
//! recording model to check which conversions each stage requests.
//!
//! ## Graceful Degradation
//!
//! Adjustment values are never rejected. Brightness, contrast, and exposure
//! clamp at every step, a non-positive contrast gets an identity gamma, and
//! hue wraps. An unknown accessibility filter is a no-op that is still
//! mentioned in the summary. Only decoding and encoding can fail.

pub mod config;
pub mod enhance;
pub mod explain;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
