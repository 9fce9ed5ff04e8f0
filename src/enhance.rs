//! The enhancement pipeline end to end.
//!
//! ```text
//! decode → measure → auto-enhance → tone → filter → measure → explain → encode
//! ```
//!
//! [`enhance`] works on an already decoded raster and never fails: every
//! numeric oddity is clamped or guarded inside the stages. [`enhance_bytes`]
//! wraps it with decoding and encoding, which are the only fallible steps.
//!
//! Both entry points have a `*_with_model` variant taking the [`ColorModel`]
//! explicitly so tests can inject a recording one.

use crate::explain::{Summary, explain};
use crate::imaging::{
    Adjustments, ColorModel, Metrics, RustColorModel, accessibility, auto_enhance, measure, tonal,
};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// How the processed image is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// JPEG quality (1-100). Ignored for PNG.
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: 95,
        }
    }
}

/// Result of running the pipeline on a decoded image.
#[derive(Debug, Clone)]
pub struct Enhancement {
    pub image: RgbImage,
    pub summary: Summary,
    pub original: Metrics,
    pub processed: Metrics,
    /// Adjustments actually applied, after auto-enhance.
    pub applied: Adjustments,
}

impl Enhancement {
    pub fn report(&self) -> EnhancementReport {
        EnhancementReport {
            summary: self.summary.to_string(),
            clauses: self.summary.clauses().to_vec(),
            adjustments: self.applied.clone(),
            original_metrics: self.original,
            processed_metrics: self.processed,
        }
    }
}

/// Serializable description of one enhancement, without pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementReport {
    pub summary: String,
    pub clauses: Vec<String>,
    pub adjustments: Adjustments,
    pub original_metrics: Metrics,
    pub processed_metrics: Metrics,
}

/// Encoded image plus its report.
#[derive(Debug, Clone)]
pub struct EncodedEnhancement {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub report: EnhancementReport,
}

/// Run the pipeline with the default [`RustColorModel`].
pub fn enhance(image: RgbImage, requested: &Adjustments) -> Enhancement {
    enhance_with_model(&RustColorModel, image, requested)
}

/// Run the pipeline through the given color model.
pub fn enhance_with_model(
    model: &impl ColorModel,
    image: RgbImage,
    requested: &Adjustments,
) -> Enhancement {
    let original = measure(model, &image);
    let applied = auto_enhance::derive_adjustments(&original, requested);

    let image = tonal::apply(model, image, &applied);
    let image = accessibility::apply_filter(model, image, &applied.accessibility_filter);

    let processed = measure(model, &image).metrics;
    let summary = explain(
        &original.metrics,
        &processed,
        &applied,
        &applied.accessibility_filter,
    );
    tracing::info!(
        width = image.width(),
        height = image.height(),
        auto_enhance = applied.auto_enhance,
        filter = %applied.accessibility_filter,
        "enhanced image"
    );

    Enhancement {
        image,
        summary,
        original: original.metrics,
        processed,
        applied,
    }
}

/// Decode any supported format into 8-bit RGB.
///
/// Alpha is dropped and grayscale is expanded to three channels.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, EnhanceError> {
    let image = image::load_from_memory(bytes).map_err(EnhanceError::Decode)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(EnhanceError::EmptyImage);
    }
    Ok(image.to_rgb8())
}

/// Encode an RGB image in the configured format.
pub fn encode(image: &RgbImage, output: &OutputConfig) -> Result<Vec<u8>, EnhanceError> {
    let mut buf = Vec::new();
    let result = match output.format {
        OutputFormat::Jpeg => {
            let quality = output.quality.clamp(1, 100);
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        }
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut buf)),
    };
    result.map_err(EnhanceError::Encode)?;
    Ok(buf)
}

/// Decode, enhance, and encode in one call.
pub fn enhance_bytes(
    bytes: &[u8],
    requested: &Adjustments,
    output: &OutputConfig,
) -> Result<EncodedEnhancement, EnhanceError> {
    enhance_bytes_with_model(&RustColorModel, bytes, requested, output)
}

pub fn enhance_bytes_with_model(
    model: &impl ColorModel,
    bytes: &[u8],
    requested: &Adjustments,
    output: &OutputConfig,
) -> Result<EncodedEnhancement, EnhanceError> {
    let image = decode(bytes)?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        input_bytes = bytes.len(),
        "decoded input"
    );

    let enhancement = enhance_with_model(model, image, requested);
    let bytes = encode(&enhancement.image, output)?;
    Ok(EncodedEnhancement {
        bytes,
        format: output.format,
        report: enhancement.report(),
    })
}
