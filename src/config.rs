//! Configuration loading, merging, and validation.
//!
//! Configuration is layered: stock defaults, then an optional TOML file, then
//! command-line overrides. Each layer is a sparse `toml::Value` merged key by
//! key onto the one below it before the result is deserialized and
//! validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [adjustments]
//! brightness = 0.0                # additive, normalized units
//! contrast = 1.0                  # multiplicative; also sets gamma = 1/contrast
//! saturation = 1.0                # multiplicative on HSV saturation
//! hue = 0.0                       # shift on the 0-180 hue scale
//! exposure = 0.0                  # stops
//! accessibility_filter = "none"   # high_contrast | colorblind_protanopia | ...
//! auto_enhance = false
//!
//! [output]
//! format = "jpeg"                 # jpeg | png
//! quality = 95                    # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4               # Max rayon workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early. Adjustment values are
//! never rejected: out-of-range numbers are clamped by the pipeline.

use crate::enhance::OutputConfig;
use crate::imaging::Adjustments;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "photo-equalizer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhanceConfig {
    /// Requested adjustments.
    pub adjustments: Adjustments,
    /// Output encoding.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl EnhanceConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of rayon workers. When absent, defaults to the number
    /// of CPU cores; larger values are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EnhanceConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist and `Err` if it exists but
/// cannot be read or parsed.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<EnhanceConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: EnhanceConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path` (stock defaults when the file is missing) and
/// apply `overrides` on top.
pub fn load_config(
    path: &Path,
    overrides: Option<toml::Value>,
) -> Result<EnhanceConfig, ConfigError> {
    let file = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), file.into_iter().chain(overrides))
}

/// Returns a fully-commented stock config file with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Equalizer Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags override values from this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Adjustments
# ---------------------------------------------------------------------------
[adjustments]
# Additive brightness offset in normalized units (typically -1.0 to 1.0).
brightness = 0.0

# Contrast multiplier. Any value other than 1.0 also applies a
# gamma of 1/contrast.
contrast = 1.0

# Saturation multiplier (0.0 = grayscale).
saturation = 1.0

# Hue shift on the 0-180 hue scale (180 = a full turn).
hue = 0.0

# Exposure in stops (typically -3.0 to 3.0).
exposure = 0.0

# One of: none, high_contrast, colorblind_protanopia,
# colorblind_deuteranopia, colorblind_tritanopia.
accessibility_filter = "none"

# Derive brightness, contrast, and saturation from the image's own statistics.
auto_enhance = false

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# jpeg or png.
format = "jpeg"

# JPEG quality (1 = worst, 100 = best). Ignored for PNG.
quality = 95

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of parallel workers for per-pixel stages.
# Omit to use all CPU cores. Values above the core count are clamped.
# max_processes = 4
"##
}
