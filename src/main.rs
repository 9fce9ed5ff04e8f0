use clap::{Parser, Subcommand};
use photo_equalizer::enhance::{self, OutputFormat};
use photo_equalizer::{config, imaging, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "photo-equalizer")]
#[command(about = "Perceptual photo enhancement with explainable summaries")]
#[command(long_about = "\
Perceptual photo enhancement with explainable summaries

Applies brightness, contrast, saturation, hue, and exposure adjustments,
optionally derived automatically from the image's own statistics, plus
accessibility filters (high contrast, colorblindness simulations). Every
run reports what changed in plain language, backed by before/after metrics.

Settings are layered: built-in defaults, then the config file, then flags.

Run 'photo-equalizer gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Log pipeline stages to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enhance an image and explain what changed
    Process(ProcessArgs),
    /// Print the perceptual metrics of an image
    Metrics {
        /// Input image (JPEG, PNG, TIFF, WebP)
        input: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Input image (JPEG, PNG, TIFF, WebP)
    input: PathBuf,

    /// Output file [default: <stem>_processed.<ext> next to the input]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file; missing files fall back to defaults
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Additive brightness in normalized units
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<f64>,

    /// Contrast multiplier (also applies gamma 1/contrast)
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<f64>,

    /// Saturation multiplier
    #[arg(long, allow_negative_numbers = true)]
    saturation: Option<f64>,

    /// Hue shift on the 0-180 scale
    #[arg(long, allow_negative_numbers = true)]
    hue: Option<f64>,

    /// Exposure in stops
    #[arg(long, allow_negative_numbers = true)]
    exposure: Option<f64>,

    /// Accessibility filter: high_contrast, colorblind_protanopia,
    /// colorblind_deuteranopia, colorblind_tritanopia, none
    #[arg(long)]
    filter: Option<String>,

    /// Derive brightness, contrast, and saturation from the image
    #[arg(long, overrides_with = "no_auto_enhance")]
    auto_enhance: bool,

    /// Turn auto-enhance off even if the config file enables it
    #[arg(long, overrides_with = "auto_enhance")]
    no_auto_enhance: bool,

    /// Output format: jpeg or png
    #[arg(long)]
    format: Option<String>,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u8>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

impl ProcessArgs {
    /// Flags that were given, as a sparse config layer.
    fn overrides(&self) -> toml::Value {
        let mut adjustments = toml::Table::new();
        let numeric = [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("hue", self.hue),
            ("exposure", self.exposure),
        ];
        for (key, value) in numeric {
            if let Some(v) = value {
                adjustments.insert(key.into(), toml::Value::Float(v));
            }
        }
        if let Some(filter) = &self.filter {
            adjustments.insert("accessibility_filter".into(), filter.clone().into());
        }
        if self.auto_enhance || self.no_auto_enhance {
            adjustments.insert("auto_enhance".into(), self.auto_enhance.into());
        }

        let mut output = toml::Table::new();
        if let Some(format) = &self.format {
            output.insert("format".into(), format.clone().into());
        }
        if let Some(quality) = self.quality {
            output.insert("quality".into(), toml::Value::Integer(quality.into()));
        }

        let mut root = toml::Table::new();
        root.insert("adjustments".into(), toml::Value::Table(adjustments));
        root.insert("output".into(), toml::Value::Table(output));
        toml::Value::Table(root)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Process(args) => {
            let settings = config::load_config(&args.config, Some(args.overrides()))?;
            init_thread_pool(&settings.processing);

            let bytes = std::fs::read(&args.input)?;
            let result = enhance::enhance_bytes(&bytes, &settings.adjustments, &settings.output)?;

            let output_path = args
                .output
                .clone()
                .unwrap_or_else(|| default_output_path(&args.input, result.format));
            std::fs::write(&output_path, &result.bytes)?;
            tracing::info!(
                output = %output_path.display(),
                bytes = result.bytes.len(),
                "wrote processed image"
            );

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result.report)?);
            } else {
                output::print_process_output(&args.input, &output_path, &result.report);
            }
        }
        Command::Metrics { input, json } => {
            let bytes = std::fs::read(&input)?;
            let image = enhance::decode(&bytes)?;
            let measurement = imaging::measure(&imaging::RustColorModel, &image);
            if json {
                println!("{}", serde_json::to_string_pretty(&measurement)?);
            } else {
                output::print_metrics_output(&input, &measurement);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "photo_equalizer=debug"
    } else {
        "photo_equalizer=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores: config can lower it, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// `<stem>_processed.<ext>` next to the input.
fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}_processed.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_uses_format_extension() {
        assert_eq!(
            default_output_path(Path::new("/photos/dawn.jpeg"), OutputFormat::Jpeg),
            PathBuf::from("/photos/dawn_processed.jpg")
        );
        assert_eq!(
            default_output_path(Path::new("scan.tiff"), OutputFormat::Png),
            PathBuf::from("scan_processed.png")
        );
    }

    #[test]
    fn overrides_only_include_given_flags() {
        let cli = Cli::parse_from([
            "photo-equalizer",
            "process",
            "in.png",
            "--brightness",
            "-0.2",
            "--filter",
            "high_contrast",
        ]);
        let Command::Process(args) = cli.command else {
            panic!("expected process command");
        };
        let overrides = args.overrides();
        let adjustments = overrides.get("adjustments").unwrap();
        assert_eq!(adjustments.get("brightness").unwrap().as_float(), Some(-0.2));
        assert_eq!(
            adjustments.get("accessibility_filter").unwrap().as_str(),
            Some("high_contrast")
        );
        assert!(adjustments.get("contrast").is_none());
        assert!(adjustments.get("auto_enhance").is_none());
        assert!(overrides.get("output").unwrap().get("quality").is_none());
    }

    #[test]
    fn overrides_resolve_on_top_of_defaults() {
        let cli = Cli::parse_from([
            "photo-equalizer",
            "process",
            "in.png",
            "--auto-enhance",
            "--format",
            "png",
        ]);
        let Command::Process(args) = cli.command else {
            panic!("expected process command");
        };
        let settings =
            config::resolve_config(config::stock_defaults_value(), [args.overrides()]).unwrap();
        assert!(settings.adjustments.auto_enhance);
        assert_eq!(settings.output.format, OutputFormat::Png);
        assert_eq!(settings.adjustments.contrast, 1.0);
    }

    #[test]
    fn no_auto_enhance_overrides_config_file() {
        let cli = Cli::parse_from(["photo-equalizer", "process", "in.png", "--no-auto-enhance"]);
        let Command::Process(args) = cli.command else {
            panic!("expected process command");
        };
        let file: toml::Value = toml::from_str("[adjustments]\nauto_enhance = true\n").unwrap();
        let settings =
            config::resolve_config(config::stock_defaults_value(), [file, args.overrides()])
                .unwrap();
        assert!(!settings.adjustments.auto_enhance);
    }

    #[test]
    fn last_auto_enhance_flag_wins() {
        let cli = Cli::parse_from([
            "photo-equalizer",
            "process",
            "in.png",
            "--no-auto-enhance",
            "--auto-enhance",
        ]);
        let Command::Process(args) = cli.command else {
            panic!("expected process command");
        };
        let overrides = args.overrides();
        let adjustments = overrides.get("adjustments").unwrap();
        assert_eq!(adjustments.get("auto_enhance").unwrap().as_bool(), Some(true));
    }
}
