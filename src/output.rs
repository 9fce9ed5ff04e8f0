//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! portrait.jpg → portrait_processed.jpg
//! Summary
//!     Brightened the image by 0.2 levels
//!     Applied High Contrast accessibility filter
//! Adjustments
//!     brightness: 0.20
//!     contrast: 1.00
//!     ...
//! Metrics               original   processed      change
//!     sharpness           812.40      930.11     +117.71
//!     ...
//! ```
//!
//! ## Metrics
//!
//! ```text
//! portrait.jpg
//!     sharpness: 812.40
//!     brightness balance: 3.12
//!     contrast: 41.87
//!     saturation: 96.03
//!     mean brightness: 118.55
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::enhance::EnhancementReport;
use crate::imaging::{Adjustments, Measurement, Metrics};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name for display, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Metric labels paired with their values, in display order.
fn metric_rows(metrics: &Metrics) -> [(&'static str, f64); 4] {
    [
        ("sharpness", metrics.sharpness),
        ("brightness balance", metrics.brightness_balance),
        ("contrast", metrics.contrast),
        ("saturation", metrics.saturation),
    ]
}

// ============================================================================
// Shared sections
// ============================================================================

/// One line per summary clause, under a `Summary` header.
pub fn format_summary(clauses: &[String]) -> Vec<String> {
    let mut lines = vec!["Summary".to_string()];
    lines.extend(clauses.iter().map(|c| format!("{}{}", indent(1), c)));
    lines
}

/// The effective adjustments, one per line.
pub fn format_adjustments(adjustments: &Adjustments) -> Vec<String> {
    let mut lines = vec!["Adjustments".to_string()];
    let numeric = [
        ("brightness", adjustments.brightness),
        ("contrast", adjustments.contrast),
        ("saturation", adjustments.saturation),
        ("hue", adjustments.hue),
        ("exposure", adjustments.exposure),
    ];
    for (label, value) in numeric {
        lines.push(format!("{}{}: {:.2}", indent(1), label, value));
    }
    lines.push(format!(
        "{}filter: {}",
        indent(1),
        adjustments.accessibility_filter
    ));
    if adjustments.auto_enhance {
        lines.push(format!("{}auto-enhance: on", indent(1)));
    }
    lines
}

/// Before/after table with signed deltas.
pub fn format_metrics_comparison(original: &Metrics, processed: &Metrics) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<18}{:>12}{:>12}{:>12}",
        "Metrics", "original", "processed", "change"
    )];
    for ((label, before), (_, after)) in metric_rows(original)
        .into_iter()
        .zip(metric_rows(processed))
    {
        lines.push(format!(
            "{}{:<14}{:>12.2}{:>12.2}{:>+12.2}",
            indent(1),
            label,
            before,
            after,
            after - before
        ));
    }
    lines
}

// ============================================================================
// process
// ============================================================================

/// Format the result of the `process` command.
pub fn format_process_output(
    input: &Path,
    output: &Path,
    report: &EnhancementReport,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {}",
        display_name(input),
        display_name(output)
    )];
    lines.extend(format_summary(&report.clauses));
    lines.extend(format_adjustments(&report.adjustments));
    lines.extend(format_metrics_comparison(
        &report.original_metrics,
        &report.processed_metrics,
    ));
    lines
}

pub fn print_process_output(input: &Path, output: &Path, report: &EnhancementReport) {
    for line in format_process_output(input, output, report) {
        println!("{}", line);
    }
}

// ============================================================================
// metrics
// ============================================================================

/// Format the result of the `metrics` command.
pub fn format_metrics_output(input: &Path, measurement: &Measurement) -> Vec<String> {
    let mut lines = vec![display_name(input)];
    for (label, value) in metric_rows(&measurement.metrics) {
        lines.push(format!("{}{}: {:.2}", indent(1), label, value));
    }
    lines.push(format!(
        "{}mean brightness: {:.2}",
        indent(1),
        measurement.mean_brightness
    ));
    lines
}

pub fn print_metrics_output(input: &Path, measurement: &Measurement) {
    for line in format_metrics_output(input, measurement) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::AccessibilityFilter;

    fn sample_metrics(scale: f64) -> Metrics {
        Metrics {
            sharpness: 100.0 * scale,
            brightness_balance: 2.0 * scale,
            contrast: 40.0 * scale,
            saturation: 80.0 * scale,
        }
    }

    fn sample_report() -> EnhancementReport {
        EnhancementReport {
            summary: "Brightened the image by 0.2 levels".to_string(),
            clauses: vec!["Brightened the image by 0.2 levels".to_string()],
            adjustments: Adjustments {
                brightness: 0.2,
                ..Adjustments::default()
            },
            original_metrics: sample_metrics(1.0),
            processed_metrics: sample_metrics(1.5),
        }
    }

    // =========================================================================
    // Section helpers
    // =========================================================================

    #[test]
    fn summary_lists_each_clause() {
        let lines = format_summary(&["one".to_string(), "two".to_string()]);
        assert_eq!(lines, vec!["Summary", "    one", "    two"]);
    }

    #[test]
    fn adjustments_show_filter_and_auto() {
        let adj = Adjustments {
            accessibility_filter: AccessibilityFilter::HighContrast,
            auto_enhance: true,
            ..Adjustments::default()
        };
        let lines = format_adjustments(&adj);
        assert_eq!(lines[0], "Adjustments");
        assert!(lines.contains(&"    contrast: 1.00".to_string()));
        assert!(lines.contains(&"    filter: high_contrast".to_string()));
        assert_eq!(lines.last().unwrap(), "    auto-enhance: on");
    }

    #[test]
    fn adjustments_without_auto_enhance() {
        let lines = format_adjustments(&Adjustments::default());
        assert!(!lines.iter().any(|l| l.contains("auto-enhance")));
        assert!(lines.contains(&"    filter: none".to_string()));
    }

    #[test]
    fn comparison_shows_signed_change() {
        let lines = format_metrics_comparison(&sample_metrics(1.0), &sample_metrics(0.5));
        assert_eq!(lines.len(), 5);
        assert!(lines[1].trim_start().starts_with("sharpness"));
        assert!(lines[1].ends_with("-50.00"), "{}", lines[1]);
        let lines = format_metrics_comparison(&sample_metrics(1.0), &sample_metrics(2.0));
        assert!(lines[3].ends_with("+40.00"), "{}", lines[3]);
    }

    // =========================================================================
    // Command output
    // =========================================================================

    #[test]
    fn process_output_sections_in_order() {
        let lines = format_process_output(
            Path::new("/photos/portrait.jpg"),
            Path::new("/photos/portrait_processed.jpg"),
            &sample_report(),
        );
        assert_eq!(lines[0], "portrait.jpg \u{2192} portrait_processed.jpg");
        let pos = |header: &str| lines.iter().position(|l| l.starts_with(header)).unwrap();
        assert!(pos("Summary") < pos("Adjustments"));
        assert!(pos("Adjustments") < pos("Metrics"));
        assert!(lines.contains(&"    Brightened the image by 0.2 levels".to_string()));
    }

    #[test]
    fn metrics_output_lists_all_values() {
        let measurement = Measurement {
            metrics: sample_metrics(1.0),
            mean_brightness: 118.5,
        };
        let lines = format_metrics_output(Path::new("shot.png"), &measurement);
        assert_eq!(
            lines,
            vec![
                "shot.png",
                "    sharpness: 100.00",
                "    brightness balance: 2.00",
                "    contrast: 40.00",
                "    saturation: 80.00",
                "    mean brightness: 118.50",
            ]
        );
    }
}
