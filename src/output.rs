//! CLI output formatting.
//!
//! Every line the tool prints is built here. Each concern has a `format_*`
//! function (returns `Vec<String>`) for testability and a `print_*` wrapper
//! that writes to stdout. Format functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ```text
//! Project root: /work/themes
//! Adding backgrounds from: /work/themes/input_images
//! Output directory: /work/themes/store/backgrounds
//!
//! Found 3 image(s) to process
//! Starting with image ID: image-4
//! 001 beach.jpg → image-4
//! 002 broken.png
//!     Error: Failed to decode ...
//! 003 forest.webp → image-5
//!
//! ✓ Successfully processed 2 image(s)
//! ✓ Added entries to /work/themes/store/backgrounds.json
//! ✗ Skipped 1 image(s)
//!     broken.png
//!
//! Next steps:
//!     1. Edit /work/themes/store/backgrounds.json to update:
//!        - 'category' (currently set to 'Uncategorized')
//!        - 'name' (currently set to 'No Tags')
//!        - 'featured' (currently set to false)
//!
//!     2. The following entries were added:
//!        - image-4: No Tags
//!        - image-5: No Tags
//! ```

use crate::config::{IngestConfig, Layout};
use crate::ingest::{IngestEvent, IngestReport, Outcome};
use crate::scan::IMAGE_EXTENSIONS;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name of `path`, or the whole path when it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Run header
// ============================================================================

/// Where the run reads from and writes to.
pub fn format_header(layout: &Layout, input: &Path) -> Vec<String> {
    vec![
        format!("Project root: {}", layout.root.display()),
        format!("Adding backgrounds from: {}", input.display()),
        format!("Output directory: {}", layout.store_dir().display()),
        String::new(),
    ]
}

pub fn print_header(layout: &Layout, input: &Path) {
    for line in format_header(layout, input) {
        println!("{}", line);
    }
}

// ============================================================================
// Progress events
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_event(event: &IngestEvent) -> Vec<String> {
    match event {
        IngestEvent::Found { count } => vec![format!("Found {} image(s) to process", count)],
        IngestEvent::ManifestRecovered { reason } => vec![
            format!("Warning: Could not parse manifest: {}", reason),
            format!("{}Continuing with an empty manifest", indent(1)),
        ],
        IngestEvent::StartingId { id } => vec![format!("Starting with image ID: {}", id)],
        IngestEvent::Processed {
            index, source, id, ..
        } => vec![format!(
            "{} {} \u{2192} {}",
            format_index(*index),
            display_name(source),
            id
        )],
        IngestEvent::Failed {
            index,
            source,
            error,
            ..
        } => vec![
            format!("{} {}", format_index(*index), display_name(source)),
            format!("{}Error: {}", indent(1), error),
        ],
    }
}

pub fn print_event(event: &IngestEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Final summary
// ============================================================================

/// Format the end-of-run summary, including the manual follow-up steps.
pub fn format_report(report: &IngestReport, config: &IngestConfig) -> Vec<String> {
    match &report.outcome {
        Outcome::InputMissing(path) => {
            return vec![
                format!("Error: Input folder '{}' does not exist!", path.display()),
                "Please create the folder and add your images there.".to_string(),
            ];
        }
        Outcome::NoImages(path) => {
            let formats: Vec<String> = IMAGE_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();
            return vec![
                format!("No image files found in '{}'!", path.display()),
                format!("Supported formats: {}", formats.join(", ")),
            ];
        }
        Outcome::Completed => {}
    }

    let mut lines = vec![String::new()];
    if report.added.is_empty() {
        lines.push("No images were successfully processed.".to_string());
        lines.extend(format_failures(report));
        return lines;
    }

    let manifest = report.manifest_path.display();
    lines.push(format!(
        "\u{2713} Successfully processed {} image(s)",
        report.added.len()
    ));
    lines.push(format!("\u{2713} Added entries to {}", manifest));
    lines.extend(format_failures(report));

    let entries = &config.entries;
    lines.push(String::new());
    lines.push("Next steps:".to_string());
    lines.push(format!("{}1. Edit {} to update:", indent(1), manifest));
    lines.push(format!(
        "{}   - 'category' (currently set to '{}')",
        indent(1),
        entries.category
    ));
    lines.push(format!(
        "{}   - 'name' (currently set to '{}')",
        indent(1),
        entries.name
    ));
    lines.push(format!(
        "{}   - 'featured' (currently set to {})",
        indent(1),
        entries.featured
    ));
    lines.push(String::new());
    lines.push(format!("{}2. The following entries were added:", indent(1)));
    for entry in &report.added {
        lines.push(format!("{}   - {}: {}", indent(1), entry.id, entry.name));
    }
    lines
}

fn format_failures(report: &IngestReport) -> Vec<String> {
    if report.failures.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "\u{2717} Skipped {} image(s)",
        report.failures.len()
    )];
    for failure in &report.failures {
        lines.push(format!("{}{}", indent(1), display_name(&failure.source)));
    }
    lines
}

pub fn print_report(report: &IngestReport, config: &IngestConfig) {
    for line in format_report(report, config) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ImageId;
    use crate::ingest::{Failure, build_entry};
    use std::path::PathBuf;

    fn report(outcome: Outcome, added: &[u64], failed: &[&str]) -> IngestReport {
        let config = IngestConfig::default();
        IngestReport {
            outcome,
            added: added
                .iter()
                .map(|n| build_entry(ImageId(*n), &config))
                .collect(),
            failures: failed
                .iter()
                .map(|name| Failure {
                    source: PathBuf::from("/in").join(name),
                    error: "bad data".to_string(),
                })
                .collect(),
            manifest_path: PathBuf::from("/p/store/backgrounds.json"),
            manifest_written: !added.is_empty(),
        }
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn header_lists_root_input_and_store() {
        let layout = IngestConfig::default().layout(Path::new("/p"));
        let lines = format_header(&layout, Path::new("/p/input_images"));
        assert_eq!(lines[0], "Project root: /p");
        assert_eq!(lines[1], "Adding backgrounds from: /p/input_images");
        assert_eq!(lines[2], "Output directory: /p/store/backgrounds");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn processed_event_shows_index_file_and_id() {
        let lines = format_event(&IngestEvent::Processed {
            index: 2,
            total: 5,
            source: PathBuf::from("/in/beach.jpg"),
            id: ImageId(7),
        });
        assert_eq!(lines, vec!["002 beach.jpg \u{2192} image-7"]);
    }

    #[test]
    fn failed_event_shows_file_and_error() {
        let lines = format_event(&IngestEvent::Failed {
            index: 3,
            total: 3,
            source: PathBuf::from("/in/broken.png"),
            error: "Failed to decode".to_string(),
        });
        assert_eq!(lines[0], "003 broken.png");
        assert_eq!(lines[1], "    Error: Failed to decode");
    }

    #[test]
    fn simple_events() {
        assert_eq!(
            format_event(&IngestEvent::Found { count: 3 }),
            vec!["Found 3 image(s) to process"]
        );
        assert_eq!(
            format_event(&IngestEvent::StartingId { id: ImageId(4) }),
            vec!["Starting with image ID: image-4"]
        );
        let warning = format_event(&IngestEvent::ManifestRecovered {
            reason: "EOF".to_string(),
        });
        assert!(warning[0].starts_with("Warning:"));
    }

    #[test]
    fn missing_input_report() {
        let lines = format_report(
            &report(Outcome::InputMissing(PathBuf::from("/p/nope")), &[], &[]),
            &IngestConfig::default(),
        );
        assert_eq!(lines[0], "Error: Input folder '/p/nope' does not exist!");
    }

    #[test]
    fn no_images_report_lists_formats() {
        let lines = format_report(
            &report(Outcome::NoImages(PathBuf::from("/p/in")), &[], &[]),
            &IngestConfig::default(),
        );
        assert_eq!(lines[0], "No image files found in '/p/in'!");
        assert_eq!(
            lines[1],
            "Supported formats: .jpg, .jpeg, .png, .gif, .bmp, .webp, .tiff, .tif"
        );
    }

    #[test]
    fn nothing_processed_report() {
        let lines = format_report(
            &report(Outcome::Completed, &[], &["a.jpg"]),
            &IngestConfig::default(),
        );
        assert!(lines.contains(&"No images were successfully processed.".to_string()));
        assert!(lines.contains(&"\u{2717} Skipped 1 image(s)".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Next steps")));
    }

    #[test]
    fn success_report_counts_and_lists_ids() {
        let lines = format_report(
            &report(Outcome::Completed, &[4, 5], &["broken.png"]),
            &IngestConfig::default(),
        );
        assert!(lines.contains(&"\u{2713} Successfully processed 2 image(s)".to_string()));
        assert!(lines.contains(&"\u{2713} Added entries to /p/store/backgrounds.json".to_string()));
        assert!(lines.contains(&"\u{2717} Skipped 1 image(s)".to_string()));
        assert!(lines.contains(&"    broken.png".to_string()));
        assert!(lines.contains(&"       - 'category' (currently set to 'Uncategorized')".to_string()));
        assert!(lines.contains(&"       - 'featured' (currently set to false)".to_string()));
        assert!(lines.contains(&"       - image-4: No Tags".to_string()));
        assert!(lines.contains(&"       - image-5: No Tags".to_string()));
    }
}
