//! CLI output formatting for conversion runs.
//!
//! Output leads with what happened (counts, the landing decision, the page
//! order) and shows paths as indented context, so a run reads as an
//! inventory of the wiki rather than a file log:
//!
//! ```text
//! Converted docs → wiki
//!     8 files: 7 pages, 1 asset
//!     Rewrites: 2 front matter, 1 diagrams, 1 links, 1 admonitions (1 warnings)
//!
//! Landing
//!     index.md synthesized (trivial)
//!
//! Order
//! 001 (root)
//!     index, README
//! 002 guide
//!     getting-started, architecture, broken
//!
//! Warnings
//!     guide/broken.md
//!         mermaid block never closed, left unchanged
//! ```
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::landing::{LandingDecision, SynthesisReason};
use crate::report::RunReport;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn display_dir(dir: &Path) -> String {
    if dir.as_os_str().is_empty() {
        "(root)".to_string()
    } else {
        crate::naming::url_path(dir)
    }
}

/// Describe the landing decision in one line.
fn landing_line(page: &str, decision: &LandingDecision) -> String {
    match decision {
        LandingDecision::Kept => format!("{} kept", page),
        LandingDecision::Synthesized { reason } => {
            let why = match reason {
                SynthesisReason::Missing => "missing".to_string(),
                SynthesisReason::Trivial => "trivial".to_string(),
                SynthesisReason::Placeholder(sig) => format!("placeholder \"{}\"", sig),
            };
            format!("{} synthesized ({})", page, why)
        }
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Format the summary of a conversion run.
///
/// `output` is `None` for a dry run, which has no landing page or order.
pub fn format_run_summary(
    report: &RunReport,
    source: &Path,
    output: Option<&Path>,
    landing_page: &str,
) -> Vec<String> {
    let mut lines = Vec::new();

    match output {
        Some(out) => lines.push(format!("Converted {} → {}", source.display(), out.display())),
        None => lines.push(format!("Checked {} (dry run)", source.display())),
    }
    lines.push(format!(
        "{}{}: {}, {}",
        indent(1),
        plural(report.files_processed(), "file"),
        plural(report.pages_converted, "page"),
        plural(report.assets_copied, "asset")
    ));
    lines.push(format!("{}Rewrites: {}", indent(1), report.stats));

    if let Some(decision) = &report.landing {
        lines.push(String::new());
        lines.push("Landing".to_string());
        lines.push(format!("{}{}", indent(1), landing_line(landing_page, decision)));
    }

    if !report.order.is_empty() {
        lines.push(String::new());
        lines.push("Order".to_string());
        for (i, entry) in report.order.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), display_dir(&entry.dir)));
            lines.push(format!("{}{}", indent(1), entry.pages.join(", ")));
        }
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &report.warnings {
            lines.push(format!("{}{}", indent(1), warning.path.display()));
            lines.push(format!("{}{}", indent(2), warning.kind));
        }
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push(format!("Failures ({})", report.failures.len()));
        for failure in &report.failures {
            lines.push(format!("{}{}", indent(1), failure.path.display()));
            lines.push(format!("{}{}", indent(2), failure.message));
        }
    }

    lines
}

/// Print the run summary to stdout.
pub fn print_run_summary(
    report: &RunReport,
    source: &Path,
    output: Option<&Path>,
    landing_page: &str,
) {
    for line in format_run_summary(report, source, output, landing_page) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
