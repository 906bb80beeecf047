//! Mermaid fence conversion.
//!
//! GitHub and VitePress render ```` ```mermaid ```` fences; the wiki wants a
//! `::: mermaid` container and an older mermaid renderer. The pass walks the
//! document once, carrying a [`ScanState`], and only rewrites lines that sit
//! inside a diagram block:
//!
//! ```text
//! ```mermaid              ::: mermaid
//! flowchart LR      →     graph LR
//!   A[One<br/>Two]          A[One Two]
//!   A ----> B               A --> B
//! ```                     :::
//! ```
//!
//! A fence that is never closed is not guessed at: the block is emitted
//! exactly as written and counted as unbalanced.

use super::split_eol;
use crate::stats::TransformStats;
use regex::Regex;
use std::sync::LazyLock;

const SOURCE_OPEN: &str = "```mermaid";
const SOURCE_CLOSE: &str = "```";
pub const TARGET_OPEN: &str = "::: mermaid";
pub const TARGET_CLOSE: &str = ":::";

static FLOWCHART_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)flowchart\b").expect("valid regex"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\b[^>]*>").expect("valid regex"));
static LONG_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{4,}>").expect("valid regex"));

/// Position of the scan relative to diagram blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    /// Inside a block opened by the input line at this index.
    InDiagram { opened_at: usize },
}

/// Convert every balanced mermaid fence in `content`.
pub fn convert(content: &str, stats: &mut TransformStats) -> String {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut out = String::with_capacity(content.len());
    // Converted lines of the open block, flushed when the block closes.
    let mut pending = String::new();

    let state = lines
        .iter()
        .enumerate()
        .fold(ScanState::Outside, |state, (idx, line)| {
            let (body, eol) = split_eol(line);
            match state {
                ScanState::Outside if body.trim_end() == SOURCE_OPEN => {
                    pending.clear();
                    pending.push_str(TARGET_OPEN);
                    pending.push_str(eol);
                    ScanState::InDiagram { opened_at: idx }
                }
                ScanState::Outside => {
                    out.push_str(line);
                    ScanState::Outside
                }
                ScanState::InDiagram { .. } if body.trim_end() == SOURCE_CLOSE => {
                    out.push_str(&pending);
                    out.push_str(TARGET_CLOSE);
                    out.push_str(eol);
                    stats.diagrams_converted += 1;
                    ScanState::Outside
                }
                ScanState::InDiagram { .. } => {
                    pending.push_str(&rewrite_diagram_line(body));
                    pending.push_str(eol);
                    state
                }
            }
        });

    if let ScanState::InDiagram { opened_at } = state {
        stats.unbalanced_diagrams += 1;
        for line in &lines[opened_at..] {
            out.push_str(line);
        }
    }

    out
}

/// Apply the in-block rewrites to one line (without its line ending).
pub fn rewrite_diagram_line(line: &str) -> String {
    let line = FLOWCHART_KEYWORD.replace(line, "${1}graph");
    let line = LINE_BREAK.replace_all(&line, " ");
    LONG_ARROW.replace_all(&line, "-->").into_owned()
}
