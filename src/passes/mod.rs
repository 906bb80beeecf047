//! Markdown rewrite passes.
//!
//! Each pass is a pure `&str → String` function that records what it did in a
//! document-local [`TransformStats`]. [`transform`] composes them in the fixed
//! order the wiki needs:
//!
//! | Order | Pass | Effect |
//! |-------|------|--------|
//! | 1 | [`front_matter`] | drop the leading `---` / `+++` block |
//! | 2 | [`diagram`] | ```` ```mermaid ```` fences → `::: mermaid` blocks |
//! | 3 | [`links`] | `[label](../x)` → `label` |
//! | 4 | [`admonition`] | `::: tip` containers → `> [!TIP]` alerts (optional) |
//!
//! Running the pipeline on its own output changes nothing.

pub mod admonition;
pub mod diagram;
pub mod front_matter;
pub mod links;

use crate::stats::TransformStats;

/// Switches for the optional passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOptions {
    pub admonitions: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self { admonitions: true }
    }
}

/// Result of running the pass pipeline over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub content: String,
    pub stats: TransformStats,
}

pub fn transform(content: &str, options: &PassOptions) -> Transformed {
    let mut stats = TransformStats::default();
    let text = front_matter::strip(content, &mut stats);
    let text = diagram::convert(&text, &mut stats);
    let text = links::rewrite(&text, &mut stats);
    let text = if options.admonitions {
        admonition::convert(&text, &mut stats)
    } else {
        text
    };
    Transformed {
        content: text,
        stats,
    }
}

/// Split a line produced by `split_inclusive('\n')` into its text and its
/// line ending (`"\r\n"`, `"\n"` or `""` on the last line).
pub(crate) fn split_eol(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
