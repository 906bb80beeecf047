//! Leading metadata block removal.
//!
//! The wiki renders front matter as a literal table, so it is dropped. Both
//! YAML (`---`) and TOML (`+++`) blocks are recognized; the closing line must
//! use the same token as the opening one.

use super::split_eol;
use crate::stats::TransformStats;

const DELIMITERS: &[&str] = &["---", "+++"];

/// What [`strip`] found at the top of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatter {
    Absent,
    Stripped,
    /// Opening delimiter without a closing one. Content is left as is.
    Unterminated,
}

/// Remove leading front-matter blocks, counting the outcome in `stats`.
///
/// Stripping repeats while the remainder still opens with a complete block,
/// so the result never starts with one.
pub fn strip(content: &str, stats: &mut TransformStats) -> String {
    let mut body = content;
    loop {
        let (rest, outcome) = split_front_matter(body);
        match outcome {
            FrontMatter::Stripped => {
                stats.front_matter_removed += 1;
                body = rest;
            }
            FrontMatter::Unterminated => {
                stats.malformed_front_matter += 1;
                break;
            }
            FrontMatter::Absent => break,
        }
    }
    body.to_string()
}

/// Split off a leading front-matter block.
///
/// Returns the remainder of the document (everything after the closing
/// delimiter and at most one blank line) or the untouched input.
pub fn split_front_matter(content: &str) -> (&str, FrontMatter) {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (content, FrontMatter::Absent);
    };
    let opening = split_eol(first).0.trim_end();
    let Some(token) = DELIMITERS.iter().find(|d| **d == opening) else {
        return (content, FrontMatter::Absent);
    };

    let mut offset = first.len();
    for line in lines.by_ref() {
        offset += line.len();
        if split_eol(line).0.trim_end() == *token {
            let mut rest = &text[offset..];
            if let Some(blank) = rest.split_inclusive('\n').next()
                && blank.trim().is_empty()
            {
                rest = &rest[blank.len()..];
            }
            return (rest, FrontMatter::Stripped);
        }
    }

    (content, FrontMatter::Unterminated)
}
