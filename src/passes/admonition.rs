//! VitePress custom containers to block-quote alerts.
//!
//! ```text
//! ::: warning Heads up        > [!WARNING]
//! Rotate the key first.   →   > **Heads up**
//! :::                         > Rotate the key first.
//! ```
//!
//! Only the four kinds below are converted, and only when the container is
//! closed before any other `:::` opener. Anything else is left exactly as
//! written. Lines inside backtick fences are never considered.

use super::split_eol;
use crate::stats::TransformStats;
use regex::Regex;
use std::sync::LazyLock;

static OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:::\s*([A-Za-z]+)(?:\s+(.*?))?\s*$").expect("valid regex"));
static ANY_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:::\s*\S").expect("valid regex"));
static CLOSER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:::\s*$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Tip,
    Warning,
    Caution,
    Note,
}

impl AlertKind {
    /// Map a container name to the alert it becomes.
    pub fn from_container(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "tip" => Some(Self::Tip),
            "warning" => Some(Self::Warning),
            "danger" => Some(Self::Caution),
            "info" => Some(Self::Note),
            _ => None,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Tip => "[!TIP]",
            Self::Warning => "[!WARNING]",
            Self::Caution => "[!CAUTION]",
            Self::Note => "[!NOTE]",
        }
    }
}

/// Convert every recognized, terminated container in `content`.
pub fn convert(content: &str, stats: &mut TransformStats) -> String {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut out = String::with_capacity(content.len());
    let mut in_code = false;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        let body = split_eol(line).0;

        if body.trim_start().starts_with("```") {
            in_code = !in_code;
        }
        if in_code {
            out.push_str(line);
            idx += 1;
            continue;
        }

        if let Some((kind, title)) = parse_opener(body) {
            if let Some(close) = find_closer(&lines, idx) {
                render_alert(&mut out, kind, title, &lines[idx + 1..close], line);
                stats.admonitions_converted += 1;
                idx = close + 1;
                continue;
            }
            // A balanced nest of containers is left whole, inner ones included.
            if let Some(end) = nested_region_end(&lines, idx) {
                lines[idx..=end].iter().for_each(|l| out.push_str(l));
                idx = end + 1;
                continue;
            }
        }
        out.push_str(line);
        idx += 1;
    }

    out
}

fn parse_opener(line: &str) -> Option<(AlertKind, Option<&str>)> {
    let caps = OPENER.captures(line)?;
    let kind = AlertKind::from_container(caps.get(1)?.as_str())?;
    let title = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|t| !t.is_empty());
    Some((kind, title))
}

/// Index of the line closing the container opened at `open`, if the
/// container is unambiguous.
fn find_closer(lines: &[&str], open: usize) -> Option<usize> {
    for (offset, line) in lines[open + 1..].iter().enumerate() {
        let body = split_eol(line).0;
        if CLOSER.is_match(body) {
            return Some(open + 1 + offset);
        }
        if ANY_OPENER.is_match(body) {
            return None;
        }
    }
    None
}

/// Line closing the container opened at `open` when containers nest inside
/// it, counting every `:::` opener and closer.
fn nested_region_end(lines: &[&str], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, line) in lines[open..].iter().enumerate() {
        let body = split_eol(line).0;
        if CLOSER.is_match(body) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(open + offset);
            }
        } else if ANY_OPENER.is_match(body) {
            depth += 1;
        }
    }
    None
}

fn render_alert(
    out: &mut String,
    kind: AlertKind,
    title: Option<&str>,
    body: &[&str],
    opener_line: &str,
) {
    // Keep the document's line-ending style.
    let eol = match split_eol(opener_line).1 {
        "" => "\n",
        eol => eol,
    };
    out.push_str("> ");
    out.push_str(kind.marker());
    out.push_str(eol);
    if let Some(title) = title {
        out.push_str("> **");
        out.push_str(title);
        out.push_str("**");
        out.push_str(eol);
    }
    for line in body {
        let text = split_eol(line).0;
        if text.trim().is_empty() {
            out.push('>');
        } else {
            out.push_str("> ");
            out.push_str(text);
        }
        out.push_str(eol);
    }
}
