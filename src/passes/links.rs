//! Links that climb out of the documentation root.
//!
//! A target such as `../../src/client.ts` points at the repository, not the
//! docs, and cannot resolve once the pages live in a wiki. Those links are
//! reduced to their label; everything else is left byte-for-byte.
//!
//! Code is sample text, not navigation: lines inside backtick fences and
//! links that start inside an inline code span are kept as written.

use super::split_eol;
use crate::stats::TransformStats;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

// `!` is captured so image syntax can be told apart from links; the regex
// crate has no look-behind.
static PARENT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\[\]]*)\]\((?:\.\./)+[^()\s]*(?:\s+"[^"]*")?\)"#).expect("valid regex")
});

/// Replace every `[label](../...)` link outside code with `label`.
pub fn rewrite(content: &str, stats: &mut TransformStats) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_fence = false;

    for line in content.split_inclusive('\n') {
        let (body, eol) = split_eol(line);
        let is_fence = body.trim_start().starts_with("```");
        if is_fence {
            in_fence = !in_fence;
        }
        if is_fence || in_fence {
            out.push_str(line);
            continue;
        }
        let (rewritten, count) = rewrite_line(body);
        stats.links_rewritten += count;
        out.push_str(&rewritten);
        out.push_str(eol);
    }
    out
}

/// Rewrite one line until no parent link is left, so a label that itself
/// held a link is reduced too.
///
/// A result that would read as a fence, container or delimiter line keeps
/// the original line instead.
fn rewrite_line(line: &str) -> (String, usize) {
    let mut current = line.to_string();
    let mut total = 0;
    loop {
        let spans = code_spans(&current);
        let mut rewritten = 0;
        let next = PARENT_LINK.replace_all(&current, |caps: &Captures<'_>| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if &caps[1] == "!" || spans.iter().any(|span| span.contains(&start)) {
                return caps[0].to_string();
            }
            rewritten += 1;
            caps[2].to_string()
        });
        if rewritten == 0 {
            break;
        }
        current = next.into_owned();
        total += rewritten;
    }

    if total > 0 && is_structural(&current) {
        return (line.to_string(), 0);
    }
    (current, total)
}

/// Byte ranges of inline code spans: a backtick run up to the next run of
/// the same length.
fn code_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut runs = Vec::new();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'`' {
            let start = idx;
            while idx < bytes.len() && bytes[idx] == b'`' {
                idx += 1;
            }
            runs.push((start, idx - start));
        } else {
            idx += 1;
        }
    }

    let mut spans = Vec::new();
    let mut open = 0;
    while open < runs.len() {
        let (start, len) = runs[open];
        match runs[open + 1..].iter().position(|&(_, l)| l == len) {
            Some(offset) => {
                let (close, close_len) = runs[open + 1 + offset];
                spans.push(start..close + close_len);
                open += offset + 2;
            }
            None => open += 1,
        }
    }
    spans
}

fn is_structural(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("```") || trimmed.starts_with(":::") || trimmed == "---" || trimmed == "+++"
}
