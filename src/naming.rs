//! Page and section names.
//!
//! Docs trees commonly prefix entries with a number to force an order
//! (`01-getting-started.md`, `020-api/`). The wiki orders pages with `.order`
//! files instead, so the prefix is only meaningful for display: it is dropped
//! and the rest is turned into a title.
//!
//! - `getting-started` → "Getting Started"
//! - `02-api_reference` → "Api Reference"
//! - `faq` → "Faq"

use std::path::Path;

/// Display title for an entry name, with an optional `NNN-` prefix dropped.
///
/// A name that is only a number keeps it as the title so the section still
/// has a label.
pub fn display_title(name: &str) -> String {
    if let Some((prefix, rest)) = name.split_once('-')
        && !rest.is_empty()
        && prefix.parse::<u32>().is_ok()
    {
        return title_case(rest);
    }
    title_case(name)
}

/// Page name as the wiki sees it: the file stem, extension dropped.
pub fn page_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// Whether `path` names a wiki page.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Relative path rendered with `/` separators, as used in wiki links.
pub fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().replace(' ', "%20"))
        .collect::<Vec<_>>()
        .join("/")
}

fn title_case(raw: &str) -> String {
    raw.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
