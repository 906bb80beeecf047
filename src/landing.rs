//! Root page resolution.
//!
//! Static-site generators often ship a home page that is all front matter
//! (`layout: home`, `hero:` ...) or a template nobody filled in. After the
//! passes run, such a page is empty or still carries boilerplate, and the
//! wiki would open on it. The resolver runs once every document is written
//! and decides between two outcomes:
//!
//! - **Kept**: the written page has real content and no placeholder signature.
//! - **Synthesized**: the page is missing, trivial, or carries a signature. It
//!   is replaced by a generated page:
//!
//! ```text
//! # Contoso SDK                       ← first H1 of README.md (or fallback)
//!
//! Client libraries for Contoso.       ← first text paragraph of README.md
//!
//! ## Sections
//!
//! | Section | Pages |
//! | --- | --- |
//! | [Api](api/index.md) | 4 |
//! | [Guide](guide/getting-started.md) | 7 |
//! ```
//!
//! The placeholder check is authoritative: a title or paragraph taken from
//! the README that itself contains a signature is replaced by the fallback.

use crate::collect::Collection;
use crate::config::LandingConfig;
use crate::naming;
use crate::passes::front_matter;
use crate::write::write_atomic;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::info;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

const FALLBACK_OVERVIEW: &str =
    "This wiki was generated from the project documentation. Start with one of the sections below.";

#[derive(Error, Debug)]
pub enum LandingError {
    #[error("cannot read landing page {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write landing page {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Which branch the resolver took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum LandingDecision {
    Kept,
    Synthesized { reason: SynthesisReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "signature", rename_all = "snake_case")]
pub enum SynthesisReason {
    /// No root page was written.
    Missing,
    /// Nothing but whitespace and HTML comments.
    Trivial,
    /// Contains this placeholder signature.
    Placeholder(String),
}

/// A top-level directory offered in the navigation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Entry page, relative to the output root.
    pub entry: PathBuf,
    pub page_count: usize,
}

/// Title and overview for a synthesized page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub title: String,
    pub overview: String,
}

/// Inspect the written root page and replace it when it is not usable.
pub fn resolve(
    output_root: &Path,
    source_root: &Path,
    collection: &Collection,
    config: &LandingConfig,
) -> Result<LandingDecision, LandingError> {
    let page_path = output_root.join(&config.page);

    let reason = match fs::read_to_string(&page_path) {
        Ok(content) => match assess(&content, &config.placeholders) {
            None => {
                info!(page = %config.page, "keeping landing page");
                return Ok(LandingDecision::Kept);
            }
            Some(reason) => reason,
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => SynthesisReason::Missing,
        Err(source) => {
            return Err(LandingError::Read {
                path: PathBuf::from(&config.page),
                source,
            });
        }
    };

    let project = project_info(source_root, config);
    let sections = discover_sections(collection, &config.page);
    let page = synthesize(&project, &sections);
    write_atomic(&page_path, page.as_bytes()).map_err(|source| LandingError::Write {
        path: PathBuf::from(&config.page),
        source,
    })?;

    info!(page = %config.page, ?reason, sections = sections.len(), "synthesized landing page");
    Ok(LandingDecision::Synthesized { reason })
}

/// Why `content` cannot stay as the landing page, or `None` if it can.
pub fn assess(content: &str, placeholders: &[String]) -> Option<SynthesisReason> {
    if let Some(signature) = find_placeholder(content, placeholders) {
        return Some(SynthesisReason::Placeholder(signature.to_string()));
    }
    if HTML_COMMENT.replace_all(content, "").trim().is_empty() {
        return Some(SynthesisReason::Trivial);
    }
    None
}

/// First signature that occurs in `text`, compared case-insensitively.
pub fn find_placeholder<'a>(text: &str, placeholders: &'a [String]) -> Option<&'a str> {
    let haystack = text.to_lowercase();
    placeholders
        .iter()
        .filter(|p| !p.trim().is_empty())
        .find(|p| haystack.contains(&p.to_lowercase()))
        .map(String::as_str)
}

/// Top-level directories that contain markdown, in collector order.
///
/// The entry page is the directory's `index.md`, then its `README.md`, then
/// its first direct page, then the first page anywhere below it.
pub fn discover_sections(collection: &Collection, landing_page: &str) -> Vec<Section> {
    let mut grouped: BTreeMap<String, Vec<&Path>> = BTreeMap::new();
    for file in collection.markdown() {
        let mut components = file.rel_path.components();
        let (Some(top), Some(_)) = (components.next(), components.next()) else {
            continue;
        };
        grouped
            .entry(top.as_os_str().to_string_lossy().into_owned())
            .or_default()
            .push(&file.rel_path);
    }

    grouped
        .into_iter()
        .filter_map(|(dir, pages)| {
            let direct: Vec<&Path> = pages
                .iter()
                .copied()
                .filter(|p| p.components().count() == 2)
                .collect();
            let named = |wanted: &str| {
                direct.iter().copied().find(|p| {
                    p.file_name()
                        .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(wanted))
                })
            };
            let entry = named(landing_page)
                .or_else(|| named("README.md"))
                .or_else(|| direct.first().copied())
                .or_else(|| pages.first().copied())?;
            Some(Section {
                title: naming::display_title(&dir),
                entry: entry.to_path_buf(),
                page_count: pages.len(),
            })
        })
        .collect()
}

/// Title and overview from the first existing description source.
///
/// Anything carrying a placeholder signature falls back, so the synthesized
/// page never contains one.
pub fn project_info(source_root: &Path, config: &LandingConfig) -> ProjectInfo {
    let extracted = config
        .description_sources
        .iter()
        .map(|name| source_root.join(name))
        .find_map(|path| fs::read_to_string(path).ok())
        .map(|content| extract_title_and_overview(front_matter::split_front_matter(&content).0))
        .unwrap_or_default();

    let usable = |text: Option<String>| {
        text.filter(|t| !t.is_empty() && find_placeholder(t, &config.placeholders).is_none())
    };
    ProjectInfo {
        title: usable(extracted.0).unwrap_or_else(|| config.fallback_title.clone()),
        overview: usable(extracted.1).unwrap_or_else(|| FALLBACK_OVERVIEW.to_string()),
    }
}

/// First H1 and first plain-text paragraph of a markdown document.
///
/// Paragraphs holding images (badge rows) are skipped.
pub fn extract_title_and_overview(markdown: &str) -> (Option<String>, Option<String>) {
    let mut title = None;
    let mut overview = None;
    let mut buffer = String::new();
    let mut in_title = false;
    let mut in_paragraph = false;
    let mut has_image = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if title.is_none() => {
                in_title = true;
                buffer.clear();
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_title => {
                in_title = false;
                title = Some(collapse_whitespace(&buffer));
            }
            Event::Start(Tag::Paragraph) if overview.is_none() && !in_title => {
                in_paragraph = true;
                has_image = false;
                buffer.clear();
            }
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                in_paragraph = false;
                let text = collapse_whitespace(&buffer);
                if !has_image && !text.is_empty() {
                    overview = Some(text);
                }
            }
            Event::Start(Tag::Image { .. }) if in_paragraph => has_image = true,
            Event::Text(text) | Event::Code(text) if in_title || in_paragraph => {
                buffer.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_title || in_paragraph => buffer.push(' '),
            _ => {}
        }
        if title.is_some() && overview.is_some() {
            break;
        }
    }

    (title, overview)
}

/// Markdown for a generated landing page.
pub fn synthesize(project: &ProjectInfo, sections: &[Section]) -> String {
    let mut page = format!("# {}\n\n{}\n\n## Sections\n\n", project.title, project.overview);
    if sections.is_empty() {
        page.push_str("No documentation sections were found.\n");
        return page;
    }
    page.push_str("| Section | Pages |\n| --- | --- |\n");
    for section in sections {
        page.push_str(&format!(
            "| [{}]({}) | {} |\n",
            section.title.replace('|', "\\|"),
            naming::url_path(&section.entry),
            section.page_count
        ));
    }
    page
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
