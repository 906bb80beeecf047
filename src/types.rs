//! Types shared between the collector, the writer and the whole-tree steps.

use serde::Serialize;
use std::path::PathBuf;

/// How a collected file is treated by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// `.md` page: run through the rewrite passes.
    Markdown,
    /// Anything else: copied byte-for-byte.
    Asset,
}

/// A file found by the collector, identified by its path relative to the
/// source root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub rel_path: PathBuf,
    pub kind: DocumentKind,
}

impl SourceFile {
    pub fn new(rel_path: PathBuf) -> Self {
        let kind = if crate::naming::is_markdown(&rel_path) {
            DocumentKind::Markdown
        } else {
            DocumentKind::Asset
        };
        Self { rel_path, kind }
    }

    pub fn is_markdown(&self) -> bool {
        self.kind == DocumentKind::Markdown
    }
}

/// Per-directory page order written to `.order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderEntry {
    /// Directory relative to the output root (empty for the root itself).
    pub dir: PathBuf,
    /// Page names without extension, in display order.
    pub pages: Vec<String>,
}
