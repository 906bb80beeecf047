//! `.order` files.
//!
//! The wiki shows sibling pages in the order given by a `.order` file in
//! their directory (one page name per line, no extension). Every directory of
//! the output tree that holds pages gets one, regenerated from scratch: pinned
//! onboarding pages first, the rest in collector order.

use crate::naming;
use crate::types::OrderEntry;
use crate::write::write_atomic;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const ORDER_FILE: &str = ".order";

/// Display order for one directory's pages.
///
/// `pages` must be in collector order. Pinned names match case-insensitively
/// and keep the allowlist's order; every page appears exactly once.
pub fn plan(pages: &[String], pinned: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::with_capacity(pages.len());

    for pin in pinned {
        for page in pages {
            if page.eq_ignore_ascii_case(pin) && seen.insert(page.as_str()) {
                ordered.push(page.clone());
            }
        }
    }
    for page in pages {
        if seen.insert(page.as_str()) {
            ordered.push(page.clone());
        }
    }
    ordered
}

/// Write a `.order` file into every page directory under `output_root`.
///
/// Returns the written entries and the directories whose file could not be
/// written.
pub fn emit(output_root: &Path, pinned: &[String]) -> (Vec<OrderEntry>, Vec<(PathBuf, io::Error)>) {
    let mut entries = Vec::new();
    let mut failures = Vec::new();

    for (dir, pages) in pages_by_directory(output_root) {
        let ordered = plan(&pages, pinned);
        let mut body = ordered.join("\n");
        body.push('\n');

        match write_atomic(&output_root.join(&dir).join(ORDER_FILE), body.as_bytes()) {
            Ok(()) => {
                debug!(dir = %dir.display(), pages = ordered.len(), "wrote .order");
                entries.push(OrderEntry {
                    dir,
                    pages: ordered,
                });
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "cannot write .order");
                failures.push((dir.join(ORDER_FILE), err));
            }
        }
    }

    (entries, failures)
}

/// Page names grouped by directory (relative to `root`), each list in file
/// name order.
fn pages_by_directory(root: &Path) -> BTreeMap<PathBuf, Vec<String>> {
    let mut grouped: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok());

    for entry in walker {
        if !entry.file_type().is_file() || !naming::is_markdown(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let (Some(dir), Some(name)) = (rel.parent(), naming::page_name(rel)) else {
            continue;
        };
        let pages = grouped.entry(dir.to_path_buf()).or_default();
        if !pages.contains(&name) {
            pages.push(name);
        }
    }
    grouped
}
