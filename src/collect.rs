//! Source tree enumeration.
//!
//! Walks the source root and returns every regular file as a [`SourceFile`],
//! sorted by relative path so runs are reproducible. Excluded directories
//! (by name, anywhere in the tree), the output root and the config file are
//! skipped. Symbolic links are not followed.
//!
//! An unreadable root aborts the run. An unreadable directory further down
//! only loses that subtree: it is logged and reported as a warning.

use crate::config::CONFIG_FILE;
use crate::types::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Cannot read source root {}: {source}", path.display())]
    UnreadableRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files found under a source root.
#[derive(Debug, Default)]
pub struct Collection {
    /// Sorted by relative path.
    pub files: Vec<SourceFile>,
    /// Directories that could not be read, relative to the root when possible.
    pub skipped: Vec<(PathBuf, String)>,
}

impl Collection {
    pub fn markdown(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(|f| f.is_markdown())
    }

    pub fn markdown_count(&self) -> usize {
        self.markdown().count()
    }
}

/// Collect all files under `root`.
///
/// `exclude` holds directory names; `output_root` is skipped if it lies
/// inside the source tree.
pub fn collect(
    root: &Path,
    exclude: &[String],
    output_root: &Path,
) -> Result<Collection, CollectError> {
    fs::read_dir(root).map_err(|source| CollectError::UnreadableRoot {
        path: root.to_path_buf(),
        source,
    })?;

    let output_abs = std::path::absolute(output_root).ok();
    let mut collection = Collection::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, exclude, output_abs.as_deref()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk failed"));
                    return Err(CollectError::UnreadableRoot {
                        path: root.to_path_buf(),
                        source,
                    });
                }
                let path = err
                    .path()
                    .map(|p| p.strip_prefix(root).unwrap_or(p).to_path_buf())
                    .unwrap_or_default();
                warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                collection.skipped.push((path, err.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        if entry.depth() == 1 && rel_path == Path::new(CONFIG_FILE) {
            continue;
        }
        debug!(path = %rel_path.display(), "collected");
        collection.files.push(SourceFile::new(rel_path.to_path_buf()));
    }

    collection.files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(collection)
}

fn is_excluded(entry: &DirEntry, exclude: &[String], output_abs: Option<&Path>) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if exclude.iter().any(|ex| *ex == name) {
        return true;
    }
    match (output_abs, std::path::absolute(entry.path())) {
        (Some(out), Ok(path)) => path == out,
        _ => false,
    }
}
