//! Shared test utilities.
//!
//! Source trees are built in a temp directory from `(relative path, content)`
//! pairs, so each test states its input inline:
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = write_tree(&[
//!     ("index.md", "# Home\n"),
//!     ("guide/intro.md", "# Intro\n"),
//! ]);
//! let out = tmp.path().join("wiki");
//! let report = pipeline::convert(tmp.path(), &out, &WikiConfig::default()).unwrap();
//! assert_eq!(read(&out, ".order"), "index\n");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::collect::Collection;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding the given files.
pub fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    add_files(tmp.path(), files);
    tmp
}

/// Write files (creating parents) under `root`.
pub fn add_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Read a file under `root` as UTF-8. Panics if missing.
pub fn read(root: &Path, rel: &str) -> String {
    let path = root.join(rel);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Relative paths of a collection, `/`-separated.
pub fn rel_paths(collection: &Collection) -> Vec<String> {
    collection
        .files
        .iter()
        .map(|f| crate::naming::url_path(&f.rel_path))
        .collect()
}

/// Lines of a `.order` file in `dir` (relative to `root`).
pub fn order_lines(root: &Path, dir: &str) -> Vec<String> {
    let rel = if dir.is_empty() {
        ".order".to_string()
    } else {
        format!("{dir}/.order")
    };
    read(root, &rel).lines().map(str::to_string).collect()
}
