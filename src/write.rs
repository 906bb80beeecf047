//! Output tree writer.
//!
//! Mirrors every collected file into the output root: markdown goes through
//! [`passes::transform`], assets are copied byte-for-byte. Files are handled
//! in parallel with rayon; each task returns its own [`FileOutcome`] and the
//! stats are summed once all tasks have joined.
//!
//! A file is written to a temporary sibling and renamed into place, so the
//! output never holds a half-written page. Failures are per file: they are
//! logged, recorded, and do not stop the other files.

use crate::passes::{self, PassOptions};
use crate::stats::TransformStats;
use crate::types::{DocumentKind, SourceFile};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to one collected file.
#[derive(Debug)]
pub struct FileOutcome {
    pub rel_path: PathBuf,
    pub kind: DocumentKind,
    pub result: Result<TransformStats, WriteError>,
}

impl FileOutcome {
    pub fn stats(&self) -> TransformStats {
        self.result.as_ref().copied().unwrap_or_default()
    }
}

/// Write every file into `output_root`. Outcomes keep the input order.
pub fn write_all(
    files: &[SourceFile],
    source_root: &Path,
    output_root: &Path,
    options: &PassOptions,
) -> Vec<FileOutcome> {
    files
        .par_iter()
        .map(|file| {
            let result = write_one(file, source_root, output_root, options);
            if let Err(err) = &result {
                error!(path = %file.rel_path.display(), error = %err, "file failed");
            }
            FileOutcome {
                rel_path: file.rel_path.clone(),
                kind: file.kind,
                result,
            }
        })
        .collect()
}

fn write_one(
    file: &SourceFile,
    source_root: &Path,
    output_root: &Path,
    options: &PassOptions,
) -> Result<TransformStats, WriteError> {
    let src = source_root.join(&file.rel_path);
    let dst = output_root.join(&file.rel_path);

    let (bytes, stats) = match file.kind {
        DocumentKind::Markdown => {
            let transformed = transform_file(source_root, &file.rel_path, options)?;
            (transformed.content.into_bytes(), transformed.stats)
        }
        DocumentKind::Asset => {
            let bytes = fs::read(&src).map_err(|source| WriteError::Read {
                path: file.rel_path.clone(),
                source,
            })?;
            (bytes, TransformStats::default())
        }
    };

    write_atomic(&dst, &bytes).map_err(|source| WriteError::Write {
        path: file.rel_path.clone(),
        source,
    })?;
    debug!(path = %file.rel_path.display(), %stats, "written");
    Ok(stats)
}

/// Read a markdown file and run the pass pipeline over it.
pub fn transform_file(
    source_root: &Path,
    rel_path: &Path,
    options: &PassOptions,
) -> Result<passes::Transformed, WriteError> {
    let content =
        fs::read_to_string(source_root.join(rel_path)).map_err(|source| WriteError::Read {
            path: rel_path.to_path_buf(),
            source,
        })?;
    Ok(passes::transform(&content, options))
}

/// Write `bytes` to `path` through a temporary sibling and a rename,
/// creating parent directories as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let written = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}
