//! Run driver.
//!
//! ```text
//! collect ──► write (parallel, per file) ──► barrier ──► landing ──► .order
//! ```
//!
//! Only a few things abort a run: an invalid config, an unreadable source
//! root, and an output root that overlaps the source, holds something other
//! than an earlier wiki, or cannot be recreated.
//! Everything else is recorded in the [`RunReport`] and the run carries on.

use crate::collect::{self, CollectError, Collection};
use crate::config::{ConfigError, WikiConfig};
use crate::landing;
use crate::order;
use crate::report::{RunReport, Warning, WarningKind};
use crate::types::DocumentKind;
use crate::write::{self, FileOutcome};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error(
        "output root {} must not contain the source root {}",
        output.display(),
        source_root.display()
    )]
    OutputOverlapsSource { output: PathBuf, source_root: PathBuf },
    #[error("cannot create output root {}: {source}", path.display())]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "output root {} is not empty and was not written by an earlier run (no {} at its top), refusing to replace it",
        path.display(),
        order::ORDER_FILE
    )]
    ForeignOutputRoot { path: PathBuf },
}

/// Convert `source` into a fresh wiki tree at `output`.
pub fn convert(
    source: &Path,
    output: &Path,
    config: &WikiConfig,
) -> Result<RunReport, PipelineError> {
    check_overlap(source, output)?;
    check_replaceable(output)?;

    let collection = collect::collect(source, &config.exclude, output)?;
    info!(
        files = collection.files.len(),
        pages = collection.markdown_count(),
        "collected {}",
        source.display()
    );

    prepare_output_root(output)?;

    let outcomes = write::write_all(&collection.files, source, output, &config.pass_options());
    let mut report = summarize(&collection, &outcomes);

    // Barrier: everything below inspects the complete output tree.
    match landing::resolve(output, source, &collection, &config.landing) {
        Ok(decision) => report.landing = Some(decision),
        Err(err) => {
            tracing::error!(error = %err, "landing page failed");
            report.fail(PathBuf::from(&config.landing.page), err);
        }
    }

    let (entries, failures) = order::emit(output, &config.order.pinned);
    for (path, err) in failures {
        report.fail(path, err);
    }
    report.order = entries;

    info!(
        pages = report.pages_converted,
        assets = report.assets_copied,
        failures = report.failures.len(),
        "conversion finished"
    );
    Ok(report)
}

/// Collect and transform in memory without writing anything.
pub fn check(source: &Path, config: &WikiConfig) -> Result<RunReport, PipelineError> {
    // A path that can never be inside the tree, so nothing extra is skipped.
    let collection = collect::collect(source, &config.exclude, Path::new(""))?;
    let options = config.pass_options();

    let outcomes: Vec<FileOutcome> = collection
        .files
        .par_iter()
        .map(|file| {
            let result = match file.kind {
                DocumentKind::Markdown => {
                    write::transform_file(source, &file.rel_path, &options).map(|t| t.stats)
                }
                DocumentKind::Asset => Ok(Default::default()),
            };
            FileOutcome {
                rel_path: file.rel_path.clone(),
                kind: file.kind,
                result,
            }
        })
        .collect();

    Ok(summarize(&collection, &outcomes))
}

/// Reduce per-file outcomes into a report. Runs after the join.
fn summarize(collection: &Collection, outcomes: &[FileOutcome]) -> RunReport {
    let mut report = RunReport::default();

    for (path, reason) in &collection.skipped {
        tracing::debug!(path = %path.display(), %reason, "skipped directory");
        report.warnings.push(Warning {
            path: path.clone(),
            kind: WarningKind::UnreadableDirectory,
        });
    }

    for outcome in outcomes {
        match &outcome.result {
            Ok(stats) => {
                match outcome.kind {
                    DocumentKind::Markdown => report.pages_converted += 1,
                    DocumentKind::Asset => report.assets_copied += 1,
                }
                report.warn_from_stats(&outcome.rel_path, stats);
            }
            Err(err) => report.fail(outcome.rel_path.clone(), err),
        }
    }
    report.stats = outcomes.iter().map(FileOutcome::stats).sum();
    report
}

fn check_overlap(source: &Path, output: &Path) -> Result<(), PipelineError> {
    let abs = |p: &Path| std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
    let (source_abs, output_abs) = (abs(source), abs(output));
    if source_abs.starts_with(&output_abs) {
        return Err(PipelineError::OutputOverlapsSource {
            output: output.to_path_buf(),
            source_root: source.to_path_buf(),
        });
    }
    Ok(())
}

/// An existing output root is only replaced when it is empty or carries the
/// root `.order` file every run writes.
fn check_replaceable(output: &Path) -> Result<(), PipelineError> {
    let mut entries = match fs::read_dir(output) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(PipelineError::OutputRoot {
                path: output.to_path_buf(),
                source,
            });
        }
    };
    if entries.next().is_none() || output.join(order::ORDER_FILE).is_file() {
        return Ok(());
    }
    Err(PipelineError::ForeignOutputRoot {
        path: output.to_path_buf(),
    })
}

/// Remove any previous output and recreate the root.
fn prepare_output_root(output: &Path) -> Result<(), PipelineError> {
    let to_err = |source| PipelineError::OutputRoot {
        path: output.to_path_buf(),
        source,
    };
    if output.exists() {
        fs::remove_dir_all(output).map_err(to_err)?;
    }
    fs::create_dir_all(output).map_err(to_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landing::{LandingDecision, SynthesisReason};
    use crate::test_helpers::*;

    const HOME: &str = "---\nlayout: home\nhero:\n  name: Contoso\n---\n";

    fn docs_tree() -> tempfile::TempDir {
        write_tree(&[
            ("README.md", "# Contoso SDK\n\nClient libraries for Contoso.\n"),
            ("index.md", HOME),
            (
                "guide/getting-started.md",
                "---\ntitle: Start\n---\n# Getting started\n\nSee [the code](../../src/main.ts).\n",
            ),
            (
                "guide/architecture.md",
                "# Architecture\n\n```mermaid\nflowchart TD\n  A[UI<br/>Shell] -----> B\n```\n",
            ),
            ("guide/broken.md", "```mermaid\nflowchart LR\n"),
            ("api/index.md", "# API\n\n::: tip\nUse the async client.\n:::\n"),
            ("api/client.md", "# Client\n"),
            ("assets/logo.png", "\u{89}PNG"),
            ("node_modules/x/readme.md", "ignored"),
        ])
    }

    #[test]
    fn full_run_mirrors_and_transforms() {
        let src = docs_tree();
        let out = src.path().join("wiki");

        let report = convert(src.path(), &out, &WikiConfig::default()).unwrap();

        assert!(report.succeeded());
        assert_eq!(report.pages_converted, 7);
        assert_eq!(report.assets_copied, 1);
        assert_eq!(report.stats.front_matter_removed, 2);
        assert_eq!(report.stats.diagrams_converted, 1);
        assert_eq!(report.stats.links_rewritten, 1);
        assert_eq!(report.stats.admonitions_converted, 1);
        assert_eq!(
            report.warnings,
            vec![Warning {
                path: PathBuf::from("guide/broken.md"),
                kind: WarningKind::UnbalancedDiagram
            }]
        );

        assert_eq!(
            read(&out, "guide/getting-started.md"),
            "# Getting started\n\nSee the code.\n"
        );
        assert_eq!(
            read(&out, "guide/architecture.md"),
            "# Architecture\n\n::: mermaid\ngraph TD\n  A[UI Shell] --> B\n:::\n"
        );
        assert_eq!(read(&out, "guide/broken.md"), "```mermaid\nflowchart LR\n");
        assert_eq!(read(&out, "api/index.md"), "# API\n\n> [!TIP]\n> Use the async client.\n");
        assert_eq!(fs::read(out.join("assets/logo.png")).unwrap(), "\u{89}PNG".as_bytes());
        assert!(!out.join("node_modules").exists());
        assert!(!out.join("wiki").exists());
    }

    #[test]
    fn hero_only_home_page_is_synthesized() {
        let src = docs_tree();
        let out = src.path().join("wiki");

        let report = convert(src.path(), &out, &WikiConfig::default()).unwrap();

        assert_eq!(
            report.landing,
            Some(LandingDecision::Synthesized {
                reason: SynthesisReason::Trivial
            })
        );
        assert_eq!(
            read(&out, "index.md"),
            "# Contoso SDK\n\nClient libraries for Contoso.\n\n## Sections\n\n\
             | Section | Pages |\n| --- | --- |\n\
             | [Api](api/index.md) | 2 |\n\
             | [Guide](guide/architecture.md) | 3 |\n"
        );
    }

    #[test]
    fn order_files_cover_every_page() {
        let src = docs_tree();
        let out = src.path().join("wiki");

        let report = convert(src.path(), &out, &WikiConfig::default()).unwrap();

        assert_eq!(order_lines(&out, ""), vec!["index", "README"]);
        assert_eq!(
            order_lines(&out, "guide"),
            vec!["getting-started", "architecture", "broken"]
        );
        assert_eq!(order_lines(&out, "api"), vec!["index", "client"]);
        assert!(!out.join("assets/.order").exists());
        assert_eq!(report.order.len(), 3);
    }

    #[test]
    fn real_home_page_is_kept() {
        let src = write_tree(&[("index.md", "# Welcome\n\nReal content.\n")]);
        let out = src.path().join("wiki");

        let report = convert(src.path(), &out, &WikiConfig::default()).unwrap();

        assert_eq!(report.landing, Some(LandingDecision::Kept));
        assert_eq!(read(&out, "index.md"), "# Welcome\n\nReal content.\n");
    }

    #[test]
    fn output_is_fresh_each_run() {
        let src = write_tree(&[("a.md", "# A\n")]);
        let out = tempfile::TempDir::new().unwrap();
        add_files(
            out.path(),
            &[(".order", "stale\n"), ("stale.md", "old"), ("old/.order", "x\n")],
        );

        convert(src.path(), out.path(), &WikiConfig::default()).unwrap();

        assert!(!out.path().join("stale.md").exists());
        assert!(!out.path().join("old").exists());
        assert_eq!(read(out.path(), "a.md"), "# A\n");
    }

    #[test]
    fn foreign_output_directory_is_refused() {
        let src = write_tree(&[("a.md", "# A\n")]);
        let out = write_tree(&[("main.rs", "fn main() {}\n")]);

        let result = convert(src.path(), out.path(), &WikiConfig::default());

        assert!(matches!(result, Err(PipelineError::ForeignOutputRoot { .. })));
        assert_eq!(read(out.path(), "main.rs"), "fn main() {}\n");
    }

    #[test]
    fn previous_wiki_output_is_replaced_on_rerun() {
        let src = write_tree(&[("a.md", "# A\n")]);
        let out = tempfile::TempDir::new().unwrap();

        convert(src.path(), out.path(), &WikiConfig::default()).unwrap();
        fs::remove_file(src.path().join("a.md")).unwrap();
        add_files(src.path(), &[("b.md", "# B\n")]);
        convert(src.path(), out.path(), &WikiConfig::default()).unwrap();

        assert!(!out.path().join("a.md").exists());
        assert_eq!(read(out.path(), "b.md"), "# B\n");
    }

    #[test]
    fn converting_twice_gives_identical_tree() {
        let src = docs_tree();
        let first = tempfile::TempDir::new().unwrap();
        let second = tempfile::TempDir::new().unwrap();

        convert(src.path(), first.path(), &WikiConfig::default()).unwrap();
        let report = convert(first.path(), second.path(), &WikiConfig::default()).unwrap();

        assert_eq!(report.stats.total_rewrites(), 0);
        for page in ["guide/architecture.md", "guide/getting-started.md", "api/index.md"] {
            assert_eq!(read(first.path(), page), read(second.path(), page));
        }
    }

    #[test]
    fn output_containing_source_is_rejected() {
        let parent = tempfile::TempDir::new().unwrap();
        let src = parent.path().join("docs");
        add_files(&src, &[("a.md", "x")]);

        let result = convert(&src, parent.path(), &WikiConfig::default());
        assert!(matches!(result, Err(PipelineError::OutputOverlapsSource { .. })));

        let result = convert(&src, &src, &WikiConfig::default());
        assert!(matches!(result, Err(PipelineError::OutputOverlapsSource { .. })));
        assert!(src.join("a.md").exists());
    }

    #[test]
    fn missing_source_is_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = convert(
            &tmp.path().join("missing"),
            &tmp.path().join("wiki"),
            &WikiConfig::default(),
        );
        assert!(matches!(result, Err(PipelineError::Collect(_))));
        assert!(!tmp.path().join("wiki").exists());
    }

    #[test]
    fn unreadable_page_fails_run_but_writes_the_rest() {
        let src = write_tree(&[("good.md", "# Good\n")]);
        fs::write(src.path().join("bad.md"), [0xc3, 0x28]).unwrap();
        let out = src.path().join("wiki");

        let report = convert(src.path(), &out, &WikiConfig::default()).unwrap();

        assert!(!report.succeeded());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("bad.md"));
        assert_eq!(read(&out, "good.md"), "# Good\n");
        assert_eq!(order_lines(&out, ""), vec!["index", "good"]);
    }

    #[test]
    fn admonitions_disabled_by_config() {
        let src = write_tree(&[("index.md", "# Home\n\n::: tip\nx\n:::\n")]);
        let out = src.path().join("wiki");
        let mut config = WikiConfig::default();
        config.passes.admonitions = false;

        let report = convert(src.path(), &out, &config).unwrap();

        assert_eq!(report.stats.admonitions_converted, 0);
        assert_eq!(read(&out, "index.md"), "# Home\n\n::: tip\nx\n:::\n");
    }

    #[test]
    fn check_writes_nothing() {
        let src = docs_tree();

        let report = check(src.path(), &WikiConfig::default()).unwrap();

        assert_eq!(report.pages_converted, 7);
        assert_eq!(report.stats.diagrams_converted, 1);
        assert_eq!(report.landing, None);
        assert!(report.order.is_empty());
        assert!(!src.path().join("wiki").exists());
        assert_eq!(read(src.path(), "index.md"), HOME);
    }
}
