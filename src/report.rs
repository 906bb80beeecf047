//! Run report.
//!
//! Everything a run did, gathered after the barrier: per-file outcomes
//! reduced into totals, warnings and failures with their paths, the landing
//! decision and the `.order` files. Serialized as JSON for `--report`.

use crate::landing::LandingDecision;
use crate::stats::TransformStats;
use crate::types::OrderEntry;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MalformedFrontMatter,
    UnbalancedDiagram,
    UnreadableDirectory,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MalformedFrontMatter => "unterminated front matter left in place",
            Self::UnbalancedDiagram => "mermaid block never closed, left unchanged",
            Self::UnreadableDirectory => "directory could not be read, skipped",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub path: PathBuf,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Markdown pages converted successfully.
    pub pages_converted: usize,
    /// Assets copied successfully.
    pub assets_copied: usize,
    pub stats: TransformStats,
    pub warnings: Vec<Warning>,
    pub failures: Vec<Failure>,
    /// `None` for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing: Option<LandingDecision>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<OrderEntry>,
}

impl RunReport {
    pub fn files_processed(&self) -> usize {
        self.pages_converted + self.assets_copied
    }

    /// True when every file was written. Warnings do not count.
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record the warnings implied by one document's stats.
    pub fn warn_from_stats(&mut self, path: &std::path::Path, stats: &TransformStats) {
        for _ in 0..stats.malformed_front_matter {
            self.warnings.push(Warning {
                path: path.to_path_buf(),
                kind: WarningKind::MalformedFrontMatter,
            });
        }
        for _ in 0..stats.unbalanced_diagrams {
            self.warnings.push(Warning {
                path: path.to_path_buf(),
                kind: WarningKind::UnbalancedDiagram,
            });
        }
    }

    pub fn fail(&mut self, path: impl Into<PathBuf>, message: impl fmt::Display) {
        self.failures.push(Failure {
            path: path.into(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn warnings_derived_from_stats() {
        let mut report = RunReport::default();
        let stats = TransformStats {
            malformed_front_matter: 1,
            unbalanced_diagrams: 2,
            ..Default::default()
        };
        report.warn_from_stats(Path::new("guide/a.md"), &stats);

        let kinds: Vec<WarningKind> = report.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WarningKind::MalformedFrontMatter,
                WarningKind::UnbalancedDiagram,
                WarningKind::UnbalancedDiagram
            ]
        );
        assert!(report.succeeded());
    }

    #[test]
    fn any_failure_fails_the_run() {
        let mut report = RunReport::default();
        report.fail("a.md", "cannot write a.md: disk full");
        assert!(!report.succeeded());
        assert_eq!(report.failures[0].path, PathBuf::from("a.md"));
    }

    #[test]
    fn json_shape() {
        let report = RunReport {
            pages_converted: 2,
            assets_copied: 1,
            warnings: vec![Warning {
                path: "x.md".into(),
                kind: WarningKind::UnbalancedDiagram,
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pages_converted"], 2);
        assert_eq!(json["warnings"][0]["kind"], "unbalanced_diagram");
        assert!(json.get("landing").is_none());
        assert!(json.get("order").is_none());
        assert_eq!(report.files_processed(), 3);
    }
}
