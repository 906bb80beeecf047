//! Rewrite counters.
//!
//! Every pass bumps its own counter on a document-local [`TransformStats`].
//! Documents are converted in parallel, so there is no shared accumulator:
//! each task returns its stats and the writer sums them after the join.

use serde::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Leading front-matter blocks removed.
    pub front_matter_removed: usize,
    /// Mermaid fences converted to `::: mermaid` blocks.
    pub diagrams_converted: usize,
    /// `../` links replaced by their label.
    pub links_rewritten: usize,
    /// `::: tip` style containers converted to block-quote alerts.
    pub admonitions_converted: usize,
    /// Opening front-matter delimiter without a closing one.
    pub malformed_front_matter: usize,
    /// Mermaid fence opened but never closed.
    pub unbalanced_diagrams: usize,
}

impl TransformStats {
    pub fn total_rewrites(&self) -> usize {
        self.front_matter_removed
            + self.diagrams_converted
            + self.links_rewritten
            + self.admonitions_converted
    }

    pub fn total_warnings(&self) -> usize {
        self.malformed_front_matter + self.unbalanced_diagrams
    }
}

impl AddAssign for TransformStats {
    fn add_assign(&mut self, other: Self) {
        self.front_matter_removed += other.front_matter_removed;
        self.diagrams_converted += other.diagrams_converted;
        self.links_rewritten += other.links_rewritten;
        self.admonitions_converted += other.admonitions_converted;
        self.malformed_front_matter += other.malformed_front_matter;
        self.unbalanced_diagrams += other.unbalanced_diagrams;
    }
}

impl Add for TransformStats {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for TransformStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a TransformStats> for TransformStats {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for TransformStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} front matter, {} diagrams, {} links, {} admonitions",
            self.front_matter_removed,
            self.diagrams_converted,
            self.links_rewritten,
            self.admonitions_converted
        )?;
        let warnings = self.total_warnings();
        if warnings > 0 {
            write!(f, " ({warnings} warnings)")?;
        }
        Ok(())
    }
}
