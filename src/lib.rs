//! # ADO Wiki
//!
//! Converts a documentation tree written for GitHub or VitePress into one an
//! Azure DevOps wiki renders correctly. The source tree is mirrored into a
//! fresh output root: markdown pages are rewritten, everything else is copied
//! byte-for-byte.
//!
//! # Architecture: Per-File Passes, Then Whole-Tree Steps
//!
//! ```text
//! 1. Collect   docs/      →  sorted file list        (filesystem walk)
//! 2. Write     file list  →  wiki/                   (parallel, one task per file)
//! 3. Landing   wiki/      →  wiki/index.md           (kept or synthesized)
//! 4. Order     wiki/      →  wiki/**/.order          (one per page directory)
//! ```
//!
//! Stage 2 is embarrassingly parallel: a page's rewrites depend only on its
//! own text, so each file is one rayon task returning its own stats. Stages
//! 3 and 4 look at the whole output tree and run only after every task has
//! joined.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collect`] | Walks the source root, applies exclusions, classifies files |
//! | [`passes`] | The four text rewrites: front matter, diagrams, links, admonitions |
//! | [`write`] | Mirrors files into the output root through atomic writes |
//! | [`landing`] | Keeps or synthesizes the root landing page |
//! | [`order`] | Emits `.order` files with pinned onboarding pages first |
//! | [`pipeline`] | Drives a run (`convert`) or a dry run (`check`) |
//! | [`report`] | Run totals, warnings and failures; serialized for `--report` |
//! | [`config`] | `ado-wiki.toml` loading, merging over stock defaults, validation |
//! | [`stats`] | Per-pass rewrite counters, summed across files |
//! | [`naming`] | Page names, section titles and URL paths from file names |
//! | [`types`] | Shared types: `SourceFile`, `DocumentKind`, `OrderEntry` |
//! | [`output`] | CLI output formatting of the run summary |
//!
//! # Design Decisions
//!
//! ## Passes Are Line-Oriented Text Rewrites
//!
//! The passes never parse the document into a tree and render it back. A
//! markdown renderer round-trip would normalize spacing, list markers and
//! emphasis all over the page; line-level rewrites leave every byte they do
//! not target untouched, which is what makes a second run a no-op. The one
//! place a real parser is used is reading the README for the landing page,
//! where only text is extracted and nothing is rendered.
//!
//! ## Fresh Output Every Run
//!
//! The output root is removed and recreated before writing. Pages deleted
//! from the source disappear from the wiki, and `.order` files never list
//! stale entries. A non-empty directory without a root `.order` was not
//! written by an earlier run and is refused instead of removed.
//!
//! ## Failures Are Per File
//!
//! Only an unusable source root, an unusable output root or an invalid
//! config stops a run. A page that cannot be read or written is reported
//! with its path and the exit status becomes 1, but every other page still
//! lands in the wiki.

pub mod collect;
pub mod config;
pub mod landing;
pub mod naming;
pub mod order;
pub mod output;
pub mod passes;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod types;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
