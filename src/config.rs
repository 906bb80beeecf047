//! Converter configuration.
//!
//! Loaded from `ado-wiki.toml` in the source root. The file is optional and
//! sparse: stock defaults are serialized to a TOML table, the user's values
//! are merged on top key-by-key, and the result is deserialized and
//! validated.
//!
//! ```toml
//! # Directory names skipped anywhere in the tree
//! exclude = [".git", "node_modules", ".vitepress", "dist", "build", "target", "__pycache__", ".venv"]
//!
//! [passes]
//! admonitions = true        # ::: tip → > [!TIP]
//!
//! [landing]
//! page = "index.md"         # Root page inspected after conversion
//! description_sources = ["README.md"]
//! fallback_title = "Documentation"
//! placeholders = ["TODO: add content", "Lorem ipsum", "layout: home", "hero:", "<VPHero", "{{ $frontmatter"]
//!
//! [order]
//! pinned = ["index", "readme", "overview", "introduction", "getting-started", "quickstart", "installation", "setup", "onboarding"]
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Lists replace the stock list wholesale. Unknown keys are rejected to catch
//! typos early.

use crate::passes::PassOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source root.
pub const CONFIG_FILE: &str = "ado-wiki.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WikiConfig {
    /// Directory names excluded from collection wherever they appear.
    pub exclude: Vec<String>,
    pub passes: PassesConfig,
    pub landing: LandingConfig,
    pub order: OrderConfig,
    pub processing: ProcessingConfig,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            exclude: [
                ".git",
                "node_modules",
                ".vitepress",
                "dist",
                "build",
                "target",
                "__pycache__",
                ".venv",
            ]
            .map(String::from)
            .to_vec(),
            passes: PassesConfig::default(),
            landing: LandingConfig::default(),
            order: OrderConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl WikiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exclude.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "exclude entries must not be empty".into(),
            ));
        }
        let page = Path::new(&self.landing.page);
        if page.components().count() != 1 || !crate::naming::is_markdown(page) {
            return Err(ConfigError::Validation(
                "landing.page must be a .md file name in the output root".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn pass_options(&self) -> PassOptions {
        PassOptions {
            admonitions: self.passes.admonitions,
        }
    }
}

/// Optional rewrite passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassesConfig {
    /// Convert `::: tip` style containers into block-quote alerts.
    pub admonitions: bool,
}

impl Default for PassesConfig {
    fn default() -> Self {
        Self { admonitions: true }
    }
}

/// Landing page resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LandingConfig {
    /// Root page file name, relative to the output root.
    pub page: String,
    /// Files in the source root read for the synthesized title and
    /// overview. First existing one wins.
    pub description_sources: Vec<String>,
    /// Title used when no description source has a heading.
    pub fallback_title: String,
    /// Case-insensitive signatures of boilerplate that must not survive.
    pub placeholders: Vec<String>,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            page: "index.md".to_string(),
            description_sources: vec!["README.md".to_string()],
            fallback_title: "Documentation".to_string(),
            placeholders: [
                "TODO: add content",
                "Lorem ipsum",
                "layout: home",
                "hero:",
                "<VPHero",
                "{{ $frontmatter",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// `.order` generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderConfig {
    /// Page names listed first, in this order, when present.
    pub pinned: Vec<String>,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            pinned: [
                "index",
                "readme",
                "overview",
                "introduction",
                "getting-started",
                "quickstart",
                "installation",
                "setup",
                "onboarding",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel conversion workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(WikiConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value (arrays included)
/// replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `ado-wiki.toml` from `dir` as a raw TOML value, `None` if absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<WikiConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: WikiConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a source root: stock defaults plus the user's file.
pub fn load_config(source_root: &Path) -> Result<WikiConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(source_root)?;
    resolve_config(base, overlay)
}

/// A fully-commented stock `ado-wiki.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# ado-wiki configuration
# ======================
# Place this file in the source root as ado-wiki.toml.
# All settings are optional; values shown below are the defaults.
# Unknown keys cause an error. Lists replace the defaults entirely.

# Directory names skipped wherever they appear in the source tree
# (version control, dependency caches, previous build output).
exclude = [".git", "node_modules", ".vitepress", "dist", "build", "target", "__pycache__", ".venv"]

# ---------------------------------------------------------------------------
# Rewrite passes
# ---------------------------------------------------------------------------
[passes]
# Convert VitePress containers (::: tip / warning / danger / info)
# into block-quote alerts (> [!TIP] ...).
admonitions = true

# ---------------------------------------------------------------------------
# Landing page
# ---------------------------------------------------------------------------
[landing]
# Root page of the wiki, relative to the output root.
page = "index.md"

# Files in the source root used for the title and overview paragraph of a
# synthesized landing page. The first one that exists wins.
description_sources = ["README.md"]

# Title used when no description source provides a heading.
fallback_title = "Documentation"

# Boilerplate that marks a landing page as a placeholder (case-insensitive).
# A page containing any of these is replaced by a generated one.
placeholders = ["TODO: add content", "Lorem ipsum", "layout: home", "hero:", "<VPHero", "{{ $frontmatter"]

# ---------------------------------------------------------------------------
# Page order
# ---------------------------------------------------------------------------
[order]
# Pages listed first in every .order file, in this order, when present.
# Matched case-insensitively against file names without extension.
pinned = ["index", "readme", "overview", "introduction", "getting-started", "quickstart", "installation", "setup", "onboarding"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers. Omit for auto (number of CPU cores).
# Values above the core count are clamped down.
# max_processes = 4
"##
}
