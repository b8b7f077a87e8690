//! Configuration loading and parsing for `.versionrc.json` files.
//!
//! The type-to-section mapping is ordered: sections render in the order
//! they are configured.
use color_eyre::eyre::WrapErr;
use log::*;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::result::Result;

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = ".versionrc.json";
/// GitHub Actions checkout location searched before the working directory.
pub const WORKSPACE_CONFIG_FILE: &str = "/github/workspace/.versionrc.json";

/// One commit-type to section-title mapping entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeMapping {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub section: String,
}

/// Rules for splitting out a custom section of commits bounded by
/// version-bump commits (e.g. UI-only changes).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CustomSectionConfig {
    pub enabled: bool,
    /// Title of the combined custom section.
    pub section: String,
    /// Tag prefix used when rendering the detected version span.
    #[serde(rename = "tagPrefix")]
    pub tag_prefix: String,
    /// Glob patterns a candidate commit's changed files must match.
    #[serde(rename = "pathPatterns")]
    pub path_patterns: Vec<String>,
    /// Regex identifying bump commits; the first capture group is the
    /// bumped version.
    #[serde(rename = "bumpCommitPattern")]
    pub bump_commit_pattern: Option<String>,
}

impl Default for CustomSectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            section: "UI Changes".to_string(),
            tag_prefix: "v".to_string(),
            path_patterns: vec![],
            bump_commit_pattern: None,
        }
    }
}

/// Root configuration structure for `.versionrc.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered commit-type to section-title mappings.
    pub types: Vec<TypeMapping>,
    /// Issue tracker prefixes (e.g. "DATAGO-"). Opt-in: no references are
    /// extracted unless explicitly configured.
    #[serde(rename = "issuePrefixes")]
    pub issue_prefixes: Option<Vec<String>>,
    /// Issue link template with `{{prefix}}` and `{{id}}` placeholders.
    /// Opt-in alongside `issuePrefixes`.
    #[serde(rename = "issueUrlFormat")]
    pub issue_url_format: Option<String>,
    /// Custom section rules. Accepts the legacy `uiChanges` key.
    #[serde(rename = "customSections", alias = "uiChanges")]
    pub custom_sections: Option<CustomSectionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            types: default_types(),
            issue_prefixes: None,
            issue_url_format: None,
            custom_sections: None,
        }
    }
}

fn default_types() -> Vec<TypeMapping> {
    [
        ("feat", "Features"),
        ("fix", "Bug Fixes"),
        ("ci", "Continuous Integration"),
        ("deps", "Dependencies"),
        ("chore", "Chores"),
        ("build", "Build"),
        ("docs", "Documentation"),
        ("style", "Style"),
        ("refactor", "Refactoring"),
        ("perf", "Performance"),
        ("test", "Tests"),
    ]
    .iter()
    .map(|(commit_type, section)| TypeMapping {
        commit_type: commit_type.to_string(),
        section: section.to_string(),
    })
    .collect()
}

impl Config {
    /// Load configuration from an explicit path, or discover it in the
    /// GitHub Actions workspace then the working directory. A missing
    /// discovered file falls back to defaults; a missing explicit path or
    /// a malformed file is fatal.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(explicit) => Some(explicit.to_path_buf()),
            None => discover_config_file(),
        };

        let Some(config_path) = candidate else {
            warn!("{DEFAULT_CONFIG_FILE} not found: using default configuration");
            return Ok(Self::default());
        };

        let content = fs::read_to_string(&config_path).wrap_err_with(|| {
            format!("failed to read {}", config_path.display())
        })?;

        let mut config: Config =
            serde_json::from_str(&content).wrap_err_with(|| {
                format!("failed to parse {}", config_path.display())
            })?;

        if config.types.is_empty() {
            config.types = default_types();
        }

        Ok(config)
    }

    /// Configured issue prefixes, empty unless explicitly opted in.
    pub fn active_prefixes(&self) -> &[String] {
        self.issue_prefixes.as_deref().unwrap_or_default()
    }

    /// Whether rendered commits should carry issue links: requires both
    /// prefixes and a URL template.
    pub fn issue_links_enabled(&self) -> bool {
        !self.active_prefixes().is_empty()
            && self
                .issue_url_format
                .as_deref()
                .is_some_and(|format| !format.is_empty())
    }
}

fn discover_config_file() -> Option<PathBuf> {
    let workspace = PathBuf::from(WORKSPACE_CONFIG_FILE);
    if workspace.exists() {
        return Some(workspace);
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    None
}
