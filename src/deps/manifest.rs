//! Reads dependency tables from pyproject.toml manifests.
use color_eyre::eyre::WrapErr;
use log::*;
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

use crate::result::Result;

/// Profile names that never contribute to runtime requirement sets.
pub const DEV_PROFILE_NAMES: &[&str] = &[
    "dev",
    "development",
    "develop",
    "test",
    "testing",
    "tests",
    "lint",
    "linting",
    "format",
    "formatting",
    "docs",
    "documentation",
    "build",
    "ci",
    "cd",
    "debug",
    "local",
];

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    project: ProjectTable,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectTable {
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default, rename = "optional-dependencies")]
    optional_dependencies: BTreeMap<String, Vec<String>>,
}

/// Whether a profile name is development-related, case-insensitively.
pub fn is_dev_profile(name: &str) -> bool {
    DEV_PROFILE_NAMES.contains(&name.to_lowercase().as_str())
}

/// Dependency lists per profile: "main" first, then retained optional
/// profiles in name order. Dev-related profiles are skipped.
pub fn load_profiles(path: &Path) -> Result<Vec<(String, Vec<String>)>> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;

    let manifest: PyProject = toml::from_str(&content)
        .wrap_err_with(|| format!("failed to parse {}", path.display()))?;

    let mut profiles = vec![];

    if !manifest.project.dependencies.is_empty() {
        profiles.push(("main".to_string(), manifest.project.dependencies));
    }

    for (name, deps) in manifest.project.optional_dependencies {
        if is_dev_profile(&name) {
            info!("skipping dev profile: {name}");
            continue;
        }

        profiles.push((name, deps));
    }

    Ok(profiles)
}

/// Flattened dependency list across main and retained profiles.
pub fn load_all(path: &Path) -> Result<Vec<String>> {
    Ok(load_profiles(path)?
        .into_iter()
        .flat_map(|(_, deps)| deps)
        .collect())
}
