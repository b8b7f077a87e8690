//! Requirement consolidation: one spec per package, highest exact pin
//! wins.
use color_eyre::eyre::WrapErr;
use log::*;
use std::{collections::BTreeMap, fs, path::Path};

use crate::{deps::spec::DependencySpec, result::Result, version_helpers};

/// Consolidate raw dependency strings down to one retained entry per
/// normalized package name. Malformed entries are skipped with a warning.
pub fn consolidate(all_deps: &[String]) -> BTreeMap<String, String> {
    let mut grouped: BTreeMap<String, Vec<DependencySpec>> = BTreeMap::new();

    for dep in all_deps {
        match DependencySpec::parse(dep) {
            Ok(spec) => {
                grouped.entry(spec.name.clone()).or_default().push(spec)
            }
            Err(err) => warn!("{err}: skipping"),
        }
    }

    grouped
        .into_iter()
        .map(|(name, specs)| {
            let retained = select_spec(&specs).original.clone();
            (name, retained)
        })
        .collect()
}

/// Pick the retained spec for one package: the highest exact pin when any
/// exists, otherwise the first occurrence.
fn select_spec(specs: &[DependencySpec]) -> &DependencySpec {
    if specs.len() == 1 {
        return &specs[0];
    }

    let mut best: Option<(semver::Version, &DependencySpec)> = None;

    for spec in specs {
        if !spec.is_exact_pin() {
            continue;
        }

        let Some(version) = spec
            .version
            .as_deref()
            .and_then(version_helpers::parse_lenient)
        else {
            continue;
        };

        match &best {
            Some((current, _)) if *current >= version => {}
            _ => best = Some((version, spec)),
        }
    }

    best.map(|(_, spec)| spec).unwrap_or(&specs[0])
}

/// Write consolidated requirements sorted by package name, one original
/// spec string per line.
pub fn write_requirements(
    consolidated: &BTreeMap<String, String>,
    output: &Path,
) -> Result<()> {
    let mut content = String::new();

    for dep in consolidated.values() {
        content.push_str(dep);
        content.push('\n');
    }

    fs::write(output, content)
        .wrap_err_with(|| format!("failed to write {}", output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn highest_exact_pin_wins() {
        let consolidated =
            consolidate(&deps(&["requests==2.0", "requests==2.5"]));

        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated["requests"], "requests==2.5");
    }

    #[test]
    fn single_occurrence_kept_verbatim() {
        let original = "uvicorn>=0.23 ; sys_platform != \"win32\"";
        let consolidated = consolidate(&deps(&[original]));

        assert_eq!(consolidated["uvicorn"], original);
    }

    #[test]
    fn first_occurrence_wins_without_exact_pins() {
        let consolidated =
            consolidate(&deps(&["requests>=2.0", "requests>=2.5"]));

        assert_eq!(consolidated["requests"], "requests>=2.0");
    }

    #[test]
    fn exact_pin_beats_ranges() {
        let consolidated =
            consolidate(&deps(&["requests>=2.0", "requests==2.5"]));

        assert_eq!(consolidated["requests"], "requests==2.5");
    }

    #[test]
    fn groups_by_normalized_name() {
        let consolidated =
            consolidate(&deps(&["My_Package==1.0", "my-package==2.0"]));

        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated["my-package"], "my-package==2.0");
    }

    #[test]
    fn skips_malformed_entries() {
        let consolidated =
            consolidate(&deps(&["requests==2.5", "not a package"]));

        assert_eq!(consolidated.len(), 1);
        assert!(consolidated.contains_key("requests"));
    }

    #[test]
    fn writes_sorted_requirements() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("requirements.txt");

        let consolidated =
            consolidate(&deps(&["zlib-ng==1.0", "attrs==23.1.0"]));
        write_requirements(&consolidated, &output).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, "attrs==23.1.0\nzlib-ng==1.0\n");
    }
}
