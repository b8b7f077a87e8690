//! Cross-profile dependency conflict detection and reporting.
use log::*;
use std::collections::BTreeMap;

use crate::deps::spec::DependencySpec;

/// One package pinned to different exact versions in different profiles.
#[derive(Debug)]
pub struct Conflict {
    pub package: String,
    /// Exact versions seen, each with the (profile, original spec) pairs
    /// that pin it.
    pub versions: Vec<(String, Vec<(String, String)>)>,
}

/// Find packages with two or more distinct exact pins across profiles.
/// Range constraints never conflict on their own.
pub fn find_conflicts(profiles: &[(String, Vec<String>)]) -> Vec<Conflict> {
    // package -> version -> [(profile, original)]
    let mut package_pins: BTreeMap<
        String,
        BTreeMap<String, Vec<(String, String)>>,
    > = BTreeMap::new();

    for (profile, deps) in profiles {
        for dep in deps {
            let spec = match DependencySpec::parse(dep) {
                Ok(spec) => spec,
                Err(err) => {
                    warn!("{err} in profile '{profile}': skipping");
                    continue;
                }
            };

            if !spec.is_exact_pin() {
                continue;
            }

            let Some(version) = spec.version.clone() else {
                continue;
            };

            package_pins
                .entry(spec.name)
                .or_default()
                .entry(version)
                .or_default()
                .push((profile.clone(), spec.original));
        }
    }

    package_pins
        .into_iter()
        .filter(|(_, versions)| versions.len() > 1)
        .map(|(package, versions)| Conflict {
            package,
            versions: versions.into_iter().collect(),
        })
        .collect()
}

/// Format conflicts into a readable report.
pub fn format_report(conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return "No dependency conflicts found!".to_string();
    }

    let mut report =
        vec!["Dependency conflicts detected:".to_string(), String::new()];

    for (index, conflict) in conflicts.iter().enumerate() {
        report.push(format!("{}. Package: {}", index + 1, conflict.package));

        for (version, occurrences) in conflict.versions.iter() {
            let profiles = occurrences
                .iter()
                .map(|(profile, _)| profile.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            report.push(format!(
                "   Version {version} found in profiles: {profiles}"
            ));

            for (profile, original) in occurrences {
                report.push(format!("     - {profile}: {original}"));
            }
        }

        report.push(String::new());
    }

    report.push("Resolution suggestions:".to_string());
    report.push(
        "   1. Align versions across all profiles to use the same version"
            .to_string(),
    );
    report.push(
        "   2. Remove duplicate dependencies if they're not needed in multiple profiles"
            .to_string(),
    );
    report.push(
        "   3. Use version ranges (>=, <) instead of exact pins where appropriate"
            .to_string(),
    );
    report.push(String::new());

    report.join("\n")
}

/// Per-profile dependency dump appended to detailed reports.
pub fn detailed_appendix(profiles: &[(String, Vec<String>)]) -> String {
    let mut out = vec![
        String::new(),
        String::new(),
        "=".repeat(60),
        "DETAILED ANALYSIS".to_string(),
        "=".repeat(60),
        String::new(),
    ];

    for (profile, deps) in profiles {
        out.push(format!("Profile: {profile}"));
        out.push("-".repeat(profile.len() + 9));

        for dep in deps {
            out.push(format!("  {dep}"));
        }

        out.push(String::new());
    }

    out.join("\n")
}
