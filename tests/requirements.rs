//! End-to-end tests for the dependency consolidation and validation
//! tooling, driven through the public API against real manifest files.
use std::{fs, io::Write as _};

use changekit::deps::{consolidate, manifest, validate};

fn manifest_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn consolidates_duplicate_pins_to_highest_version() {
    let file = manifest_file(
        r#"
[project]
name = "demo"
dependencies = ["requests==2.0"]

[project.optional-dependencies]
gcp = ["requests==2.5", "google-cloud-storage==2.10.0"]
"#,
    );

    let all_deps = manifest::load_all(file.path()).unwrap();
    let consolidated = consolidate::consolidate(&all_deps);

    assert_eq!(consolidated["requests"], "requests==2.5");
    assert_eq!(
        consolidated["google-cloud-storage"],
        "google-cloud-storage==2.10.0"
    );
    assert_eq!(consolidated.len(), 2);
}

#[test]
fn dev_profiles_never_reach_the_output() {
    let file = manifest_file(
        r#"
[project]
name = "demo"
dependencies = ["requests==2.31.0"]

[project.optional-dependencies]
dev = ["pytest==7.0.0", "black==23.0.0"]
DEV = ["ruff==0.1.0"]
gcp = ["google-cloud-storage==2.10.0"]
"#,
    );

    let all_deps = manifest::load_all(file.path()).unwrap();
    let consolidated = consolidate::consolidate(&all_deps);

    assert!(!consolidated.contains_key("pytest"));
    assert!(!consolidated.contains_key("black"));
    assert!(!consolidated.contains_key("ruff"));
    assert!(consolidated.contains_key("requests"));
    assert!(consolidated.contains_key("google-cloud-storage"));

    let profiles = manifest::load_profiles(file.path()).unwrap();
    assert!(profiles.iter().all(|(name, _)| !name.eq_ignore_ascii_case("dev")));
}

#[test]
fn writes_requirements_file_sorted_by_package() {
    let file = manifest_file(
        r#"
[project]
name = "demo"
dependencies = ["zstandard==0.21.0", "attrs==23.1.0"]
"#,
    );

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("requirements.txt");

    let all_deps = manifest::load_all(file.path()).unwrap();
    let consolidated = consolidate::consolidate(&all_deps);
    consolidate::write_requirements(&consolidated, &output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content, "attrs==23.1.0\nzstandard==0.21.0\n");
}

#[test]
fn single_occurrence_keeps_environment_marker() {
    let file = manifest_file(
        r#"
[project]
name = "demo"
dependencies = ["uvicorn>=0.23 ; sys_platform != \"win32\""]
"#,
    );

    let all_deps = manifest::load_all(file.path()).unwrap();
    let consolidated = consolidate::consolidate(&all_deps);

    assert_eq!(
        consolidated["uvicorn"],
        "uvicorn>=0.23 ; sys_platform != \"win32\""
    );
}

#[test]
fn validation_flags_conflicting_pins_across_profiles() {
    let file = manifest_file(
        r#"
[project]
name = "demo"
dependencies = ["requests==2.0"]

[project.optional-dependencies]
gcp = ["requests==2.5"]
"#,
    );

    let profiles = manifest::load_profiles(file.path()).unwrap();
    let conflicts = validate::find_conflicts(&profiles);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].package, "requests");

    let report = validate::format_report(&conflicts);
    assert!(report.contains("Dependency conflicts detected:"));
    assert!(report.contains("requests"));
}

#[test]
fn validation_passes_for_agreeing_manifest() {
    let file = manifest_file(
        r#"
[project]
name = "demo"
dependencies = ["requests==2.31.0"]

[project.optional-dependencies]
gcp = ["requests==2.31.0", "google-cloud-storage==2.10.0"]
aws = ["boto3>=1.28"]
dev = ["pytest==7.0.0"]
"#,
    );

    let profiles = manifest::load_profiles(file.path()).unwrap();
    let conflicts = validate::find_conflicts(&profiles);

    assert!(conflicts.is_empty());
    assert_eq!(
        validate::format_report(&conflicts),
        "No dependency conflicts found!"
    );
}

#[test]
fn conflicts_in_dev_profiles_are_ignored() {
    let file = manifest_file(
        r#"
[project]
name = "demo"
dependencies = ["requests==2.31.0"]

[project.optional-dependencies]
dev = ["requests==2.0"]
"#,
    );

    let profiles = manifest::load_profiles(file.path()).unwrap();
    assert!(validate::find_conflicts(&profiles).is_empty());
}
