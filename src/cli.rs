//! CLI argument parsing for the changekit subcommands.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default number of commits to fetch when no starting reference is given.
pub const DEFAULT_COMMIT_SEARCH_DEPTH: u64 = 400;
/// Default output file for generated release notes.
pub const DEFAULT_NOTES_FILE: &str = "RELEASE_NOTES.md";
/// Default output file for the dependency conflict report.
pub const DEFAULT_CONFLICTS_FILE: &str = "dependency_conflicts.txt";

/// Global CLI arguments and subcommand selection.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CI helper subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate categorized release notes between two git references.
    ReleaseNotes(ReleaseNotesArgs),

    /// Flatten pyproject.toml dependency tables into a requirements file.
    ConsolidateRequirements(ConsolidateArgs),

    /// Detect conflicting exact pins across dependency profiles.
    ValidateDependencies(ValidateArgs),
}

/// Arguments for the release-notes subcommand.
#[derive(clap::Args, Debug)]
pub struct ReleaseNotesArgs {
    /// Starting reference (e.g. v1.2.15). Pass "" to start from the
    /// beginning of history.
    pub from_ref: String,

    /// Ending reference (e.g. v1.2.16).
    pub to_ref: String,

    /// Output file for the generated notes.
    #[arg(default_value = DEFAULT_NOTES_FILE)]
    pub output_file: PathBuf,

    #[arg(long)]
    /// Path to a .versionrc.json configuration file.
    pub config_file: Option<PathBuf>,

    #[arg(long, default_value = "")]
    /// Repository in owner/repo form. Falls back to GITHUB_REPOSITORY env var.
    pub repo: String,

    #[arg(long, default_value = "")]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub token: String,

    #[arg(long, default_value_t = DEFAULT_COMMIT_SEARCH_DEPTH)]
    /// Maximum commits to fetch when no starting reference is given.
    /// Use 0 for unlimited.
    pub commit_search_depth: u64,

    #[arg(long, default_value_t = false)]
    /// Retry from the most recent published release tag when from_ref does
    /// not resolve.
    pub fallback_latest: bool,
}

/// Arguments for the consolidate-requirements subcommand.
#[derive(clap::Args, Debug)]
pub struct ConsolidateArgs {
    /// Path to the pyproject.toml manifest.
    pub pyproject_file: PathBuf,

    /// Output requirements file.
    pub output_file: PathBuf,
}

/// Arguments for the validate-dependencies subcommand.
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Path to the pyproject.toml manifest.
    #[arg(default_value = "pyproject.toml")]
    pub pyproject_file: PathBuf,

    #[arg(long, short, default_value = DEFAULT_CONFLICTS_FILE)]
    /// Output conflicts report file.
    pub output: PathBuf,

    #[arg(long, short, default_value_t = false)]
    /// Include a per-profile dependency dump in the report.
    pub detailed: bool,
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI argument parsing.
    use super::*;

    /// Test release-notes argument parsing with defaults.
    #[test]
    fn parses_release_notes_args() {
        let args = Args::try_parse_from([
            "changekit",
            "release-notes",
            "v1.0.0",
            "v1.1.0",
        ])
        .unwrap();

        match args.command {
            Command::ReleaseNotes(cmd) => {
                assert_eq!(cmd.from_ref, "v1.0.0");
                assert_eq!(cmd.to_ref, "v1.1.0");
                assert_eq!(cmd.output_file, PathBuf::from(DEFAULT_NOTES_FILE));
                assert_eq!(
                    cmd.commit_search_depth,
                    DEFAULT_COMMIT_SEARCH_DEPTH
                );
                assert!(!cmd.fallback_latest);
            }
            _ => panic!("expected release-notes command"),
        }
    }

    /// Test that an empty from_ref is accepted.
    #[test]
    fn accepts_empty_from_ref() {
        let args = Args::try_parse_from([
            "changekit",
            "release-notes",
            "",
            "HEAD",
            "notes.md",
        ])
        .unwrap();

        match args.command {
            Command::ReleaseNotes(cmd) => {
                assert!(cmd.from_ref.is_empty());
                assert_eq!(cmd.output_file, PathBuf::from("notes.md"));
            }
            _ => panic!("expected release-notes command"),
        }
    }

    /// Test consolidate-requirements argument parsing.
    #[test]
    fn parses_consolidate_args() {
        let args = Args::try_parse_from([
            "changekit",
            "consolidate-requirements",
            "pyproject.toml",
            "requirements.txt",
        ])
        .unwrap();

        match args.command {
            Command::ConsolidateRequirements(cmd) => {
                assert_eq!(cmd.pyproject_file, PathBuf::from("pyproject.toml"));
                assert_eq!(cmd.output_file, PathBuf::from("requirements.txt"));
            }
            _ => panic!("expected consolidate-requirements command"),
        }
    }

    /// Test validate-dependencies argument parsing with defaults.
    #[test]
    fn parses_validate_args() {
        let args =
            Args::try_parse_from(["changekit", "validate-dependencies"])
                .unwrap();

        match args.command {
            Command::ValidateDependencies(cmd) => {
                assert_eq!(cmd.pyproject_file, PathBuf::from("pyproject.toml"));
                assert_eq!(cmd.output, PathBuf::from(DEFAULT_CONFLICTS_FILE));
                assert!(!cmd.detailed);
            }
            _ => panic!("expected validate-dependencies command"),
        }
    }

    /// Test the global debug flag.
    #[test]
    fn parses_global_debug_flag() {
        let args = Args::try_parse_from([
            "changekit",
            "validate-dependencies",
            "--debug",
        ])
        .unwrap();

        assert!(args.debug);
    }
}
