//! Buckets parsed commits into configured sections, optionally splitting
//! out a custom section bounded by version-bump commits.
use std::collections::BTreeSet;

use glob::Pattern;
use log::*;
use regex::Regex;
use semver::Version;

use crate::{
    analyzer::{commit::ParsedCommit, issues::IssueParser},
    config::Config,
    forge::types::ForgeCommit,
    result::Result,
};

/// Marker excluding automated release-tooling commits from every section.
pub const CI_SKIP_MARKER: &str = "[ci skip]";

/// A named bucket of commits for one configured commit type.
#[derive(Debug)]
pub struct Section {
    pub title: String,
    pub commits: Vec<ParsedCommit>,
}

/// Commits grouped under the custom-section rules, classified with the
/// same type mappings as the regular partition.
#[derive(Debug)]
pub struct CustomSection {
    pub title: String,
    pub sections: Vec<Section>,
}

impl CustomSection {
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| section.commits.is_empty())
    }
}

/// Full classification result for one invocation.
#[derive(Debug)]
pub struct Classified {
    /// Regular sections in configured order.
    pub sections: Vec<Section>,
    pub custom: Option<CustomSection>,
    /// Total commits fetched, including excluded ones.
    pub total: usize,
}

/// Buckets commits by conventional commit type according to the ordered
/// type-to-section configuration.
pub struct Classifier<'c> {
    config: &'c Config,
    issue_parser: IssueParser,
    bump_pattern: Option<Regex>,
    path_patterns: Vec<Pattern>,
}

impl<'c> Classifier<'c> {
    /// Create a classifier, compiling the configured bump pattern and
    /// path globs.
    pub fn new(config: &'c Config) -> Result<Self> {
        let issue_parser = IssueParser::new(config.active_prefixes())?;

        let custom = config.custom_sections.as_ref().filter(|c| c.enabled);

        let bump_pattern = custom
            .and_then(|c| c.bump_commit_pattern.as_deref())
            .map(Regex::new)
            .transpose()?;

        let path_patterns = custom
            .map(|c| {
                c.path_patterns
                    .iter()
                    .map(|pattern| Pattern::new(pattern))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            config,
            issue_parser,
            bump_pattern,
            path_patterns,
        })
    }

    /// Whether classification would consult per-commit file metadata,
    /// letting callers fetch it only when needed.
    pub fn wants_file_metadata(&self) -> bool {
        self.bump_pattern.is_some() && !self.path_patterns.is_empty()
    }

    /// Indices of commits that immediately precede a bump commit. Callers
    /// may enrich these with file metadata before classification.
    pub fn custom_candidates(&self, commits: &[ForgeCommit]) -> Vec<usize> {
        let Some(bump) = &self.bump_pattern else {
            return vec![];
        };

        let mut candidates = vec![];

        for (index, commit) in commits.iter().enumerate() {
            if bump.is_match(&commit.subject)
                && index > 0
                && !bump.is_match(&commits[index - 1].subject)
            {
                candidates.push(index - 1);
            }
        }

        candidates
    }

    /// Classify commits into regular sections plus the optional custom
    /// section. Expects commits in chronological order.
    pub fn classify(&self, commits: &[ForgeCommit]) -> Classified {
        let total = commits.len();

        let Some(bump) = &self.bump_pattern else {
            return Classified {
                sections: self.bucket(commits.iter().collect()),
                custom: None,
                total,
            };
        };

        let custom_indices: BTreeSet<usize> = self
            .custom_candidates(commits)
            .into_iter()
            .filter(|index| self.qualifies_for_custom(&commits[*index]))
            .collect();

        let mut regular: Vec<&ForgeCommit> = vec![];
        let mut custom: Vec<&ForgeCommit> = vec![];
        let mut versions: Vec<Version> = vec![];

        for (index, commit) in commits.iter().enumerate() {
            if bump.is_match(&commit.subject) {
                // bump commits are boundary markers, never rendered
                if let Some(version) = bump
                    .captures(&commit.subject)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| {
                        crate::version_helpers::parse_lenient(m.as_str())
                    })
                {
                    versions.push(version);
                } else {
                    debug!(
                        "no version captured from bump commit: {}",
                        commit.short_id
                    );
                }
                continue;
            }

            if custom_indices.contains(&index) {
                custom.push(commit);
            } else {
                regular.push(commit);
            }
        }

        let custom_section = if custom.is_empty() {
            None
        } else {
            Some(CustomSection {
                title: self.custom_title(&versions),
                sections: self.bucket(custom),
            })
        };

        Classified {
            sections: self.bucket(regular),
            custom: custom_section,
            total,
        }
    }

    /// A candidate only joins the custom partition when its changed files
    /// all match the configured path patterns. Commits without file
    /// metadata qualify by default.
    fn qualifies_for_custom(&self, commit: &ForgeCommit) -> bool {
        if self.path_patterns.is_empty() || commit.files.is_empty() {
            return true;
        }

        commit.files.iter().all(|file| {
            self.path_patterns.iter().any(|pattern| pattern.matches(file))
        })
    }

    /// Title spanning the oldest-to-newest detected version.
    fn custom_title(&self, versions: &[Version]) -> String {
        let custom = self
            .config
            .custom_sections
            .as_ref()
            .filter(|c| c.enabled);

        let Some(custom) = custom else {
            return "Custom".to_string();
        };

        let mut sorted = versions.to_vec();
        sorted.sort();

        match (sorted.first(), sorted.last()) {
            (Some(oldest), Some(newest)) if oldest != newest => format!(
                "{} ({}{} → {}{})",
                custom.section,
                custom.tag_prefix,
                oldest,
                custom.tag_prefix,
                newest
            ),
            (Some(only), _) => {
                format!("{} ({}{})", custom.section, custom.tag_prefix, only)
            }
            _ => custom.section.clone(),
        }
    }

    /// Bucket one partition by commit type, preserving configured order.
    fn bucket(&self, commits: Vec<&ForgeCommit>) -> Vec<Section> {
        let mut buckets: Vec<(String, Section)> = self
            .config
            .types
            .iter()
            .map(|mapping| {
                (
                    mapping.commit_type.clone(),
                    Section {
                        title: mapping.section.clone(),
                        commits: vec![],
                    },
                )
            })
            .collect();

        for forge_commit in commits {
            if forge_commit.subject.contains(CI_SKIP_MARKER) {
                continue;
            }

            let parsed =
                ParsedCommit::parse(&self.issue_parser, forge_commit);

            let Some(commit_type) = parsed.commit_type.clone() else {
                debug!(
                    "skipping unclassified commit: {}",
                    forge_commit.short_id
                );
                continue;
            };

            match buckets
                .iter_mut()
                .find(|(bucket_type, _)| *bucket_type == commit_type)
            {
                Some((_, section)) => section.commits.push(parsed),
                None => debug!(
                    "no section configured for type '{}': skipping {}",
                    commit_type, forge_commit.short_id
                ),
            }
        }

        buckets.into_iter().map(|(_, section)| section).collect()
    }
}
