use std::sync::LazyLock;

use regex::Regex;

use crate::{analyzer::issues::IssueParser, forge::types::ForgeCommit};

// The scoped shape is tried first; both accept an optional trailing PR
// reference.
static SCOPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\(([^)]+)\): (.+?)(?:\s+\(#(\d+)\))?$").unwrap()
});

static UNSCOPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+): (.+?)(?:\s+\(#(\d+)\))?$").unwrap()
});

/// Parsed commit with conventional commit fields and forge metadata.
#[derive(Debug, Clone)]
pub struct ParsedCommit {
    /// Conventional commit type, None for free-text subjects.
    pub commit_type: Option<String>,
    pub scope: Option<String>,
    /// Subject with issue references stripped.
    pub subject: String,
    pub pr_number: Option<u64>,
    /// Issue references found in the scope and subject.
    pub issues: Vec<String>,
    pub id: String,
    pub short_id: String,
    pub author_name: String,
}

impl ParsedCommit {
    /// Parse a forge commit subject into conventional commit fields.
    ///
    /// Recognizes exactly two shapes, `type(scope): text (#N)` and
    /// `type: text (#N)`, with the `(#N)` suffix optional in both.
    /// Anything else passes through with no type and the original
    /// subject unchanged.
    pub fn parse(
        issue_parser: &IssueParser,
        forge_commit: &ForgeCommit,
    ) -> Self {
        let (commit_type, scope, subject, inline_pr) =
            parse_subject(&forge_commit.subject);

        let search_text = format!(
            "{} {}",
            scope.clone().unwrap_or_default(),
            subject
        );
        let issues = issue_parser.extract(&search_text);
        let subject = issue_parser.clean(&subject);

        Self {
            commit_type,
            scope,
            subject,
            // the inline reference wins over the API association
            pr_number: inline_pr.or(forge_commit.pr_number),
            issues,
            id: forge_commit.id.clone(),
            short_id: forge_commit.short_id.clone(),
            author_name: forge_commit.author_name.clone(),
        }
    }
}

fn parse_subject(
    subject: &str,
) -> (Option<String>, Option<String>, String, Option<u64>) {
    if let Some(caps) = SCOPED_RE.captures(subject) {
        return (
            Some(caps[1].to_string()),
            Some(caps[2].to_string()),
            caps[3].to_string(),
            caps.get(4).and_then(|m| m.as_str().parse().ok()),
        );
    }

    if let Some(caps) = UNSCOPED_RE.captures(subject) {
        return (
            Some(caps[1].to_string()),
            None,
            caps[2].to_string(),
            caps.get(3).and_then(|m| m.as_str().parse().ok()),
        );
    }

    (None, None, subject.to_string(), None)
}
