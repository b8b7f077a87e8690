//! Issue-tracker reference extraction and subject cleaning.
use std::sync::LazyLock;

use regex::Regex;
use crate::result::Result;

static COLLAPSE_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

static LEADING_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[,\-:]\s*").unwrap());

static TRAILING_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[,\-:]\s*$").unwrap());

/// Finds and strips configured issue-tracker references
/// (e.g. "DATAGO-123") from commit subjects.
///
/// With no configured prefixes the parser is inert: nothing is extracted
/// and subjects pass through untouched. Extraction is strictly opt-in.
pub struct IssueParser {
    finders: Vec<Regex>,
    removals: Vec<(Regex, &'static str)>,
    any_issue: Option<Regex>,
}

impl IssueParser {
    /// Build matchers for the configured prefixes.
    pub fn new(prefixes: &[String]) -> Result<Self> {
        if prefixes.is_empty() {
            return Ok(Self {
                finders: vec![],
                removals: vec![],
                any_issue: None,
            });
        }

        let finders = prefixes
            .iter()
            .map(|prefix| {
                Regex::new(&format!(r"{}\d+", regex::escape(prefix)))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let joined = prefixes
            .iter()
            .map(|prefix| regex::escape(prefix))
            .collect::<Vec<_>>()
            .join("|");
        let issue = format!(r"({joined})\d+");

        // Ordered removal passes: the "and" phrasings run before the
        // general passes that would otherwise strip the context they
        // match on.
        let removals = vec![
            (Regex::new(&format!(r"^{issue}:\s*"))?, ""),
            (Regex::new(&format!(r"^and\s+{issue}\s*"))?, ""),
            (Regex::new(&format!(r"^and\s+{issue}\s*-\s*"))?, ""),
            (Regex::new(&format!(r"\s+and\s+{issue}\s*"))?, " "),
            (Regex::new(&format!(r"{issue}\s*-\s*"))?, ""),
            (Regex::new(&format!(r"{issue}:\s*"))?, ""),
            (Regex::new(&format!(r"\s*{issue}\s*"))?, " "),
        ];

        let any_issue = Some(Regex::new(&issue)?);

        Ok(Self {
            finders,
            removals,
            any_issue,
        })
    }

    /// Extract deduplicated issue references from text. Returns empty
    /// when no prefixes are configured, regardless of content.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut issues: Vec<String> = vec![];

        for finder in self.finders.iter() {
            for found in finder.find_iter(text) {
                let issue = found.as_str().to_string();
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
        }

        issues
    }

    /// Remove issue references and leftover punctuation from a subject.
    /// Idempotent: a cleaned subject contains no references to remove.
    pub fn clean(&self, subject: &str) -> String {
        let Some(any_issue) = &self.any_issue else {
            return subject.to_string();
        };

        if !any_issue.is_match(subject) {
            return subject.to_string();
        }

        let mut cleaned = subject.to_string();

        for (pattern, replacement) in self.removals.iter() {
            cleaned = pattern.replace_all(&cleaned, *replacement).to_string();
        }

        cleaned = COLLAPSE_WS.replace_all(&cleaned, " ").to_string();
        cleaned = LEADING_PUNCT.replace(&cleaned, "").to_string();
        cleaned = TRAILING_PUNCT.replace(&cleaned, "").to_string();

        cleaned.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(prefixes: &[&str]) -> IssueParser {
        let prefixes: Vec<String> =
            prefixes.iter().map(|p| p.to_string()).collect();
        IssueParser::new(&prefixes).unwrap()
    }

    #[test]
    fn extracts_single_issue() {
        let parser = parser(&["DATAGO-"]);
        assert_eq!(
            parser.extract("Fix DATAGO-123 issue"),
            vec!["DATAGO-123".to_string()]
        );
    }

    #[test]
    fn extracts_issues_for_multiple_prefixes() {
        let parser = parser(&["DATAGO-", "MRE-"]);
        let issues = parser.extract("Fix DATAGO-123 and MRE-456");

        assert!(issues.contains(&"DATAGO-123".to_string()));
        assert!(issues.contains(&"MRE-456".to_string()));
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn extracts_nothing_without_matches() {
        let parser = parser(&["DATAGO-"]);
        assert!(parser.extract("No issues here").is_empty());
    }

    #[test]
    fn deduplicates_extracted_issues() {
        let parser = parser(&["DATAGO-"]);
        let issues = parser.extract("DATAGO-123 DATAGO-123 DATAGO-456");

        assert_eq!(issues.len(), 2);
        assert!(issues.contains(&"DATAGO-123".to_string()));
        assert!(issues.contains(&"DATAGO-456".to_string()));
    }

    /// Unconfigured systems must not extract anything, whatever the
    /// subject contains.
    #[test]
    fn extraction_is_opt_in() {
        let parser = parser(&[]);
        assert!(parser.extract("Fix DATAGO-123 and MRE-456").is_empty());
    }

    #[test]
    fn cleans_leading_issue_prefix() {
        let parser = parser(&["DATAGO-"]);
        assert_eq!(
            parser.clean("DATAGO-123: add new feature"),
            "add new feature"
        );
    }

    #[test]
    fn cleans_leading_and_phrase() {
        let parser = parser(&["DATAGO-"]);
        assert_eq!(
            parser.clean("and DATAGO-456 implement feature"),
            "implement feature"
        );
    }

    #[test]
    fn cleans_leading_and_phrase_with_dash() {
        let parser = parser(&["DATAGO-"]);
        assert_eq!(parser.clean("and DATAGO-789 - fix bug"), "fix bug");
    }

    #[test]
    fn cleans_multiple_references() {
        let parser = parser(&["DATAGO-", "MRE-"]);
        assert_eq!(
            parser.clean("DATAGO-111: and MRE-222 - implement feature"),
            "implement feature"
        );
    }

    #[test]
    fn cleans_mid_string_and_phrase() {
        let parser = parser(&["DATAGO-"]);
        assert_eq!(
            parser.clean("fix login and DATAGO-333 flow"),
            "fix login flow"
        );
    }

    #[test]
    fn leaves_unrelated_subjects_untouched() {
        let parser = parser(&["DATAGO-"]);
        assert_eq!(
            parser.clean("normal commit message"),
            "normal commit message"
        );
    }

    #[test]
    fn cleaning_is_inert_without_prefixes() {
        let parser = parser(&[]);
        assert_eq!(
            parser.clean("DATAGO-123: add new feature"),
            "DATAGO-123: add new feature"
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let parser = parser(&["DATAGO-", "MRE-"]);
        let subjects = [
            "DATAGO-123: add new feature",
            "and DATAGO-456 implement feature",
            "DATAGO-111: and MRE-222 - implement feature",
            "fix login and DATAGO-333 flow",
            "normal commit message",
        ];

        for subject in subjects {
            let once = parser.clean(subject);
            let twice = parser.clean(&once);
            assert_eq!(once, twice, "not idempotent for: {subject}");
        }
    }
}
