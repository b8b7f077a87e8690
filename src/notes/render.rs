//! Markdown rendering for categorized release notes.
use tera::{Context, Tera};

use crate::{
    analyzer::{
        commit::ParsedCommit,
        sections::{Classified, Section},
    },
    config::Config,
    result::Result,
};

/// Placeholder emitted when no section produced output.
pub const EMPTY_NOTES: &str = "No commits found in this release.\n";

/// Renders classified commits into markdown with commit, PR, and issue
/// links.
pub struct Renderer<'c> {
    config: &'c Config,
    repo_url: String,
}

impl<'c> Renderer<'c> {
    pub fn new(config: &'c Config, repo_url: impl Into<String>) -> Self {
        Self {
            config,
            repo_url: repo_url.into(),
        }
    }

    /// Render all non-empty sections in configured order, the custom
    /// section last with type subheadings.
    pub fn render(&self, classified: &Classified) -> Result<String> {
        let mut notes = String::new();

        for section in classified
            .sections
            .iter()
            .filter(|section| !section.commits.is_empty())
        {
            notes.push_str(&format!("## {}\n\n", section.title));
            self.render_commits(&mut notes, section)?;
            notes.push('\n');
        }

        if let Some(custom) = &classified.custom
            && !custom.is_empty()
        {
            notes.push_str(&format!("## {}\n\n", custom.title));

            for section in custom
                .sections
                .iter()
                .filter(|section| !section.commits.is_empty())
            {
                notes.push_str(&format!("### {}\n\n", section.title));
                self.render_commits(&mut notes, section)?;
                notes.push('\n');
            }
        }

        if notes.is_empty() {
            return Ok(EMPTY_NOTES.to_string());
        }

        Ok(notes)
    }

    fn render_commits(
        &self,
        notes: &mut String,
        section: &Section,
    ) -> Result<()> {
        for commit in section.commits.iter() {
            notes.push_str(&self.commit_line(commit)?);
            notes.push('\n');
        }

        Ok(())
    }

    /// One bullet per commit: linked hash, cleaned subject, PR link,
    /// author, then issue links when configured.
    fn commit_line(&self, commit: &ParsedCommit) -> Result<String> {
        let mut line = if commit.id.is_empty() {
            format!("* {}", commit.subject)
        } else {
            format!(
                "* [`{}`]({}/commit/{}) {}",
                commit.short_id, self.repo_url, commit.id, commit.subject
            )
        };

        if let Some(pr_number) = commit.pr_number {
            line.push_str(&format!(
                " ([#{pr_number}]({}/pull/{pr_number}))",
                self.repo_url
            ));
        }

        line.push_str(&format!(" ({})", commit.author_name));

        if self.config.issue_links_enabled() && !commit.issues.is_empty() {
            let links = self.issue_links(commit)?;
            if !links.is_empty() {
                line.push_str(&format!(" ({})", links.join(", ")));
            }
        }

        Ok(line)
    }

    fn issue_links(&self, commit: &ParsedCommit) -> Result<Vec<String>> {
        let Some(template) = self.config.issue_url_format.as_deref() else {
            return Ok(vec![]);
        };

        let mut links = vec![];

        for issue in commit.issues.iter() {
            for prefix in self.config.active_prefixes() {
                if let Some(id) = issue.strip_prefix(prefix.as_str()) {
                    let mut context = Context::new();
                    context.insert("prefix", prefix);
                    context.insert("id", id);

                    let url = Tera::one_off(template, &context, false)?;
                    links.push(format!("[{issue}]({url})"));
                    break;
                }
            }
        }

        Ok(links)
    }
}
