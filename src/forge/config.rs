//! Remote repository configuration resolved from CLI flags and the CI
//! environment.
use color_eyre::eyre::eyre;
use secrecy::SecretString;
use std::env;
use url::Url;

use crate::{cli::ReleaseNotesArgs, error::ChangekitError, result::Result};

/// Default page size for paginated commit queries.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Hard cap on compare pages fetched in one invocation, bounding API cost
/// against a pathological ref range.
pub const MAX_COMPARE_PAGES: u64 = 20;
/// Server URL used when GITHUB_SERVER_URL is not set.
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Remote repository connection configuration for authenticating and
/// interacting with the GitHub API.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// URL scheme (http or https).
    pub scheme: String,
    /// Forge host (e.g. "github.com").
    pub host: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Base URL for API requests.
    pub api_base_url: String,
    /// Maximum commits fetched when walking history without a start ref.
    pub commit_search_depth: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "github.com".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
            api_base_url: "https://api.github.com".to_string(),
            commit_search_depth: crate::cli::DEFAULT_COMMIT_SEARCH_DEPTH,
        }
    }
}

impl RemoteConfig {
    /// Resolve connection configuration from CLI arguments with
    /// environment fallbacks.
    pub fn resolve(args: &ReleaseNotesArgs) -> Result<Self> {
        let (owner, repo) = resolve_repo(&args.repo)?;
        let token = resolve_token(&args.token)?;

        let server = env::var("GITHUB_SERVER_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let server = Url::parse(&server)?;
        let scheme = server.scheme().to_string();
        let host = server
            .host_str()
            .ok_or(eyre!("unable to parse host from server url"))?
            .to_string();

        let api_base_url = env::var("GITHUB_API_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("{scheme}://api.{host}"));

        let mut search_depth = args.commit_search_depth;

        if search_depth == 0 {
            search_depth = u64::MAX;
        }

        Ok(Self {
            scheme,
            host,
            owner,
            repo,
            token: SecretString::from(token),
            api_base_url,
            commit_search_depth: search_depth,
        })
    }

    /// Web URL of the repository, used as the base for commit and PR links.
    pub fn repo_url(&self) -> String {
        format!("{}://{}/{}/{}", self.scheme, self.host, self.owner, self.repo)
    }
}

/// Resolve owner and repository name from the `--repo` flag, the
/// GITHUB_REPOSITORY env var, or the GITHUB_REPOSITORY_OWNER/REPO_NAME
/// pair used for local testing.
fn resolve_repo(repo_flag: &str) -> Result<(String, String)> {
    let mut repo = repo_flag.to_string();

    if repo.is_empty()
        && let Ok(env_repo) = env::var("GITHUB_REPOSITORY")
    {
        repo = env_repo;
    }

    if repo.is_empty()
        && let Ok(owner) = env::var("GITHUB_REPOSITORY_OWNER")
        && let Ok(name) = env::var("REPO_NAME")
    {
        repo = format!("{owner}/{name}");
    }

    if repo.is_empty() {
        return Err(ChangekitError::MissingEnv("GITHUB_REPOSITORY".into()).into());
    }

    let (owner, name) = repo
        .split_once('/')
        .ok_or(eyre!("repository must be in owner/repo form: {repo}"))?;

    if owner.is_empty() || name.is_empty() {
        return Err(eyre!("repository must be in owner/repo form: {repo}"));
    }

    Ok((owner.to_string(), name.to_string()))
}

/// Resolve the API token from the `--token` flag or GITHUB_TOKEN.
fn resolve_token(token_flag: &str) -> Result<String> {
    let mut token = token_flag.to_string();

    if token.is_empty()
        && let Ok(env_token) = env::var("GITHUB_TOKEN")
    {
        token = env_token;
    }

    if token.is_empty() {
        return Err(ChangekitError::MissingEnv("GITHUB_TOKEN".into()).into());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    //! Unit tests for remote configuration resolution.
    use super::*;
    use crate::cli::DEFAULT_COMMIT_SEARCH_DEPTH;

    fn release_notes_args(repo: &str, token: &str) -> ReleaseNotesArgs {
        ReleaseNotesArgs {
            from_ref: "v1.0.0".into(),
            to_ref: "v1.1.0".into(),
            output_file: "RELEASE_NOTES.md".into(),
            config_file: None,
            repo: repo.into(),
            token: token.into(),
            commit_search_depth: DEFAULT_COMMIT_SEARCH_DEPTH,
            fallback_latest: false,
        }
    }

    /// Test resolution from explicit CLI flags.
    #[test]
    fn resolves_from_flags() {
        let args = release_notes_args("example/repo", "secret-token");

        let remote = RemoteConfig::resolve(&args).unwrap();

        assert_eq!(remote.owner, "example");
        assert_eq!(remote.repo, "repo");
        assert_eq!(remote.repo_url(), "https://github.com/example/repo");
        assert_eq!(remote.commit_search_depth, DEFAULT_COMMIT_SEARCH_DEPTH);
    }

    /// Test that a malformed repo identifier is rejected.
    #[test]
    fn rejects_malformed_repo() {
        let args = release_notes_args("not-a-repo", "secret-token");

        let result = RemoteConfig::resolve(&args);
        assert!(result.is_err());
    }

    /// Test that zero search depth means unlimited.
    #[test]
    fn zero_search_depth_is_unlimited() {
        let mut args = release_notes_args("example/repo", "secret-token");
        args.commit_search_depth = 0;

        let remote = RemoteConfig::resolve(&args).unwrap();
        assert_eq!(remote.commit_search_depth, u64::MAX);
    }

    #[test]
    fn default_remote_config() {
        let remote = RemoteConfig::default();
        assert_eq!(remote.api_base_url, "https://api.github.com");
    }
}
