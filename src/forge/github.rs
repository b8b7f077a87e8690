//! Implements the CommitSource trait for GitHub
use async_trait::async_trait;
use chrono::DateTime;
use log::*;
use octocrab::Octocrab;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::cmp;

use crate::{
    error::ChangekitError,
    forge::{
        config::{DEFAULT_PAGE_SIZE, MAX_COMPARE_PAGES, RemoteConfig},
        traits::CommitSource,
        types::ForgeCommit,
    },
    result::Result,
};

const HISTORY_QUERY: &str = r#"
query GetHistory($owner: String!, $repo: String!, $ref: String!, $page_limit: Int!, $cursor: String) {
  repository(owner: $owner, name: $repo) {
    object(expression: $ref) {
      ... on Commit {
        history(first: $page_limit, after: $cursor) {
          pageInfo {
            hasNextPage
            endCursor
          }
          edges {
            node {
              oid
              message
              committedDate
              author {
                name
              }
              associatedPullRequests(first: 1) {
                nodes {
                  number
                }
              }
            }
          }
        }
      }
    }
  }
}"#;

const ASSOCIATED_PR_QUERY: &str = r#"
query GetAssociatedPr($owner: String!, $repo: String!, $sha: GitObjectID!) {
  repository(owner: $owner, name: $repo) {
    object(oid: $sha) {
      ... on Commit {
        associatedPullRequests(first: 1) {
          nodes {
            number
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct PrNode {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct PrNodes {
    nodes: Vec<PrNode>,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryNode {
    oid: String,
    message: String,
    #[serde(rename = "committedDate")]
    committed_date: String,
    author: Option<HistoryQueryAuthor>,
    #[serde(rename = "associatedPullRequests")]
    associated_pull_requests: Option<PrNodes>,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryEdge {
    node: HistoryQueryNode,
}

#[derive(Debug, Deserialize)]
struct QueryPageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryHistory {
    edges: Vec<HistoryQueryEdge>,
    #[serde(rename = "pageInfo")]
    page_info: QueryPageInfo,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryObject {
    history: HistoryQueryHistory,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryRepository {
    object: Option<HistoryQueryObject>,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryData {
    repository: HistoryQueryRepository,
}

#[derive(Debug, Deserialize)]
struct HistoryQueryResult {
    data: HistoryQueryData,
}

#[derive(Debug, Serialize)]
struct HistoryQueryVariables {
    owner: String,
    repo: String,
    #[serde(rename = "ref")]
    reference: String,
    cursor: Option<String>,
    page_limit: u64,
}

#[derive(Debug, Deserialize)]
struct AssociatedPrObject {
    #[serde(rename = "associatedPullRequests")]
    associated_pull_requests: PrNodes,
}

#[derive(Debug, Deserialize)]
struct AssociatedPrRepository {
    object: Option<AssociatedPrObject>,
}

#[derive(Debug, Deserialize)]
struct AssociatedPrData {
    repository: AssociatedPrRepository,
}

#[derive(Debug, Deserialize)]
struct AssociatedPrResult {
    data: AssociatedPrData,
}

#[derive(Debug, Serialize)]
struct AssociatedPrVariables {
    owner: String,
    repo: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    total_commits: u64,
    commits: Vec<RestCommit>,
}

#[derive(Debug, Deserialize)]
struct RestCommit {
    sha: String,
    commit: RestCommitDetail,
}

#[derive(Debug, Deserialize)]
struct RestCommitDetail {
    message: String,
    author: Option<RestCommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct RestCommitAuthor {
    name: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct RestCommitFiles {
    files: Option<Vec<RestFile>>,
}

#[derive(Debug, Deserialize)]
struct RestFile {
    filename: String,
}

/// GitHub commit source using Octocrab for REST comparisons and GraphQL
/// history and pull-request association queries.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and
    /// API base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_base_url.clone())?;
        let instance = builder.build()?;

        Ok(Self { config, instance })
    }

    fn to_forge_commit(&self, rest: &RestCommit) -> ForgeCommit {
        let subject = rest
            .commit
            .message
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();

        let (author_name, timestamp) = match &rest.commit.author {
            Some(author) => (
                author.name.clone(),
                DateTime::parse_from_rfc3339(&author.date)
                    .map(|date| date.timestamp())
                    .unwrap_or_default(),
            ),
            None => ("Unknown".to_string(), 0),
        };

        ForgeCommit {
            id: rest.sha.clone(),
            short_id: rest.sha.chars().take(7).collect(),
            subject,
            author_name,
            pr_number: None,
            files: vec![],
            timestamp,
        }
    }

    /// Look up the first pull request associated with a commit. Failures
    /// are tolerated: the commit passes through without a PR number.
    async fn associated_pr(&self, sha: &str) -> Option<u64> {
        let vars = AssociatedPrVariables {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
            sha: sha.to_string(),
        };

        let json = serde_json::json!({
          "query": ASSOCIATED_PR_QUERY,
          "variables": vars,
        });

        match self.instance.graphql::<AssociatedPrResult>(&json).await {
            Ok(result) => result
                .data
                .repository
                .object
                .and_then(|object| {
                    object.associated_pull_requests.nodes.first().map(|n| n.number)
                }),
            Err(err) => {
                debug!("pull request lookup failed for {sha}: {err}");
                None
            }
        }
    }
}

#[async_trait]
impl CommitSource for Github {
    async fn compare(
        &self,
        from_ref: &str,
        to_ref: &str,
    ) -> Result<Vec<ForgeCommit>> {
        let range = format!("{from_ref}...{to_ref}");
        let mut rest_commits: Vec<RestCommit> = vec![];
        let mut page: u64 = 1;

        loop {
            let endpoint = format!(
                "{}/repos/{}/{}/compare/{}?per_page={}&page={}",
                self.config.api_base_url,
                self.config.owner,
                self.config.repo,
                range,
                DEFAULT_PAGE_SIZE,
                page,
            );

            let result = self
                .instance
                .get::<CompareResponse, _, ()>(&endpoint, None)
                .await;

            let response = match result {
                Err(octocrab::Error::GitHub { source, .. })
                    if source.status_code == StatusCode::NOT_FOUND =>
                {
                    return Err(ChangekitError::UnresolvedRef(range.clone()).into());
                }
                Err(err) => return Err(ChangekitError::from(err).into()),
                Ok(response) => response,
            };

            let total = response.total_commits;
            let batch_len = response.commits.len();
            rest_commits.extend(response.commits);

            if batch_len == 0 || rest_commits.len() as u64 >= total {
                break;
            }

            page += 1;

            if page > MAX_COMPARE_PAGES {
                warn!(
                    "reached page cap ({MAX_COMPARE_PAGES}) comparing {range}: truncating at {} commits",
                    rest_commits.len()
                );
                break;
            }
        }

        info!("processing {} commits", rest_commits.len());

        let mut commits = vec![];

        for rest in rest_commits.iter() {
            let mut commit = self.to_forge_commit(rest);
            commit.pr_number = self.associated_pr(&rest.sha).await;
            commits.push(commit);
        }

        Ok(commits)
    }

    async fn history(&self, to_ref: &str) -> Result<Vec<ForgeCommit>> {
        let search_depth = self.config.commit_search_depth;
        let page_limit = cmp::min(DEFAULT_PAGE_SIZE, search_depth);
        let mut commits: Vec<ForgeCommit> = vec![];
        let mut cursor: Option<String> = None;
        let mut has_more = true;

        while has_more {
            if commits.len() as u64 >= search_depth {
                break;
            }

            let vars = HistoryQueryVariables {
                owner: self.config.owner.clone(),
                repo: self.config.repo.clone(),
                reference: to_ref.to_string(),
                cursor: cursor.clone(),
                page_limit,
            };

            let result: HistoryQueryResult = self
                .instance
                .graphql(&serde_json::json!({
                    "query": HISTORY_QUERY,
                    "variables": vars,
                }))
                .await
                .map_err(ChangekitError::from)?;

            let object = result.data.repository.object.ok_or_else(|| {
                ChangekitError::UnresolvedRef(to_ref.to_string())
            })?;

            for edge in object.history.edges.iter() {
                let node = &edge.node;

                commits.push(ForgeCommit {
                    id: node.oid.clone(),
                    short_id: node.oid.chars().take(7).collect(),
                    subject: node
                        .message
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .to_string(),
                    author_name: node
                        .author
                        .as_ref()
                        .and_then(|author| author.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    pr_number: node
                        .associated_pull_requests
                        .as_ref()
                        .and_then(|prs| prs.nodes.first().map(|n| n.number)),
                    files: vec![],
                    timestamp: DateTime::parse_from_rfc3339(
                        &node.committed_date,
                    )
                    .map(|date| date.timestamp())
                    .unwrap_or_default(),
                });
            }

            cursor = object.history.page_info.end_cursor.clone();
            has_more =
                object.history.page_info.has_next_page && cursor.is_some();
        }

        // history arrives newest first
        commits.reverse();

        Ok(commits)
    }

    async fn latest_release_tag(&self) -> Result<Option<String>> {
        let result = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .get_latest()
            .await;

        match result {
            Ok(release) => Ok(Some(release.tag_name)),
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code == StatusCode::NOT_FOUND =>
            {
                info!(
                    "no published releases found for {}/{}",
                    self.config.owner, self.config.repo
                );
                Ok(None)
            }
            Err(err) => Err(ChangekitError::from(err).into()),
        }
    }

    async fn commit_files(&self, sha: &str) -> Result<Vec<String>> {
        let endpoint = format!(
            "{}/repos/{}/{}/commits/{}",
            self.config.api_base_url, self.config.owner, self.config.repo, sha,
        );

        let result: RestCommitFiles = self
            .instance
            .get::<RestCommitFiles, _, ()>(&endpoint, None)
            .await
            .map_err(ChangekitError::from)?;

        Ok(result
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|file| file.filename)
            .collect())
    }
}
