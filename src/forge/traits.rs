//! Traits related to the remote git forge
use async_trait::async_trait;

use crate::{forge::types::ForgeCommit, result::Result};

/// Narrow interface over the forge commit-history API, mockable for
/// pipeline tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Commits reachable from `to_ref` but not `from_ref`, oldest first.
    async fn compare(
        &self,
        from_ref: &str,
        to_ref: &str,
    ) -> Result<Vec<ForgeCommit>>;

    /// Full history up to `to_ref`, oldest first, bounded by the
    /// configured search depth.
    async fn history(&self, to_ref: &str) -> Result<Vec<ForgeCommit>>;

    /// Tag name of the most recent published release, if any.
    async fn latest_release_tag(&self) -> Result<Option<String>>;

    /// Paths touched by a single commit.
    async fn commit_files(&self, sha: &str) -> Result<Vec<String>>;
}
