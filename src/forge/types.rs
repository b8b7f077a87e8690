/// Normalized commit returned from the forge API.
#[derive(Debug, Clone)]
pub struct ForgeCommit {
    /// Full commit sha.
    pub id: String,
    /// Abbreviated sha used in rendered links.
    pub short_id: String,
    /// First line of the commit message.
    pub subject: String,
    pub author_name: String,
    /// Pull request associated with this commit, when discoverable.
    pub pr_number: Option<u64>,
    /// Paths touched by this commit. Only populated on demand.
    pub files: Vec<String>,
    pub timestamp: i64,
}
