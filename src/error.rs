//! Typed errors for changekit operations.

use thiserror::Error;

/// Main error type for changekit operations.
///
/// Most call sites propagate errors through `crate::result::Result`; the
/// variants here exist for the cases callers branch on, such as the
/// from-ref fallback on `UnresolvedRef` and the non-zero exit on
/// `DependencyConflicts`.
#[derive(Error, Debug)]
pub enum ChangekitError {
    // Environment/configuration errors
    #[error("Missing environment configuration: {0} is not set")]
    MissingEnv(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Forge/API errors
    #[error("Unable to resolve git reference: {0}")]
    UnresolvedRef(String),

    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Dependency tooling errors
    #[error("Could not parse dependency '{0}'")]
    MalformedDependency(String),

    #[error("{count} dependency conflict(s) detected: see report for details")]
    DependencyConflicts { count: usize },
}

impl ChangekitError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unresolved reference error for a ref or range
    pub fn unresolved_ref(reference: impl Into<String>) -> Self {
        Self::UnresolvedRef(reference.into())
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for ChangekitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::NetworkError(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    Self::AuthenticationError(err.to_string())
                } else if status.as_u16() == 429 {
                    Self::RateLimitExceeded
                } else {
                    Self::NetworkError(err.to_string())
                }
            } else {
                Self::NetworkError(err.to_string())
            }
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ChangekitError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            octocrab::Error::GitHub { source, .. }
                if source.status_code.as_u16() == 401
                    || source.status_code.as_u16() == 403 =>
            {
                Self::AuthenticationError(source.message.clone())
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
