//! Remote forge access for commit history and release lookups.
pub mod config;
pub mod github;
pub mod traits;
pub mod types;
