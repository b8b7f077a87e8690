//! Subcommand implementations.
pub mod consolidate;
pub mod release_notes;
pub mod validate;
