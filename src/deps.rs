//! Dependency manifest tooling: spec parsing, consolidation, validation.
pub mod consolidate;
pub mod manifest;
pub mod spec;
pub mod validate;
