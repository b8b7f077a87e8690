//! Result type used throughout changekit.
//!
//! All fallible functions in this crate return the `Result<T>` alias defined
//! here, built on `color-eyre` for readable diagnostics with context chains.
//! Add context as errors propagate with `.wrap_err()`.

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout changekit.
pub type Result<T> = EyreResult<T>;
