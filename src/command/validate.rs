//! Dependency conflict validation command implementation.
use color_eyre::eyre::WrapErr;
use log::*;
use std::fs;

use crate::{
    cli::ValidateArgs,
    deps::{manifest, validate},
    error::ChangekitError,
    result::Result,
};

/// Execute validate-dependencies: report conflicting exact pins across
/// profiles and fail when any exist.
pub fn execute(args: &ValidateArgs) -> Result<()> {
    let profiles = manifest::load_profiles(&args.pyproject_file)?;

    info!("found {} dependency profiles", profiles.len());
    for (name, deps) in profiles.iter() {
        info!("  - {name} ({} dependencies)", deps.len());
    }

    let conflicts = validate::find_conflicts(&profiles);
    let mut report = validate::format_report(&conflicts);

    if args.detailed {
        report.push_str(&validate::detailed_appendix(&profiles));
    }

    println!("{report}");

    fs::write(&args.output, &report).wrap_err_with(|| {
        format!("failed to write {}", args.output.display())
    })?;
    info!("report written to: {}", args.output.display());

    if !conflicts.is_empty() {
        return Err(ChangekitError::DependencyConflicts {
            count: conflicts.len(),
        }
        .into());
    }

    Ok(())
}
