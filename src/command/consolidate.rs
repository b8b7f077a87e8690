//! Requirements consolidation command implementation.
use log::*;

use crate::{
    cli::ConsolidateArgs,
    deps::{consolidate, manifest},
    result::Result,
};

/// Execute consolidate-requirements: flatten the manifest's dependency
/// tables into a deduplicated requirements file.
pub fn execute(args: &ConsolidateArgs) -> Result<()> {
    info!(
        "extracting dependencies from {}",
        args.pyproject_file.display()
    );

    let all_deps = manifest::load_all(&args.pyproject_file)?;
    info!("found {} total dependencies", all_deps.len());

    let consolidated = consolidate::consolidate(&all_deps);
    info!("consolidated to {} unique packages", consolidated.len());

    consolidate::write_requirements(&consolidated, &args.output_file)?;
    info!(
        "clean requirements file generated: {}",
        args.output_file.display()
    );

    Ok(())
}
