//! Persists rendered notes and publishes workflow output values.
use color_eyre::eyre::WrapErr;
use log::*;
use std::{
    env,
    fs::{self, OpenOptions},
    io::Write as _,
    path::Path,
};

use crate::result::Result;

/// Write notes to the output path and, when the GITHUB_OUTPUT channel is
/// available, append output variables for downstream workflow steps.
pub fn write(notes: &str, output_file: &Path, total_commits: usize) -> Result<()> {
    let github_output = env::var("GITHUB_OUTPUT")
        .ok()
        .filter(|path| !path.is_empty());

    write_with_outputs(
        notes,
        output_file,
        total_commits,
        github_output.as_deref().map(Path::new),
    )
}

/// Like [`write`], with the output channel passed explicitly.
pub fn write_with_outputs(
    notes: &str,
    output_file: &Path,
    total_commits: usize,
    github_output: Option<&Path>,
) -> Result<()> {
    fs::write(output_file, notes).wrap_err_with(|| {
        format!("failed to write {}", output_file.display())
    })?;

    info!("release notes generated: {}", output_file.display());
    info!("total commits: {total_commits}");

    println!("{notes}");

    if let Some(output_path) = github_output {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(output_path)
            .wrap_err_with(|| {
                format!("failed to open {}", output_path.display())
            })?;

        writeln!(file, "release_notes_file={}", output_file.display())?;
        writeln!(file, "total_commits={total_commits}")?;
    }

    Ok(())
}
