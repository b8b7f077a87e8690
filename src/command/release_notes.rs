//! Release notes generation command implementation.
use log::*;

use crate::{
    analyzer::sections::Classifier,
    cli::ReleaseNotesArgs,
    config::Config,
    error::ChangekitError,
    forge::{
        config::RemoteConfig, github::Github, traits::CommitSource,
        types::ForgeCommit,
    },
    notes::{render::Renderer, writer},
    result::Result,
};

/// Execute release-notes: fetch commits between the given references,
/// classify them, and write the rendered markdown.
pub async fn execute(args: &ReleaseNotesArgs) -> Result<()> {
    let from_display = if args.from_ref.is_empty() {
        "beginning"
    } else {
        args.from_ref.as_str()
    };
    info!(
        "generating release notes from {} to {}",
        from_display, args.to_ref
    );

    let config = Config::load(args.config_file.as_deref())?;
    let remote = RemoteConfig::resolve(args)?;
    let github = Github::new(remote.clone())?;

    let mut commits = fetch_commits(
        &github,
        &args.from_ref,
        &args.to_ref,
        args.fallback_latest,
    )
    .await?;

    if commits.is_empty() {
        info!("no commits found between the specified references");
    }

    let classifier = Classifier::new(&config)?;

    if classifier.wants_file_metadata() {
        enrich_custom_candidates(&github, &classifier, &mut commits).await;
    }

    let classified = classifier.classify(&commits);

    let renderer = Renderer::new(&config, remote.repo_url());
    let notes = renderer.render(&classified)?;

    writer::write(&notes, &args.output_file, classified.total)?;

    Ok(())
}

/// Fetch the commit range: full history when from_ref is empty, otherwise
/// a compare, retried once from the latest published release tag when the
/// fallback is enabled and from_ref does not resolve.
async fn fetch_commits<S: CommitSource>(
    source: &S,
    from_ref: &str,
    to_ref: &str,
    fallback_latest: bool,
) -> Result<Vec<ForgeCommit>> {
    if from_ref.is_empty() {
        return source.history(to_ref).await;
    }

    match source.compare(from_ref, to_ref).await {
        Ok(commits) => Ok(commits),
        Err(err) if fallback_latest && is_unresolved_ref(&err) => {
            warn!(
                "unable to resolve {from_ref}: falling back to the latest published release tag"
            );

            let Some(tag) = source.latest_release_tag().await? else {
                return Err(err);
            };

            info!("retrying compare from {tag}");
            source.compare(&tag, to_ref).await
        }
        Err(err) => Err(err),
    }
}

fn is_unresolved_ref(err: &color_eyre::Report) -> bool {
    matches!(
        err.downcast_ref::<ChangekitError>(),
        Some(ChangekitError::UnresolvedRef(_))
    )
}

/// Fetch changed-file metadata for commits that may belong to the custom
/// section. Lookup failures are non-fatal.
async fn enrich_custom_candidates<S: CommitSource>(
    source: &S,
    classifier: &Classifier<'_>,
    commits: &mut [ForgeCommit],
) {
    for index in classifier.custom_candidates(commits) {
        match source.commit_files(&commits[index].id).await {
            Ok(files) => commits[index].files = files,
            Err(err) => warn!(
                "failed to fetch files for {}: {err}",
                commits[index].short_id
            ),
        }
    }
}
