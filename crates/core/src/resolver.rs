//! Top-level orchestrator (§4.8): resolves a [`Version`] for a repository
//! snapshot, given a [`RepositoryQuery`] and a [`CliConfig`].
//!
//! Single-threaded, synchronous, purely a deterministic function of the
//! repository query results and the config (§5): no suspension points, no
//! shared mutable state.

use crate::config::CliConfig;
use crate::error::Result;
use crate::ignore;
use crate::keyword::{parse_commit_message, Directive};
use crate::metadata_builder::build_metadata;
use crate::prerelease_resolver::ResolutionContext;
use crate::repository::{Commit, RepositoryQuery, Tag};
use crate::target::{derive_core_from_directives, select_target, TargetContext};
use crate::version::{PreRelease, PreReleaseClassifier, Version};

/// Resolve the version for the basis commit named in `config.basis_commit`.
///
/// `ctx` threads the active [`crate::prerelease_resolver::PreReleaseResolver`]
/// through tag-name parsing; most callers can use [`ResolutionContext::default`].
pub fn resolve(
    ctx: &ResolutionContext<'_>,
    repo: &impl RepositoryQuery,
    config: &CliConfig,
) -> Result<Version> {
    let basis_sha = repo.resolve_rev(&config.basis_commit)?;
    tracing::debug!(basis = %basis_sha, "resolved basis commit");

    let is_clean = repo.is_working_directory_clean()?;
    let reachable = repo.find_reachable_tags(&basis_sha)?;
    let all_tags = repo.list_all_tags()?;
    tracing::trace!(
        reachable = reachable.len(),
        total = all_tags.len(),
        clean = is_clean,
        "gathered tag landscape"
    );

    let head_tag = highest_on_commit(&reachable, &basis_sha);

    // Mode 1: concrete version, verbatim, when HEAD carries a tag and the
    // worktree is clean.
    if is_clean {
        if let Some(tag) = &head_tag {
            tracing::debug!(version = %tag.version, "concrete version: clean tagged commit");
            return Ok(tag.version.clone());
        }
    }

    // Mode 2: development version.
    let base_tag = highest(&reachable);
    tracing::debug!(base = ?base_tag.map(|t| t.name.as_str()), "selected base tag");

    let scan_from = base_tag.map(|t| t.commit_sha.as_str());
    let commits = repo.get_commits_since(&basis_sha, scan_from)?;
    tracing::trace!(commits = commits.len(), "commits in scan range");

    let per_commit_directives: Vec<(Commit, Vec<Directive>)> = commits
        .iter()
        .map(|c| (c.clone(), parse_commit_message(&c.message, ctx.resolver)))
        .collect();

    let excluded = ignore::compute_ignored(&commits, &per_commit_directives, repo)?;
    tracing::trace!(ignored = excluded.len(), "computed ignore set");

    let surviving: Vec<Directive> = per_commit_directives
        .iter()
        .filter(|(commit, directives)| !ignore::is_dropped(commit, directives, &excluded))
        .flat_map(|(_, directives)| {
            directives
                .iter()
                .filter(|d| !matches!(d, Directive::IgnoreSelf))
                .cloned()
        })
        .collect();

    let target_core = resolve_target(&surviving, base_tag, &reachable, &all_tags);
    tracing::debug!(target = %target_core, "computed target core");

    let metadata = build_metadata(
        config,
        &basis_sha,
        base_tag.map(|t| t.commit_sha.as_str()),
        is_clean,
        repo,
    )?;

    let snapshot = PreRelease::snapshot();
    let version = target_core
        .with_pre_release(Some(snapshot))
        .with_metadata(Some(metadata));
    tracing::info!(version = %version.to_extended(), "resolved development version");
    Ok(version)
}

/// §4.5: try the validated `target:` candidates first, falling back to the
/// directive-derived core.
fn resolve_target(
    directives: &[Directive],
    base_tag: Option<&Tag>,
    reachable: &[Tag],
    all_tags: &[Tag],
) -> Version {
    let candidates: Vec<Version> = directives
        .iter()
        .filter_map(|d| match d {
            Directive::TargetSet(v) => Some(v.clone()),
            _ => None,
        })
        .collect();

    if !candidates.is_empty() {
        let highest_reachable = highest(reachable).map(|t| &t.version);
        let highest_reachable_final_core = reachable
            .iter()
            .filter(|t| t.version.is_final())
            .map(|t| t.version.core())
            .max();
        let repository_highest = highest(all_tags).map(|t| &t.version);
        let repository_highest_final_core = all_tags
            .iter()
            .filter(|t| t.version.is_final())
            .map(|t| t.version.core())
            .max();

        let target_ctx = TargetContext {
            highest_reachable,
            highest_reachable_final_core,
            repository_highest,
            repository_highest_final_core,
            // The resolver's own development-mode path never treats the
            // basis commit as sitting on a final tag, so rule D is vacuous
            // here by construction, not by omission.
            is_head_on_final_tag: false,
        };

        if let Some(selected) = select_target(&candidates, &target_ctx) {
            return selected;
        }
    }

    let any_tag = highest(all_tags).map(|t| &t.version);
    derive_core_from_directives(directives, base_tag.map(|t| &t.version), any_tag)
}

/// The single highest tag by version ordering, breaking ties in favour of
/// whichever the map happens to keep last (multiple tags of equal
/// precedence on different commits is left undisambiguated beyond that).
fn highest(tags: &[Tag]) -> Option<&Tag> {
    tags.iter().max_by(|a, b| a.version.cmp(&b.version))
}

/// The highest tag whose commit is exactly `sha` (§5 "multi-tag on a
/// single commit": final outranks pre-release of the same core, otherwise
/// highest SemVer — which is exactly `Version`'s own ordering).
fn highest_on_commit<'a>(tags: &'a [Tag], sha: &str) -> Option<&'a Tag> {
    tags.iter()
        .filter(|t| t.commit_sha == sha)
        .max_by(|a, b| a.version.cmp(&b.version))
}
