//! The repository query interface (§6): the abstract collaborator the core
//! consumes instead of touching Git itself. The core is specified only
//! against this trait; process invocation and plumbing-command parsing are
//! explicitly out of scope (§1).

use crate::error::Result;
use crate::version::Version;

/// `(name, commitSha, version)` — a tag that parsed as a valid SemVer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
    pub version: Version,
}

/// `(sha, message, isMerge)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub is_merge: bool,
}

/// One method per row of §6's table. Every operation may fail with a typed
/// [`crate::error::ResolutionError`]; there is no silent-failure path here
/// (that belongs to the directive/tag parsers further up the pipeline).
pub trait RepositoryQuery {
    /// Full SHA for a revision spec (e.g. `HEAD`, a branch, a short SHA).
    fn resolve_rev(&self, spec: &str) -> Result<String>;

    /// Every annotated tag parseable as SemVer. Lightweight tags and
    /// unparseable names are excluded upstream, never a hard error.
    fn list_all_tags(&self) -> Result<Vec<Tag>>;

    /// The subset of `list_all_tags` whose commits are ancestors of, or
    /// equal to, `sha`.
    fn find_reachable_tags(&self, sha: &str) -> Result<Vec<Tag>>;

    /// True iff there are no tracked changes and no non-ignored untracked files.
    fn is_working_directory_clean(&self) -> Result<bool>;

    /// Short branch name, or `None` if `HEAD` is detached.
    fn get_branch_name(&self) -> Result<Option<String>>;

    /// Ordered commits from `from_exclusive` (exclusive) to `to` (inclusive),
    /// traversing *all* parents so directives on merged branches are visible.
    fn get_commits_since(&self, to: &str, from_exclusive: Option<&str>) -> Result<Vec<Commit>>;

    /// Non-merge, first-parent commit count, clamped to the 32-bit signed max.
    fn count_commits_since(&self, to: &str, from_exclusive: Option<&str>) -> Result<i32>;

    /// Lowercase hex of the requested length (7-40).
    fn get_abbreviated_sha(&self, sha: &str, length: u8) -> Result<String>;

    /// SHAs introduced by the given merge commit (for `IgnoreMerged`).
    fn get_merged_commits(&self, merge_sha: &str) -> Result<Vec<String>>;
}
