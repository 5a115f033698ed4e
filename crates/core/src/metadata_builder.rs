//! Metadata builder (§4.6): assembles the ordered build-metadata
//! identifier list (`pr`, `branch`, `commits`, `sha`, `dirty`) that
//! accompanies every development version.

use crate::config::CliConfig;
use crate::error::{Result, ResolutionError, VersionError};
use crate::repository::RepositoryQuery;
use crate::version::Metadata;

/// (1) lowercase ASCII, (2) replace any char outside `[0-9a-z-]` with `-`,
/// (3) collapse runs of `-`, (4) trim leading/trailing `-`, (5) `detached`
/// if the result is empty. A pure function (§4.6 "Branch normalisation").
pub fn normalize_branch(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(b) => b,
        None => return "detached".to_string(),
    };

    let mut collapsed = String::with_capacity(raw.len());
    let mut last_was_dash = false;
    for c in raw.chars() {
        let lower = c.to_ascii_lowercase();
        let normalized = if lower.is_ascii_digit() || lower.is_ascii_lowercase() || lower == '-' {
            lower
        } else {
            '-'
        };
        if normalized == '-' {
            if !last_was_dash {
                collapsed.push('-');
            }
            last_was_dash = true;
        } else {
            collapsed.push(normalized);
            last_was_dash = false;
        }
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        "detached".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Assemble build metadata for a development version, per the six steps
/// of §4.6. `basis_sha` is the full SHA of the resolved basis commit;
/// `base_sha` is the base tag's commit SHA, if any.
pub fn build_metadata(
    config: &CliConfig,
    basis_sha: &str,
    base_sha: Option<&str>,
    is_clean: bool,
    repo: &impl RepositoryQuery,
) -> Result<Metadata> {
    if !(7..=40).contains(&config.sha_length) {
        return Err(ResolutionError::InvalidShaLength(config.sha_length));
    }

    let mut identifiers = Vec::new();

    if let Some(pr) = config.pr_number {
        if pr >= 0 {
            identifiers.push(format!("pr{pr}"));
        }
    }

    let branch = match &config.branch_override {
        Some(b) => Some(b.clone()),
        None => repo.get_branch_name()?,
    };
    identifiers.push(format!("branch{}", normalize_branch(branch.as_deref())));

    let commit_count = repo.count_commits_since(basis_sha, base_sha)?;
    identifiers.push(format!("commits{commit_count}"));

    let sha = repo.get_abbreviated_sha(basis_sha, config.sha_length)?;
    identifiers.push(format!("sha{sha}"));

    if !is_clean {
        identifiers.push("dirty".to_string());
    }

    Metadata::from(identifiers).map_err(|e: VersionError| ResolutionError::Version(e))
}
