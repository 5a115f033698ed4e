//! The bundled `gix`-backed [`RepositoryQuery`] implementation (§6): opens a
//! repository in-process rather than shelling out to `git` for discovery
//! and traversal.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, ResolutionError};
use crate::prerelease_resolver::DefaultPreReleaseResolver;
use crate::repository::{Commit, RepositoryQuery, Tag};

/// Wraps an opened `gix::Repository`, exposing only the operations the
/// resolver needs through [`RepositoryQuery`].
pub struct GixRepository {
    inner: gix::Repository,
}

impl GixRepository {
    /// Discover and open a Git repository starting from `path`.
    pub fn discover(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = gix::discover(&path)
            .map_err(|e| ResolutionError::NotAGitRepository(format!("{}: {e}", path.display())))?;
        Ok(Self { inner })
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    fn resolve_id(&self, spec: &str) -> Result<gix::ObjectId> {
        self.inner
            .rev_parse_single(spec)
            .map(|id| id.detach())
            .map_err(|e| ResolutionError::NotAGitRepository(format!("{spec}: {e}")))
    }

    fn commit_message(&self, id: gix::ObjectId) -> Result<(String, bool)> {
        let object = self
            .inner
            .find_object(id)
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        let commit = object
            .try_into_commit()
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        let is_merge = commit.parent_ids().count() > 1;
        let message = commit
            .message_raw()
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        Ok((String::from_utf8_lossy(message).into_owned(), is_merge))
    }

    fn first_parent(&self, id: gix::ObjectId) -> Result<Option<gix::ObjectId>> {
        let object = self
            .inner
            .find_object(id)
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        let commit = object
            .try_into_commit()
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        Ok(commit.parent_ids().next().map(|p| p.detach()))
    }

    fn parent_ids(&self, id: gix::ObjectId) -> Result<Vec<gix::ObjectId>> {
        let object = self
            .inner
            .find_object(id)
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        let commit = object
            .try_into_commit()
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        Ok(commit.parent_ids().map(|p| p.detach()).collect())
    }

    /// Every ancestor of `id` (inclusive), walking all parents.
    fn ancestors_inclusive(&self, id: gix::ObjectId) -> Result<HashSet<gix::ObjectId>> {
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            for parent in self.parent_ids(current)? {
                stack.push(parent);
            }
        }
        Ok(seen)
    }
}

impl RepositoryQuery for GixRepository {
    fn resolve_rev(&self, spec: &str) -> Result<String> {
        Ok(self.resolve_id(spec)?.to_string())
    }

    fn list_all_tags(&self) -> Result<Vec<Tag>> {
        let resolver = DefaultPreReleaseResolver;
        let refs = self
            .inner
            .references()
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        let tag_refs = refs
            .tags()
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;

        let mut tags = Vec::new();
        for mut tag_ref in tag_refs.flatten() {
            let name = tag_ref.name().shorten().to_string();

            // Only annotated tags count (§6): a lightweight tag's reference
            // target is the commit itself, never a tag object.
            let Some(target_id) = tag_ref.target().try_id().map(|id| id.to_owned()) else {
                continue;
            };
            let Ok(target_object) = self.inner.find_object(target_id) else {
                continue;
            };
            if target_object.kind != gix::object::Kind::Tag {
                continue;
            }

            let stripped = name.strip_prefix('v').or_else(|| name.strip_prefix('V')).unwrap_or(&name);
            let Ok(version) = crate::parser::parse_version(stripped, &resolver) else {
                continue;
            };
            let Ok(id) = tag_ref.peel_to_id() else {
                continue;
            };
            tags.push(Tag {
                name,
                commit_sha: id.detach().to_string(),
                version,
            });
        }
        Ok(tags)
    }

    fn find_reachable_tags(&self, sha: &str) -> Result<Vec<Tag>> {
        let target = self.resolve_id(sha)?;
        let ancestors = self.ancestors_inclusive(target)?;
        Ok(self
            .list_all_tags()?
            .into_iter()
            .filter(|tag| {
                gix::ObjectId::from_hex(tag.commit_sha.as_bytes())
                    .map(|id| ancestors.contains(&id))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn is_working_directory_clean(&self) -> Result<bool> {
        self.inner
            .is_dirty()
            .map(|dirty| !dirty)
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))
    }

    fn get_branch_name(&self) -> Result<Option<String>> {
        let head_name = self
            .inner
            .head_name()
            .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?;
        Ok(head_name.map(|name| name.shorten().to_string()))
    }

    fn get_commits_since(&self, to: &str, from_exclusive: Option<&str>) -> Result<Vec<Commit>> {
        let to_id = self.resolve_id(to)?;
        let boundary = from_exclusive
            .map(|spec| self.resolve_id(spec))
            .transpose()?;

        let excluded = match boundary {
            Some(id) => self.ancestors_inclusive(id)?,
            None => HashSet::new(),
        };

        let mut commits = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![to_id];
        let mut order = Vec::new();
        while let Some(current) = stack.pop() {
            if excluded.contains(&current) || !seen.insert(current) {
                continue;
            }
            order.push(current);
            for parent in self.parent_ids(current)? {
                stack.push(parent);
            }
        }

        for id in order {
            let (message, is_merge) = self.commit_message(id)?;
            commits.push(Commit {
                sha: id.to_string(),
                message,
                is_merge,
            });
        }
        Ok(commits)
    }

    fn count_commits_since(&self, to: &str, from_exclusive: Option<&str>) -> Result<i32> {
        let boundary = from_exclusive
            .map(|spec| self.resolve_id(spec))
            .transpose()?;

        let mut count: i64 = 0;
        let mut current = Some(self.resolve_id(to)?);
        while let Some(id) = current {
            if Some(id) == boundary {
                break;
            }
            let (_, is_merge) = self.commit_message(id)?;
            if !is_merge {
                count += 1;
            }
            current = self.first_parent(id)?;
        }
        Ok(count.min(i32::MAX as i64) as i32)
    }

    fn get_abbreviated_sha(&self, sha: &str, length: u8) -> Result<String> {
        if !(7..=40).contains(&length) {
            return Err(ResolutionError::InvalidShaLength(length));
        }
        let full = self.resolve_id(sha)?.to_string();
        Ok(full[..length as usize].to_ascii_lowercase())
    }

    fn get_merged_commits(&self, merge_sha: &str) -> Result<Vec<String>> {
        let merge_id = self.resolve_id(merge_sha)?;
        let parents = self.parent_ids(merge_id)?;
        let Some((first, rest)) = parents.split_first() else {
            return Ok(Vec::new());
        };
        let first_parent_ancestors = self.ancestors_inclusive(*first)?;

        let mut introduced = HashSet::new();
        let mut stack: Vec<_> = rest.to_vec();
        while let Some(current) = stack.pop() {
            if first_parent_ancestors.contains(&current) || !introduced.insert(current) {
                continue;
            }
            for parent in self.parent_ids(current)? {
                stack.push(parent);
            }
        }
        Ok(introduced.into_iter().map(|id| id.to_string()).collect())
    }
}
