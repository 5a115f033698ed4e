//! `ProcessRepository`: a `git` subprocess-invoking [`RepositoryQuery`]
//! implementation, driving the Git-interrogation plumbing commands
//! (`rev-parse`, `for-each-ref`, `merge-base --is-ancestor`,
//! `status --porcelain`, `rev-list`).
//!
//! This lives in the CLI crate, not the core: process invocation and
//! plumbing-command parsing are kept out of the pure resolution engine.
//! `semres-core` ships its own `gix`-backed implementation for library
//! consumers who'd rather not shell out.

use std::path::PathBuf;
use std::process::Command;

use semres::{parser, Commit, DefaultPreReleaseResolver, ResolutionError, RepositoryQuery, Result, Tag};

pub struct ProcessRepository {
    work_dir: PathBuf,
}

impl ProcessRepository {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| ResolutionError::NotAGitRepository(format!("git {}: {e}", args.join(" "))))?;

        if !output.status.success() {
            return Err(ResolutionError::from_git_output(
                format!("git {}", args.join(" ")),
                &output,
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl RepositoryQuery for ProcessRepository {
    fn resolve_rev(&self, spec: &str) -> Result<String> {
        self.git(&["rev-parse", "--verify", spec])
    }

    fn list_all_tags(&self) -> Result<Vec<Tag>> {
        let resolver = DefaultPreReleaseResolver;
        let raw = self.git(&[
            "for-each-ref",
            "--format=%(refname:short) %(objectname) %(object)",
            "refs/tags",
        ])?;

        let mut tags = Vec::new();
        for line in raw.lines() {
            let mut parts = line.split_whitespace();
            // `%(objectname)` is the tag object's own oid for an annotated
            // tag; `%(object)` (present only for annotated tags) is the
            // commit it points at. Lightweight tags have no third field and
            // are excluded, matching "Lightweight tags ... are excluded" (§6).
            let (Some(name), Some(_tag_oid), Some(commit_oid)) =
                (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };

            let stripped = name
                .strip_prefix('v')
                .or_else(|| name.strip_prefix('V'))
                .unwrap_or(name);
            let Ok(version) = parser::parse_version(stripped, &resolver) else {
                continue;
            };
            tags.push(Tag {
                name: name.to_string(),
                commit_sha: commit_oid.to_string(),
                version,
            });
        }
        Ok(tags)
    }

    fn find_reachable_tags(&self, sha: &str) -> Result<Vec<Tag>> {
        let mut reachable = Vec::new();
        for tag in self.list_all_tags()? {
            let is_ancestor = Command::new("git")
                .args(["merge-base", "--is-ancestor", &tag.commit_sha, sha])
                .current_dir(&self.work_dir)
                .status()
                .map_err(|e| ResolutionError::NotAGitRepository(e.to_string()))?
                .success();
            if is_ancestor {
                reachable.push(tag);
            }
        }
        Ok(reachable)
    }

    fn is_working_directory_clean(&self) -> Result<bool> {
        let status = self.git(&["status", "--porcelain"])?;
        Ok(status.is_empty())
    }

    fn get_branch_name(&self) -> Result<Option<String>> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if name == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(name))
        }
    }

    fn get_commits_since(&self, to: &str, from_exclusive: Option<&str>) -> Result<Vec<Commit>> {
        let range = match from_exclusive {
            Some(from) => format!("{from}..{to}"),
            None => to.to_string(),
        };
        let raw = self.git(&[
            "rev-list",
            "--parents",
            "--pretty=format:%H%x01%P%x01%B%x02",
            &range,
        ])?;

        let mut commits = Vec::new();
        for entry in raw.split('\u{2}') {
            let entry = entry.trim_start_matches('\n');
            if entry.is_empty() {
                continue;
            }
            // Each `rev-list --pretty` entry begins with a `commit <sha>
            // <parents>` plumbing line we don't need; the payload we asked
            // for follows on the next line.
            let Some(payload_start) = entry.find('\n') else {
                continue;
            };
            let payload = &entry[payload_start + 1..];
            let mut fields = payload.splitn(3, '\u{1}');
            let (Some(sha), Some(parents), Some(message)) =
                (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            let is_merge = parents.split_whitespace().count() > 1;
            commits.push(Commit {
                sha: sha.to_string(),
                message: message.trim_end_matches('\n').to_string(),
                is_merge,
            });
        }
        Ok(commits)
    }

    fn count_commits_since(&self, to: &str, from_exclusive: Option<&str>) -> Result<i32> {
        let range = match from_exclusive {
            Some(from) => format!("{from}..{to}"),
            None => to.to_string(),
        };
        let raw = self.git(&["rev-list", "--first-parent", "--no-merges", "--count", &range])?;
        let count: i64 = raw.parse().unwrap_or(0);
        Ok(count.min(i32::MAX as i64) as i32)
    }

    fn get_abbreviated_sha(&self, sha: &str, length: u8) -> Result<String> {
        if !(7..=40).contains(&length) {
            return Err(ResolutionError::InvalidShaLength(length));
        }
        let full = self.git(&["rev-parse", sha])?;
        Ok(full[..length as usize].to_ascii_lowercase())
    }

    fn get_merged_commits(&self, merge_sha: &str) -> Result<Vec<String>> {
        let parents = self.git(&["rev-parse", &format!("{merge_sha}^@")])?;
        let mut parent_iter = parents.lines();
        let Some(first_parent) = parent_iter.next() else {
            return Ok(Vec::new());
        };
        let rest: Vec<&str> = parent_iter.collect();
        if rest.is_empty() {
            return Ok(Vec::new());
        }

        let mut introduced = Vec::new();
        for other_parent in rest {
            let range = format!("{first_parent}..{other_parent}");
            let raw = self.git(&["rev-list", &range])?;
            introduced.extend(raw.lines().map(str::to_string));
        }
        Ok(introduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn git(dir: &std::path::Path, args: &[&str]) {
        let status = StdCommand::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .expect("git invocation failed");
        assert!(status.success(), "git {args:?} failed");
    }

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "--initial-branch=main"]);
        git(dir.path(), &["config", "user.email", "test@example.com"]);
        git(dir.path(), &["config", "user.name", "Test User"]);
        git(dir.path(), &["config", "commit.gpgsign", "false"]);
        dir
    }

    #[test]
    fn resolves_head_and_reports_clean() {
        let dir = init_repo();
        git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        let repo = ProcessRepository::new(dir.path());

        let head = repo.resolve_rev("HEAD").unwrap();
        assert_eq!(head.len(), 40);
        assert!(repo.is_working_directory_clean().unwrap());
    }

    #[test]
    fn detects_dirty_worktree() {
        let dir = init_repo();
        git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        std::fs::write(dir.path().join("untracked.txt"), "x").unwrap();
        let repo = ProcessRepository::new(dir.path());
        assert!(!repo.is_working_directory_clean().unwrap());
    }

    #[test]
    fn lightweight_tags_are_excluded_annotated_tags_included() {
        let dir = init_repo();
        git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        git(dir.path(), &["tag", "v1.0.0"]); // lightweight
        git(
            dir.path(),
            &["tag", "-a", "v2.0.0", "-m", "release 2.0.0"],
        );
        let repo = ProcessRepository::new(dir.path());

        let tags = repo.list_all_tags().unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert!(!names.contains(&"v1.0.0"));
        assert!(names.contains(&"v2.0.0"));
    }

    #[test]
    fn reachable_tags_are_ancestors_of_head() {
        let dir = init_repo();
        git(dir.path(), &["commit", "--allow-empty", "-m", "1"]);
        git(dir.path(), &["tag", "-a", "v1.0.0", "-m", "."]);
        git(dir.path(), &["checkout", "-b", "other"]);
        git(dir.path(), &["commit", "--allow-empty", "-m", "2"]);
        git(dir.path(), &["tag", "-a", "v2.0.0", "-m", "."]);
        git(dir.path(), &["checkout", "main"]);

        let repo = ProcessRepository::new(dir.path());
        let head = repo.resolve_rev("HEAD").unwrap();
        let reachable = repo.find_reachable_tags(&head).unwrap();
        let names: Vec<&str> = reachable.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["v1.0.0"]);
    }

    #[test]
    fn commit_count_excludes_merges_and_follows_first_parent() {
        let dir = init_repo();
        git(dir.path(), &["commit", "--allow-empty", "-m", "1"]);
        git(dir.path(), &["checkout", "-b", "feature"]);
        git(dir.path(), &["commit", "--allow-empty", "-m", "2"]);
        git(dir.path(), &["checkout", "main"]);
        git(dir.path(), &["commit", "--allow-empty", "-m", "3"]);
        git(dir.path(), &["merge", "feature", "--no-ff", "--no-edit"]);

        let repo = ProcessRepository::new(dir.path());
        let head = repo.resolve_rev("HEAD").unwrap();
        // first-parent, non-merge: initial + "3" + the merge commit itself
        // (excluded) -> 2, the feature-branch commit is never on the first
        // parent spine.
        let count = repo.count_commits_since(&head, None).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn get_merged_commits_returns_shas_introduced_by_other_parents() {
        let dir = init_repo();
        git(dir.path(), &["commit", "--allow-empty", "-m", "1"]);
        git(dir.path(), &["checkout", "-b", "feature"]);
        git(dir.path(), &["commit", "--allow-empty", "-m", "2"]);
        git(dir.path(), &["checkout", "main"]);
        git(dir.path(), &["merge", "feature", "--no-ff", "--no-edit"]);

        let repo = ProcessRepository::new(dir.path());
        let head = repo.resolve_rev("HEAD").unwrap();
        let merged = repo.get_merged_commits(&head).unwrap();
        assert_eq!(merged.len(), 1);
    }
}
