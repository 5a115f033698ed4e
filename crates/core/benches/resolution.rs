use criterion::{black_box, criterion_group, criterion_main, Criterion};
use semres::{resolve, CliConfig, Commit, RepositoryQuery, ResolutionContext, Result, Tag};

/// An in-memory stand-in for the git-backed [`RepositoryQuery`] so the
/// benchmark measures the resolution pipeline itself, not subprocess
/// overhead.
struct FixtureRepo {
    tags: Vec<Tag>,
    commits: Vec<Commit>,
}

impl RepositoryQuery for FixtureRepo {
    fn resolve_rev(&self, _spec: &str) -> Result<String> {
        Ok("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef".into())
    }
    fn list_all_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.clone())
    }
    fn find_reachable_tags(&self, _sha: &str) -> Result<Vec<Tag>> {
        Ok(self.tags.clone())
    }
    fn is_working_directory_clean(&self) -> Result<bool> {
        Ok(true)
    }
    fn get_branch_name(&self) -> Result<Option<String>> {
        Ok(Some("main".into()))
    }
    fn get_commits_since(&self, _to: &str, _from: Option<&str>) -> Result<Vec<Commit>> {
        Ok(self.commits.clone())
    }
    fn count_commits_since(&self, _to: &str, _from: Option<&str>) -> Result<i32> {
        Ok(self.commits.len() as i32)
    }
    fn get_abbreviated_sha(&self, sha: &str, length: u8) -> Result<String> {
        Ok(sha.chars().take(length as usize).collect())
    }
    fn get_merged_commits(&self, _merge_sha: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

fn fixture(commit_count: usize) -> FixtureRepo {
    let tags = vec![Tag {
        name: "v1.4.5".into(),
        commit_sha: "base0000".into(),
        version: "1.4.5".parse().unwrap(),
    }];
    let commits = (0..commit_count)
        .map(|i| Commit {
            sha: format!("{i:040x}"),
            message: match i % 4 {
                0 => "fix: something small".to_string(),
                1 => "feat: add a thing\n\nversion: minor".to_string(),
                2 => "chore: cleanup".to_string(),
                _ => "version: ignore-merged".to_string(),
            },
            is_merge: i % 4 == 3,
        })
        .collect();
    FixtureRepo { tags, commits }
}

fn bench_resolve_no_commits(c: &mut Criterion) {
    let repo = fixture(0);
    let config = CliConfig::default();
    let ctx = ResolutionContext::default();
    c.bench_function("resolve_development_no_commits", |b| {
        b.iter(|| black_box(resolve(&ctx, &repo, &config)))
    });
}

fn bench_resolve_with_commit_history(c: &mut Criterion) {
    let repo = fixture(200);
    let config = CliConfig::default();
    let ctx = ResolutionContext::default();
    c.bench_function("resolve_200_commits", |b| {
        b.iter(|| black_box(resolve(&ctx, &repo, &config)))
    });
}

criterion_group!(benches, bench_resolve_no_commits, bench_resolve_with_commit_history);
criterion_main!(benches);
