//! Commit-message directive handling, exercised end-to-end through `resolve`.

use semres::{resolve, CliConfig, GixRepository, ResolutionContext};

mod common;

fn config_for(repo_path: &std::path::Path) -> CliConfig {
    CliConfig {
        repo: repo_path.to_path_buf(),
        ..CliConfig::default()
    }
}

async fn resolved_version(path: &std::path::Path) -> String {
    let repo = GixRepository::discover(path).unwrap();
    let config = config_for(path);
    let ctx = ResolutionContext::default();
    resolve(&ctx, &repo, &config).unwrap().to_extended()
}

#[tokio::test]
async fn version_major_keyword_bumps_major_and_resets_lower_components() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "1.4.5", ".").await.unwrap();
    common::git::commit_with_message(path, "drop deprecated API\n\nversion: major").await.unwrap();

    assert!(resolved_version(path).await.starts_with("2.0.0-SNAPSHOT"));
}

#[tokio::test]
async fn feat_alias_behaves_like_minor() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "1.4.5", ".").await.unwrap();
    common::git::commit_with_message(path, "feat: add export command").await.unwrap();

    assert!(resolved_version(path).await.starts_with("1.5.0-SNAPSHOT"));
}

#[tokio::test]
async fn absolute_major_set_wins_over_default_increment() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "1.4.5", ".").await.unwrap();
    common::git::commit_with_message(path, "jump ahead\n\nversion: major: 9").await.unwrap();

    assert!(resolved_version(path).await.starts_with("9.0.0-SNAPSHOT"));
}

#[tokio::test]
async fn target_directive_sets_the_resolved_core() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "1.0.0", ".").await.unwrap();
    common::git::commit_with_message(path, "prep for next release\n\ntarget: 3.0.0").await.unwrap();

    assert!(resolved_version(path).await.starts_with("3.0.0-SNAPSHOT"));
}

#[tokio::test]
async fn target_directive_below_reachable_final_is_rejected() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "2.2.5", ".").await.unwrap();
    common::git::commit_with_message(path, "oops\n\ntarget: 2.2.4").await.unwrap();

    // Rule A rejects the candidate; falls back to the directive-derived core.
    assert!(resolved_version(path).await.starts_with("2.2.6-SNAPSHOT"));
}

#[tokio::test]
async fn version_ignore_drops_the_entire_commit() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "1.0.0", ".").await.unwrap();
    common::git::commit_with_message(path, "version: major\n\nversion: ignore").await.unwrap();

    // The directive-bearing commit is dropped entirely, so no directive is
    // ever aggregated: falls back to the default patch bump.
    assert!(resolved_version(path).await.starts_with("1.0.1-SNAPSHOT"));
}

#[tokio::test]
async fn ignore_by_sha_drops_only_the_named_commit() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "1.0.0", ".").await.unwrap();
    common::git::commit_with_message(path, "version: major").await.unwrap();
    let bad_sha = common::git::head_sha(path).await.unwrap();
    common::git::commit_with_message(path, &format!("cleanup\n\nversion: ignore: {bad_sha}"))
        .await
        .unwrap();

    assert!(resolved_version(path).await.starts_with("1.0.1-SNAPSHOT"));
}

#[tokio::test]
async fn ignore_merged_drops_directives_introduced_by_the_merged_branch() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path();
    common::git::ensure_empty_repository_and_commit(path).await.unwrap();
    common::git::annotated_tag(path, "1.0.0", ".").await.unwrap();

    common::git::checkout_new_branch(path, "feature").await.unwrap();
    common::git::commit_with_message(path, "breaking change\n\nversion: major").await.unwrap();
    common::git::checkout(path, "main").await.unwrap();
    common::git::merge_no_ff_with_message(path, "feature", "merge feature\n\nversion: ignore-merged")
        .await
        .unwrap();

    assert!(resolved_version(path).await.starts_with("1.0.1-SNAPSHOT"));
}
