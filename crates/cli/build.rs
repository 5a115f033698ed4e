use std::env;
use std::path::PathBuf;

fn main() {
    let version = calculate_semres_version();
    println!("cargo:rustc-env=SEMRES_CALCULATED_VERSION={}", version);

    // shadow-rs generates extended build metadata (git hash, timestamps, rustc version)
    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("shadow-rs build failed");
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    manifest_dir
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn calculate_semres_version() -> String {
    let work_dir = workspace_root();
    let Ok(repo) = semres::GixRepository::discover(&work_dir) else {
        return env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0-dev".to_string());
    };
    let config = semres::CliConfig {
        repo: work_dir,
        ..semres::CliConfig::default()
    };
    let ctx = semres::ResolutionContext::default();

    match semres::resolve(&ctx, &repo, &config) {
        Ok(version) => version.to_extended(),
        Err(_) => env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0-dev".to_string()),
    }
}
