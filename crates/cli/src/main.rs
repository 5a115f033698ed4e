//! `semres` CLI - resolve a deterministic SemVer version from Git tags,
//! commit-message directives and working-tree state.

mod process_repository;

use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::path::PathBuf;
use std::process::exit;

use process_repository::ProcessRepository;
use semres::{resolve, CliConfig, ResolutionContext, ResolutionError, Verbosity};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

shadow_rs::shadow!(build);
const CLI_VERSION: &str = env!("SEMRES_CALCULATED_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

/// Resolve a deterministic SemVer version from Git tags, commit-message
/// directives and working-tree state.
#[derive(Parser, Debug, Clone)]
#[command(name = "semres")]
#[command(about = "Resolve a deterministic SemVer version from Git history")]
#[command(version = CLI_VERSION)]
struct Args {
    /// Repository to analyze (defaults to current directory)
    #[arg(default_value = ".")]
    working_directory: PathBuf,

    /// Commit-ish to resolve the version for
    #[arg(short = 'c', long = "basis-commit")]
    basis_commit: Option<String>,

    /// Pull request number to include in development build metadata
    #[arg(long = "pr-number")]
    pr_number: Option<i64>,

    /// Override the detected branch name used in build metadata
    #[arg(long = "branch")]
    branch_override: Option<String>,

    /// Length of the abbreviated commit SHA in build metadata (7-40)
    #[arg(long = "sha-length")]
    sha_length: Option<u8>,

    /// Verbosity level (quiet, normal, verbose, debug, trace)
    #[arg(short = 'v', long = "verbosity", value_parser = parse_verbosity)]
    verbosity: Option<Verbosity>,

    /// Output format: plain text or a JSON object
    #[arg(long = "format", value_enum, default_value = "plain")]
    format: OutputFormat,
}

fn parse_verbosity(s: &str) -> Result<Verbosity, String> {
    s.parse::<Verbosity>()
}

fn main() {
    let long_ver: &'static str = Box::leak(long_version().into_boxed_str());

    let mut cmd = Args::command();
    cmd = cmd.version(CLI_VERSION).long_version(long_ver);
    let args = Args::from_arg_matches(&cmd.get_matches()).unwrap_or_else(|e| e.exit());

    let verbosity = args.verbosity.unwrap_or(Verbosity::Normal);
    let tracing_level = match verbosity {
        Verbosity::Quiet => tracing::Level::ERROR,
        Verbosity::Normal => tracing::Level::WARN,
        Verbosity::Verbose => tracing::Level::INFO,
        Verbosity::Debug => tracing::Level::DEBUG,
        Verbosity::Trace => tracing::Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = build_config(&args);
    debug!("using configuration: {:?}", config);

    let repo = ProcessRepository::new(config.repo.clone());
    let ctx = ResolutionContext::default();

    let exit_code = match resolve(&ctx, &repo, &config) {
        Ok(version) => {
            info!("resolved version: {}", version.to_extended());
            match args.format {
                OutputFormat::Plain => println!("{}", version.to_extended()),
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "version": version.to_extended(),
                        "major": version.major(),
                        "minor": version.minor(),
                        "patch": version.patch(),
                        "isFinal": version.is_final(),
                    });
                    println!("{}", payload);
                }
            }
            0
        }
        Err(ResolutionError::NotAGitRepository(path)) => {
            error!("'{}' is not a Git repository", path);
            2
        }
        Err(e) => {
            error!("version resolution failed: {}", e);
            2
        }
    };

    exit(exit_code);
}

fn build_config(args: &Args) -> CliConfig {
    let mut config = CliConfig::default();
    apply_env_vars(&mut config);

    config.repo = args.working_directory.clone();

    if let Some(basis) = &args.basis_commit {
        config.basis_commit = basis.clone();
    }
    if let Some(pr) = args.pr_number {
        config.pr_number = Some(pr);
    }
    if let Some(branch) = &args.branch_override {
        config.branch_override = Some(branch.clone());
    }
    if let Some(len) = args.sha_length {
        config.sha_length = len;
    }
    if let Some(verbosity) = args.verbosity {
        config.verbosity = verbosity;
    }

    config
}

fn apply_env_vars(config: &mut CliConfig) {
    use std::env;

    if let Ok(basis) = env::var("SEMRES_BASIS_COMMIT") {
        if !basis.is_empty() {
            config.basis_commit = basis;
        }
    }
    if let Ok(pr) = env::var("SEMRES_PR_NUMBER") {
        if let Ok(value) = pr.parse::<i64>() {
            config.pr_number = Some(value);
        }
    }
    if let Ok(branch) = env::var("SEMRES_BRANCH") {
        if !branch.is_empty() {
            config.branch_override = Some(branch);
        }
    }
    if let Ok(len) = env::var("SEMRES_SHA_LENGTH") {
        if let Ok(value) = len.parse::<u8>() {
            config.sha_length = value;
        }
    }
    if let Ok(verbosity) = env::var("SEMRES_VERBOSITY") {
        if let Ok(level) = verbosity.parse::<Verbosity>() {
            config.verbosity = level;
        }
    }
}

fn long_version() -> String {
    format!(
        "{version}\ncommit: {commit} ({date})\nbuild: {build}\nrustc: {rustc}",
        version = CLI_VERSION,
        commit = build::SHORT_COMMIT,
        date = build::COMMIT_DATE,
        build = build::BUILD_TIME,
        rustc = build::RUST_VERSION,
    )
}
