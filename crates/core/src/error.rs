//! Error types for the resolution engine.
//!
//! Mirrors the source's split between hard failures (repository I/O and
//! contract violations) and value-construction errors: every fallible
//! constructor in [`crate::version`] gets its own variant here rather than
//! a single catch-all string.

use thiserror::Error;

use crate::version::PreReleaseClassifier;

/// Result type alias used throughout `semres`.
pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Errors raised by the version-algebra's smart constructors and operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid major version: {0}")]
    InvalidMajorVersion(i64),

    #[error("invalid minor version: {0}")]
    InvalidMinorVersion(i64),

    #[error("invalid patch number: {0}")]
    InvalidPatchNumber(i64),

    #[error("invalid pre-release number: {0}")]
    InvalidPreReleaseNumber(i64),

    #[error("pre-release classifier {0:?} requires a number")]
    MissingPreReleaseNumber(PreReleaseClassifier),

    #[error("pre-release classifier {0:?} does not take a number")]
    UnexpectedPreReleaseNumber(PreReleaseClassifier),

    #[error("classifier {0:?} is not versioned")]
    ClassifierNotVersioned(PreReleaseClassifier),

    #[error("invalid pre-release transition: {0}")]
    InvalidPreReleaseTransition(String),

    #[error("version is not a pre-release")]
    NotAPreReleaseVersion,

    #[error("invalid build metadata: {0}")]
    InvalidMetadata(String),
}

/// Errors raised while parsing a SemVer string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("invalid numeric field {field}: {value}")]
    InvalidNumericField { field: &'static str, value: String },

    #[error("unrecognized pre-release identifiers: {0:?}")]
    UnrecognizedPreRelease(Vec<String>),

    #[error("invalid build metadata: {0}")]
    InvalidMetadata(String),
}

/// The top-level error type surfaced by the resolver and its collaborators.
///
/// Hard failures only: anything arising from user commit-message content
/// (malformed directives, unparseable tags, overflowing absolute setters)
/// is swallowed by the component that encountered it and never reaches
/// this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("not a git repository: {0}")]
    NotAGitRepository(String),

    #[error("git command failed: {command} (exit {exit_code:?}): {stderr}")]
    GitCommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("invalid sha length: {0} (must be between 7 and 40)")]
    InvalidShaLength(u8),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Parse(#[from] VersionParseError),
}

impl ResolutionError {
    /// Build a [`ResolutionError::GitCommandFailed`] from a finished subprocess.
    pub fn from_git_output(command: impl Into<String>, output: &std::process::Output) -> Self {
        ResolutionError::GitCommandFailed {
            command: command.into(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
