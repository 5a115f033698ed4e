//! Configuration for `semres` resolution (§3 "CliConfig", §6 "Configuration").

use std::path::PathBuf;
use std::str::FromStr;

/// Verbosity levels for logging. Purely an observability hint (§6):
/// it never changes the resolved version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Verbosity::Quiet),
            "normal" => Ok(Verbosity::Normal),
            "verbose" | "info" => Ok(Verbosity::Verbose),
            "debug" => Ok(Verbosity::Debug),
            "trace" => Ok(Verbosity::Trace),
            _ => Err(format!("invalid verbosity level: {s}")),
        }
    }
}

/// The exhaustive input surface the resolver consumes (§6 "Configuration").
///
/// # Defaults
/// - `repo`: current directory (`.`)
/// - `basis_commit`: `"HEAD"`
/// - `pr_number`: `None`
/// - `branch_override`: `None`
/// - `sha_length`: `12`
/// - `verbosity`: [`Verbosity::Normal`]
///
/// # Examples
/// ```rust
/// use semres::{CliConfig, Verbosity};
///
/// let mut config = CliConfig::default();
/// config.sha_length = 8;
/// config.verbosity = Verbosity::Verbose;
///
/// assert_eq!(config.basis_commit, "HEAD");
/// assert_eq!(config.sha_length, 8);
/// ```
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Opaque location handle; the repository interface implementation
    /// decides what it means (a filesystem path for a subprocess-backed
    /// implementation, a handle to an already-open repository otherwise).
    pub repo: PathBuf,
    pub basis_commit: String,
    pub pr_number: Option<i64>,
    pub branch_override: Option<String>,
    pub sha_length: u8,
    pub verbosity: Verbosity,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            repo: ".".into(),
            basis_commit: "HEAD".into(),
            pr_number: None,
            branch_override: None,
            sha_length: 12,
            verbosity: Verbosity::Normal,
        }
    }
}
