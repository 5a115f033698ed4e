//! # semres
//!
//! Deterministic SemVer 2.0.0 resolution from a repository's annotated
//! version tags, commit-message directives, and working-tree state.
//!
//! At a tagged, clean commit this resolves to the exact tag (a *concrete*
//! version). Between tags it resolves to a *development* version: the next
//! core computed from the base tag and any `version:`/`target:` directives
//! found in the intervening commit messages, rendered with a `-SNAPSHOT`
//! pre-release and build metadata identifying branch, PR, commit distance,
//! SHA and dirty status.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use semres::{resolve, CliConfig, GixRepository, ResolutionContext};
//!
//! let repo = GixRepository::discover(".")?;
//! let config = CliConfig::default();
//! let ctx = ResolutionContext::default();
//!
//! let version = resolve(&ctx, &repo, &config)?;
//! println!("{version}");
//! # Ok::<_, semres::ResolutionError>(())
//! ```
//!
//! ## Layout
//!
//! - [`version`] — the typed version algebra: numeric newtypes, pre-release
//!   classifiers, the validated [`Version`] and its total order.
//! - [`parser`] — parses a SemVer string into a [`Version`].
//! - [`prerelease_resolver`] — the polymorphic pre-release identifier
//!   interpreter the parser and keyword parser both consult.
//! - [`keyword`] — the commit-message directive scanner.
//! - [`target`] — the target calculator (rules A-F and the directive
//!   fallback).
//! - [`metadata_builder`] — assembles the ordered build-metadata identifier
//!   list.
//! - [`ignore`] — computes the set of commit SHAs to drop before directive
//!   aggregation.
//! - [`repository`] — the abstract [`RepositoryQuery`] collaborator, plus
//!   [`Tag`] and [`Commit`].
//! - [`git`] — a bundled `gix`-backed [`RepositoryQuery`] implementation.
//! - [`resolver`] — the top-level orchestrator, [`resolve`].
//! - [`config`] — [`CliConfig`] and [`Verbosity`].
//! - [`error`] — the crate's typed errors.

pub mod config;
pub mod error;
pub mod git;
pub mod ignore;
pub mod keyword;
pub mod metadata_builder;
pub mod parser;
pub mod prerelease_resolver;
pub mod repository;
pub mod resolver;
pub mod target;
pub mod version;

pub use config::{CliConfig, Verbosity};
pub use error::{ResolutionError, Result, VersionError, VersionParseError};
pub use git::GixRepository;
pub use keyword::Directive;
pub use prerelease_resolver::{
    ChainedResolver, DefaultPreReleaseResolver, PreReleaseResolver, ResolutionContext,
};
pub use repository::{Commit, RepositoryQuery, Tag};
pub use resolver::resolve;
pub use version::{
    Component, MajorVersion, Metadata, MinorVersion, PatchNumber, PreRelease, PreReleaseClassifier,
    PreReleaseNumber, Version,
};
