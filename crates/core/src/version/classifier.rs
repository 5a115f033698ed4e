//! Pre-release classifier: the closed, totally-ordered set of pre-release
//! "stages" a version can sit at before it is final.

use crate::error::VersionError;
use crate::version::numeric::PreReleaseNumber;

/// A single step in the pre-release hierarchy, ascending in precedence.
///
/// `Snapshot` is special: it never takes a number, and it outranks every
/// other classifier (it sits immediately below the final version of the
/// same core).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreReleaseClassifier {
    Dev,
    Milestone,
    Alpha,
    Beta,
    ReleaseCandidate,
    Snapshot,
}

use PreReleaseClassifier::*;

const ALL: [PreReleaseClassifier; 6] = [Dev, Milestone, Alpha, Beta, ReleaseCandidate, Snapshot];

impl PreReleaseClassifier {
    /// Total precedence order, ascending.
    pub fn rank(self) -> u8 {
        match self {
            Dev => 0,
            Milestone => 1,
            Alpha => 2,
            Beta => 3,
            ReleaseCandidate => 4,
            Snapshot => 5,
        }
    }

    /// Whether this classifier requires a pre-release number. Every
    /// classifier except `Snapshot` is versioned.
    pub fn is_versioned(self) -> bool {
        !matches!(self, Snapshot)
    }

    /// Case-insensitive aliases, canonical rendering first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Dev => &["dev"],
            Milestone => &["milestone", "m"],
            Alpha => &["alpha", "a"],
            Beta => &["beta", "b"],
            ReleaseCandidate => &["rc", "cr"],
            Snapshot => &["SNAPSHOT", "snapshot"],
        }
    }

    /// The canonical rendering: the first alias.
    pub fn canonical(self) -> &'static str {
        self.aliases()[0]
    }

    /// Resolve a case-insensitive alias to its classifier.
    pub fn from_alias(s: &str) -> Option<PreReleaseClassifier> {
        ALL.into_iter()
            .find(|c| c.aliases().iter().any(|a| a.eq_ignore_ascii_case(s)))
    }
}

impl PartialOrd for PreReleaseClassifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PreReleaseClassifier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl std::fmt::Display for PreReleaseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// A classifier paired with its (optionally absent) number, with the
/// versioned/unversioned invariant enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreRelease {
    classifier: PreReleaseClassifier,
    number: Option<PreReleaseNumber>,
}

impl PreRelease {
    /// Smart constructor enforcing `classifier.is_versioned() == number.is_some()`.
    pub fn new(
        classifier: PreReleaseClassifier,
        number: Option<PreReleaseNumber>,
    ) -> Result<Self, VersionError> {
        match (classifier.is_versioned(), number) {
            (true, None) => Err(VersionError::MissingPreReleaseNumber(classifier)),
            (false, Some(_)) => Err(VersionError::UnexpectedPreReleaseNumber(classifier)),
            (_, number) => Ok(Self { classifier, number }),
        }
    }

    /// The one unversioned classifier, total (never fails).
    pub fn snapshot() -> Self {
        Self {
            classifier: Snapshot,
            number: None,
        }
    }

    pub fn classifier(&self) -> PreReleaseClassifier {
        self.classifier
    }

    pub fn number(&self) -> Option<u32> {
        self.number.map(PreReleaseNumber::value)
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.classifier
            .cmp(&other.classifier)
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl std::fmt::Display for PreRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.classifier.canonical())?;
        if let Some(n) = self.number {
            write!(f, ".{}", n)?;
        }
        Ok(())
    }
}
