//! The version algebra: typed components, pre-release classifiers, a
//! validated [`Version`], precedence-aware ordering, and the `next`/`as`/
//! `advance`/`core` operations that embody the module's semantic rules.

mod classifier;
mod metadata;
mod numeric;

pub use classifier::{PreRelease, PreReleaseClassifier};
pub use metadata::Metadata;
pub use numeric::{MajorVersion, MinorVersion, PatchNumber, PreReleaseNumber};

use crate::error::VersionError;

/// The named components `next` can bump. Kept as a plain enum rather than
/// phantom-type dispatch: the public contract is the observable behaviour,
/// not the dispatch mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Major,
    Minor,
    Patch,
}

/// A fully-formed, validated SemVer 2.0.0 version.
///
/// Construction is total once its components are already validated
/// (`MajorVersion`, `MinorVersion`, `PatchNumber`, `PreRelease`, `Metadata`
/// are themselves only ever built through their own smart constructors).
#[derive(Debug, Clone)]
pub struct Version {
    major: MajorVersion,
    minor: MinorVersion,
    patch: PatchNumber,
    pre_release: Option<PreRelease>,
    metadata: Option<Metadata>,
}

impl Version {
    pub fn new(
        major: MajorVersion,
        minor: MinorVersion,
        patch: PatchNumber,
        pre_release: Option<PreRelease>,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release,
            metadata,
        }
    }

    /// Convenience constructor for a final core version from raw integers,
    /// validating each component.
    pub fn from_core(major: u32, minor: u32, patch: u32) -> Result<Self, VersionError> {
        Ok(Self::new(
            MajorVersion::from(major as i64)?,
            MinorVersion::from(minor as i64)?,
            PatchNumber::from(patch as i64)?,
            None,
            None,
        ))
    }

    /// Same as [`Version::from_core`], but for callers that already know the
    /// values are in range (e.g. arithmetic derived from another valid
    /// `Version`).
    pub fn from_core_unsafe(major: u32, minor: u32, patch: u32) -> Self {
        Self::new(
            MajorVersion::from_unsafe(major),
            MinorVersion::from_unsafe(minor),
            PatchNumber::from_unsafe(patch),
            None,
            None,
        )
    }

    pub fn major(&self) -> u32 {
        self.major.value()
    }

    pub fn minor(&self) -> u32 {
        self.minor.value()
    }

    pub fn patch(&self) -> u32 {
        self.patch.value()
    }

    pub fn pre_release(&self) -> Option<&PreRelease> {
        self.pre_release.as_ref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn with_pre_release(&self, pre_release: Option<PreRelease>) -> Self {
        Self {
            pre_release,
            ..self.clone()
        }
    }

    pub fn with_metadata(&self, metadata: Option<Metadata>) -> Self {
        Self {
            metadata,
            ..self.clone()
        }
    }

    /// Strip pre-release and metadata, leaving `(major, minor, patch)`.
    pub fn core(&self) -> Self {
        Self::new(self.major, self.minor, self.patch, None, None)
    }

    pub fn is_final(&self) -> bool {
        self.pre_release.is_none()
    }

    pub fn is_pre_release(&self) -> bool {
        !self.is_final()
    }

    pub fn is_snapshot(&self) -> bool {
        self.pre_release
            .is_some_and(|p| matches!(p.classifier(), PreReleaseClassifier::Snapshot))
    }

    /// `major > 0 ∧ ¬snapshot`.
    pub fn is_stable(&self) -> bool {
        self.major() > 0 && !self.is_snapshot()
    }

    /// Increment the named component, resetting all lower-precedence
    /// components to zero and clearing pre-release and metadata.
    pub fn next(&self, component: Component) -> Self {
        match component {
            Component::Major => Self::new(
                self.major.increment(),
                MinorVersion::ZERO,
                PatchNumber::ZERO,
                None,
                None,
            ),
            Component::Minor => Self::new(
                self.major,
                self.minor.increment(),
                PatchNumber::ZERO,
                None,
                None,
            ),
            Component::Patch => {
                Self::new(self.major, self.minor, self.patch.increment(), None, None)
            }
        }
    }

    /// Precedence-aware classifier bump (`next[C]` in the source algebra).
    ///
    /// - If the current pre-release has classifier `C`, increment its number.
    /// - If `C` outranks the current pre-release (or the version is final),
    ///   start a new cycle at `1` — on the same core if there already was a
    ///   pre-release of lower rank, otherwise on a patch-bumped core.
    /// - If `C` is of lower-or-equal rank than the current pre-release,
    ///   bump patch and start the cycle at `1` there instead.
    ///
    /// `Snapshot` has no instance of this operation: use [`Version::as_classifier`].
    pub fn advance(&self, classifier: PreReleaseClassifier) -> Result<Self, VersionError> {
        if matches!(classifier, PreReleaseClassifier::Snapshot) {
            return Err(VersionError::InvalidPreReleaseTransition(
                "Snapshot has no next[C]; use as_classifier".into(),
            ));
        }

        let one = PreReleaseNumber::ONE;

        match &self.pre_release {
            Some(current) if current.classifier() == classifier => {
                let number = PreReleaseNumber::from(current.number().unwrap_or(0) as i64 + 1)
                    .map_err(|_| {
                        VersionError::InvalidPreReleaseTransition(
                            "pre-release number overflow".into(),
                        )
                    })?;
                let pre = PreRelease::new(classifier, Some(number))?;
                Ok(self.with_pre_release(Some(pre)).with_metadata(None))
            }
            Some(current) if classifier > current.classifier() => {
                let pre = PreRelease::new(classifier, Some(one))?;
                Ok(self.core().with_pre_release(Some(pre)))
            }
            Some(_) => {
                let pre = PreRelease::new(classifier, Some(one))?;
                Ok(self.next(Component::Patch).with_pre_release(Some(pre)))
            }
            None => {
                let pre = PreRelease::new(classifier, Some(one))?;
                Ok(self.core().with_pre_release(Some(pre)))
            }
        }
    }

    /// Set the pre-release classifier directly, ignoring precedence and
    /// clearing metadata. `number` defaults to `1` for versioned classifiers
    /// and must be absent for `Snapshot`.
    pub fn as_classifier(
        &self,
        classifier: PreReleaseClassifier,
        number: Option<u32>,
    ) -> Result<Self, VersionError> {
        if !classifier.is_versioned() && number.is_some() {
            return Err(VersionError::ClassifierNotVersioned(classifier));
        }
        let number = if classifier.is_versioned() {
            let n = number.unwrap_or(1);
            Some(PreReleaseNumber::from(n as i64)?)
        } else {
            None
        };
        let pre = PreRelease::new(classifier, number)?;
        Ok(self.core().with_pre_release(Some(pre)))
    }

    /// The pre-release number, if any. Errors if this is a final version.
    pub fn pre_release_number(&self) -> Result<Option<u32>, VersionError> {
        match &self.pre_release {
            Some(pre) => Ok(pre.number()),
            None => Err(VersionError::NotAPreReleaseVersion),
        }
    }

    /// Extended rendering: `M.m.p[-pre][+meta]`.
    pub fn to_extended(&self) -> String {
        let mut s = self.to_string();
        if let Some(meta) = &self.metadata {
            s.push('+');
            s.push_str(&meta.to_string());
        }
        s
    }
}

/// Standard rendering: `M.m.p[-pre]`, metadata omitted.
impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Metadata is excluded from both equality and ordering (§3 "Ordering";
/// matches the canonical `semver` crate's treatment of build metadata).
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering::*;

        let core_order = self
            .major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch));
        if core_order != Equal {
            return core_order;
        }

        match (&self.pre_release, &other.pre_release) {
            (None, None) => Equal,
            (None, Some(_)) => Greater,
            (Some(_), None) => Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}
