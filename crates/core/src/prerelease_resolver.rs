//! Pre-release resolver: the polymorphic mapping from a list of pre-release
//! identifier tokens to a structured [`PreRelease`] (or `None`).
//!
//! Expressed as a trait with a blanket impl for closures so ad-hoc
//! resolvers can be written inline, plus a [`ChainedResolver`] implementing
//! a "try this, else delegate" chain-of-responsibility composition.

use crate::version::{PreRelease, PreReleaseClassifier, PreReleaseNumber};

/// `List[String] -> Option[PreRelease]`.
pub trait PreReleaseResolver {
    fn resolve(&self, identifiers: &[String]) -> Option<PreRelease>;
}

impl<F> PreReleaseResolver for F
where
    F: Fn(&[String]) -> Option<PreRelease>,
{
    fn resolve(&self, identifiers: &[String]) -> Option<PreRelease> {
        self(identifiers)
    }
}

/// The default resolver described in §4.3:
/// - a single `"snapshot"`/`"SNAPSHOT"` identifier resolves to [`PreRelease::snapshot`].
/// - a two-identifier `(alias, digits)` pair resolves to a versioned pre-release.
/// - anything else resolves to `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPreReleaseResolver;

impl PreReleaseResolver for DefaultPreReleaseResolver {
    fn resolve(&self, identifiers: &[String]) -> Option<PreRelease> {
        match identifiers {
            [single] if single.eq_ignore_ascii_case("snapshot") => Some(PreRelease::snapshot()),
            [alias, digits] => {
                let classifier = PreReleaseClassifier::from_alias(alias)?;
                if !classifier.is_versioned() {
                    return None;
                }
                let n: i64 = digits.parse().ok()?;
                let number = PreReleaseNumber::from(n).ok()?;
                PreRelease::new(classifier, Some(number)).ok()
            }
            _ => None,
        }
    }
}

/// Tries `primary` first; falls back to `fallback` on `None`.
pub struct ChainedResolver<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> ChainedResolver<A, B>
where
    A: PreReleaseResolver,
    B: PreReleaseResolver,
{
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A, B> PreReleaseResolver for ChainedResolver<A, B>
where
    A: PreReleaseResolver,
    B: PreReleaseResolver,
{
    fn resolve(&self, identifiers: &[String]) -> Option<PreRelease> {
        self.primary
            .resolve(identifiers)
            .or_else(|| self.fallback.resolve(identifiers))
    }
}

/// Threads the active resolver explicitly through parsing and resolution,
/// so the same resolver applies to both tag names and `target:` directive
/// literals.
pub struct ResolutionContext<'a> {
    pub resolver: &'a dyn PreReleaseResolver,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(resolver: &'a dyn PreReleaseResolver) -> Self {
        Self { resolver }
    }
}

impl Default for ResolutionContext<'static> {
    fn default() -> Self {
        static DEFAULT: DefaultPreReleaseResolver = DefaultPreReleaseResolver;
        Self { resolver: &DEFAULT }
    }
}
