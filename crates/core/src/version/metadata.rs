//! Build metadata: an ordered, non-empty-once-present list of identifiers.

use crate::error::VersionError;
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z-]+$").unwrap());

/// Ordered list of build-metadata identifiers. Order is preserved in
/// rendering but never influences precedence (`Version`'s `Ord` ignores it
/// entirely).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Metadata(Vec<String>);

impl Metadata {
    /// Rejects empty identifiers and identifiers containing characters
    /// outside `[0-9A-Za-z-]`.
    pub fn from(identifiers: Vec<String>) -> Result<Self, VersionError> {
        for id in &identifiers {
            if id.is_empty() || !IDENTIFIER.is_match(id) {
                return Err(VersionError::InvalidMetadata(id.clone()));
            }
        }
        Ok(Self(identifiers))
    }

    pub fn identifiers(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_identifier() {
        assert!(Metadata::from(vec!["".into()]).is_err());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(Metadata::from(vec!["has_underscore".into()]).is_err());
    }

    #[test]
    fn accepts_hyphenated_identifiers() {
        let m = Metadata::from(vec!["branch-main".into(), "sha1234567".into()]).unwrap();
        assert_eq!(m.to_string(), "branch-main.sha1234567");
    }
}
