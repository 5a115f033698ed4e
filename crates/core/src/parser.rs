//! The SemVer parser: a hand-rolled recursive-descent reader over a
//! `&str`, chosen over a `regex`-based grammar for predictable,
//! allocation-light parsing (§4.2).
//!
//! `regex` stays in the dependency stack for the keyword parser's
//! hex-prefix and identifier-shape checks, where a compiled pattern is the
//! better fit.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ResolutionError, VersionParseError};
use crate::prerelease_resolver::{DefaultPreReleaseResolver, PreReleaseResolver};
use crate::version::{MajorVersion, Metadata, MinorVersion, PatchNumber, PreRelease, Version};

static RC_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z-]+)(\d+)$").unwrap());
static METADATA_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z-]+$").unwrap());
static PRERELEASE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0|[1-9]\d*|\d*[A-Za-z-][0-9A-Za-z-]*)$").unwrap());

impl std::str::FromStr for Version {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s, &DefaultPreReleaseResolver)
    }
}

/// Parse a version string, consulting `resolver` for pre-release identifier
/// interpretation (§4.2 "Resolver invocation").
pub fn parse_version(
    input: &str,
    resolver: &dyn PreReleaseResolver,
) -> Result<Version, ResolutionError> {
    let stripped = input
        .strip_prefix('v')
        .or_else(|| input.strip_prefix('V'))
        .unwrap_or(input);

    let (before_meta, meta_part) = match stripped.find('+') {
        Some(i) => (&stripped[..i], Some(&stripped[i + 1..])),
        None => (stripped, None),
    };

    let mut cursor = Cursor::new(before_meta);
    let major = cursor.take_numeric_field("major", input)?;
    cursor.expect_char('.', input)?;
    let minor = cursor.take_numeric_field("minor", input)?;
    cursor.expect_char('.', input)?;
    let patch = cursor.take_numeric_field("patch", input)?;

    let pre_release = if cursor.peek() == Some('-') {
        cursor.advance();
        let rest = cursor.remainder();
        if rest.is_empty() {
            return Err(VersionParseError::InvalidVersionFormat(input.to_string()).into());
        }
        let mut identifiers: Vec<String> = Vec::new();
        for part in rest.split('.') {
            if part.is_empty() || !PRERELEASE_IDENTIFIER.is_match(part) {
                return Err(VersionParseError::InvalidVersionFormat(input.to_string()).into());
            }
            identifiers.push(part.to_string());
        }
        Some(reconcile_and_resolve(identifiers, resolver, input)?)
    } else if !cursor.remainder().is_empty() {
        return Err(VersionParseError::InvalidVersionFormat(input.to_string()).into());
    } else {
        None
    };

    let metadata = match meta_part {
        Some(raw) => {
            if raw.is_empty() {
                return Err(VersionParseError::InvalidVersionFormat(input.to_string()).into());
            }
            let mut ids = Vec::new();
            for part in raw.split('.') {
                if part.is_empty() || !METADATA_IDENTIFIER.is_match(part) {
                    return Err(VersionParseError::InvalidMetadata(part.to_string()).into());
                }
                ids.push(part.to_string());
            }
            Some(Metadata::from(ids).map_err(ResolutionError::Version)?)
        }
        None => None,
    };

    Ok(Version::new(major, minor, patch, pre_release, metadata))
}

/// §4.2 "Pre-release reconciliation": a single identifier matching
/// `([A-Za-z-]+)(\d+)` (e.g. `RC1`) is split into two before consulting
/// the resolver; everything else passes through unchanged.
fn reconcile_and_resolve(
    identifiers: Vec<String>,
    resolver: &dyn PreReleaseResolver,
    _original: &str,
) -> Result<PreRelease, ResolutionError> {
    let identifiers = if let [single] = identifiers.as_slice() {
        match RC_SPLIT.captures(single) {
            Some(caps) => vec![caps[1].to_string(), caps[2].to_string()],
            None => identifiers,
        }
    } else {
        identifiers
    };

    resolver
        .resolve(&identifiers)
        .ok_or_else(|| ResolutionError::Parse(VersionParseError::UnrecognizedPreRelease(identifiers)))
}

struct Cursor<'a> {
    bytes: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { bytes: s, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.bytes[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn remainder(&self) -> &'a str {
        &self.bytes[self.pos..]
    }

    fn expect_char(&mut self, expected: char, original: &str) -> Result<(), ResolutionError> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(VersionParseError::InvalidVersionFormat(original.to_string()).into())
        }
    }

    /// `0|[1-9]\d*`, converted and validated as a version component.
    fn take_numeric_field<T>(
        &mut self,
        field: &'static str,
        original: &str,
    ) -> Result<T, ResolutionError>
    where
        T: NumericComponent,
    {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.bytes[start..self.pos];
        if digits.is_empty() {
            return Err(VersionParseError::InvalidVersionFormat(original.to_string()).into());
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(VersionParseError::InvalidVersionFormat(original.to_string()).into());
        }
        let value: i64 = digits
            .parse()
            .map_err(|_| VersionParseError::InvalidNumericField {
                field,
                value: digits.to_string(),
            })?;
        T::from_value(value).map_err(|_| {
            ResolutionError::Parse(VersionParseError::InvalidNumericField {
                field,
                value: digits.to_string(),
            })
        })
    }
}

trait NumericComponent: Sized {
    fn from_value(value: i64) -> Result<Self, ()>;
}

impl NumericComponent for MajorVersion {
    fn from_value(value: i64) -> Result<Self, ()> {
        MajorVersion::from(value).map_err(|_| ())
    }
}

impl NumericComponent for MinorVersion {
    fn from_value(value: i64) -> Result<Self, ()> {
        MinorVersion::from(value).map_err(|_| ())
    }
}

impl NumericComponent for PatchNumber {
    fn from_value(value: i64) -> Result<Self, ()> {
        PatchNumber::from(value).map_err(|_| ())
    }
}
