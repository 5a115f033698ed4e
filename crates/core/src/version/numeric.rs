//! Opaque numeric newtypes backing the version components.
//!
//! Each wraps a `u32` and is only ever constructed through a validated
//! smart constructor (`from`) or, for values already known to be in range
//! (computed internally from another validated value), `from_unsafe`.

use crate::error::VersionError;

macro_rules! numeric_newtype {
    ($name:ident, $min:expr, $err:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Validated construction: fails if `value < $min` or out of `i32` range.
            pub fn from(value: i64) -> Result<Self, VersionError> {
                if value < $min || value > i32::MAX as i64 {
                    return Err(VersionError::$err(value));
                }
                Ok(Self(value as u32))
            }

            /// Construction from a value already known to satisfy the invariant.
            pub fn from_unsafe(value: u32) -> Self {
                Self(value)
            }

            pub fn value(self) -> u32 {
                self.0
            }

            pub fn increment(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_newtype!(MajorVersion, 0, InvalidMajorVersion);
numeric_newtype!(MinorVersion, 0, InvalidMinorVersion);
numeric_newtype!(PatchNumber, 0, InvalidPatchNumber);
numeric_newtype!(PreReleaseNumber, 1, InvalidPreReleaseNumber);

impl MajorVersion {
    pub const ZERO: MajorVersion = MajorVersion(0);
}

impl MinorVersion {
    pub const ZERO: MinorVersion = MinorVersion(0);
}

impl PatchNumber {
    pub const ZERO: PatchNumber = PatchNumber(0);
}

impl PreReleaseNumber {
    pub const ONE: PreReleaseNumber = PreReleaseNumber(1);
}
