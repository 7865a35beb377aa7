//! Snap revisions.
//!
//! A revision identifies one build of a snap. Positive numbers are assigned
//! by the store; negative numbers are allocated locally for sideloaded
//! builds and render with an `x` prefix. Zero means the revision is not
//! known yet.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not a valid revision.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid snap revision: {input:?}")]
pub struct ParseRevisionError {
    input: String,
}

impl ParseRevisionError {
    fn new(input: &str) -> Self {
        Self { input: input.to_string() }
    }
}

/// The revision of a snap.
///
/// Ordering follows the raw number, so every local revision sorts before
/// unset and every store revision sorts after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(i32);

impl Revision {
    /// The zero revision, used when no revision has been assigned.
    pub const UNSET: Revision = Revision(0);

    /// Builds a revision from a raw number.
    pub fn new(n: i32) -> Self {
        Self(n)
    }

    /// The raw revision number.
    pub fn number(self) -> i32 {
        self.0
    }

    /// Whether no revision has been assigned.
    pub fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// Whether this is a locally allocated revision.
    pub fn is_local(self) -> bool {
        self.0 < 0
    }

    /// Whether this revision was assigned by the store.
    pub fn is_store(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            f.write_str("unset")
        } else if self.0 < 0 {
            write!(f, "x{}", -self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Revision {
    type Err = ParseRevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "unset" {
            return Ok(Revision::UNSET);
        }
        let (digits, negative) = match s.strip_prefix('x') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let n: i32 = digits.parse().map_err(|_| ParseRevisionError::new(s))?;
        if n <= 0 {
            return Err(ParseRevisionError::new(s));
        }
        Ok(Revision(if negative { -n } else { n }))
    }
}

impl Serialize for Revision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Revision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RevisionVisitor;

        impl Visitor<'_> for RevisionVisitor {
            type Value = Revision;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a revision string or number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Revision, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Revision, E> {
                i32::try_from(value)
                    .map(Revision)
                    .map_err(|_| E::custom(ParseRevisionError::new(&value.to_string())))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Revision, E> {
                i32::try_from(value)
                    .map(Revision)
                    .map_err(|_| E::custom(ParseRevisionError::new(&value.to_string())))
            }
        }

        deserializer.deserialize_any(RevisionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_store_revision() {
        assert_eq!("7".parse::<Revision>().unwrap(), Revision::new(7));
        assert_eq!("123".parse::<Revision>().unwrap(), Revision::new(123));
    }

    #[test]
    fn parse_local_revision() {
        assert_eq!("x1".parse::<Revision>().unwrap(), Revision::new(-1));
        assert_eq!("x42".parse::<Revision>().unwrap(), Revision::new(-42));
    }

    #[test]
    fn parse_unset() {
        assert_eq!("unset".parse::<Revision>().unwrap(), Revision::UNSET);
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "0", "x0", "x-1", "-5", "1.5", "7up", "x", "X1"] {
            let err = bad.parse::<Revision>().unwrap_err();
            assert_eq!(err.to_string(), format!("invalid snap revision: {bad:?}"));
        }
    }

    #[test]
    fn display_forms() {
        assert_eq!(Revision::new(7).to_string(), "7");
        assert_eq!(Revision::new(-3).to_string(), "x3");
        assert_eq!(Revision::UNSET.to_string(), "unset");
    }

    #[test]
    fn display_parse_round_trip() {
        for n in [-99, -1, 0, 1, 99] {
            let rev = Revision::new(n);
            assert_eq!(rev.to_string().parse::<Revision>().unwrap(), rev);
        }
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Revision::new(-2) < Revision::new(-1));
        assert!(Revision::new(-1) < Revision::UNSET);
        assert!(Revision::UNSET < Revision::new(1));
        assert!(Revision::new(1) < Revision::new(2));
    }

    #[test]
    fn predicates() {
        assert!(Revision::new(5).is_store());
        assert!(Revision::new(-5).is_local());
        assert!(Revision::UNSET.is_unset());
        assert!(!Revision::new(5).is_local());
        assert!(!Revision::new(-5).is_store());
    }

    #[test]
    fn serializes_as_string() {
        assert_eq!(serde_json::to_string(&Revision::new(10)).unwrap(), "\"10\"");
        assert_eq!(serde_json::to_string(&Revision::new(-2)).unwrap(), "\"x2\"");
        assert_eq!(serde_json::to_string(&Revision::UNSET).unwrap(), "\"unset\"");
    }

    #[test]
    fn deserializes_string_or_number() {
        assert_eq!(serde_json::from_str::<Revision>("\"x7\"").unwrap(), Revision::new(-7));
        assert_eq!(serde_json::from_str::<Revision>("\"12\"").unwrap(), Revision::new(12));
        assert_eq!(serde_json::from_str::<Revision>("12").unwrap(), Revision::new(12));
        assert_eq!(serde_json::from_str::<Revision>("-3").unwrap(), Revision::new(-3));
        assert!(serde_json::from_str::<Revision>("\"potato\"").is_err());
    }
}
