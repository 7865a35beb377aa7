//! Snap epochs.
//!
//! Epochs gate upgrades between incompatible data formats. A snap declares
//! which epochs it can read and which it writes; refreshes are only offered
//! along paths where the new snap can read what the old one wrote.
//!
//! Manifests spell epochs three ways: a bare number (`epoch: 2`), a number
//! with a star (`epoch: 2*`, shorthand for "writes 2, can still read 1"),
//! or explicit lists (`epoch: {read: [1, 2], write: [2]}`).

use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when an epoch declaration is not valid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid epoch: {input:?}")]
pub struct ParseEpochError {
    input: String,
}

impl ParseEpochError {
    fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

/// The epochs a snap can read and the epoch it writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Epoch {
    read: Vec<u32>,
    write: Vec<u32>,
}

impl Default for Epoch {
    /// Epoch 0, the epoch of every snap that does not declare one.
    fn default() -> Self {
        Epoch { read: vec![0], write: vec![0] }
    }
}

impl Epoch {
    /// The single-number epoch `n`.
    pub fn simple(n: u32) -> Self {
        Epoch { read: vec![n], write: vec![n] }
    }

    /// The star epoch `n*`: writes `n` but can still read `n - 1`.
    ///
    /// Returns `None` for `0*`, which has nothing earlier to read.
    pub fn star(n: u32) -> Option<Self> {
        if n == 0 {
            return None;
        }
        Some(Epoch { read: vec![n - 1, n], write: vec![n] })
    }

    /// Builds an epoch from explicit read and write lists.
    ///
    /// Both lists must be non-empty and strictly ascending.
    pub fn from_lists(read: Vec<u32>, write: Vec<u32>) -> Result<Self, ParseEpochError> {
        let epoch = Epoch { read, write };
        if !list_ok(&epoch.read) || !list_ok(&epoch.write) {
            return Err(ParseEpochError::new(epoch.to_string()));
        }
        Ok(epoch)
    }

    /// The epochs this snap can read, ascending.
    pub fn reads(&self) -> &[u32] {
        &self.read
    }

    /// The epochs this snap writes, ascending.
    pub fn writes(&self) -> &[u32] {
        &self.write
    }

    /// Whether this snap can read data written by `other`.
    pub fn can_read(&self, other: &Epoch) -> bool {
        other.write.iter().any(|w| self.read.contains(w))
    }

    fn as_simple(&self) -> Option<u32> {
        match (self.read.as_slice(), self.write.as_slice()) {
            ([r], [w]) if r == w => Some(*r),
            _ => None,
        }
    }

    fn as_star(&self) -> Option<u32> {
        match (self.read.as_slice(), self.write.as_slice()) {
            ([prev, n], [w]) if n == w && *n > 0 && *prev == n - 1 => Some(*n),
            _ => None,
        }
    }
}

fn list_ok(list: &[u32]) -> bool {
    !list.is_empty() && list.windows(2).all(|pair| pair[0] < pair[1])
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.as_simple() {
            return write!(f, "{n}");
        }
        if let Some(n) = self.as_star() {
            return write!(f, "{n}*");
        }
        // The general form renders as JSON; downstream tooling parses it back.
        let join = |list: &[u32]| {
            list.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
        };
        write!(f, "{{\"read\":[{}],\"write\":[{}]}}", join(&self.read), join(&self.write))
    }
}

impl FromStr for Epoch {
    type Err = ParseEpochError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, star) = match s.strip_suffix('*') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let n: u32 = digits.parse().map_err(|_| ParseEpochError::new(s))?;
        if star {
            Epoch::star(n).ok_or_else(|| ParseEpochError::new(s))
        } else {
            Ok(Epoch::simple(n))
        }
    }
}

impl Serialize for Epoch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.as_simple().is_some() || self.as_star().is_some() {
            return serializer.collect_str(self);
        }
        let mut state = serializer.serialize_struct("Epoch", 2)?;
        state.serialize_field("read", &self.read)?;
        state.serialize_field("write", &self.write)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Epoch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EpochVisitor;

        impl<'de> Visitor<'de> for EpochVisitor {
            type Value = Epoch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an epoch string, number, or {read, write} mapping")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Epoch, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Epoch, E> {
                u32::try_from(value)
                    .map(Epoch::simple)
                    .map_err(|_| E::custom(ParseEpochError::new(value.to_string())))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Epoch, E> {
                u32::try_from(value)
                    .map(Epoch::simple)
                    .map_err(|_| E::custom(ParseEpochError::new(value.to_string())))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Epoch, A::Error> {
                let mut read: Option<Vec<u32>> = None;
                let mut write: Option<Vec<u32>> = None;
                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "read" => read = Some(access.next_value()?),
                        "write" => write = Some(access.next_value()?),
                        other => {
                            return Err(de::Error::unknown_field(other, &["read", "write"]));
                        }
                    }
                }
                Epoch::from_lists(read.unwrap_or_default(), write.unwrap_or_default())
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(EpochVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_epoch_zero() {
        let epoch = Epoch::default();
        assert_eq!(epoch.reads(), &[0]);
        assert_eq!(epoch.writes(), &[0]);
        assert_eq!(epoch.to_string(), "0");
    }

    #[test]
    fn parse_simple() {
        let epoch: Epoch = "3".parse().unwrap();
        assert_eq!(epoch, Epoch::simple(3));
        assert_eq!(epoch.to_string(), "3");
    }

    #[test]
    fn parse_star() {
        let epoch: Epoch = "2*".parse().unwrap();
        assert_eq!(epoch.reads(), &[1, 2]);
        assert_eq!(epoch.writes(), &[2]);
        assert_eq!(epoch.to_string(), "2*");
    }

    #[test]
    fn general_form_displays_as_json() {
        let epoch = Epoch::from_lists(vec![1, 3], vec![3]).unwrap();
        assert_eq!(epoch.to_string(), r#"{"read":[1,3],"write":[3]}"#);
    }

    #[test]
    fn parse_rejects_bad_forms() {
        for bad in ["", "*", "0*", "-1", "1**", "x", "1.5"] {
            assert!(bad.parse::<Epoch>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn lists_must_ascend() {
        assert!(Epoch::from_lists(vec![2, 1], vec![2]).is_err());
        assert!(Epoch::from_lists(vec![1, 1], vec![1]).is_err());
        assert!(Epoch::from_lists(vec![], vec![1]).is_err());
        assert!(Epoch::from_lists(vec![1, 2, 3], vec![3]).is_ok());
    }

    #[test]
    fn can_read_follows_write_lists() {
        let old = Epoch::simple(0);
        let bridge = Epoch::star(1).unwrap();
        let new = Epoch::simple(1);
        assert!(bridge.can_read(&old));
        assert!(new.can_read(&bridge));
        assert!(!new.can_read(&old));
    }

    #[test]
    fn yaml_number_and_star_and_mapping() {
        let number: Epoch = serde_yaml::from_str("2").unwrap();
        assert_eq!(number, Epoch::simple(2));

        let star: Epoch = serde_yaml::from_str("\"1*\"").unwrap();
        assert_eq!(star, Epoch::star(1).unwrap());

        let mapping: Epoch = serde_yaml::from_str("{read: [1, 2, 3], write: [3]}").unwrap();
        assert_eq!(mapping.reads(), &[1, 2, 3]);
        assert_eq!(mapping.writes(), &[3]);
    }

    #[test]
    fn yaml_mapping_rejects_descending_lists() {
        assert!(serde_yaml::from_str::<Epoch>("{read: [3, 1], write: [3]}").is_err());
    }

    #[test]
    fn serializes_compact_forms() {
        assert_eq!(serde_json::to_string(&Epoch::simple(4)).unwrap(), "\"4\"");
        assert_eq!(serde_json::to_string(&Epoch::star(2).unwrap()).unwrap(), "\"2*\"");
        let full = Epoch::from_lists(vec![1, 3], vec![3]).unwrap();
        assert_eq!(serde_json::to_string(&full).unwrap(), r#"{"read":[1,3],"write":[3]}"#);
    }
}
