//! Service stop timeouts.
//!
//! Manifests express timeouts as duration strings such as `30s`, `1m30s`,
//! or `500ms`. A duration is a sequence of decimal numbers, each with a
//! unit suffix from `ns`, `us`, `ms`, `s`, `m`, `h`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// How long to wait for a service to stop before killing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timeout(Duration);

/// The stop timeout used when a service does not declare one.
pub const DEFAULT_TIMEOUT: Timeout = Timeout(Duration::from_secs(30));

impl Default for Timeout {
    fn default() -> Self {
        DEFAULT_TIMEOUT
    }
}

impl Timeout {
    /// Wraps an explicit duration.
    pub fn new(d: Duration) -> Self {
        Timeout(d)
    }

    /// The underlying duration.
    pub fn duration(self) -> Duration {
        self.0
    }

    /// Whether the timeout is zero, meaning wait forever.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Timeout(d)
    }
}

/// Error returned when a duration string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseTimeoutError {
    /// The string is not a sequence of number/unit pairs.
    #[error("invalid duration {0:?}")]
    Invalid(String),
    /// A number has no unit suffix.
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    /// A unit suffix is not one of the known units.
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The offending suffix.
        unit: String,
        /// The full input.
        input: String,
    },
}

impl FromStr for Timeout {
    type Err = ParseTimeoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Bare zero is the only unitless form.
        if s == "0" {
            return Ok(Timeout(Duration::ZERO));
        }
        if s.is_empty() {
            return Err(ParseTimeoutError::Invalid(s.to_string()));
        }
        let invalid = || ParseTimeoutError::Invalid(s.to_string());
        let mut rest = s;
        let mut total: u64 = 0;
        while !rest.is_empty() {
            let number_end = rest
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .unwrap_or(rest.len());
            let (whole, frac) = match rest[..number_end].split_once('.') {
                Some((whole, frac)) => (whole, frac),
                None => (&rest[..number_end], ""),
            };
            if (whole.is_empty() && frac.is_empty()) || frac.contains('.') {
                return Err(invalid());
            }
            rest = &rest[number_end..];

            let unit_end = rest
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(rest.len());
            let unit = &rest[..unit_end];
            rest = &rest[unit_end..];
            let scale: u64 = match unit {
                "ns" => 1,
                "us" | "\u{b5}s" => 1_000,
                "ms" => 1_000_000,
                "s" => 1_000_000_000,
                "m" => 60_000_000_000,
                "h" => 3_600_000_000_000,
                "" => return Err(ParseTimeoutError::MissingUnit(s.to_string())),
                other => {
                    return Err(ParseTimeoutError::UnknownUnit {
                        unit: other.to_string(),
                        input: s.to_string(),
                    });
                }
            };
            let mut term = if whole.is_empty() {
                0
            } else {
                whole
                    .parse::<u64>()
                    .ok()
                    .and_then(|n| n.checked_mul(scale))
                    .ok_or_else(invalid)?
            };
            if !frac.is_empty() {
                // Digits past the fifteenth are beyond nanosecond
                // precision for every unit.
                let digits = &frac[..frac.len().min(15)];
                let value: u64 = digits.parse().map_err(|_| invalid())?;
                let divisor = u128::from(10u64.pow(digits.len() as u32));
                let extra = (u128::from(value) * u128::from(scale) / divisor) as u64;
                term = term.checked_add(extra).ok_or_else(invalid)?;
            }
            total = total.checked_add(term).ok_or_else(invalid)?;
        }
        Ok(Timeout(Duration::from_nanos(total)))
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        if d.is_zero() {
            return f.write_str("0s");
        }
        let nanos = d.as_nanos();
        if nanos < 1_000_000_000 {
            if nanos % 1_000_000 == 0 {
                return write!(f, "{}ms", nanos / 1_000_000);
            }
            if nanos % 1_000 == 0 {
                return write!(f, "{}us", nanos / 1_000);
            }
            return write!(f, "{nanos}ns");
        }
        let total = d.as_secs();
        let hours = total / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        let frac = d.subsec_nanos();
        if frac > 0 {
            let digits = format!("{frac:09}");
            write!(f, "{seconds}.{}s", digits.trim_end_matches('0'))
        } else {
            write!(f, "{seconds}s")
        }
    }
}

impl Serialize for Timeout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timeout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimeoutVisitor;

        impl Visitor<'_> for TimeoutVisitor {
            type Value = Timeout;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a duration string such as \"30s\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Timeout, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TimeoutVisitor)
    }
}
