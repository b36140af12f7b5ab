//! Enumerated fields that may hold values from older schema revisions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value that is either a member of the current enumeration or raw text
/// that the current enumeration does not recognize.
///
/// Decoded documents can carry `Unrecognized` values; the schema normalizer
/// maps them onto the current enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    /// Member of the current enumeration.
    Known(T),
    /// Text outside the current enumeration.
    Unrecognized(String),
}

impl<T> Lenient<T> {
    /// The known value, if any.
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether this holds a current enumeration member.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Lenient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{}", v),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}
