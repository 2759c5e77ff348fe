//! Typed search parameter values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};


/// One decoded query-string value: free text, or a number for fields the
/// screen's config declares as integer-typed (page, page_size, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq)]
pub enum Scalar {
    String(String),
    Int(i64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}


/// The value under one parameter key.
///
/// A key that appears once in the URL decodes to `Single`; a key repeated
/// (`id__in=1&id__in=2`) decodes to `Many` in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    Single(Scalar),
    Many(Vec<Scalar>),
}

impl ParamValue {
    /// All scalars under this key, in order. `Single` yields one element.
    pub fn scalars(&self) -> &[Scalar] {
        match self {
            Self::Single(scalar) => std::slice::from_ref(scalar),
            Self::Many(scalars) => scalars,
        }
    }

    /// Append one more occurrence of this key, turning `Single` into `Many`.
    pub fn push(&mut self, scalar: Scalar) {
        let current = std::mem::replace(self, ParamValue::Many(Vec::new()));
        *self = match current {
            Self::Single(first) => ParamValue::Many(vec![first, scalar]),
            Self::Many(mut scalars) => {
                scalars.push(scalar);
                ParamValue::Many(scalars)
            }
        };
    }

    /// Order-insensitive equivalence: every scalar on each side appears on
    /// the other. Used to decide whether a value still equals its default.
    pub fn set_equivalent(&self, other: &ParamValue) -> bool {
        let ours = self.scalars();
        let theirs = other.scalars();
        ours.iter().all(|scalar| theirs.contains(scalar))
            && theirs.iter().all(|scalar| ours.contains(scalar))
    }
}

impl From<Scalar> for ParamValue {
    fn from(value: Scalar) -> Self {
        ParamValue::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Single(value.into())
    }
}

impl From<Vec<Scalar>> for ParamValue {
    fn from(values: Vec<Scalar>) -> Self {
        ParamValue::Many(values)
    }
}


/// A full set of decoded parameters for one screen, keyed without the
/// namespace prefix. The ordered map keeps encode output deterministic.
pub type ParameterSet = BTreeMap<String, ParamValue>;
