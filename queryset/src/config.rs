//! Per-screen search configuration.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::ParameterSet;


/// Immutable descriptor built once per list screen: the URL namespace the
/// screen owns, the parameter values considered implicit, and which fields
/// decode as integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QsConfig {
    namespace: Option<String>,
    default_params: ParameterSet,
    integer_fields: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyNamespace,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNamespace => {
                write!(f, "A list screen needs a non-empty namespace to keep its query keys apart from co-located lists")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl QsConfig {
    /// Build a namespaced config. Fails fast on an empty namespace rather
    /// than letting two lists on one page silently share keys.
    pub fn new(
        namespace: &str,
        default_params: ParameterSet,
        integer_fields: &[&str],
    ) -> Result<Self, ConfigError> {
        if namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        Ok(Self {
            namespace: Some(namespace.to_string()),
            default_params,
            integer_fields: integer_fields.iter().map(|field| field.to_string()).collect(),
        })
    }

    /// Config for a page with a single list that keeps its keys unprefixed.
    /// Namespaced keys in the URL then belong to other lists and are ignored
    /// on decode.
    pub fn without_namespace(default_params: ParameterSet, integer_fields: &[&str]) -> Self {
        Self {
            namespace: None,
            default_params,
            integer_fields: integer_fields.iter().map(|field| field.to_string()).collect(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn default_params(&self) -> &ParameterSet {
        &self.default_params
    }

    pub fn is_integer_field(&self, key: &str) -> bool {
        self.integer_fields.contains(key)
    }

    /// The form of `key` as it appears in the URL.
    pub fn prefixed_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}.{}", namespace, key),
            None => key.to_string(),
        }
    }

    /// Strip the namespace from a URL key, or `None` if the key belongs to
    /// another list. Without a namespace, any dotted key is foreign.
    pub fn strip_key<'a>(&self, key: &'a str) -> Option<&'a str> {
        match &self.namespace {
            Some(namespace) => key
                .strip_prefix(namespace.as_str())
                .and_then(|rest| rest.strip_prefix('.')),
            None => {
                if key.contains('.') {
                    None
                } else {
                    Some(key)
                }
            }
        }
    }
}
