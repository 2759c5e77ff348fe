//! Deterministic query-string encoding.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::QsConfig;
use crate::params::{ParameterSet, Scalar};


/// Characters kept literal in a query component: the RFC 3986 unreserved set,
/// which is what the browsers' encodeURIComponent leaves alone too. The
/// namespace dot stays readable in the address bar; `&` and `=` inside values
/// are always escaped so pairs can never be mis-split.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

fn scalar_component(scalar: &Scalar) -> String {
    match scalar {
        Scalar::String(value) => component(value),
        Scalar::Int(value) => value.to_string(),
    }
}

/// Serialize a parameter set as-is. Keys emit in lexicographic order; a
/// `Many` value emits one `key=value` pair per element in sequence order.
/// An empty set yields the empty string.
pub fn encode(params: &ParameterSet) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        for scalar in value.scalars() {
            pairs.push(format!("{}={}", component(key), scalar_component(scalar)));
        }
    }
    pairs.join("&")
}

/// Serialize with the config's namespace applied to every key.
pub fn encode_with_namespace(config: &QsConfig, params: &ParameterSet) -> String {
    let namespaced: ParameterSet = params
        .iter()
        .map(|(key, value)| (config.prefixed_key(key), value.clone()))
        .collect();
    encode(&namespaced)
}

/// Serialize only the parameters that differ from their configured default,
/// namespaced. This is the string written to the address bar: the default
/// state renders as a clean URL and any deviation stays visible.
pub fn encode_non_default(config: &QsConfig, params: &ParameterSet) -> String {
    let visible: ParameterSet = params
        .iter()
        .filter(|(key, value)| {
            !config
                .default_params()
                .get(*key)
                .is_some_and(|default| value.set_equivalent(default))
        })
        .map(|(key, value)| (config.prefixed_key(key), value.clone()))
        .collect();
    encode(&visible)
}
