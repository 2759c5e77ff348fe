//! Parameter-set merges behind the add/remove/replace search-chip actions.

use std::collections::btree_map::Entry;

use crate::config::QsConfig;
use crate::params::{ParamValue, ParameterSet};


fn is_default_value(config: &QsConfig, key: &str, value: &ParamValue) -> bool {
    config
        .default_params()
        .get(key)
        .is_some_and(|default| value.set_equivalent(default))
}

/// Add search terms without clearing existing ones.
///
/// A key still at its default is replaced wholesale by the incoming value;
/// a non-default key present on both sides grows into a sequence (old values
/// first, then new); keys only in `params_to_add` are inserted directly.
pub fn add_params(
    config: &QsConfig,
    old_params: &ParameterSet,
    params_to_add: &ParameterSet,
) -> ParameterSet {
    let mut merged = old_params.clone();
    for (key, incoming) in params_to_add {
        let next = match old_params.get(key) {
            None => incoming.clone(),
            Some(current) if is_default_value(config, key, current) => incoming.clone(),
            Some(current) => {
                let mut scalars = current.scalars().to_vec();
                scalars.extend(incoming.scalars().iter().cloned());
                ParamValue::Many(scalars)
            }
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Remove one facet from a multi-valued filter without disturbing siblings.
///
/// Every (key, value) pair of `old_params` that exactly matches a pair in
/// `params_to_remove` is dropped; survivors re-merge per key in their
/// original order, and any default key left without a value is restored.
pub fn remove_params(
    config: &QsConfig,
    old_params: &ParameterSet,
    params_to_remove: &ParameterSet,
) -> ParameterSet {
    let mut remaining = ParameterSet::new();
    for (key, value) in old_params {
        for scalar in value.scalars() {
            let doomed = params_to_remove
                .get(key)
                .is_some_and(|removed| removed.scalars().contains(scalar));
            if doomed {
                continue;
            }
            match remaining.entry(key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(ParamValue::Single(scalar.clone()));
                }
                Entry::Occupied(mut slot) => slot.get_mut().push(scalar.clone()),
            }
        }
    }
    for (key, value) in config.default_params() {
        remaining.entry(key.clone()).or_insert_with(|| value.clone());
    }
    remaining
}

/// Overwrite keys wholesale, never concatenating. Sort and page controls use
/// this: picking a new sort order replaces the old one.
pub fn replace_params(old_params: &ParameterSet, params_to_replace: &ParameterSet) -> ParameterSet {
    let mut merged = old_params.clone();
    for (key, value) in params_to_replace {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
