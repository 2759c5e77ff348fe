//! Strict query-string decoding.

use std::collections::btree_map::Entry;
use std::fmt;

use percent_encoding::percent_decode_str;
use tracing::trace;

use crate::config::QsConfig;
use crate::params::{ParamValue, ParameterSet, Scalar};


/// A malformed query string. Never swallowed: a user may have bookmarked or
/// hand-edited the URL, and silently falling back to defaults would hide that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    BadPercentSequence(String),
    BadUtf8(String),
    BadInteger { key: String, value: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadPercentSequence(component) => {
                write!(f, "Malformed percent-encoding in '{}'", component)
            }
            Self::BadUtf8(component) => {
                write!(f, "Percent-decoded '{}' is not valid UTF-8", component)
            }
            Self::BadInteger { key, value } => {
                write!(f, "Field '{}' expects an integer, got '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Percent-decode one key or value. `percent_decode_str` passes a stray `%`
/// through untouched, so malformed sequences are rejected up front.
fn decode_component(raw: &str) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return Err(DecodeError::BadPercentSequence(raw.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| DecodeError::BadUtf8(raw.to_string()))?;
    Ok(decoded.into_owned())
}

/// Parse a raw query string (leading `?` allowed) into the parameter set of
/// the list the config describes.
///
/// Keys outside the config's namespace belong to other lists and are skipped.
/// Integer fields parse to numbers. A key seen once yields `Single`, repeated
/// keys collect into `Many` in encounter order. Defaults fill in for keys the
/// URL does not mention; URL values always win over defaults.
pub fn decode(config: &QsConfig, query_string: &str) -> Result<ParameterSet, DecodeError> {
    let raw = query_string.strip_prefix('?').unwrap_or(query_string);
    if raw.is_empty() {
        return Ok(config.default_params().clone());
    }

    let mut params = ParameterSet::new();
    for pair in raw.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key)?;
        let Some(bare_key) = config.strip_key(&key) else {
            trace!(key = %key, "query key belongs to another list, skipping");
            continue;
        };
        let value = decode_component(raw_value)?;
        let scalar = if config.is_integer_field(bare_key) {
            let parsed = value.parse::<i64>().map_err(|_| DecodeError::BadInteger {
                key: bare_key.to_string(),
                value: value.clone(),
            })?;
            Scalar::Int(parsed)
        } else {
            Scalar::String(value)
        };
        match params.entry(bare_key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(ParamValue::Single(scalar));
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(scalar),
        }
    }

    for (key, value) in config.default_params() {
        params.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Ok(params)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn job_config() -> QsConfig {
        let defaults: ParameterSet = [
            ("page".to_string(), ParamValue::from(1)),
            ("page_size".to_string(), ParamValue::from(20)),
            ("order_by".to_string(), ParamValue::from("-finished")),
        ]
        .into_iter()
        .collect();
        QsConfig::new("job", defaults, &["page", "page_size"]).unwrap()
    }

    #[test]
    fn test_empty_string_returns_defaults() {
        let config = job_config();
        assert_eq!(decode(&config, "").unwrap(), *config.default_params());
        assert_eq!(decode(&config, "?").unwrap(), *config.default_params());
    }

    #[test]
    fn test_url_values_win_over_defaults() {
        let config = job_config();
        let params = decode(&config, "?job.page=3").unwrap();
        assert_eq!(params.get("page"), Some(&ParamValue::from(3)));
        assert_eq!(params.get("page_size"), Some(&ParamValue::from(20)));
        assert_eq!(params.get("order_by"), Some(&ParamValue::from("-finished")));
    }

    #[test]
    fn test_integer_field_parses_to_number() {
        let config = job_config();
        let params = decode(&config, "job.page=7").unwrap();
        assert_eq!(params.get("page"), Some(&ParamValue::Single(Scalar::Int(7))));
    }

    #[test]
    fn test_non_integer_field_stays_a_string() {
        let config = job_config();
        let params = decode(&config, "job.name=7").unwrap();
        assert_eq!(params.get("name"), Some(&ParamValue::from("7")));
    }

    #[test]
    fn test_repeated_keys_collapse_in_encounter_order() {
        let config = job_config();
        let params = decode(&config, "job.id=b&job.id=a&job.id=c").unwrap();
        assert_eq!(
            params.get("id"),
            Some(&ParamValue::Many(vec![
                Scalar::from("b"),
                Scalar::from("a"),
                Scalar::from("c"),
            ]))
        );
    }

    #[test]
    fn test_single_occurrence_stays_scalar() {
        let config = job_config();
        let params = decode(&config, "job.id=42").unwrap();
        assert_eq!(params.get("id"), Some(&ParamValue::from("42")));
    }

    #[test]
    fn test_foreign_namespace_keys_are_skipped() {
        let config = job_config();
        let params = decode(&config, "job.page=2&template.page=5&other=x").unwrap();
        assert_eq!(params.get("page"), Some(&ParamValue::from(2)));
        assert!(!params.contains_key("template.page"));
        assert!(!params.contains_key("other"));
    }

    #[test]
    fn test_unnamespaced_config_ignores_dotted_keys() {
        let config = QsConfig::without_namespace(ParameterSet::new(), &["page"]);
        let params = decode(&config, "page=2&job.page=9").unwrap();
        assert_eq!(params.get("page"), Some(&ParamValue::from(2)));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_percent_decoding_of_key_and_value() {
        let config = job_config();
        let params = decode(&config, "job.name=a%20b%26c").unwrap();
        assert_eq!(params.get("name"), Some(&ParamValue::from("a b&c")));
    }

    #[test]
    fn test_plus_is_a_literal_plus() {
        // encodeURIComponent never writes '+' for space, so none is read back.
        let config = job_config();
        let params = decode(&config, "job.name=a+b").unwrap();
        assert_eq!(params.get("name"), Some(&ParamValue::from("a+b")));
    }

    #[test]
    fn test_pair_without_equals_decodes_to_empty_value() {
        let config = job_config();
        let params = decode(&config, "job.name").unwrap();
        assert_eq!(params.get("name"), Some(&ParamValue::from("")));
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let config = job_config();
        let params = decode(&config, "job.page=2&&job.name=x").unwrap();
        assert_eq!(params.get("page"), Some(&ParamValue::from(2)));
        assert_eq!(params.get("name"), Some(&ParamValue::from("x")));
    }

    #[test]
    fn test_malformed_percent_sequence_is_an_error() {
        let config = job_config();
        let err = decode(&config, "job.name=%zz").unwrap_err();
        assert_eq!(err, DecodeError::BadPercentSequence("%zz".to_string()));
    }

    #[test]
    fn test_truncated_percent_sequence_is_an_error() {
        let config = job_config();
        assert!(matches!(
            decode(&config, "job.name=abc%2"),
            Err(DecodeError::BadPercentSequence(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let config = job_config();
        assert_eq!(
            decode(&config, "job.name=%ff"),
            Err(DecodeError::BadUtf8("%ff".to_string()))
        );
    }

    #[test]
    fn test_unparsable_integer_field_is_an_error() {
        let config = job_config();
        assert_eq!(
            decode(&config, "job.page=seven"),
            Err(DecodeError::BadInteger {
                key: "page".to_string(),
                value: "seven".to_string(),
            })
        );
    }

    #[test]
    fn test_negative_integer_field() {
        let config = job_config();
        let params = decode(&config, "job.page=-1").unwrap();
        assert_eq!(params.get("page"), Some(&ParamValue::Single(Scalar::Int(-1))));
    }
}
