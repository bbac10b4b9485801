// crates/sources/src/util.rs
//! Serde helpers for the loosely-typed upstream JSON
//!
//! The public catalogs are inconsistent about field types: ids arrive as
//! numbers or strings, creators as a string or an array of strings. These
//! deserializers absorb that without failing the whole response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON string or number, yielding its string form
pub(crate) fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Accepts a JSON string or array of strings, yielding the first entry
pub(crate) fn first_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Array(arr) => arr.into_iter().find_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }),
        _ => None,
    })
}

/// Accepts a JSON string or array of strings, yielding all string entries
pub(crate) fn string_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::String(s) => vec![s],
        Value::Array(arr) => arr
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Non-empty trimmed string, or the given default
pub(crate) fn or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "first_string")]
        creator: Option<String>,
        #[serde(default, deserialize_with = "string_list")]
        subject: Vec<String>,
    }

    #[test]
    fn test_string_or_number() {
        let p: Probe = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(p.id, "42");
        let p: Probe = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(p.id, "abc");
    }

    #[test]
    fn test_first_string() {
        let p: Probe = serde_json::from_str(r#"{"creator": "One"}"#).unwrap();
        assert_eq!(p.creator.as_deref(), Some("One"));
        let p: Probe = serde_json::from_str(r#"{"creator": ["A", "B"]}"#).unwrap();
        assert_eq!(p.creator.as_deref(), Some("A"));
        let p: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.creator.is_none());
    }

    #[test]
    fn test_string_list() {
        let p: Probe = serde_json::from_str(r#"{"subject": "solo"}"#).unwrap();
        assert_eq!(p.subject, vec!["solo"]);
        let p: Probe = serde_json::from_str(r#"{"subject": ["a", "b"]}"#).unwrap();
        assert_eq!(p.subject, vec!["a", "b"]);
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default("  ", "Unknown"), "Unknown");
        assert_eq!(or_default(" Jane ", "Unknown"), "Jane");
    }
}
