//! Lenient parsing of extraction-service responses
//!
//! The service is asked for a single JSON object but occasionally wraps it
//! in a markdown code fence or in a one-element array. Both repairs happen
//! here; anything else fails the segment, not the document.

use crate::error::ExtractorError;
use dossier_domain::value::map_from_json_object;
use dossier_domain::FieldMap;
use serde_json::Value;
use tracing::warn;

/// Parse a response body into a field map
pub fn parse_response(raw: &str) -> Result<FieldMap, ExtractorError> {
    let json_str = strip_code_fence(raw);

    let parsed: Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::JsonParse(e.to_string()))?;

    let object = match parsed {
        Value::Object(obj) => obj,
        // The service occasionally wraps a single object in an array.
        Value::Array(items) => {
            warn!(
                "Service returned an array of {} elements, taking the first",
                items.len()
            );
            match items.into_iter().next() {
                Some(Value::Object(obj)) => obj,
                Some(other) => {
                    return Err(ExtractorError::InvalidFormat(format!(
                        "Array element is {}, expected object",
                        type_name(&other)
                    )))
                }
                None => {
                    return Err(ExtractorError::InvalidFormat(
                        "Service returned an empty array".to_string(),
                    ))
                }
            }
        }
        other => {
            return Err(ExtractorError::InvalidFormat(format!(
                "Top-level value is {}, expected object",
                type_name(&other)
            )))
        }
    };

    Ok(map_from_json_object(&object))
}

/// Strip a surrounding markdown code fence, if present
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_object() {
        let map = parse_response(r#"{"graduation_year": 2015, "full_name": "ALİ VELİ"}"#).unwrap();
        assert_eq!(map.get("graduation_year").unwrap().as_i64(), Some(2015));
        assert_eq!(map.get("full_name").unwrap().as_text(), Some("ALİ VELİ"));
    }

    #[test]
    fn test_parse_fenced_object() {
        let raw = "```json\n{\"has_criminal_record\": false}\n```";
        let map = parse_response(raw).unwrap();
        assert_eq!(
            map.get("has_criminal_record").unwrap().as_bool(),
            Some(false)
        );
    }

    #[test]
    fn test_parse_fence_without_language() {
        let raw = "```\n{\"total_experience_years\": 7}\n```";
        let map = parse_response(raw).unwrap();
        assert_eq!(
            map.get("total_experience_years").unwrap().as_i64(),
            Some(7)
        );
    }

    #[test]
    fn test_array_unwraps_to_first_element() {
        let raw = r#"[{"graduation_year": 2016}, {"graduation_year": 1999}]"#;
        let map = parse_response(raw).unwrap();
        assert_eq!(map.get("graduation_year").unwrap().as_i64(), Some(2016));
    }

    #[test]
    fn test_empty_array_is_rejected() {
        assert!(matches!(
            parse_response("[]"),
            Err(ExtractorError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_scalar_is_rejected() {
        assert!(matches!(
            parse_response("42"),
            Err(ExtractorError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_non_json_is_rejected() {
        assert!(matches!(
            parse_response("the document describes..."),
            Err(ExtractorError::JsonParse(_))
        ));
    }

    #[test]
    fn test_null_fields_are_dropped() {
        let map = parse_response(r#"{"university": null, "department": "ÇEVRE MÜH."}"#).unwrap();
        assert!(!map.contains_key("university"));
        assert!(map.contains_key("department"));
    }
}
