//! Tagged field values for extracted facts
//!
//! The extraction service returns free-form JSON; the rest of the pipeline
//! works on this explicit union instead. JSON `null` has no representation
//! here on purpose: an absent fact is an absent key.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A map of extracted facts keyed by field name
pub type FieldMap = BTreeMap<String, FieldValue>;

/// One extracted fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean fact (e.g. "has a criminal record")
    Bool(bool),

    /// Integer fact (years, counts, day totals)
    Int(i64),

    /// Fractional fact (e.g. a diploma grade)
    Float(f64),

    /// Free-text fact
    Text(String),

    /// Ordered list of facts — order may carry meaning, duplicates allowed
    List(Vec<FieldValue>),

    /// Nested record (e.g. one project entry)
    Map(FieldMap),
}

impl FieldValue {
    /// Convert a JSON value, returning `None` for `null`
    pub fn from_json(value: &Value) -> Option<FieldValue> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::Int(i))
                } else {
                    n.as_f64().map(FieldValue::Float)
                }
            }
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Array(items) => Some(FieldValue::List(
                items.iter().filter_map(FieldValue::from_json).collect(),
            )),
            Value::Object(obj) => Some(FieldValue::Map(map_from_json_object(obj))),
        }
    }

    /// Convert back to JSON for persistence/audit payloads
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            FieldValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Integer view; floats are truncated
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric view
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Boolean view
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// List view
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for numeric variants
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Int(_) | FieldValue::Float(_))
    }
}

/// Build a [`FieldMap`] from a JSON object, dropping `null` entries
pub fn map_from_json_object(obj: &serde_json::Map<String, Value>) -> FieldMap {
    obj.iter()
        .filter_map(|(k, v)| FieldValue::from_json(v).map(|fv| (k.clone(), fv)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_null_entries_are_dropped() {
        let json = json!({"name": "AYLIN", "birth_year": null, "years": 4});
        let map = map_from_json_object(json.as_object().unwrap());

        assert_eq!(map.get("name").and_then(|v| v.as_text()), Some("AYLIN"));
        assert!(!map.contains_key("birth_year"));
        assert_eq!(map.get("years").and_then(|v| v.as_i64()), Some(4));
    }

    #[test]
    fn test_nested_structures_convert() {
        let json = json!({
            "projects": [{"title": "Flue gas retrofit", "year": 2021}],
            "has_record": false
        });
        let map = map_from_json_object(json.as_object().unwrap());

        let projects = map.get("projects").and_then(|v| v.as_list()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(map.get("has_record").and_then(|v| v.as_bool()), Some(false));
    }

    #[test]
    fn test_float_truncates_to_int_view() {
        assert_eq!(FieldValue::Float(3.7).as_i64(), Some(3));
    }

    fn arb_value() -> impl Strategy<Value = FieldValue> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(FieldValue::Bool),
            any::<i64>().prop_map(FieldValue::Int),
            "[a-z]{0,12}".prop_map(FieldValue::Text),
        ];
        leaf.prop_recursive(2, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(FieldValue::List),
                prop::collection::btree_map("[a-z]{1,8}", inner, 0..4).prop_map(FieldValue::Map),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_json_round_trip(value in arb_value()) {
            let json = value.to_json();
            let back = FieldValue::from_json(&json).unwrap();
            prop_assert_eq!(back, value);
        }
    }
}
