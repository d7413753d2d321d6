//! Per-field merge of segment extraction results
//!
//! Applied left-to-right across segments in order. Numeric fields sum,
//! except calendar-year fields which keep the more plausible value; strings
//! keep the first non-empty value; booleans OR; lists concatenate (order may
//! carry meaning, duplicates allowed); nested records merge recursively.

use dossier_domain::{FieldMap, FieldValue};

/// Plausible ranges for fields that semantically hold a calendar year.
/// Summing these across overlapping segments would be nonsense.
const YEAR_FIELD_RANGES: &[(&str, i64, i64)] = &[
    ("graduation_year", 1950, 2030),
    ("birth_year", 1930, 2015),
];

fn year_range(field: &str) -> Option<(i64, i64)> {
    YEAR_FIELD_RANGES
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|(_, lo, hi)| (*lo, *hi))
}

/// Merge per-segment field maps into one map for the document
pub fn merge_segment_maps(maps: Vec<FieldMap>) -> FieldMap {
    let mut iter = maps.into_iter();
    let Some(mut merged) = iter.next() else {
        return FieldMap::new();
    };
    for map in iter {
        merge_into(&mut merged, map);
    }
    merged
}

fn merge_into(base: &mut FieldMap, incoming: FieldMap) {
    for (key, value) in incoming {
        match base.remove(&key) {
            None => {
                base.insert(key, value);
            }
            Some(existing) => {
                if let Some(combined) = combine(&key, existing, value) {
                    base.insert(key, combined);
                }
                // None means both year candidates were implausible; drop the key.
            }
        }
    }
}

fn combine(key: &str, first: FieldValue, second: FieldValue) -> Option<FieldValue> {
    use FieldValue::*;

    match (first, second) {
        (a, b) if a.is_numeric() && b.is_numeric() && year_range(key).is_some() => {
            merge_year(key, &a, &b)
        }
        (Int(x), Int(y)) => Some(Int(x + y)),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            Some(Float(a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0)))
        }
        (Text(x), Text(y)) => {
            if x.is_empty() && !y.is_empty() {
                Some(Text(y))
            } else {
                Some(Text(x))
            }
        }
        (Bool(x), Bool(y)) => Some(Bool(x || y)),
        (List(mut x), List(y)) => {
            x.extend(y);
            Some(List(x))
        }
        (Map(mut x), Map(y)) => {
            merge_into(&mut x, y);
            Some(Map(x))
        }
        // Type mismatch between segments: keep the value seen first.
        (a, _) => Some(a),
    }
}

/// Keep the more plausible year; when both are plausible prefer the smaller
fn merge_year(key: &str, a: &FieldValue, b: &FieldValue) -> Option<FieldValue> {
    let (lo, hi) = year_range(key)?;
    let x = a.as_i64()?;
    let y = b.as_i64()?;
    let x_ok = (lo..=hi).contains(&x);
    let y_ok = (lo..=hi).contains(&y);

    match (x_ok, y_ok) {
        (true, true) => Some(FieldValue::Int(x.min(y))),
        (true, false) => Some(FieldValue::Int(x)),
        (false, true) => Some(FieldValue::Int(y)),
        (false, false) => None,
    }
}
