//! Post-merge normalization
//!
//! Range-validates and cleans the merged record: month overflow folds into
//! years, implausible values fall back to a preferred source or are dropped,
//! placeholder strings are dropped, and a truncated national id is repaired
//! from ground truth when the digits agree.

use dossier_domain::{
    DocumentKind, FieldMap, FieldValue, GroundTruth, MergeStrategy, MergedField, MergedRecord,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// (field, min, max, preferred fallback source)
const RANGE_RULES: &[(&str, i64, i64, Option<DocumentKind>)] = &[
    ("graduation_year", 1950, 2030, Some(DocumentKind::Diploma)),
    ("birth_year", 1930, 2015, None),
    (
        "total_experience_years",
        0,
        50,
        Some(DocumentKind::ServiceRecord),
    ),
];

/// String values meaning "the service could not tell"
const PLACEHOLDER_TOKENS: &[&str] = &[
    "unknown",
    "unspecified",
    "none",
    "n/a",
    "belirsiz",
    "bilinmiyor",
    "yok",
];

/// Normalize the merged record in place
///
/// `by_kind` supplies the per-source maps used for range fallback;
/// `ground_truth` enables national-id repair. Notes about every repair or
/// drop are appended to `warnings`.
pub fn normalize_record(
    record: &mut MergedRecord,
    by_kind: &BTreeMap<DocumentKind, FieldMap>,
    ground_truth: Option<&GroundTruth>,
    warnings: &mut Vec<String>,
) {
    fold_month_overflow(record);
    apply_range_rules(record, by_kind, warnings);
    drop_placeholders(record);
    repair_national_id(record, ground_truth, warnings);
}

/// Fold an experience month total of 12+ into the year total
fn fold_month_overflow(record: &mut MergedRecord) {
    let months = record
        .value("total_experience_months")
        .and_then(|v| v.as_i64());
    let Some(months) = months.filter(|m| *m >= 12) else {
        return;
    };

    let extra_years = months / 12;
    let remaining = months % 12;

    if let Some(field) = record.fields.get_mut("total_experience_months") {
        field.value = FieldValue::Int(remaining);
    }
    match record.fields.get_mut("total_experience_years") {
        Some(field) => {
            let years = field.value.as_i64().unwrap_or(0);
            field.value = FieldValue::Int(years + extra_years);
        }
        None => {
            let source = record
                .fields
                .get("total_experience_months")
                .map(|f| f.source)
                .unwrap_or(DocumentKind::Other);
            record.insert(
                "total_experience_years",
                MergedField {
                    value: FieldValue::Int(extra_years),
                    source,
                    strategy: MergeStrategy::Max,
                    conflicts: None,
                },
            );
        }
    }

    info!("Month overflow folded: +{} years, {} months left", extra_years, remaining);
}

/// Replace or drop out-of-range values per the configured rules
fn apply_range_rules(
    record: &mut MergedRecord,
    by_kind: &BTreeMap<DocumentKind, FieldMap>,
    warnings: &mut Vec<String>,
) {
    for (field_name, min, max, fallback_kind) in RANGE_RULES {
        let Some(value) = record.value(field_name).and_then(|v| v.as_i64()) else {
            continue;
        };
        if (*min..=*max).contains(&value) {
            continue;
        }

        warn!(
            "Implausible value: {}={} (expected {}..={})",
            field_name, value, min, max
        );

        let fallback = fallback_kind.and_then(|kind| {
            by_kind
                .get(&kind)
                .and_then(|fields| fields.get(*field_name))
                .and_then(|v| v.as_i64())
                .filter(|v| (*min..=*max).contains(v))
                .map(|v| (kind, v))
        });

        match fallback {
            Some((kind, corrected)) => {
                if let Some(field) = record.fields.get_mut(*field_name) {
                    field.value = FieldValue::Int(corrected);
                    field.source = kind;
                }
                warnings.push(format!(
                    "{} corrected from {} to {} using {}",
                    field_name,
                    value,
                    corrected,
                    kind.label()
                ));
            }
            None => {
                record.remove(field_name);
                warnings.push(format!(
                    "{} dropped: {} outside {}..={} and no usable fallback",
                    field_name, value, min, max
                ));
            }
        }
    }
}

/// Drop string values that only say "unknown"
fn drop_placeholders(record: &mut MergedRecord) {
    let placeholder_fields: Vec<String> = record
        .fields
        .iter()
        .filter_map(|(name, field)| match &field.value {
            FieldValue::Text(s)
                if PLACEHOLDER_TOKENS.contains(&s.trim().to_lowercase().as_str()) =>
            {
                Some(name.clone())
            }
            _ => None,
        })
        .collect();

    for name in placeholder_fields {
        record.remove(&name);
    }
}

/// Repair a 10-digit national id from ground truth, validate the length
/// otherwise
fn repair_national_id(
    record: &mut MergedRecord,
    ground_truth: Option<&GroundTruth>,
    warnings: &mut Vec<String>,
) {
    let Some(value) = record.value("national_id").and_then(|v| v.as_text()) else {
        return;
    };
    let id = value.trim().to_string();

    match id.len() {
        11 => {}
        // OCR commonly eats the first digit; extend only when ground truth
        // agrees on the remaining ten.
        10 => {
            let reference = ground_truth.and_then(|gt| gt.national_id.as_deref());
            match reference {
                Some(reference) if reference.len() == 11 && reference.ends_with(&id) => {
                    info!("National id repaired: {} -> {}", id, reference);
                    let reference = reference.to_string();
                    if let Some(field) = record.fields.get_mut("national_id") {
                        field.value = FieldValue::Text(reference);
                    }
                }
                Some(_) => {
                    warnings.push(format!(
                        "national_id has 10 digits ({}) and disagrees with ground truth",
                        id
                    ));
                }
                None => {
                    warnings.push(format!(
                        "national_id has 10 digits ({}) and no ground truth to repair from",
                        id
                    ));
                }
            }
        }
        other => {
            warnings.push(format!("national_id dropped: invalid length {}", other));
            record.remove("national_id");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: FieldValue, source: DocumentKind) -> MergedField {
        MergedField {
            value,
            source,
            strategy: MergeStrategy::First,
            conflicts: None,
        }
    }

    fn record_with(entries: Vec<(&str, FieldValue, DocumentKind)>) -> MergedRecord {
        let mut record = MergedRecord::new();
        for (name, value, source) in entries {
            record.insert(name, field(value, source));
        }
        record
    }

    #[test]
    fn test_month_overflow_folds_into_years() {
        let mut record = record_with(vec![
            ("total_experience_years", FieldValue::Int(4), DocumentKind::Cv),
            ("total_experience_months", FieldValue::Int(26), DocumentKind::Cv),
        ]);
        normalize_record(&mut record, &BTreeMap::new(), None, &mut Vec::new());

        assert_eq!(record.value("total_experience_years").unwrap().as_i64(), Some(6));
        assert_eq!(record.value("total_experience_months").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_out_of_range_year_falls_back_to_diploma() {
        let mut record = record_with(vec![(
            "graduation_year",
            FieldValue::Int(20155),
            DocumentKind::Cv,
        )]);
        let by_kind = BTreeMap::from([(
            DocumentKind::Diploma,
            BTreeMap::from([("graduation_year".to_string(), FieldValue::Int(2015))]),
        )]);

        let mut warnings = Vec::new();
        normalize_record(&mut record, &by_kind, None, &mut warnings);

        let field = record.fields.get("graduation_year").unwrap();
        assert_eq!(field.value, FieldValue::Int(2015));
        assert_eq!(field.source, DocumentKind::Diploma);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_out_of_range_without_fallback_is_dropped() {
        let mut record = record_with(vec![(
            "birth_year",
            FieldValue::Int(1802),
            DocumentKind::Cv,
        )]);

        let mut warnings = Vec::new();
        normalize_record(&mut record, &BTreeMap::new(), None, &mut warnings);

        assert!(record.value("birth_year").is_none());
        assert!(warnings[0].contains("dropped"));
    }

    #[test]
    fn test_year_fields_never_stay_out_of_range() {
        // Fallback itself out of range: the field must go, not stay wrong.
        let mut record = record_with(vec![(
            "graduation_year",
            FieldValue::Int(1901),
            DocumentKind::Cv,
        )]);
        let by_kind = BTreeMap::from([(
            DocumentKind::Diploma,
            BTreeMap::from([("graduation_year".to_string(), FieldValue::Int(1900))]),
        )]);

        normalize_record(&mut record, &by_kind, None, &mut Vec::new());
        assert!(record.value("graduation_year").is_none());
    }

    #[test]
    fn test_placeholders_are_dropped() {
        let mut record = record_with(vec![
            ("university", FieldValue::Text("Belirsiz".into()), DocumentKind::Cv),
            ("department", FieldValue::Text("N/A".into()), DocumentKind::Cv),
            ("full_name", FieldValue::Text("ALİ VELİ".into()), DocumentKind::Cv),
        ]);
        normalize_record(&mut record, &BTreeMap::new(), None, &mut Vec::new());

        assert!(record.value("university").is_none());
        assert!(record.value("department").is_none());
        assert!(record.value("full_name").is_some());
    }

    fn ground_truth(id: &str) -> GroundTruth {
        GroundTruth {
            full_name: "ALI VELI".to_string(),
            national_id: Some(id.to_string()),
            address: None,
            email: None,
            phone: None,
            submitted_at: None,
            subject: None,
            declared_files: Vec::new(),
        }
    }

    #[test]
    fn test_truncated_national_id_is_repaired() {
        let mut record = record_with(vec![(
            "national_id",
            FieldValue::Text("2345678901".into()),
            DocumentKind::Cv,
        )]);
        let gt = ground_truth("12345678901");

        normalize_record(&mut record, &BTreeMap::new(), Some(&gt), &mut Vec::new());
        assert_eq!(
            record.value("national_id").unwrap().as_text(),
            Some("12345678901")
        );
    }

    #[test]
    fn test_disagreeing_national_id_is_left_flagged() {
        let mut record = record_with(vec![(
            "national_id",
            FieldValue::Text("9999999999".into()),
            DocumentKind::Cv,
        )]);
        let gt = ground_truth("12345678901");

        let mut warnings = Vec::new();
        normalize_record(&mut record, &BTreeMap::new(), Some(&gt), &mut warnings);

        // Left as-is, flagged for review.
        assert_eq!(
            record.value("national_id").unwrap().as_text(),
            Some("9999999999")
        );
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_invalid_length_national_id_is_dropped() {
        let mut record = record_with(vec![(
            "national_id",
            FieldValue::Text("12345".into()),
            DocumentKind::Cv,
        )]);

        let mut warnings = Vec::new();
        normalize_record(&mut record, &BTreeMap::new(), None, &mut warnings);

        assert!(record.value("national_id").is_none());
        assert!(warnings[0].contains("invalid length"));
    }
}
