//! Same-kind and cross-kind merging under the per-field strategy table
//!
//! The strategy table is domain convention carried over unchanged: which
//! identity fields resolve by trust priority and which experience fields
//! resolve by maximum is business semantics, not something to re-derive.

use dossier_domain::{DocumentKind, FieldMap, FieldValue, MergeStrategy, MergedField, MergedRecord};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Resolution strategy for a field
pub fn strategy_for(field: &str) -> MergeStrategy {
    match field {
        // Academic identity: the diploma outranks everything.
        "graduation_year" | "university" | "department" | "education_level" => {
            MergeStrategy::Priority
        }
        // Accumulated experience: the largest substantiated value wins.
        "total_experience_years"
        | "total_experience_months"
        | "experience_energy"
        | "experience_metal"
        | "experience_mineral"
        | "experience_chemistry"
        | "experience_waste"
        | "experience_other" => MergeStrategy::Max,
        // Flags: any document asserting true wins.
        "has_criminal_record" | "green_transition_experience" | "environmental_law_knowledge" => {
            MergeStrategy::Or
        }
        _ => MergeStrategy::First,
    }
}

/// One analyzed document's contribution to a same-kind merge
#[derive(Debug, Clone)]
pub struct TypedResult {
    /// Physical document id
    pub document_id: i64,

    /// Fields that document produced
    pub fields: FieldMap,
}

/// Merge several documents of the same kind into one field map
///
/// Returns the merged map and, per field, the physical document that
/// contributed the winning value.
pub fn merge_same_kind(
    kind: DocumentKind,
    results: &[TypedResult],
) -> (FieldMap, BTreeMap<String, i64>) {
    let mut merged = FieldMap::new();
    let mut provenance = BTreeMap::new();

    if results.len() > 1 {
        debug!("Merging {} documents of kind {}", results.len(), kind.label());
    }

    let mut all_fields: Vec<&String> = results.iter().flat_map(|r| r.fields.keys()).collect();
    all_fields.sort();
    all_fields.dedup();

    for field in all_fields {
        let values: Vec<(&FieldValue, i64)> = results
            .iter()
            .filter_map(|r| r.fields.get(field).map(|v| (v, r.document_id)))
            .collect();

        let winner: Option<(FieldValue, i64)> = match strategy_for(field) {
            MergeStrategy::Max => values
                .iter()
                .filter(|(v, _)| v.is_numeric())
                .max_by(|(a, _), (b, _)| {
                    a.as_f64()
                        .unwrap_or(f64::MIN)
                        .total_cmp(&b.as_f64().unwrap_or(f64::MIN))
                })
                .map(|(value, id)| ((*value).clone(), *id)),
            MergeStrategy::Or => {
                let flags: Vec<(bool, i64)> = values
                    .iter()
                    .filter_map(|(v, id)| v.as_bool().map(|b| (b, *id)))
                    .collect();
                let result = flags.iter().any(|(b, _)| *b);
                flags
                    .iter()
                    .find(|(b, _)| *b)
                    .or_else(|| flags.first())
                    .map(|(_, id)| (FieldValue::Bool(result), *id))
            }
            // Within one kind, priority degenerates to document order.
            MergeStrategy::Priority | MergeStrategy::First => values
                .iter()
                .find(|(v, _)| !is_blank(v))
                .or_else(|| values.first())
                .map(|(value, id)| ((*value).clone(), *id)),
        };

        if let Some((value, document_id)) = winner {
            merged.insert(field.clone(), value);
            provenance.insert(field.clone(), document_id);
        }
    }

    (merged, provenance)
}

fn is_blank(value: &FieldValue) -> bool {
    matches!(value, FieldValue::Text(s) if s.is_empty())
}

/// Merge the per-kind field maps into the application's record
///
/// For every field present in at least one kind: agreement is recorded
/// silently; disagreement records a conflict entry with all contributing
/// values keyed by source label, then the field's strategy picks the winner.
pub fn merge_across_kinds(by_kind: &BTreeMap<DocumentKind, FieldMap>) -> MergedRecord {
    let mut record = MergedRecord::new();

    // Contributors in trust order; ties cannot happen (one map per kind).
    let mut kinds: Vec<&DocumentKind> = by_kind.keys().collect();
    kinds.sort_by_key(|k| k.trust_rank());

    let mut all_fields: Vec<&String> = by_kind.values().flat_map(|m| m.keys()).collect();
    all_fields.sort();
    all_fields.dedup();

    for field in all_fields {
        let contributions: Vec<(DocumentKind, &FieldValue)> = kinds
            .iter()
            .filter_map(|kind| by_kind[kind].get(field).map(|v| (**kind, v)))
            .collect();

        if contributions.is_empty() {
            continue;
        }

        let distinct = {
            let mut seen: Vec<&FieldValue> = Vec::new();
            for (_, value) in &contributions {
                if !seen.contains(value) {
                    seen.push(*value);
                }
            }
            seen.len()
        };

        let conflicts = if distinct > 1 {
            warn!(
                "Conflict on '{}': {} sources disagree",
                field,
                contributions.len()
            );
            Some(
                contributions
                    .iter()
                    .map(|(kind, value)| (kind.label(), (*value).clone()))
                    .collect::<BTreeMap<String, FieldValue>>(),
            )
        } else {
            None
        };

        let strategy = strategy_for(field);
        let winner: Option<(DocumentKind, FieldValue)> = match strategy {
            // Trust-ordered walk: first kind holding the field wins.
            MergeStrategy::Priority | MergeStrategy::First => contributions
                .first()
                .map(|(kind, value)| (*kind, (*value).clone())),
            MergeStrategy::Max => contributions
                .iter()
                .filter(|(_, v)| v.is_numeric())
                .max_by(|(_, a), (_, b)| {
                    a.as_f64()
                        .unwrap_or(f64::MIN)
                        .total_cmp(&b.as_f64().unwrap_or(f64::MIN))
                })
                .map(|(kind, value)| (*kind, (*value).clone())),
            MergeStrategy::Or => {
                let flags: Vec<(DocumentKind, bool)> = contributions
                    .iter()
                    .filter_map(|(kind, v)| v.as_bool().map(|b| (*kind, b)))
                    .collect();
                if flags.is_empty() {
                    None
                } else {
                    let result = flags.iter().any(|(_, b)| *b);
                    let source = flags
                        .iter()
                        .find(|(_, b)| *b)
                        .or_else(|| flags.first())
                        .map(|(kind, _)| *kind);
                    source.map(|kind| (kind, FieldValue::Bool(result)))
                }
            }
        };

        if let Some((source, value)) = winner {
            record.insert(
                field.clone(),
                MergedField {
                    value,
                    source,
                    strategy,
                    conflicts,
                },
            );
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, FieldValue)>) -> FieldMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_priority_selects_diploma_and_records_conflict() {
        let by_kind = BTreeMap::from([
            (
                DocumentKind::Diploma,
                map(vec![("graduation_year", FieldValue::Int(2010))]),
            ),
            (
                DocumentKind::Cv,
                map(vec![("graduation_year", FieldValue::Int(2012))]),
            ),
        ]);

        let record = merge_across_kinds(&by_kind);
        let field = record.fields.get("graduation_year").unwrap();

        assert_eq!(field.value, FieldValue::Int(2010));
        assert_eq!(field.source, DocumentKind::Diploma);
        assert_eq!(field.strategy, MergeStrategy::Priority);

        let conflicts = field.conflicts.as_ref().unwrap();
        assert_eq!(conflicts.get("Diploma"), Some(&FieldValue::Int(2010)));
        assert_eq!(conflicts.get("CV"), Some(&FieldValue::Int(2012)));
    }

    #[test]
    fn test_agreement_records_no_conflict() {
        let by_kind = BTreeMap::from([
            (
                DocumentKind::Diploma,
                map(vec![("graduation_year", FieldValue::Int(2015))]),
            ),
            (
                DocumentKind::Cv,
                map(vec![("graduation_year", FieldValue::Int(2015))]),
            ),
        ]);

        let record = merge_across_kinds(&by_kind);
        assert!(record.fields.get("graduation_year").unwrap().conflicts.is_none());
        assert!(record.conflicts().is_empty());
    }

    #[test]
    fn test_max_takes_largest_experience() {
        let by_kind = BTreeMap::from([
            (
                DocumentKind::Cv,
                map(vec![("total_experience_years", FieldValue::Int(8))]),
            ),
            (
                DocumentKind::ServiceRecord,
                map(vec![("total_experience_years", FieldValue::Int(11))]),
            ),
        ]);

        let record = merge_across_kinds(&by_kind);
        let field = record.fields.get("total_experience_years").unwrap();

        assert_eq!(field.value, FieldValue::Int(11));
        assert_eq!(field.source, DocumentKind::ServiceRecord);
        assert_eq!(field.strategy, MergeStrategy::Max);
    }

    #[test]
    fn test_or_lets_true_win() {
        let by_kind = BTreeMap::from([
            (
                DocumentKind::CriminalRecord,
                map(vec![("has_criminal_record", FieldValue::Bool(true))]),
            ),
            (
                DocumentKind::Cv,
                map(vec![("has_criminal_record", FieldValue::Bool(false))]),
            ),
        ]);

        let record = merge_across_kinds(&by_kind);
        let field = record.fields.get("has_criminal_record").unwrap();

        assert_eq!(field.value, FieldValue::Bool(true));
        assert_eq!(field.source, DocumentKind::CriminalRecord);
    }

    #[test]
    fn test_first_takes_highest_trust_source() {
        let by_kind = BTreeMap::from([
            (
                DocumentKind::ServiceRecord,
                map(vec![("full_name", FieldValue::Text("ELİF SARI".into()))]),
            ),
            (
                DocumentKind::Diploma,
                map(vec![("full_name", FieldValue::Text("ELİF TÜRKYILMAZ".into()))]),
            ),
        ]);

        let record = merge_across_kinds(&by_kind);
        let field = record.fields.get("full_name").unwrap();

        // Diploma outranks the service record in the trust order.
        assert_eq!(field.value, FieldValue::Text("ELİF TÜRKYILMAZ".into()));
        assert_eq!(field.strategy, MergeStrategy::First);
    }

    #[test]
    fn test_same_kind_merge_tracks_document_provenance() {
        let results = vec![
            TypedResult {
                document_id: 10,
                fields: map(vec![
                    ("graduation_year", FieldValue::Int(2015)),
                    ("university", FieldValue::Text(String::new())),
                ]),
            },
            TypedResult {
                document_id: 11,
                fields: map(vec![
                    ("university", FieldValue::Text("EGE ÜNİVERSİTESİ".into())),
                    ("total_experience_years", FieldValue::Int(6)),
                ]),
            },
        ];

        let (merged, provenance) = merge_same_kind(DocumentKind::Diploma, &results);

        assert_eq!(merged.get("graduation_year").unwrap().as_i64(), Some(2015));
        // Blank text from document 10 loses to the non-empty value.
        assert_eq!(
            merged.get("university").unwrap().as_text(),
            Some("EGE ÜNİVERSİTESİ")
        );
        assert_eq!(provenance.get("graduation_year"), Some(&10));
        assert_eq!(provenance.get("university"), Some(&11));
        assert_eq!(provenance.get("total_experience_years"), Some(&11));
    }

    #[test]
    fn test_same_kind_max_strategy() {
        let results = vec![
            TypedResult {
                document_id: 20,
                fields: map(vec![("experience_energy", FieldValue::Int(3))]),
            },
            TypedResult {
                document_id: 21,
                fields: map(vec![("experience_energy", FieldValue::Int(5))]),
            },
        ];

        let (merged, provenance) = merge_same_kind(
            DocumentKind::SectorCertificate(dossier_domain::Sector::Energy),
            &results,
        );

        assert_eq!(merged.get("experience_energy").unwrap().as_i64(), Some(5));
        assert_eq!(provenance.get("experience_energy"), Some(&21));
    }
}
