//! Mapping-table extraction for flat key/value records

use crate::domain::SectionRecord;
use std::collections::BTreeMap;

/// Values backends use to say "no data" or "not applicable".
const PLACEHOLDERS: &[&str] = &[
    "자료없음",
    "해당없음",
    "-",
    "n/a",
    "na",
    "no data",
    "no data available",
    "not available",
    "not applicable",
];

/// Trim a backend value, mapping placeholders to the empty string.
pub fn normalize_value(value: &str) -> String {
    let trimmed = value.trim();
    let lowered = trimmed.to_lowercase();
    if PLACEHOLDERS.iter().any(|p| *p == lowered) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Fill a section from `record` using a `(backend key, field)` table.
///
/// Keys absent from the record leave their field empty.
pub fn extract_flat<R: SectionRecord>(
    record: &BTreeMap<String, String>,
    table: &[(&str, R::Field)],
) -> R {
    let mut section = R::default();
    for (key, field) in table {
        if let Some(value) = record.get(*key) {
            *section.field_mut(*field) = normalize_value(value);
        }
    }
    section
}
