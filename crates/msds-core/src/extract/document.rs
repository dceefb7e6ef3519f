//! Heuristic extraction from nested document trees
//!
//! Finds sub-records by exact heading, flattens the text beneath them and
//! classifies each string with a keyword rule table. Best effort: text that
//! no rule recognizes ends up in the section's open-ended list, and
//! ambiguous phrasing can be misfiled.

use super::rules::{classify, haystack, KeywordRule, MIN_UNCLASSIFIED_LEN};
use crate::domain::SectionRecord;
use serde_json::Value;

/// A heading whose sub-tree feeds one section.
#[derive(Debug, Clone, Copy)]
pub struct HeadingScope {
    pub heading: &'static str,
    /// Whether unmatched text under this heading goes to the section's list
    pub collect_unmatched: bool,
    /// Sub-headings that belong to another section and are skipped
    pub exclude: &'static [&'static str],
}

/// One flattened text value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Nearest enclosing heading
    pub heading: String,
    /// Entry label, when the backend gives one
    pub label: String,
    pub text: String,
    pub collect_unmatched: bool,
}

/// Collect leaves under every node whose heading is in `scopes`, in
/// document order. A matched node is not searched again for nested matches.
pub fn collect_leaves(doc: &Value, scopes: &[HeadingScope]) -> Vec<Leaf> {
    let mut out = Vec::new();
    search(doc, scopes, &mut out);
    out
}

fn search(node: &Value, scopes: &[HeadingScope], out: &mut Vec<Leaf>) {
    match node {
        Value::Object(map) => {
            if let Some(heading) = map.get("TOCHeading").and_then(Value::as_str) {
                if let Some(scope) = scopes.iter().find(|s| s.heading == heading) {
                    collect_under(node, heading, scope, out);
                    return;
                }
            }
            for child in map.values() {
                search(child, scopes, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                search(item, scopes, out);
            }
        }
        _ => {}
    }
}

fn collect_under(node: &Value, heading: &str, scope: &HeadingScope, out: &mut Vec<Leaf>) {
    if let Some(infos) = node.get("Information").and_then(Value::as_array) {
        for info in infos {
            let label = info.get("Name").and_then(Value::as_str).unwrap_or("");
            let Some(value) = info.get("Value") else {
                continue;
            };
            for text in value_texts(value) {
                out.push(Leaf {
                    heading: heading.to_string(),
                    label: label.to_string(),
                    text,
                    collect_unmatched: scope.collect_unmatched,
                });
            }
        }
    }

    if let Some(children) = node.get("Section").and_then(Value::as_array) {
        for child in children {
            let child_heading = child
                .get("TOCHeading")
                .and_then(Value::as_str)
                .unwrap_or(heading);
            if scope.exclude.contains(&child_heading) {
                continue;
            }
            collect_under(child, child_heading, scope, out);
        }
    }
}

/// Flatten one value object into its text strings.
fn value_texts(value: &Value) -> Vec<String> {
    let unit = value.get("Unit").and_then(Value::as_str);
    let with_unit = |text: &str| match unit {
        Some(u) if !u.is_empty() => format!("{} {}", text.trim(), u),
        _ => text.trim().to_string(),
    };

    let texts: Vec<String> = if let Some(items) =
        value.get("StringWithMarkup").and_then(Value::as_array)
    {
        items
            .iter()
            .filter_map(|item| item.get("String").and_then(Value::as_str))
            .map(with_unit)
            .collect()
    } else if let Some(numbers) = value.get("Number").and_then(Value::as_array) {
        let joined = numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        vec![with_unit(&joined)]
    } else if let Some(s) = value.as_str() {
        vec![s.trim().to_string()]
    } else {
        let mut found = Vec::new();
        nested_strings(value, &mut found);
        found
    };

    texts.into_iter().filter(|t| !t.is_empty()).collect()
}

/// Fallback for unfamiliar wrappers: every `"String"` value, recursively.
fn nested_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::String(s) if key == "String" => out.push(s.trim().to_string()),
                    _ => nested_strings(child, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                nested_strings(item, out);
            }
        }
        _ => {}
    }
}

/// Assign leaves to fields, first match per field wins.
///
/// A leaf whose rule targets an already populated field is dropped; a leaf
/// matching no rule is appended to the section's list when its scope allows
/// it, it is longer than [`MIN_UNCLASSIFIED_LEN`], and it is not already
/// present.
pub fn classify_leaves<R: SectionRecord>(leaves: &[Leaf], rules: &[KeywordRule<R::Field>]) -> R {
    let mut section = R::default();

    for leaf in leaves {
        let hay = haystack(&[&leaf.heading, &leaf.label, &leaf.text]);
        match classify(rules, &hay) {
            Some(field) => {
                let slot = section.field_mut(field);
                if slot.is_empty() {
                    *slot = leaf.text.clone();
                }
            }
            None => {
                if !leaf.collect_unmatched || leaf.text.chars().count() <= MIN_UNCLASSIFIED_LEN {
                    continue;
                }
                if let Some(list) = section.extra_mut() {
                    if !list.contains(&leaf.text) {
                        list.push(leaf.text.clone());
                    }
                }
            }
        }
    }

    section
}

pub fn extract_document<R: SectionRecord>(
    doc: &Value,
    scopes: &[HeadingScope],
    rules: &[KeywordRule<R::Field>],
) -> R {
    classify_leaves(&collect_leaves(doc, scopes), rules)
}
