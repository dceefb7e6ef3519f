//! Field extractors: native records into the normalized schema
//!
//! - `structured`: direct key mapping for flat records
//! - `document`: heading search plus keyword classification for trees
//! - `rules`: the ordered keyword tables the classifier uses

pub mod document;
pub mod rules;
pub mod structured;

pub use document::{classify_leaves, collect_leaves, extract_document, HeadingScope, Leaf};
pub use rules::{
    classify, haystack, KeywordRule, ECOLOGICAL_RULES, MIN_UNCLASSIFIED_LEN, PHYSICAL_RULES,
    TOXICITY_RULES,
};
pub use structured::{extract_flat, normalize_value};
