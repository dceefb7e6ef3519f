//! Query outcome and provenance types

use super::record::NormalizedRecord;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Backends this crate knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    /// KOSHA MSDS open API (credentialed, XML)
    Kosha,
    /// PubChem PUG REST / PUG View (public, JSON)
    PubChem,
}

impl SourceId {
    pub fn name(&self) -> &'static str {
        match self {
            SourceId::Kosha => "KOSHA",
            SourceId::PubChem => "PubChem",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kosha" => Ok(SourceId::Kosha),
            "pubchem" => Ok(SourceId::PubChem),
            other => Err(format!("unknown source: {}", other)),
        }
    }
}

/// Which backend(s) contributed to a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provenance {
    #[default]
    None,
    Single(SourceId),
    /// Secondary filled at least one gap left by primary
    Merged { primary: SourceId, secondary: SourceId },
}

impl Provenance {
    pub fn contains(&self, source: SourceId) -> bool {
        match self {
            Provenance::None => false,
            Provenance::Single(s) => *s == source,
            Provenance::Merged { primary, secondary } => *primary == source || *secondary == source,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Provenance::None => String::new(),
            Provenance::Single(s) => s.name().to_string(),
            Provenance::Merged { primary, secondary } => {
                format!("{}+{}", primary.name(), secondary.name())
            }
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Provenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// Result of one lookup, for the full record or a single section.
///
/// `success == true` always comes with `record: Some(_)`; use the
/// constructors rather than building the struct by hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult<T = NormalizedRecord> {
    pub success: bool,
    pub source: Provenance,
    pub record: Option<T>,
    pub error: Option<String>,
}

impl<T> QueryResult<T> {
    pub fn found(record: T, source: Provenance) -> Self {
        Self {
            success: true,
            source,
            record: Some(record),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            source: Provenance::None,
            record: None,
            error: Some(error.into()),
        }
    }

    /// Narrow the record, keeping success and provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResult<U> {
        QueryResult {
            success: self.success,
            source: self.source,
            record: self.record.map(f),
            error: self.error,
        }
    }
}
