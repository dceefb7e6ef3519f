//! Chemical identifiers and their resolution to per-source handles

pub mod resolver;
pub mod validators;

pub use resolver::*;
pub use validators::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("invalid CAS number: {0}")]
    InvalidCas(String),
    #[error("empty chemical name")]
    EmptyName,
    #[error("unknown identifier kind: {0} (expected \"cas\" or \"name\")")]
    UnknownKind(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Cas,
    Name,
}

impl std::str::FromStr for IdentifierKind {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cas" => Ok(IdentifierKind::Cas),
            "name" => Ok(IdentifierKind::Name),
            other => Err(IdentifierError::UnknownKind(other.to_string())),
        }
    }
}

/// A caller-supplied chemical identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChemicalIdentifier {
    Cas(String),
    Name(String),
}

impl ChemicalIdentifier {
    /// Build an identifier of the given kind.
    ///
    /// CAS numbers must match `\d{2,7}-\d{2}-\d`; a failing check digit is
    /// logged but accepted, since upstream registries occasionally carry
    /// numbers that do not verify.
    pub fn parse(value: &str, kind: IdentifierKind) -> Result<Self, IdentifierError> {
        match kind {
            IdentifierKind::Cas => {
                let cas = normalize_cas(value);
                if !is_cas_format(&cas) {
                    return Err(IdentifierError::InvalidCas(value.trim().to_string()));
                }
                if !is_valid_cas_checksum(&cas) {
                    tracing::warn!(cas = %cas, "CAS check digit does not verify");
                }
                Ok(ChemicalIdentifier::Cas(cas))
            }
            IdentifierKind::Name => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(IdentifierError::EmptyName);
                }
                Ok(ChemicalIdentifier::Name(name.to_string()))
            }
        }
    }

    pub fn cas(value: &str) -> Result<Self, IdentifierError> {
        Self::parse(value, IdentifierKind::Cas)
    }

    pub fn name(value: &str) -> Result<Self, IdentifierError> {
        Self::parse(value, IdentifierKind::Name)
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            ChemicalIdentifier::Cas(_) => IdentifierKind::Cas,
            ChemicalIdentifier::Name(_) => IdentifierKind::Name,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ChemicalIdentifier::Cas(v) | ChemicalIdentifier::Name(v) => v,
        }
    }
}

impl fmt::Display for ChemicalIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cas() {
        let id = ChemicalIdentifier::cas(" 71-43-2 ").unwrap();
        assert_eq!(id, ChemicalIdentifier::Cas("71-43-2".to_string()));
        assert_eq!(id.kind(), IdentifierKind::Cas);
        assert_eq!(id.to_string(), "71-43-2");
    }

    #[test]
    fn test_bad_check_digit_is_accepted() {
        assert!(ChemicalIdentifier::cas("71-43-3").is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed_cas() {
        assert_eq!(
            ChemicalIdentifier::cas("benzene"),
            Err(IdentifierError::InvalidCas("benzene".to_string()))
        );
    }

    #[test]
    fn test_parse_name() {
        let id = ChemicalIdentifier::name("  Benzene ").unwrap();
        assert_eq!(id.value(), "Benzene");
        assert_eq!(ChemicalIdentifier::name("   "), Err(IdentifierError::EmptyName));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("CAS".parse::<IdentifierKind>(), Ok(IdentifierKind::Cas));
        assert_eq!("name".parse::<IdentifierKind>(), Ok(IdentifierKind::Name));
        assert!("smiles".parse::<IdentifierKind>().is_err());
    }
}
