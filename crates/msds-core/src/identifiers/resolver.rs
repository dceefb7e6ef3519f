//! Identifier resolution across sources
//!
//! Maps a CAS number or chemical name to the record handle a given source
//! uses internally (KOSHA chemId, PubChem CID).

use super::ChemicalIdentifier;
use crate::sources::{ChemicalSource, RawMatch, SourceError, SourceHandle};

/// Resolve `identifier` against one source.
///
/// `Ok(None)` means the backend confirmed zero matches. Errors are transport,
/// parse or configuration problems; the caller treats them as "source
/// unavailable for this query".
pub async fn resolve(
    identifier: &ChemicalIdentifier,
    source: &dyn ChemicalSource,
) -> Result<Option<SourceHandle>, SourceError> {
    if !source.is_enabled() {
        return Err(SourceError::NotConfigured(source.id()));
    }

    let matches = match identifier {
        ChemicalIdentifier::Cas(cas) => source.search_by_cas(cas).await?,
        ChemicalIdentifier::Name(name) => source.search_by_name(name).await?,
    };

    if matches.len() > 1 {
        tracing::debug!(
            source = %source.id(),
            identifier = %identifier,
            candidates = matches.len(),
            "multiple candidates; taking the first"
        );
    }

    Ok(select_candidate(identifier, &matches).map(|m| SourceHandle {
        source: source.id(),
        id: m.id.clone(),
    }))
}

/// Pick the candidate to use from a backend's match list.
///
/// For CAS lookups an exact `cas_no` match wins; otherwise the first
/// candidate in backend order is taken.
pub fn select_candidate<'a>(
    identifier: &ChemicalIdentifier,
    matches: &'a [RawMatch],
) -> Option<&'a RawMatch> {
    if let ChemicalIdentifier::Cas(cas) = identifier {
        if let Some(exact) = matches
            .iter()
            .find(|m| m.cas_no.as_deref().map(str::trim) == Some(cas.as_str()))
        {
            return Some(exact);
        }
    }
    matches.first()
}
