//! Query orchestration
//!
//! One query walks `NotStarted -> ResolvingPrimary -> ResolvingSecondary ->
//! Merging -> Done`. Each adapter gets exactly one attempt; its failures are
//! logged and treated as "no data" so the other source can still answer.

use crate::cache::{CacheKey, ResultCache};
use crate::config::ServiceConfig;
use crate::domain::{
    EcologicalProfile, NormalizedRecord, PhysicalProperties, Provenance, QueryResult, Section,
    SectionSet, SourceId, ToxicityProfile,
};
use crate::http::{HttpClient, HttpError};
use crate::identifiers::{resolve, ChemicalIdentifier, IdentifierError, IdentifierKind};
use crate::merge::merge_with_report;
use crate::sources::{ChemicalSource, KoshaSource, PubChemSource, SourceError};

#[derive(Debug)]
enum QueryState {
    NotStarted,
    ResolvingPrimary,
    ResolvingSecondary {
        primary: Option<NormalizedRecord>,
    },
    Merging {
        primary: Option<NormalizedRecord>,
        secondary: Option<NormalizedRecord>,
    },
    Done(QueryResult),
}

impl QueryState {
    fn name(&self) -> &'static str {
        match self {
            QueryState::NotStarted => "not_started",
            QueryState::ResolvingPrimary => "resolving_primary",
            QueryState::ResolvingSecondary { .. } => "resolving_secondary",
            QueryState::Merging { .. } => "merging",
            QueryState::Done(_) => "done",
        }
    }
}

/// Resolves identifiers against a primary and a secondary source and merges
/// what they return.
pub struct ChemicalDataService {
    primary: Box<dyn ChemicalSource>,
    secondary: Box<dyn ChemicalSource>,
}

impl ChemicalDataService {
    pub fn new(primary: Box<dyn ChemicalSource>, secondary: Box<dyn ChemicalSource>) -> Self {
        Self { primary, secondary }
    }

    /// Build the KOSHA and PubChem adapters over one shared HTTP client,
    /// ordered by `config.primary`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, HttpError> {
        let client = HttpClient::new(&config.user_agent)?;
        let kosha: Box<dyn ChemicalSource> =
            Box::new(KoshaSource::new(client.clone(), config.kosha.clone()));
        let pubchem: Box<dyn ChemicalSource> =
            Box::new(PubChemSource::new(client, config.pubchem.clone()));

        Ok(match config.primary {
            SourceId::Kosha => Self::new(kosha, pubchem),
            SourceId::PubChem => Self::new(pubchem, kosha),
        })
    }

    /// Full record lookup for a raw identifier string
    pub async fn fetch(&self, identifier: &str, kind: IdentifierKind) -> QueryResult {
        self.fetch_sections(identifier, kind, SectionSet::ALL).await
    }

    pub async fn fetch_physical_properties(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> QueryResult<PhysicalProperties> {
        self.fetch_sections(identifier, kind, SectionSet::only(Section::Physical))
            .await
            .map(|record| record.physical_properties)
    }

    pub async fn fetch_toxicity(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> QueryResult<ToxicityProfile> {
        self.fetch_sections(identifier, kind, SectionSet::only(Section::Toxicity))
            .await
            .map(|record| record.toxicity)
    }

    pub async fn fetch_ecological(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> QueryResult<EcologicalProfile> {
        self.fetch_sections(identifier, kind, SectionSet::only(Section::Ecological))
            .await
            .map(|record| record.ecological)
    }

    /// Like [`fetch`](Self::fetch), answering from `cache` when possible.
    /// Only successful results are stored.
    pub async fn fetch_cached<C: ResultCache + ?Sized>(
        &self,
        cache: &mut C,
        identifier: &str,
        kind: IdentifierKind,
    ) -> QueryResult {
        let identifier = match ChemicalIdentifier::parse(identifier, kind) {
            Ok(id) => id,
            Err(e) => return rejected(e),
        };

        let key = CacheKey::new(identifier, SectionSet::ALL);
        if let Some(hit) = cache.get(&key) {
            tracing::debug!(identifier = %key.identifier, "cache hit");
            return hit;
        }

        let result = self.fetch_identifier(&key.identifier, key.sections).await;
        if result.success {
            cache.put(key, result.clone());
        }
        result
    }

    pub async fn fetch_sections(
        &self,
        identifier: &str,
        kind: IdentifierKind,
        sections: SectionSet,
    ) -> QueryResult {
        match ChemicalIdentifier::parse(identifier, kind) {
            Ok(id) => self.fetch_identifier(&id, sections).await,
            Err(e) => rejected(e),
        }
    }

    /// Run the query state machine for an already validated identifier.
    pub async fn fetch_identifier(
        &self,
        identifier: &ChemicalIdentifier,
        sections: SectionSet,
    ) -> QueryResult {
        let mut state = QueryState::NotStarted;

        loop {
            state = match state {
                QueryState::NotStarted => QueryState::ResolvingPrimary,
                QueryState::ResolvingPrimary => QueryState::ResolvingSecondary {
                    primary: lookup(self.primary.as_ref(), identifier, sections).await,
                },
                QueryState::ResolvingSecondary { primary } => QueryState::Merging {
                    primary,
                    secondary: lookup(self.secondary.as_ref(), identifier, sections).await,
                },
                QueryState::Merging { primary, secondary } => {
                    QueryState::Done(self.combine(identifier, primary, secondary))
                }
                QueryState::Done(result) => return result,
            };
            tracing::debug!(identifier = %identifier, state = state.name(), "query state");
        }
    }

    fn combine(
        &self,
        identifier: &ChemicalIdentifier,
        primary: Option<NormalizedRecord>,
        secondary: Option<NormalizedRecord>,
    ) -> QueryResult {
        let (primary_id, secondary_id) = (self.primary.id(), self.secondary.id());

        match (primary, secondary) {
            (Some(p), Some(s)) => {
                let report = merge_with_report(&p, &s);
                tracing::debug!(
                    filled = report.fields_from_secondary.len(),
                    "merged {} into {}",
                    secondary_id,
                    primary_id
                );
                let source = report.provenance(primary_id, secondary_id);
                QueryResult::found(report.merged, source)
            }
            (Some(p), None) => QueryResult::found(p, Provenance::Single(primary_id)),
            (None, Some(s)) => QueryResult::found(s, Provenance::Single(secondary_id)),
            (None, None) => {
                tracing::info!(identifier = %identifier, "no source returned data");
                QueryResult::failed(format!("not found: {}", identifier))
            }
        }
    }
}

fn rejected(error: IdentifierError) -> QueryResult {
    tracing::warn!(error = %error, "rejected identifier");
    QueryResult::failed(error.to_string())
}

/// Resolve, fetch and extract from one source. `None` covers every way the
/// source can fail to contribute.
async fn lookup(
    source: &dyn ChemicalSource,
    identifier: &ChemicalIdentifier,
    sections: SectionSet,
) -> Option<NormalizedRecord> {
    let id = source.id();

    let handle = match resolve(identifier, source).await {
        Ok(Some(handle)) => handle,
        Ok(None) => {
            tracing::debug!(source = %id, identifier = %identifier, "no match");
            return None;
        }
        Err(SourceError::NotConfigured(_)) => {
            tracing::info!(source = %id, "source not configured; skipping");
            return None;
        }
        Err(e) => {
            tracing::warn!(source = %id, identifier = %identifier, error = %e, "search failed");
            return None;
        }
    };

    let raw = match source.fetch_detail(&handle, sections).await {
        Ok(raw) => raw,
        Err(SourceError::NotFound) => {
            tracing::debug!(source = %id, record = %handle.id, "detail not found");
            return None;
        }
        Err(e) => {
            tracing::warn!(source = %id, record = %handle.id, error = %e, "detail fetch failed");
            return None;
        }
    };

    let record = source.extract(&raw, sections);
    if record.is_empty_in(sections) {
        tracing::debug!(source = %id, record = %handle.id, "record has no usable fields");
        return None;
    }

    Some(record)
}
