//! Common traits for source plugins

use crate::domain::{NormalizedRecord, SectionSet, SourceId};
use crate::http::HttpError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Credential missing; the adapter is disabled
    #[error("{0} is not configured")]
    NotConfigured(SourceId),
    /// Backend confirmed there is no such record
    #[error("not found")]
    NotFound,
    #[error("transport failure: {0}")]
    Transport(#[from] HttpError),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Metadata about a source
pub struct SourceMetadata {
    pub id: SourceId,
    pub name: &'static str,
    pub description: &'static str,
    pub base_url: &'static str,
    pub requires_api_key: bool,
}

/// One search candidate, in backend order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawMatch {
    /// Backend record id (KOSHA chemId, PubChem CID)
    pub id: String,
    pub cas_no: Option<String>,
    pub name: Option<String>,
}

/// Per-source record handle, resolved once per query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceHandle {
    pub source: SourceId,
    pub id: String,
}

/// Backend-native detail record
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Flat key/value pairs (item code to text)
    Flat(BTreeMap<String, String>),
    /// Nested document tree
    Document(serde_json::Value),
}

/// A backend that can be searched by CAS number or name and return detail.
///
/// Implementations never panic and never retry; every failure comes back as
/// a `SourceError` for the caller to log and absorb.
#[async_trait]
pub trait ChemicalSource: Send + Sync {
    fn id(&self) -> SourceId;

    fn metadata(&self) -> SourceMetadata;

    /// False when a required credential is missing.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn search_by_cas(&self, cas: &str) -> Result<Vec<RawMatch>, SourceError>;

    async fn search_by_name(&self, name: &str) -> Result<Vec<RawMatch>, SourceError>;

    async fn fetch_detail(
        &self,
        handle: &SourceHandle,
        sections: SectionSet,
    ) -> Result<RawRecord, SourceError>;

    /// Convert a native record into the normalized schema. Sections outside
    /// `sections` are left empty.
    fn extract(&self, raw: &RawRecord, sections: SectionSet) -> NormalizedRecord;
}
