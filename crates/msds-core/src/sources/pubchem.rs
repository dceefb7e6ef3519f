//! PubChem source plugin
//!
//! API docs: https://pubchem.ncbi.nlm.nih.gov/docs/pug-rest and
//! https://pubchem.ncbi.nlm.nih.gov/docs/pug-view
//! Two steps: name (or CAS synonym) to CID via PUG REST, then the full
//! annotation tree for that CID via PUG View.

use super::traits::{ChemicalSource, RawMatch, RawRecord, SourceError, SourceHandle, SourceMetadata};
use crate::config::PubChemConfig;
use crate::domain::{
    EcologicalProfile, NormalizedRecord, PhysicalProperties, SectionSet, SourceId, ToxicityProfile,
};
use crate::extract::{
    extract_document, HeadingScope, ECOLOGICAL_RULES, PHYSICAL_RULES, TOXICITY_RULES,
};
use crate::http::{HttpClient, HttpError, HttpResponse, Transport};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

pub const PHYSICAL_SCOPES: &[HeadingScope] = &[
    HeadingScope {
        heading: "Experimental Properties",
        collect_unmatched: true,
        exclude: &[],
    },
    HeadingScope {
        heading: "Computed Properties",
        collect_unmatched: false,
        exclude: &[],
    },
];

pub const TOXICITY_SCOPES: &[HeadingScope] = &[
    HeadingScope {
        heading: "Toxicity",
        collect_unmatched: true,
        exclude: &["Ecological Information"],
    },
    HeadingScope {
        heading: "GHS Classification",
        collect_unmatched: false,
        exclude: &[],
    },
];

pub const ECOLOGICAL_SCOPES: &[HeadingScope] = &[
    HeadingScope {
        heading: "Ecological Information",
        collect_unmatched: true,
        exclude: &[],
    },
    HeadingScope {
        heading: "GHS Classification",
        collect_unmatched: false,
        exclude: &[],
    },
];

const FAULT_NOT_FOUND: &str = "PUGREST.NotFound";
const FAULT_BAD_REQUEST: &str = "PUGREST.BadRequest";

#[derive(Debug, Deserialize)]
struct CidResponse {
    #[serde(rename = "IdentifierList")]
    identifier_list: Option<IdentifierList>,
    #[serde(rename = "Fault")]
    fault: Option<Fault>,
}

#[derive(Debug, Deserialize)]
struct IdentifierList {
    #[serde(rename = "CID", default)]
    cid: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

pub struct PubChemSource<T: Transport = HttpClient> {
    transport: T,
    config: PubChemConfig,
}

impl<T: Transport> PubChemSource<T> {
    pub fn new(transport: T, config: PubChemConfig) -> Self {
        Self { transport, config }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: SourceId::PubChem,
            name: "PubChem",
            description: "NIH open chemistry database with compound annotations",
            base_url: "https://pubchem.ncbi.nlm.nih.gov",
            requires_api_key: false,
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn lookup_cids(&self, term: &str) -> Result<Vec<RawMatch>, SourceError> {
        let url = format!(
            "{}/rest/pug/compound/name/{}/cids/JSON",
            self.base(),
            urlencoding::encode(term)
        );

        tracing::debug!(term, "PubChem CID lookup");
        let response = self
            .transport
            .get_with_params(&url, &[], self.config.search_timeout())
            .await?;

        if response.status == 404 {
            tracing::debug!(term, "PubChem: no CID (404)");
            return Ok(Vec::new());
        }

        match parse_cid_response(&response.body) {
            Ok(matches) if response.is_success() || matches.is_empty() => {
                Ok(with_query_name(matches, term))
            }
            Ok(_) => Err(status_error(response)),
            Err(e) if response.is_success() => Err(e),
            Err(_) => Err(status_error(response)),
        }
    }
}

fn status_error(response: HttpResponse) -> SourceError {
    HttpError::Status {
        status: response.status,
        body: response.body,
    }
    .into()
}

fn with_query_name(matches: Vec<RawMatch>, term: &str) -> Vec<RawMatch> {
    matches
        .into_iter()
        .map(|m| RawMatch {
            name: Some(term.to_string()),
            ..m
        })
        .collect()
}

/// Parse a PUG REST `cids/JSON` body.
///
/// A `NotFound` (or `BadRequest`, which PubChem returns for unparseable
/// names) fault is an empty list, not an error.
pub fn parse_cid_response(json: &str) -> Result<Vec<RawMatch>, SourceError> {
    let response: CidResponse = serde_json::from_str(json)
        .map_err(|e| SourceError::Malformed(format!("Invalid PubChem JSON: {}", e)))?;

    if let Some(fault) = response.fault {
        return match fault.code.as_str() {
            FAULT_NOT_FOUND | FAULT_BAD_REQUEST => {
                tracing::debug!(code = %fault.code, message = %fault.message, "PubChem: no CID");
                Ok(Vec::new())
            }
            _ => Err(SourceError::Transport(HttpError::RequestFailed {
                message: format!("PubChem fault {}: {}", fault.code, fault.message),
            })),
        };
    }

    let list = response
        .identifier_list
        .ok_or_else(|| SourceError::Malformed("missing IdentifierList".to_string()))?;

    Ok(list
        .cid
        .into_iter()
        .filter(|cid| *cid != 0)
        .map(|cid| RawMatch {
            id: cid.to_string(),
            ..Default::default()
        })
        .collect())
}

/// Parse a PUG View `data/compound/{cid}/JSON` body into its `Record` tree
pub fn parse_view_response(json: &str) -> Result<Value, SourceError> {
    let mut value: Value = serde_json::from_str(json)
        .map_err(|e| SourceError::Malformed(format!("Invalid PubChem JSON: {}", e)))?;

    if let Some(record) = value.get_mut("Record") {
        return Ok(record.take());
    }

    match value.pointer("/Fault/Code").and_then(Value::as_str) {
        Some(FAULT_NOT_FOUND) => Err(SourceError::NotFound),
        _ => Err(SourceError::Malformed("missing Record".to_string())),
    }
}

/// Normalize a PUG View record for the requested sections
pub fn extract_record(doc: &Value, sections: SectionSet) -> NormalizedRecord {
    let mut record = NormalizedRecord::default();

    if sections.physical {
        record.physical_properties =
            extract_document::<PhysicalProperties>(doc, PHYSICAL_SCOPES, PHYSICAL_RULES);
    }
    if sections.toxicity {
        record.toxicity = extract_document::<ToxicityProfile>(doc, TOXICITY_SCOPES, TOXICITY_RULES);
    }
    if sections.ecological {
        record.ecological =
            extract_document::<EcologicalProfile>(doc, ECOLOGICAL_SCOPES, ECOLOGICAL_RULES);
    }

    record
}

#[async_trait]
impl<T: Transport> ChemicalSource for PubChemSource<T> {
    fn id(&self) -> SourceId {
        SourceId::PubChem
    }

    fn metadata(&self) -> SourceMetadata {
        Self::metadata()
    }

    // CAS numbers are indexed as synonyms, so both go through the name lookup
    async fn search_by_cas(&self, cas: &str) -> Result<Vec<RawMatch>, SourceError> {
        let matches = self.lookup_cids(cas).await?;
        Ok(matches
            .into_iter()
            .map(|m| RawMatch {
                cas_no: Some(cas.to_string()),
                name: None,
                ..m
            })
            .collect())
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<RawMatch>, SourceError> {
        self.lookup_cids(name).await
    }

    async fn fetch_detail(
        &self,
        handle: &SourceHandle,
        _sections: SectionSet,
    ) -> Result<RawRecord, SourceError> {
        let url = format!(
            "{}/rest/pug_view/data/compound/{}/JSON",
            self.base(),
            urlencoding::encode(&handle.id)
        );

        tracing::debug!(cid = %handle.id, "PubChem PUG View fetch");
        let response = self
            .transport
            .get_with_params(&url, &[], self.config.detail_timeout())
            .await?;

        if response.status == 404 {
            return Err(SourceError::NotFound);
        }
        if !response.is_success() {
            return Err(status_error(response));
        }

        Ok(RawRecord::Document(parse_view_response(&response.body)?))
    }

    fn extract(&self, raw: &RawRecord, sections: SectionSet) -> NormalizedRecord {
        match raw {
            RawRecord::Document(doc) => extract_record(doc, sections),
            RawRecord::Flat(_) => {
                tracing::warn!("PubChem extractor received a flat record; ignoring");
                NormalizedRecord::default()
            }
        }
    }
}
