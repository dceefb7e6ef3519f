//! KOSHA source plugin (Korea Occupational Safety and Health Agency MSDS)
//!
//! API: https://msds.kosha.or.kr/openapi/service/msdschem
//! Requires a service key. Searches go to `chemlist`; detail is split by
//! MSDS section (`chemdetail09`, `chemdetail11`, `chemdetail12`), each
//! returning `<item>` rows of item code and text.

use super::traits::{ChemicalSource, RawMatch, RawRecord, SourceError, SourceHandle, SourceMetadata};
use crate::config::KoshaConfig;
use crate::domain::{
    EcologicalField, EcologicalProfile, NormalizedRecord, PhysicalField, PhysicalProperties,
    Section, SectionSet, SourceId, ToxicityField, ToxicityProfile,
};
use crate::extract::{extract_flat, normalize_value};
use crate::http::{HttpClient, HttpError, HttpResponse, Transport};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// Item codes of `chemdetail09` (physical and chemical properties)
pub const PHYSICAL_ITEMS: &[(&str, PhysicalField)] = &[
    ("I0901", PhysicalField::Appearance),
    ("I0902", PhysicalField::Odor),
    ("I0904", PhysicalField::Ph),
    ("I0905", PhysicalField::MeltingPoint),
    ("I0906", PhysicalField::BoilingPoint),
    ("I0907", PhysicalField::FlashPoint),
    ("I0910", PhysicalField::VaporPressure),
    ("I0912", PhysicalField::Solubility),
    ("I0914", PhysicalField::SpecificGravity),
    ("I0915", PhysicalField::PartitionCoefficient),
    ("I0916", PhysicalField::AutoignitionTemperature),
    ("I0917", PhysicalField::DecompositionTemperature),
    ("I0918", PhysicalField::Viscosity),
    ("I0919", PhysicalField::MolecularWeight),
];

/// Item codes of `chemdetail11` (toxicological information)
pub const TOXICITY_ITEMS: &[(&str, ToxicityField)] = &[
    ("I1101", ToxicityField::AcuteOral),
    ("I1102", ToxicityField::AcuteDermal),
    ("I1103", ToxicityField::AcuteInhalation),
    ("I1104", ToxicityField::SkinIrritation),
    ("I1105", ToxicityField::EyeIrritation),
    ("I1106", ToxicityField::RespiratorySensitization),
    ("I1107", ToxicityField::SkinSensitization),
    ("I1108", ToxicityField::Carcinogenicity),
    ("I1109", ToxicityField::Mutagenicity),
    ("I1110", ToxicityField::ReproductiveToxicity),
    ("I1111", ToxicityField::StotSingleExposure),
    ("I1112", ToxicityField::StotRepeatedExposure),
    ("I1113", ToxicityField::AspirationHazard),
];

/// Free-text "other information" row of `chemdetail11`
pub const TOXICITY_OTHER_ITEM: &str = "I1114";

/// Item codes of `chemdetail12` (ecological information)
pub const ECOLOGICAL_ITEMS: &[(&str, EcologicalField)] = &[
    ("I1201", EcologicalField::Fish),
    ("I1202", EcologicalField::Crustacean),
    ("I1203", EcologicalField::Algae),
    ("I1204", EcologicalField::PersistenceDegradability),
    ("I1205", EcologicalField::Bioaccumulation),
    ("I1206", EcologicalField::SoilMobility),
    ("I1207", EcologicalField::OzoneDepletion),
];

/// Free-text "other adverse effects" row of `chemdetail12`
pub const ECOLOGICAL_OTHER_ITEM: &str = "I1208";

const RESULT_OK: &str = "00";

fn detail_operation(section: Section) -> &'static str {
    match section {
        Section::Physical => "chemdetail09",
        Section::Toxicity => "chemdetail11",
        Section::Ecological => "chemdetail12",
    }
}

/// Parsed XML envelope shared by every KOSHA operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KoshaEnvelope {
    pub result_code: Option<String>,
    pub result_msg: Option<String>,
    /// Set when the gateway rejected the request (bad or unregistered key)
    pub service_error: Option<String>,
    /// Child element text of every `<item>`, in document order
    pub items: Vec<BTreeMap<String, String>>,
}

impl KoshaEnvelope {
    /// Why the backend refused to answer, if it did
    pub fn rejection(&self) -> Option<String> {
        if let Some(err) = &self.service_error {
            return Some(err.clone());
        }
        match self.result_code.as_deref() {
            Some(RESULT_OK) | None => None,
            Some(code) => Some(format!(
                "result code {}: {}",
                code,
                self.result_msg.as_deref().unwrap_or("")
            )),
        }
    }
}

pub struct KoshaSource<T: Transport = HttpClient> {
    transport: T,
    config: KoshaConfig,
}

impl<T: Transport> KoshaSource<T> {
    pub fn new(transport: T, config: KoshaConfig) -> Self {
        Self { transport, config }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: SourceId::Kosha,
            name: "KOSHA MSDS",
            description: "Korean national MSDS database of the Occupational Safety and Health Agency",
            base_url: "https://msds.kosha.or.kr",
            requires_api_key: true,
        }
    }

    fn service_key(&self) -> Result<&str, SourceError> {
        self.config
            .service_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(SourceError::NotConfigured(SourceId::Kosha))
    }

    fn url(&self, operation: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), operation)
    }

    /// `searchCnd`: 0 searches by name, 1 by CAS number
    async fn search(&self, term: &str, search_cnd: &str) -> Result<Vec<RawMatch>, SourceError> {
        let key = self.service_key()?;
        let page_size = self.config.page_size.to_string();
        let params = [
            ("serviceKey", key),
            ("searchWrd", term),
            ("searchCnd", search_cnd),
            ("numOfRows", page_size.as_str()),
            ("pageNo", "1"),
        ];

        tracing::debug!(term, search_cnd, "KOSHA chemlist search");
        let response = self
            .transport
            .get_with_params(&self.url("chemlist"), &params, self.config.search_timeout())
            .await?;

        parse_search_response(response)
    }

    async fn fetch_section(
        &self,
        key: &str,
        chem_id: &str,
        section: Section,
    ) -> Result<BTreeMap<String, String>, SourceError> {
        let operation = detail_operation(section);
        let params = [("serviceKey", key), ("chemId", chem_id)];

        tracing::debug!(chem_id, operation, "KOSHA detail fetch");
        let response = self
            .transport
            .get_with_params(&self.url(operation), &params, self.config.detail_timeout())
            .await?;

        parse_detail_response(response, operation)
    }
}

/// Interpret a `chemlist` response as candidates. A refused request has none.
pub fn parse_search_response(response: HttpResponse) -> Result<Vec<RawMatch>, SourceError> {
    Ok(accept_envelope(response, "chemlist")?
        .map(|envelope| matches_from_envelope(&envelope))
        .unwrap_or_default())
}

fn matches_from_envelope(envelope: &KoshaEnvelope) -> Vec<RawMatch> {
    envelope
        .items
        .iter()
        .filter_map(|item| {
            let id = item.get("chemId")?.trim();
            if id.is_empty() {
                return None;
            }
            Some(RawMatch {
                id: id.to_string(),
                cas_no: item.get("casNo").map(|s| s.trim().to_string()),
                name: item
                    .get("chemNameKor")
                    .or_else(|| item.get("chemNameEng"))
                    .map(|s| s.trim().to_string()),
            })
        })
        .collect()
}

/// Interpret a `chemdetailNN` response as `(item code, text)` pairs
pub fn parse_detail_response(
    response: HttpResponse,
    operation: &str,
) -> Result<BTreeMap<String, String>, SourceError> {
    Ok(accept_envelope(response, operation)?
        .map(|envelope| rows_from_envelope(&envelope))
        .unwrap_or_default())
}

fn rows_from_envelope(envelope: &KoshaEnvelope) -> BTreeMap<String, String> {
    envelope
        .items
        .iter()
        .filter_map(|item| {
            let code = item.get("msdsItemCode")?.trim().to_string();
            let detail = item.get("itemDetail").cloned().unwrap_or_default();
            Some((code, detail))
        })
        .collect()
}

/// Normalize a flat KOSHA record for the requested sections
pub fn extract_record(rows: &BTreeMap<String, String>, sections: SectionSet) -> NormalizedRecord {
    let mut record = NormalizedRecord::default();

    if sections.physical {
        record.physical_properties = extract_flat::<PhysicalProperties>(rows, PHYSICAL_ITEMS);
    }
    if sections.toxicity {
        let mut toxicity = extract_flat::<ToxicityProfile>(rows, TOXICITY_ITEMS);
        toxicity.other_info = free_text_rows(rows, TOXICITY_OTHER_ITEM);
        record.toxicity = toxicity;
    }
    if sections.ecological {
        let mut ecological = extract_flat::<EcologicalProfile>(rows, ECOLOGICAL_ITEMS);
        ecological.other_effects = free_text_rows(rows, ECOLOGICAL_OTHER_ITEM);
        record.ecological = ecological;
    }

    record
}

/// A free-text row as a list, one entry per non-blank line
fn free_text_rows(rows: &BTreeMap<String, String>, code: &str) -> Vec<String> {
    rows.get(code)
        .map(|text| {
            text.lines()
                .map(normalize_value)
                .filter(|line| !line.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Turn an HTTP response into an envelope the caller should use.
///
/// `Ok(None)` means the backend answered but refused (authorization or
/// service error); that is logged and treated as "no data".
fn accept_envelope(
    response: HttpResponse,
    operation: &str,
) -> Result<Option<KoshaEnvelope>, SourceError> {
    let parsed = parse_envelope(&response.body);

    if !response.is_success() {
        return match parsed {
            Ok(envelope) if envelope.rejection().is_some() => {
                tracing::warn!(
                    operation,
                    status = response.status,
                    reason = ?envelope.rejection(),
                    "KOSHA request refused"
                );
                Ok(None)
            }
            _ => Err(HttpError::Status {
                status: response.status,
                body: response.body,
            }
            .into()),
        };
    }

    let envelope = parsed?;
    if let Some(reason) = envelope.rejection() {
        tracing::warn!(operation, reason = %reason, "KOSHA request refused");
        return Ok(None);
    }
    Ok(Some(envelope))
}

/// Parse any KOSHA XML body.
///
/// Accepts the normal `<response>` envelope and the gateway's
/// `<OpenAPI_ServiceResponse>` error envelope; anything else is malformed.
pub fn parse_envelope(xml: &str) -> Result<KoshaEnvelope, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut envelope = KoshaEnvelope::default();
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut root: Option<String> = None;
    let mut current_item: Option<BTreeMap<String, String>> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if path.is_empty() {
                    check_root(&name, &mut root)?;
                }
                if name == "item" {
                    current_item = Some(BTreeMap::new());
                }
                path.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                if path.is_empty() {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    check_root(&name, &mut root)?;
                }
            }
            Ok(Event::End(_)) => {
                if path.pop().as_deref() == Some("item") {
                    if let Some(item) = current_item.take() {
                        envelope.items.push(item);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| SourceError::Malformed(format!("XML text error: {}", err)))?
                    .into_owned();
                record_text(&path, text, &mut current_item, &mut envelope);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).trim().to_string();
                record_text(&path, text, &mut current_item, &mut envelope);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SourceError::Malformed(format!(
                    "XML parse error at {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if root.is_none() {
        return Err(SourceError::Malformed("no XML root element".to_string()));
    }
    if !path.is_empty() {
        return Err(SourceError::Malformed(format!(
            "document ended inside <{}>",
            path.join("/")
        )));
    }

    Ok(envelope)
}

fn check_root(name: &str, root: &mut Option<String>) -> Result<(), SourceError> {
    match name {
        "response" | "OpenAPI_ServiceResponse" if root.is_none() => {
            *root = Some(name.to_string());
            Ok(())
        }
        _ => Err(SourceError::Malformed(format!(
            "unexpected root element <{}>",
            name
        ))),
    }
}

fn record_text(
    path: &[String],
    text: String,
    current_item: &mut Option<BTreeMap<String, String>>,
    envelope: &mut KoshaEnvelope,
) {
    let Some(leaf) = path.last() else {
        return;
    };

    if let Some(item) = current_item.as_mut() {
        if leaf != "item" {
            item.entry(leaf.clone())
                .and_modify(|existing| {
                    existing.push('\n');
                    existing.push_str(&text);
                })
                .or_insert(text);
        }
        return;
    }

    match leaf.as_str() {
        "resultCode" => envelope.result_code = Some(text),
        "resultMsg" => envelope.result_msg = Some(text),
        "returnAuthMsg" | "errMsg" if envelope.service_error.is_none() => {
            envelope.service_error = Some(text)
        }
        _ => {}
    }
}

#[async_trait]
impl<T: Transport> ChemicalSource for KoshaSource<T> {
    fn id(&self) -> SourceId {
        SourceId::Kosha
    }

    fn metadata(&self) -> SourceMetadata {
        Self::metadata()
    }

    fn is_enabled(&self) -> bool {
        self.config.has_service_key()
    }

    async fn search_by_cas(&self, cas: &str) -> Result<Vec<RawMatch>, SourceError> {
        self.search(cas, "1").await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<RawMatch>, SourceError> {
        self.search(name, "0").await
    }

    async fn fetch_detail(
        &self,
        handle: &SourceHandle,
        sections: SectionSet,
    ) -> Result<RawRecord, SourceError> {
        let key = self.service_key()?;
        let mut rows = BTreeMap::new();
        let mut fetched = 0;
        let mut last_error = None;

        // Sections are separate calls; one failing must not discard the others
        for section in sections.iter() {
            match self.fetch_section(key, &handle.id, section).await {
                Ok(section_rows) => {
                    fetched += 1;
                    rows.extend(section_rows);
                }
                Err(e) => {
                    tracing::warn!(
                        chem_id = %handle.id,
                        operation = detail_operation(section),
                        error = %e,
                        "KOSHA section fetch failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if fetched == 0 => Err(e),
            _ => Ok(RawRecord::Flat(rows)),
        }
    }

    fn extract(&self, raw: &RawRecord, sections: SectionSet) -> NormalizedRecord {
        match raw {
            RawRecord::Flat(rows) => extract_record(rows, sections),
            RawRecord::Document(_) => {
                tracing::warn!("KOSHA extractor received a document record; ignoring");
                NormalizedRecord::default()
            }
        }
    }
}
