//! End-to-end lookups against recorded KOSHA and PubChem responses

mod common;

use common::transport::CannedTransport;
use msds_core::sources::SourceHandle;
use msds_core::{
    ChemicalDataService, ChemicalSource, HttpError, IdentifierKind, KoshaConfig, KoshaSource,
    Provenance, PubChemConfig, PubChemSource, ResultCache, SectionSet, SessionCache, SourceError,
    SourceId,
};
use std::sync::Arc;

const CHEMLIST: &str = "/chemlist";
const DETAIL_PHYSICAL: &str = "/chemdetail09";
const DETAIL_TOXICITY: &str = "/chemdetail11";
const DETAIL_ECOLOGICAL: &str = "/chemdetail12";
const PUBCHEM_CIDS: &str = "/cids/JSON";
const PUBCHEM_VIEW: &str = "/pug_view/data/compound/241/JSON";

fn kosha_config(key: Option<&str>) -> KoshaConfig {
    KoshaConfig {
        service_key: key.map(String::from),
        ..Default::default()
    }
}

fn build_service(
    transport: &Arc<CannedTransport>,
    kosha_key: Option<&str>,
) -> ChemicalDataService {
    ChemicalDataService::new(
        Box::new(KoshaSource::new(transport.clone(), kosha_config(kosha_key))),
        Box::new(PubChemSource::new(transport.clone(), PubChemConfig::default())),
    )
}

fn pubchem_benzene(transport: CannedTransport) -> CannedTransport {
    transport
        .fixture(PUBCHEM_CIDS, "pubchem_benzene_cids.json")
        .fixture(PUBCHEM_VIEW, "pubchem_benzene_view.json")
}

fn kosha_benzene(transport: CannedTransport) -> CannedTransport {
    transport
        .fixture(CHEMLIST, "kosha_chemlist_benzene.xml")
        .fixture(DETAIL_PHYSICAL, "kosha_detail09_benzene.xml")
        .fixture(DETAIL_TOXICITY, "kosha_detail11_no_data.xml")
        .fixture(DETAIL_ECOLOGICAL, "kosha_detail12_benzene.xml")
}

#[tokio::test]
async fn test_kosha_unconfigured_falls_back_to_pubchem() {
    let transport = pubchem_benzene(CannedTransport::new()).shared();
    let service = build_service(&transport, None);

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;

    assert!(result.success);
    assert_eq!(result.source, Provenance::Single(SourceId::PubChem));
    let record = result.record.unwrap();
    assert_eq!(record.physical_properties.molecular_weight, "78.11 g/mol");
    assert_eq!(record.physical_properties.melting_point, "");
    assert_eq!(transport.request_count(CHEMLIST), 0);
}

#[tokio::test]
async fn test_both_sources_merge_with_primary_priority() {
    let transport = pubchem_benzene(kosha_benzene(CannedTransport::new())).shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;

    assert!(result.success);
    assert_eq!(
        result.source,
        Provenance::Merged {
            primary: SourceId::Kosha,
            secondary: SourceId::PubChem
        }
    );
    assert_eq!(result.source.label(), "KOSHA+PubChem");

    let record = result.record.unwrap();
    let physical = &record.physical_properties;
    assert_eq!(physical.melting_point, "5.5 ℃");
    assert_eq!(physical.boiling_point, "80.1 ℃");
    assert_eq!(physical.molecular_weight, "78.11 g/mol");
    assert_eq!(physical.vapor_pressure, "94.8 mm Hg at 25 °C");
    assert_eq!(physical.ph, "");

    assert_eq!(record.toxicity.acute_toxicity.oral, "930 mg/kg");
    assert_eq!(record.toxicity.acute_toxicity.inhalation, "10000 ppm/7 hr");

    assert_eq!(
        record.ecological.aquatic_toxicity.fish,
        "LC50 5.3 mg/ℓ 96 hr Oncorhynchus mykiss"
    );
    assert_eq!(
        record.ecological.persistence_degradability,
        "Benzene is readily degraded by aerobic microorganisms in water."
    );
}

#[tokio::test]
async fn test_malformed_kosha_xml_uses_pubchem_only() {
    let transport = pubchem_benzene(CannedTransport::new().fixture(CHEMLIST, "kosha_malformed.xml"))
        .shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;

    assert!(result.success);
    assert_eq!(result.source, Provenance::Single(SourceId::PubChem));
    assert_eq!(transport.request_count(DETAIL_PHYSICAL), 0);
}

#[tokio::test]
async fn test_kosha_auth_error_uses_pubchem_only() {
    let transport =
        pubchem_benzene(CannedTransport::new().fixture(CHEMLIST, "kosha_auth_error.xml")).shared();
    let service = build_service(&transport, Some("unregistered"));

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;
    assert_eq!(result.source, Provenance::Single(SourceId::PubChem));
}

#[tokio::test]
async fn test_kosha_timeout_uses_pubchem_only() {
    let transport =
        pubchem_benzene(CannedTransport::new().fail(CHEMLIST, HttpError::Timeout)).shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;
    assert_eq!(result.source, Provenance::Single(SourceId::PubChem));
}

#[tokio::test]
async fn test_no_matches_anywhere_is_failure() {
    let transport = CannedTransport::new()
        .fixture(CHEMLIST, "kosha_chemlist_empty.xml")
        .route(
            PUBCHEM_CIDS,
            404,
            common::fixtures::load_response_fixture("pubchem_not_found.json"),
        )
        .shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("50-00-0", IdentifierKind::Cas).await;

    assert!(!result.success);
    assert_eq!(result.source, Provenance::None);
    assert!(result.record.is_none());
    assert_eq!(result.error.as_deref(), Some("not found: 50-00-0"));
}

#[tokio::test]
async fn test_kosha_only_when_pubchem_fails() {
    let transport = kosha_benzene(CannedTransport::new())
        .route(PUBCHEM_CIDS, 503, "<html>Service Unavailable</html>")
        .shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;

    assert_eq!(result.source, Provenance::Single(SourceId::Kosha));
    let record = result.record.unwrap();
    assert_eq!(record.physical_properties.molecular_weight, "");
    assert_eq!(record.ecological.bioaccumulation, "BCF 13");
}

#[tokio::test]
async fn test_kosha_keeps_sections_fetched_before_a_failure() {
    let transport = CannedTransport::new()
        .fixture(CHEMLIST, "kosha_chemlist_benzene.xml")
        .fixture(DETAIL_PHYSICAL, "kosha_detail09_benzene.xml")
        .fixture(DETAIL_TOXICITY, "kosha_detail11_no_data.xml")
        .fail(DETAIL_ECOLOGICAL, HttpError::Timeout)
        .shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;

    assert!(result.success);
    assert_eq!(result.source, Provenance::Single(SourceId::Kosha));
    let record = result.record.unwrap();
    assert_eq!(record.physical_properties.melting_point, "5.5 ℃");
    assert_eq!(record.ecological.aquatic_toxicity.fish, "");
    assert_eq!(transport.request_count(DETAIL_ECOLOGICAL), 1);
}

#[tokio::test]
async fn test_kosha_detail_fails_only_when_every_section_fails() {
    let transport = CannedTransport::new()
        .fail("/chemdetail", HttpError::Timeout)
        .shared();
    let kosha = KoshaSource::new(transport.clone(), kosha_config(Some("test-key")));
    let handle = SourceHandle {
        source: SourceId::Kosha,
        id: "000001".to_string(),
    };

    let result = kosha.fetch_detail(&handle, SectionSet::ALL).await;

    assert!(matches!(result, Err(SourceError::Transport(HttpError::Timeout))));
    assert_eq!(transport.request_count("/chemdetail"), 3);
}

#[tokio::test]
async fn test_pubchem_404_without_fault_body_is_no_match() {
    let transport = CannedTransport::new().route(PUBCHEM_CIDS, 404, "").shared();
    let pubchem = PubChemSource::new(transport, PubChemConfig::default());
    assert_eq!(pubchem.search_by_cas("50-00-0").await, Ok(Vec::new()));

    let transport = CannedTransport::new()
        .route(PUBCHEM_CIDS, 404, "<html>Not Found</html>")
        .shared();
    let pubchem = PubChemSource::new(transport, PubChemConfig::default());
    assert_eq!(pubchem.search_by_name("no such chemical").await, Ok(Vec::new()));
}

#[tokio::test]
async fn test_section_query_skips_empty_primary_section() {
    let transport = pubchem_benzene(kosha_benzene(CannedTransport::new())).shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch_toxicity("71-43-2", IdentifierKind::Cas).await;

    assert!(result.success);
    assert_eq!(result.source, Provenance::Single(SourceId::PubChem));
    let toxicity = result.record.unwrap();
    assert_eq!(toxicity.acute_toxicity.oral, "930 mg/kg");
    assert_eq!(toxicity.aspiration_hazard.split(':').next(), Some("H304"));

    assert_eq!(transport.request_count(DETAIL_TOXICITY), 1);
    assert_eq!(transport.request_count(DETAIL_PHYSICAL), 0);
    assert_eq!(transport.request_count(DETAIL_ECOLOGICAL), 0);
}

#[tokio::test]
async fn test_physical_section_query() {
    let transport = pubchem_benzene(kosha_benzene(CannedTransport::new())).shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service
        .fetch_physical_properties("71-43-2", IdentifierKind::Cas)
        .await;

    assert_eq!(
        result.source,
        Provenance::Merged {
            primary: SourceId::Kosha,
            secondary: SourceId::PubChem
        }
    );
    let physical = result.record.unwrap();
    assert_eq!(physical.appearance, "액체");
    assert_eq!(physical.specific_gravity, "0.8765 g/cu cm at 20 °C");
}

#[tokio::test]
async fn test_ecological_section_query_from_kosha_alone() {
    let transport = kosha_benzene(CannedTransport::new()).shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch_ecological("71-43-2", IdentifierKind::Cas).await;

    assert_eq!(result.source, Provenance::Single(SourceId::Kosha));
    let ecological = result.record.unwrap();
    assert_eq!(
        ecological.aquatic_toxicity.crustacean,
        "EC50 10 mg/ℓ 48 hr Daphnia magna"
    );
    assert!(ecological.other_effects.is_empty());
}

#[tokio::test]
async fn test_name_lookup_sends_name_search() {
    let transport = pubchem_benzene(kosha_benzene(CannedTransport::new())).shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("benzene", IdentifierKind::Name).await;
    assert!(result.success);

    let requests = transport.requests();
    assert!(requests
        .iter()
        .any(|url| url.contains(CHEMLIST) && url.contains("searchCnd=0")));
    assert!(requests
        .iter()
        .any(|url| url.contains("/compound/name/benzene/cids/JSON")));
}

#[tokio::test]
async fn test_pubchem_as_primary() {
    let transport = pubchem_benzene(kosha_benzene(CannedTransport::new())).shared();
    let service = ChemicalDataService::new(
        Box::new(PubChemSource::new(transport.clone(), PubChemConfig::default())),
        Box::new(KoshaSource::new(transport.clone(), kosha_config(Some("test-key")))),
    );

    let result = service.fetch("71-43-2", IdentifierKind::Cas).await;
    let record = result.record.unwrap();

    assert_eq!(result.source.label(), "PubChem+KOSHA");
    assert_eq!(record.physical_properties.boiling_point, "80.08 °C");
    assert_eq!(record.physical_properties.melting_point, "5.5 ℃");
}

#[tokio::test]
async fn test_invalid_cas_makes_no_requests() {
    let transport = pubchem_benzene(kosha_benzene(CannedTransport::new())).shared();
    let service = build_service(&transport, Some("test-key"));

    let result = service.fetch("71-43-X", IdentifierKind::Cas).await;

    assert!(!result.success);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_fetch_cached_reuses_successful_results() {
    let transport = pubchem_benzene(CannedTransport::new()).shared();
    let service = build_service(&transport, None);
    let mut cache = SessionCache::new();

    let first = service
        .fetch_cached(&mut cache, "71-43-2", IdentifierKind::Cas)
        .await;
    let requests_after_first = transport.requests().len();
    let second = service
        .fetch_cached(&mut cache, " 71-43-2 ", IdentifierKind::Cas)
        .await;

    assert!(first.success);
    assert_eq!(first, second);
    assert_eq!(transport.requests().len(), requests_after_first);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_fetch_cached_does_not_store_failures() {
    let transport = CannedTransport::new().shared();
    let service = build_service(&transport, None);
    let mut cache = SessionCache::new();

    let result = service
        .fetch_cached(&mut cache, "71-43-2", IdentifierKind::Cas)
        .await;

    assert!(!result.success);
    assert!(cache.is_empty());
    let key = msds_core::CacheKey::new(
        msds_core::ChemicalIdentifier::cas("71-43-2").unwrap(),
        msds_core::SectionSet::ALL,
    );
    assert!(cache.get(&key).is_none());
}
