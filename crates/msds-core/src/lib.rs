//! msds-core: Chemical data resolution for MSDS authoring
//!
//! This library provides:
//! - CAS number validation and identifier resolution
//! - Source plugins for the KOSHA MSDS open API (XML) and PubChem (JSON)
//! - Field extraction into the physical, toxicity and ecological sections
//! - Gap-filling merge with provenance
//! - A query service that orchestrates both sources
//!
//! ```no_run
//! use msds_core::{ChemicalDataService, IdentifierKind, ServiceConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::default().from_env();
//! let service = ChemicalDataService::from_config(&config)?;
//! let result = service.fetch("71-43-2", IdentifierKind::Cas).await;
//! println!("{}", result.source);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod extract;
pub mod http;
pub mod identifiers;
pub mod merge;
pub mod service;
pub mod sources;

// Re-export main types for convenience
pub use cache::{CacheKey, ResultCache, SessionCache};
pub use config::{ConfigError, KoshaConfig, PubChemConfig, ServiceConfig};
pub use domain::{
    AcuteToxicity, AquaticToxicity, EcologicalProfile, NormalizedRecord, PhysicalProperties,
    Provenance, QueryResult, Section, SectionSet, Sensitization, SourceId, ToxicityProfile,
};
pub use http::{HttpClient, HttpError, HttpResponse, Transport};
pub use identifiers::{ChemicalIdentifier, IdentifierError, IdentifierKind};
pub use merge::{merge, merge_with_report, FillGaps, MergeResult};
pub use service::ChemicalDataService;
pub use sources::{ChemicalSource, KoshaSource, PubChemSource, SourceError};
