//! Keyword rule tables for free-text classification
//!
//! Rules are tried in order and the first match wins. Matching is done on a
//! lowercased, space-padded haystack built from the enclosing heading, the
//! entry label and the text itself, so a keyword such as `" ph "` only
//! matches the standalone token.

use crate::domain::{EcologicalField, PhysicalField, ToxicityField};

/// Maps free text to one field of a section.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<F: 'static> {
    pub field: F,
    /// Matches when every keyword of at least one group is present
    pub any_of: &'static [&'static [&'static str]],
    /// Vetoes the rule when any of these is present
    pub none_of: &'static [&'static str],
}

impl<F: Copy> KeywordRule<F> {
    pub fn matches(&self, haystack: &str) -> bool {
        if self.none_of.iter().any(|kw| haystack.contains(kw)) {
            return false;
        }
        self.any_of
            .iter()
            .any(|group| group.iter().all(|kw| haystack.contains(kw)))
    }
}

/// Build the haystack rules are matched against.
pub fn haystack(parts: &[&str]) -> String {
    let mut out = String::from(" ");
    for part in parts.iter().filter(|p| !p.is_empty()) {
        out.push_str(&part.to_lowercase());
        out.push(' ');
    }
    out
}

/// First rule whose keywords match `haystack`.
pub fn classify<F: Copy>(rules: &[KeywordRule<F>], haystack: &str) -> Option<F> {
    rules.iter().find(|r| r.matches(haystack)).map(|r| r.field)
}

/// Unclassified text must be longer than this (in chars) to be kept.
pub const MIN_UNCLASSIFIED_LEN: usize = 10;

const NONE: &[&str] = &[];

pub const PHYSICAL_RULES: &[KeywordRule<PhysicalField>] = &[
    KeywordRule {
        field: PhysicalField::Appearance,
        any_of: &[&["physical description"], &["appearance"], &["color/form"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::MeltingPoint,
        any_of: &[&["melting"], &["freezing point"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::BoilingPoint,
        any_of: &[&["boiling"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::FlashPoint,
        any_of: &[&["flash point"], &["flash pt"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::AutoignitionTemperature,
        any_of: &[&["autoignition"], &["auto-ignition"], &["ignition temperature"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::DecompositionTemperature,
        any_of: &[&["decomposition"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::VaporPressure,
        any_of: &[&["vapor pressure"], &["vapour pressure"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::Viscosity,
        any_of: &[&["viscosity"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::Solubility,
        any_of: &[&["solubility"], &["soluble"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::SpecificGravity,
        any_of: &[&["specific gravity"], &["relative density"], &["density"]],
        none_of: &["vapor density", "vapour density"],
    },
    KeywordRule {
        field: PhysicalField::MolecularWeight,
        any_of: &[&["molecular weight"], &["molar mass"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::PartitionCoefficient,
        any_of: &[
            &["partition coefficient"],
            &["logp"],
            &["log kow"],
            &["octanol"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::Odor,
        any_of: &[&["odor"], &["odour"]],
        none_of: NONE,
    },
    KeywordRule {
        field: PhysicalField::Ph,
        any_of: &[&[" ph "], &[" ph:"], &[" ph="]],
        none_of: NONE,
    },
];

pub const TOXICITY_RULES: &[KeywordRule<ToxicityField>] = &[
    KeywordRule {
        field: ToxicityField::AcuteOral,
        any_of: &[
            &["ld50", "oral"],
            &["acute toxicity", "oral"],
            &["h300"],
            &["h301"],
            &["h302"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::AcuteDermal,
        any_of: &[
            &["ld50", "dermal"],
            &["ld50", "skin"],
            &["acute toxicity", "dermal"],
            &["h310"],
            &["h311"],
            &["h312"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::AcuteInhalation,
        any_of: &[
            &["lc50", "inhal"],
            &["acute toxicity", "inhal"],
            &["h330"],
            &["h331"],
            &["h332"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::AspirationHazard,
        any_of: &[&["aspiration"], &["h304"]],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::SkinIrritation,
        any_of: &[
            &["skin irritation"],
            &["skin corrosion"],
            &["irritating to skin"],
            &["h314"],
            &["h315"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::EyeIrritation,
        any_of: &[
            &["eye irritation"],
            &["eye damage"],
            &["irritating to eyes"],
            &["h318"],
            &["h319"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::RespiratorySensitization,
        any_of: &[
            &["respiratory sensitization"],
            &["respiratory sensitisation"],
            &["h334"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::SkinSensitization,
        any_of: &[
            &["skin sensitization"],
            &["skin sensitisation"],
            &["allergic skin"],
            &["h317"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::Mutagenicity,
        any_of: &[&["mutagen"], &["genotox"], &["h340"], &["h341"]],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::Carcinogenicity,
        any_of: &[&["carcinogen"], &["iarc"], &["h350"], &["h351"]],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::ReproductiveToxicity,
        any_of: &[
            &["reproductive"],
            &["teratogen"],
            &["h360"],
            &["h361"],
            &["h362"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::StotSingleExposure,
        any_of: &[&["single exposure"], &["h370"], &["h371"], &["h335"], &["h336"]],
        none_of: NONE,
    },
    KeywordRule {
        field: ToxicityField::StotRepeatedExposure,
        any_of: &[&["repeated exposure"], &["h372"], &["h373"]],
        none_of: NONE,
    },
];

pub const ECOLOGICAL_RULES: &[KeywordRule<EcologicalField>] = &[
    KeywordRule {
        field: EcologicalField::Bioaccumulation,
        any_of: &[&["bioaccumulat"], &["bioconcentration"], &[" bcf"]],
        none_of: NONE,
    },
    KeywordRule {
        field: EcologicalField::PersistenceDegradability,
        any_of: &[&["biodegrad"], &["persisten"], &["degradab"]],
        none_of: NONE,
    },
    KeywordRule {
        field: EcologicalField::SoilMobility,
        any_of: &[&["soil adsorption"], &["mobility in soil"], &[" koc"]],
        none_of: NONE,
    },
    KeywordRule {
        field: EcologicalField::OzoneDepletion,
        any_of: &[&["ozone"], &["h420"]],
        none_of: NONE,
    },
    KeywordRule {
        field: EcologicalField::Crustacean,
        any_of: &[
            &["daphnia"],
            &["crustacea"],
            &["artemia"],
            &["gammarus"],
            &["ec50", "invertebrate"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: EcologicalField::Algae,
        any_of: &[
            &["alga"],
            &["selenastrum"],
            &["pseudokirchneriella"],
            &["raphidocelis"],
            &["chlorella"],
        ],
        none_of: NONE,
    },
    KeywordRule {
        field: EcologicalField::Fish,
        any_of: &[
            &["lc50", "fish"],
            &["pimephales"],
            &["oncorhynchus"],
            &["lepomis"],
            &["danio"],
            &["oryzias"],
            &["cyprinus"],
            &["fish"],
        ],
        none_of: NONE,
    },
];
