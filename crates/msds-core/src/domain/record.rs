//! Normalized MSDS record
//!
//! The backend-agnostic shape every adapter's output is converted into.
//! All scalar values are unparsed, unit-bearing free text; an empty string
//! means "unknown".

use serde::{Deserialize, Serialize};

/// One of the three MSDS sections this crate resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// MSDS section 9
    Physical,
    /// MSDS section 11
    Toxicity,
    /// MSDS section 12
    Ecological,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[Section::Physical, Section::Toxicity, Section::Ecological]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Physical => "physical",
            Section::Toxicity => "toxicity",
            Section::Ecological => "ecological",
        }
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physical" | "physical_properties" => Ok(Section::Physical),
            "toxicity" => Ok(Section::Toxicity),
            "ecological" | "ecology" => Ok(Section::Ecological),
            other => Err(format!("unknown section: {}", other)),
        }
    }
}

/// Which sections a query should fetch and extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionSet {
    pub physical: bool,
    pub toxicity: bool,
    pub ecological: bool,
}

impl SectionSet {
    pub const ALL: SectionSet = SectionSet {
        physical: true,
        toxicity: true,
        ecological: true,
    };

    pub fn only(section: Section) -> Self {
        Self {
            physical: section == Section::Physical,
            toxicity: section == Section::Toxicity,
            ecological: section == Section::Ecological,
        }
    }

    pub fn contains(&self, section: Section) -> bool {
        match section {
            Section::Physical => self.physical,
            Section::Toxicity => self.toxicity,
            Section::Ecological => self.ecological,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Section> + '_ {
        Section::all().iter().copied().filter(|s| self.contains(*s))
    }
}

impl Default for SectionSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Common access to a section's scalar slots and its open-ended list.
///
/// Extractors write through this trait so rule tables can name fields
/// without knowing struct layout.
pub trait SectionRecord: Default {
    type Field: Copy + std::fmt::Debug + PartialEq;

    fn field(&self, field: Self::Field) -> &str;
    fn field_mut(&mut self, field: Self::Field) -> &mut String;
    /// Unclassified findings; `None` for sections without such a list.
    fn extra_mut(&mut self) -> Option<&mut Vec<String>>;
    fn is_empty(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalField {
    Appearance,
    Odor,
    Ph,
    MeltingPoint,
    BoilingPoint,
    FlashPoint,
    VaporPressure,
    Solubility,
    SpecificGravity,
    MolecularWeight,
    PartitionCoefficient,
    AutoignitionTemperature,
    DecompositionTemperature,
    Viscosity,
}

/// MSDS section 9: physical and chemical properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalProperties {
    pub appearance: String,
    pub odor: String,
    pub ph: String,
    pub melting_point: String,
    pub boiling_point: String,
    pub flash_point: String,
    pub vapor_pressure: String,
    pub solubility: String,
    pub specific_gravity: String,
    pub molecular_weight: String,
    pub partition_coefficient: String,
    pub autoignition_temperature: String,
    pub decomposition_temperature: String,
    pub viscosity: String,
}

impl SectionRecord for PhysicalProperties {
    type Field = PhysicalField;

    fn field(&self, field: PhysicalField) -> &str {
        match field {
            PhysicalField::Appearance => &self.appearance,
            PhysicalField::Odor => &self.odor,
            PhysicalField::Ph => &self.ph,
            PhysicalField::MeltingPoint => &self.melting_point,
            PhysicalField::BoilingPoint => &self.boiling_point,
            PhysicalField::FlashPoint => &self.flash_point,
            PhysicalField::VaporPressure => &self.vapor_pressure,
            PhysicalField::Solubility => &self.solubility,
            PhysicalField::SpecificGravity => &self.specific_gravity,
            PhysicalField::MolecularWeight => &self.molecular_weight,
            PhysicalField::PartitionCoefficient => &self.partition_coefficient,
            PhysicalField::AutoignitionTemperature => &self.autoignition_temperature,
            PhysicalField::DecompositionTemperature => &self.decomposition_temperature,
            PhysicalField::Viscosity => &self.viscosity,
        }
    }

    fn field_mut(&mut self, field: PhysicalField) -> &mut String {
        match field {
            PhysicalField::Appearance => &mut self.appearance,
            PhysicalField::Odor => &mut self.odor,
            PhysicalField::Ph => &mut self.ph,
            PhysicalField::MeltingPoint => &mut self.melting_point,
            PhysicalField::BoilingPoint => &mut self.boiling_point,
            PhysicalField::FlashPoint => &mut self.flash_point,
            PhysicalField::VaporPressure => &mut self.vapor_pressure,
            PhysicalField::Solubility => &mut self.solubility,
            PhysicalField::SpecificGravity => &mut self.specific_gravity,
            PhysicalField::MolecularWeight => &mut self.molecular_weight,
            PhysicalField::PartitionCoefficient => &mut self.partition_coefficient,
            PhysicalField::AutoignitionTemperature => &mut self.autoignition_temperature,
            PhysicalField::DecompositionTemperature => &mut self.decomposition_temperature,
            PhysicalField::Viscosity => &mut self.viscosity,
        }
    }

    fn extra_mut(&mut self) -> Option<&mut Vec<String>> {
        None
    }

    fn is_empty(&self) -> bool {
        [
            &self.appearance,
            &self.odor,
            &self.ph,
            &self.melting_point,
            &self.boiling_point,
            &self.flash_point,
            &self.vapor_pressure,
            &self.solubility,
            &self.specific_gravity,
            &self.molecular_weight,
            &self.partition_coefficient,
            &self.autoignition_temperature,
            &self.decomposition_temperature,
            &self.viscosity,
        ]
        .iter()
        .all(|v| v.is_empty())
    }
}

/// Acute toxicity by exposure route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcuteToxicity {
    pub oral: String,
    pub dermal: String,
    pub inhalation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensitization {
    pub respiratory: String,
    pub skin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToxicityField {
    AcuteOral,
    AcuteDermal,
    AcuteInhalation,
    SkinIrritation,
    EyeIrritation,
    RespiratorySensitization,
    SkinSensitization,
    Mutagenicity,
    Carcinogenicity,
    ReproductiveToxicity,
    StotSingleExposure,
    StotRepeatedExposure,
    AspirationHazard,
}

/// MSDS section 11: toxicological information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxicityProfile {
    pub acute_toxicity: AcuteToxicity,
    pub skin_irritation: String,
    pub eye_irritation: String,
    pub sensitization: Sensitization,
    pub mutagenicity: String,
    pub carcinogenicity: String,
    pub reproductive_toxicity: String,
    pub stot_single_exposure: String,
    pub stot_repeated_exposure: String,
    pub aspiration_hazard: String,
    pub other_info: Vec<String>,
}

impl SectionRecord for ToxicityProfile {
    type Field = ToxicityField;

    fn field(&self, field: ToxicityField) -> &str {
        match field {
            ToxicityField::AcuteOral => &self.acute_toxicity.oral,
            ToxicityField::AcuteDermal => &self.acute_toxicity.dermal,
            ToxicityField::AcuteInhalation => &self.acute_toxicity.inhalation,
            ToxicityField::SkinIrritation => &self.skin_irritation,
            ToxicityField::EyeIrritation => &self.eye_irritation,
            ToxicityField::RespiratorySensitization => &self.sensitization.respiratory,
            ToxicityField::SkinSensitization => &self.sensitization.skin,
            ToxicityField::Mutagenicity => &self.mutagenicity,
            ToxicityField::Carcinogenicity => &self.carcinogenicity,
            ToxicityField::ReproductiveToxicity => &self.reproductive_toxicity,
            ToxicityField::StotSingleExposure => &self.stot_single_exposure,
            ToxicityField::StotRepeatedExposure => &self.stot_repeated_exposure,
            ToxicityField::AspirationHazard => &self.aspiration_hazard,
        }
    }

    fn field_mut(&mut self, field: ToxicityField) -> &mut String {
        match field {
            ToxicityField::AcuteOral => &mut self.acute_toxicity.oral,
            ToxicityField::AcuteDermal => &mut self.acute_toxicity.dermal,
            ToxicityField::AcuteInhalation => &mut self.acute_toxicity.inhalation,
            ToxicityField::SkinIrritation => &mut self.skin_irritation,
            ToxicityField::EyeIrritation => &mut self.eye_irritation,
            ToxicityField::RespiratorySensitization => &mut self.sensitization.respiratory,
            ToxicityField::SkinSensitization => &mut self.sensitization.skin,
            ToxicityField::Mutagenicity => &mut self.mutagenicity,
            ToxicityField::Carcinogenicity => &mut self.carcinogenicity,
            ToxicityField::ReproductiveToxicity => &mut self.reproductive_toxicity,
            ToxicityField::StotSingleExposure => &mut self.stot_single_exposure,
            ToxicityField::StotRepeatedExposure => &mut self.stot_repeated_exposure,
            ToxicityField::AspirationHazard => &mut self.aspiration_hazard,
        }
    }

    fn extra_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.other_info)
    }

    fn is_empty(&self) -> bool {
        self == &ToxicityProfile::default()
    }
}

/// Aquatic toxicity by taxon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AquaticToxicity {
    pub fish: String,
    pub crustacean: String,
    pub algae: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcologicalField {
    Fish,
    Crustacean,
    Algae,
    PersistenceDegradability,
    Bioaccumulation,
    SoilMobility,
    OzoneDepletion,
}

/// MSDS section 12: ecological information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcologicalProfile {
    pub aquatic_toxicity: AquaticToxicity,
    pub persistence_degradability: String,
    pub bioaccumulation: String,
    pub soil_mobility: String,
    pub ozone_depletion: String,
    pub other_effects: Vec<String>,
}

impl SectionRecord for EcologicalProfile {
    type Field = EcologicalField;

    fn field(&self, field: EcologicalField) -> &str {
        match field {
            EcologicalField::Fish => &self.aquatic_toxicity.fish,
            EcologicalField::Crustacean => &self.aquatic_toxicity.crustacean,
            EcologicalField::Algae => &self.aquatic_toxicity.algae,
            EcologicalField::PersistenceDegradability => &self.persistence_degradability,
            EcologicalField::Bioaccumulation => &self.bioaccumulation,
            EcologicalField::SoilMobility => &self.soil_mobility,
            EcologicalField::OzoneDepletion => &self.ozone_depletion,
        }
    }

    fn field_mut(&mut self, field: EcologicalField) -> &mut String {
        match field {
            EcologicalField::Fish => &mut self.aquatic_toxicity.fish,
            EcologicalField::Crustacean => &mut self.aquatic_toxicity.crustacean,
            EcologicalField::Algae => &mut self.aquatic_toxicity.algae,
            EcologicalField::PersistenceDegradability => &mut self.persistence_degradability,
            EcologicalField::Bioaccumulation => &mut self.bioaccumulation,
            EcologicalField::SoilMobility => &mut self.soil_mobility,
            EcologicalField::OzoneDepletion => &mut self.ozone_depletion,
        }
    }

    fn extra_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.other_effects)
    }

    fn is_empty(&self) -> bool {
        self == &EcologicalProfile::default()
    }
}

/// One chemical's physical, toxicity and ecological data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedRecord {
    pub physical_properties: PhysicalProperties,
    pub toxicity: ToxicityProfile,
    pub ecological: EcologicalProfile,
}

impl NormalizedRecord {
    pub fn is_empty(&self) -> bool {
        self.physical_properties.is_empty()
            && self.toxicity.is_empty()
            && self.ecological.is_empty()
    }

    pub fn section_is_empty(&self, section: Section) -> bool {
        match section {
            Section::Physical => self.physical_properties.is_empty(),
            Section::Toxicity => self.toxicity.is_empty(),
            Section::Ecological => self.ecological.is_empty(),
        }
    }

    /// True when every section in `sections` is empty.
    pub fn is_empty_in(&self, sections: SectionSet) -> bool {
        sections.iter().all(|s| self.section_is_empty(s))
    }
}
