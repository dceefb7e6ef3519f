//! Gap-filling merge of normalized records
//!
//! Primary wins field by field; secondary only fills what primary left
//! empty. Lists are taken wholesale, never concatenated. Not commutative.

use crate::domain::{
    AcuteToxicity, AquaticToxicity, EcologicalProfile, NormalizedRecord, PhysicalProperties,
    Provenance, Sensitization, SourceId, ToxicityProfile,
};

/// Fill empty parts of `self` from `other`.
pub trait FillGaps {
    /// Adopted fields are reported as dotted paths under `path`.
    fn fill_gaps(&mut self, other: &Self, path: &str, adopted: &mut Vec<String>);
}

impl FillGaps for String {
    fn fill_gaps(&mut self, other: &Self, path: &str, adopted: &mut Vec<String>) {
        if self.is_empty() && !other.is_empty() {
            self.clone_from(other);
            adopted.push(path.to_string());
        }
    }
}

impl FillGaps for Vec<String> {
    fn fill_gaps(&mut self, other: &Self, path: &str, adopted: &mut Vec<String>) {
        if self.is_empty() && !other.is_empty() {
            self.clone_from(other);
            adopted.push(path.to_string());
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

macro_rules! fill_gaps_fields {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl FillGaps for $ty {
            fn fill_gaps(&mut self, other: &Self, path: &str, adopted: &mut Vec<String>) {
                $(
                    self.$field
                        .fill_gaps(&other.$field, &join(path, stringify!($field)), adopted);
                )+
            }
        }
    };
}

fill_gaps_fields!(PhysicalProperties {
    appearance,
    odor,
    ph,
    melting_point,
    boiling_point,
    flash_point,
    vapor_pressure,
    solubility,
    specific_gravity,
    molecular_weight,
    partition_coefficient,
    autoignition_temperature,
    decomposition_temperature,
    viscosity,
});

fill_gaps_fields!(AcuteToxicity { oral, dermal, inhalation });

fill_gaps_fields!(Sensitization { respiratory, skin });

fill_gaps_fields!(ToxicityProfile {
    acute_toxicity,
    skin_irritation,
    eye_irritation,
    sensitization,
    mutagenicity,
    carcinogenicity,
    reproductive_toxicity,
    stot_single_exposure,
    stot_repeated_exposure,
    aspiration_hazard,
    other_info,
});

fill_gaps_fields!(AquaticToxicity { fish, crustacean, algae });

fill_gaps_fields!(EcologicalProfile {
    aquatic_toxicity,
    persistence_degradability,
    bioaccumulation,
    soil_mobility,
    ozone_depletion,
    other_effects,
});

fill_gaps_fields!(NormalizedRecord {
    physical_properties,
    toxicity,
    ecological,
});

#[derive(Clone, Debug, PartialEq)]
pub struct MergeResult<T = NormalizedRecord> {
    pub merged: T,
    /// Dotted paths of fields taken from secondary, in schema order
    pub fields_from_secondary: Vec<String>,
}

impl<T> MergeResult<T> {
    pub fn secondary_contributed(&self) -> bool {
        !self.fields_from_secondary.is_empty()
    }

    /// `Merged` only when secondary filled at least one field
    pub fn provenance(&self, primary: SourceId, secondary: SourceId) -> Provenance {
        if self.secondary_contributed() {
            Provenance::Merged { primary, secondary }
        } else {
            Provenance::Single(primary)
        }
    }
}

/// Merge any section (or whole record), reporting what secondary supplied.
pub fn merge_with_report<T: FillGaps + Clone>(primary: &T, secondary: &T) -> MergeResult<T> {
    let mut merged = primary.clone();
    let mut fields_from_secondary = Vec::new();
    merged.fill_gaps(secondary, "", &mut fields_from_secondary);

    MergeResult {
        merged,
        fields_from_secondary,
    }
}

pub fn merge(primary: &NormalizedRecord, secondary: &NormalizedRecord) -> NormalizedRecord {
    merge_with_report(primary, secondary).merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physical(melting: &str, mw: &str) -> NormalizedRecord {
        let mut record = NormalizedRecord::default();
        record.physical_properties.melting_point = melting.to_string();
        record.physical_properties.molecular_weight = mw.to_string();
        record
    }

    #[test]
    fn test_primary_wins_secondary_fills() {
        let primary = physical("5.5 ℃", "");
        let secondary = physical("5.558 °C", "78.11 g/mol");

        let result = merge_with_report(&primary, &secondary);

        assert_eq!(result.merged.physical_properties.melting_point, "5.5 ℃");
        assert_eq!(result.merged.physical_properties.molecular_weight, "78.11 g/mol");
        assert_eq!(
            result.fields_from_secondary,
            vec!["physical_properties.molecular_weight".to_string()]
        );
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let record = physical("5.5 ℃", "78.11");
        assert_eq!(merge(&record, &NormalizedRecord::default()), record);
    }

    #[test]
    fn test_nested_groups_are_filled_per_leaf() {
        let mut primary = NormalizedRecord::default();
        primary.toxicity.acute_toxicity.dermal = "LD50 > 8260 mg/kg".to_string();
        let mut secondary = NormalizedRecord::default();
        secondary.toxicity.acute_toxicity.oral = "930 mg/kg".to_string();
        secondary.toxicity.acute_toxicity.dermal = "other".to_string();

        let result = merge_with_report(&primary, &secondary);
        assert_eq!(result.merged.toxicity.acute_toxicity.oral, "930 mg/kg");
        assert_eq!(result.merged.toxicity.acute_toxicity.dermal, "LD50 > 8260 mg/kg");
        assert_eq!(
            result.fields_from_secondary,
            vec!["toxicity.acute_toxicity.oral".to_string()]
        );
    }

    #[test]
    fn test_lists_are_not_concatenated() {
        let mut primary = NormalizedRecord::default();
        primary.toxicity.other_info = vec!["from primary".to_string()];
        let mut secondary = NormalizedRecord::default();
        secondary.toxicity.other_info = vec!["from secondary".to_string()];
        secondary.ecological.other_effects = vec!["secondary effect".to_string()];

        let merged = merge(&primary, &secondary);
        assert_eq!(merged.toxicity.other_info, vec!["from primary".to_string()]);
        assert_eq!(
            merged.ecological.other_effects,
            vec!["secondary effect".to_string()]
        );
    }

    #[test]
    fn test_provenance() {
        let primary = physical("5.5 ℃", "78.11");
        let secondary = physical("", "78.1");

        let result = merge_with_report(&primary, &secondary);
        assert_eq!(
            result.provenance(SourceId::Kosha, SourceId::PubChem),
            Provenance::Single(SourceId::Kosha)
        );

        let result = merge_with_report(&NormalizedRecord::default(), &secondary);
        assert_eq!(
            result.provenance(SourceId::Kosha, SourceId::PubChem),
            Provenance::Merged {
                primary: SourceId::Kosha,
                secondary: SourceId::PubChem
            }
        );
    }

    #[test]
    fn test_merge_is_not_commutative() {
        let a = physical("5.5 ℃", "");
        let b = physical("5.558 °C", "");
        assert_ne!(merge(&a, &b), merge(&b, &a));
    }
}
