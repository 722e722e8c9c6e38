use crate::error::{Et0Error, Result};
use crate::models::{ArgumentShape, MethodCategory, MethodDescriptor, ObservationField};

use crate::models::ObservationField::{Lat, RhMax, RhMin, Rs, TMax, TMin, Uz, Z};

const FULL: &[ObservationField] = &[TMin, TMax, RhMin, RhMax, Rs, Uz, Z, Lat];
const NET_RADIATION: &[ObservationField] = &[TMin, TMax, RhMin, RhMax, Rs, Z, Lat];
const TEMP_RADIATION: &[ObservationField] = &[TMin, TMax, Rs];
const TEMP_LATITUDE: &[ObservationField] = &[TMin, TMax, Lat];
const TEMP_HUMIDITY: &[ObservationField] = &[TMin, TMax, RhMin, RhMax];

const fn method(
    id: &'static str,
    display_name: &'static str,
    category: MethodCategory,
    required_observations: &'static [ObservationField],
    argument_shape: ArgumentShape,
) -> MethodDescriptor {
    MethodDescriptor {
        id,
        display_name,
        category,
        required_observations,
        formula_library_name: id,
        argument_shape,
    }
}

const CATALOG: [MethodDescriptor; 20] = [
    // Penman-Monteith
    method(
        "pm_fao56",
        "FAO-56 Penman-Monteith",
        MethodCategory::PenmanMonteith,
        FULL,
        ArgumentShape::Combination,
    ),
    method(
        "pm_asce",
        "ASCE Penman-Monteith",
        MethodCategory::PenmanMonteith,
        FULL,
        ArgumentShape::Combination,
    ),
    method(
        "pm",
        "Penman-Monteith",
        MethodCategory::PenmanMonteith,
        FULL,
        ArgumentShape::Combination,
    ),
    method(
        "penman",
        "Penman",
        MethodCategory::PenmanMonteith,
        FULL,
        ArgumentShape::Combination,
    ),
    // Radiation-based
    method(
        "priestley_taylor",
        "Priestley-Taylor",
        MethodCategory::RadiationBased,
        NET_RADIATION,
        ArgumentShape::NetRadiation,
    ),
    method(
        "makkink",
        "Makkink",
        MethodCategory::RadiationBased,
        &[TMin, TMax, Rs, Z],
        ArgumentShape::RadiationElevation,
    ),
    method(
        "turc",
        "Turc",
        MethodCategory::RadiationBased,
        &[TMin, TMax, RhMin, RhMax, Rs],
        ArgumentShape::RadiationHumidity,
    ),
    method(
        "jensen_haise",
        "Jensen-Haise",
        MethodCategory::RadiationBased,
        TEMP_RADIATION,
        ArgumentShape::Radiation,
    ),
    method(
        "abtew",
        "Abtew",
        MethodCategory::RadiationBased,
        TEMP_RADIATION,
        ArgumentShape::Radiation,
    ),
    method(
        "mcguinness_bordne",
        "McGuinness-Bordne",
        MethodCategory::RadiationBased,
        TEMP_LATITUDE,
        ArgumentShape::TemperatureDaylength,
    ),
    // Temperature-only
    method(
        "hargreaves",
        "Hargreaves",
        MethodCategory::TemperatureOnly,
        TEMP_LATITUDE,
        ArgumentShape::TemperatureRange,
    ),
    method(
        "blaney_criddle",
        "Blaney-Criddle",
        MethodCategory::TemperatureOnly,
        TEMP_LATITUDE,
        ArgumentShape::TemperatureDaylength,
    ),
    method(
        "hamon",
        "Hamon",
        MethodCategory::TemperatureOnly,
        TEMP_LATITUDE,
        ArgumentShape::TemperatureDaylength,
    ),
    method(
        "oudin",
        "Oudin",
        MethodCategory::TemperatureOnly,
        TEMP_LATITUDE,
        ArgumentShape::TemperatureDaylength,
    ),
    method(
        "linacre",
        "Linacre",
        MethodCategory::TemperatureOnly,
        &[TMin, TMax, Z, Lat],
        ArgumentShape::TemperatureSite,
    ),
    // Humidity-based
    method(
        "romanenko",
        "Romanenko",
        MethodCategory::HumidityBased,
        TEMP_HUMIDITY,
        ArgumentShape::HumidityMean,
    ),
    method(
        "schendel",
        "Schendel",
        MethodCategory::HumidityBased,
        TEMP_HUMIDITY,
        ArgumentShape::HumidityMean,
    ),
    method(
        "haude",
        "Haude",
        MethodCategory::HumidityBased,
        &[TMax, RhMin],
        ArgumentShape::HumidityAfternoon,
    ),
    // Specialized
    method(
        "fao_24",
        "FAO-24 Penman",
        MethodCategory::Specialized,
        FULL,
        ArgumentShape::Combination,
    ),
    method(
        "kimberly_penman",
        "Kimberly-Penman",
        MethodCategory::Specialized,
        FULL,
        ArgumentShape::Combination,
    ),
];

/// Read-only catalog of ET₀ methods and their input contracts.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    methods: Vec<MethodDescriptor>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            methods: CATALOG.to_vec(),
        }
    }

    pub fn describe(&self, method_id: &str) -> Result<&MethodDescriptor> {
        self.methods
            .iter()
            .find(|m| m.id == method_id)
            .ok_or_else(|| Et0Error::UnknownMethod(method_id.to_string()))
    }

    pub fn list_by_category(&self, category: MethodCategory) -> Vec<&'static str> {
        self.methods
            .iter()
            .filter(|m| m.category == category)
            .map(|m| m.id)
            .collect()
    }

    pub fn all(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.methods.iter().map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::BuiltinLibrary;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_twenty_unique_methods() {
        let registry = MethodRegistry::new();
        assert_eq!(registry.len(), 20);
        let ids: HashSet<_> = registry.ids().into_iter().collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn categories_partition_the_catalog() {
        let registry = MethodRegistry::new();
        let counts: Vec<usize> = MethodCategory::ALL
            .iter()
            .map(|c| registry.list_by_category(*c).len())
            .collect();
        assert_eq!(counts, vec![4, 6, 5, 3, 2]);
        assert_eq!(counts.iter().sum::<usize>(), registry.len());
    }

    #[test]
    fn describe_unknown_method_fails() {
        let registry = MethodRegistry::new();
        match registry.describe("thornthwaite") {
            Err(Et0Error::UnknownMethod(id)) => assert_eq!(id, "thornthwaite"),
            other => panic!("expected UnknownMethod, got {:?}", other),
        }
    }

    #[test]
    fn required_observations_match_catalog() {
        let registry = MethodRegistry::new();
        assert_eq!(registry.describe("pm_fao56").unwrap().required_observations.len(), 8);
        assert_eq!(
            registry.describe("hargreaves").unwrap().required_observations,
            &[TMin, TMax, Lat]
        );
        assert_eq!(
            registry.describe("haude").unwrap().required_observations,
            &[TMax, RhMin]
        );
        assert!(!registry.describe("makkink").unwrap().requires(Lat));
    }

    #[test]
    fn every_method_resolves_to_a_library_symbol() {
        let symbols: HashSet<_> = BuiltinLibrary::symbols().collect();
        for method in MethodRegistry::new().all() {
            assert!(
                symbols.contains(method.formula_library_name),
                "no symbol for {}",
                method.id
            );
        }
    }

    #[test]
    fn list_by_category_keeps_catalog_order() {
        let registry = MethodRegistry::new();
        assert_eq!(
            registry.list_by_category(MethodCategory::PenmanMonteith),
            vec!["pm_fao56", "pm_asce", "pm", "penman"]
        );
    }
}
