use super::observation::ObservationField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodCategory {
    PenmanMonteith,
    RadiationBased,
    TemperatureOnly,
    HumidityBased,
    Specialized,
}

impl MethodCategory {
    pub const ALL: [MethodCategory; 5] = [
        MethodCategory::PenmanMonteith,
        MethodCategory::RadiationBased,
        MethodCategory::TemperatureOnly,
        MethodCategory::HumidityBased,
        MethodCategory::Specialized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodCategory::PenmanMonteith => "Penman-Monteith",
            MethodCategory::RadiationBased => "Radiation-based",
            MethodCategory::TemperatureOnly => "Temperature-only",
            MethodCategory::HumidityBased => "Humidity-based",
            MethodCategory::Specialized => "Specialized",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(&['-', '_', ' '][..], "").as_str() {
            "penmanmonteith" | "pm" => Some(MethodCategory::PenmanMonteith),
            "radiationbased" | "radiation" => Some(MethodCategory::RadiationBased),
            "temperatureonly" | "temperature" => Some(MethodCategory::TemperatureOnly),
            "humiditybased" | "humidity" => Some(MethodCategory::HumidityBased),
            "specialized" | "specialised" => Some(MethodCategory::Specialized),
            _ => None,
        }
    }
}

impl std::fmt::Display for MethodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How observations are assembled into the argument bundle a formula
/// symbol expects. One variant per distinct call signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentShape {
    /// Temperatures, humidity bounds, radiation, wind, elevation, latitude.
    Combination,
    /// As `Combination` without wind.
    NetRadiation,
    /// Mean temperature, radiation, elevation.
    RadiationElevation,
    /// Mean temperature, radiation, mean humidity.
    RadiationHumidity,
    /// Mean temperature and radiation.
    Radiation,
    /// Mean and extreme temperatures plus latitude.
    TemperatureRange,
    /// Mean temperature plus latitude for day length or Ra.
    TemperatureDaylength,
    /// Mean and minimum temperature, elevation, latitude in degrees.
    TemperatureSite,
    /// Mean temperature and mean humidity.
    HumidityMean,
    /// Maximum temperature and minimum humidity.
    HumidityAfternoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MethodDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: MethodCategory,
    pub required_observations: &'static [ObservationField],
    pub formula_library_name: &'static str,
    pub argument_shape: ArgumentShape,
}

impl MethodDescriptor {
    pub fn requires(&self, field: ObservationField) -> bool {
        self.required_observations.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_str_accepts_labels_and_short_names() {
        assert_eq!(
            MethodCategory::from_str("Penman-Monteith"),
            Some(MethodCategory::PenmanMonteith)
        );
        assert_eq!(
            MethodCategory::from_str("temperature_only"),
            Some(MethodCategory::TemperatureOnly)
        );
        assert_eq!(
            MethodCategory::from_str("humidity"),
            Some(MethodCategory::HumidityBased)
        );
        assert_eq!(MethodCategory::from_str("lysimeter"), None);
    }

    #[test]
    fn category_round_trips_through_label() {
        for category in MethodCategory::ALL {
            assert_eq!(MethodCategory::from_str(category.as_str()), Some(category));
        }
    }
}
