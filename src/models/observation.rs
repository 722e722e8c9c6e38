use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single measured input a method may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationField {
    TMin,
    TMax,
    RhMin,
    RhMax,
    Rs,
    Uz,
    Z,
    Lat,
}

impl ObservationField {
    pub const ALL: [ObservationField; 8] = [
        ObservationField::TMin,
        ObservationField::TMax,
        ObservationField::RhMin,
        ObservationField::RhMax,
        ObservationField::Rs,
        ObservationField::Uz,
        ObservationField::Z,
        ObservationField::Lat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationField::TMin => "t_min",
            ObservationField::TMax => "t_max",
            ObservationField::RhMin => "rh_min",
            ObservationField::RhMax => "rh_max",
            ObservationField::Rs => "rs",
            ObservationField::Uz => "uz",
            ObservationField::Z => "z",
            ObservationField::Lat => "lat",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ObservationField::TMin => "Minimum air temperature",
            ObservationField::TMax => "Maximum air temperature",
            ObservationField::RhMin => "Minimum relative humidity",
            ObservationField::RhMax => "Maximum relative humidity",
            ObservationField::Rs => "Solar radiation",
            ObservationField::Uz => "Wind speed at 2 m",
            ObservationField::Z => "Elevation",
            ObservationField::Lat => "Latitude",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ObservationField::TMin | ObservationField::TMax => "°C",
            ObservationField::RhMin | ObservationField::RhMax => "%",
            ObservationField::Rs => "MJ/m²/day",
            ObservationField::Uz => "m/s",
            ObservationField::Z => "m",
            ObservationField::Lat => "deg",
        }
    }
}

impl std::fmt::Display for ObservationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One day of raw site observations. Every field is optional; each method
/// only needs a subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    pub t_min: Option<f64>,
    pub t_max: Option<f64>,
    pub rh_min: Option<f64>,
    pub rh_max: Option<f64>,
    pub rs: Option<f64>,
    pub uz: Option<f64>,
    pub z: Option<f64>,
    pub lat: Option<f64>,
    /// Calculation day; radiation terms use its day of year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: ObservationField) -> Option<f64> {
        match field {
            ObservationField::TMin => self.t_min,
            ObservationField::TMax => self.t_max,
            ObservationField::RhMin => self.rh_min,
            ObservationField::RhMax => self.rh_max,
            ObservationField::Rs => self.rs,
            ObservationField::Uz => self.uz,
            ObservationField::Z => self.z,
            ObservationField::Lat => self.lat,
        }
    }

    pub fn set(&mut self, field: ObservationField, value: Option<f64>) {
        match field {
            ObservationField::TMin => self.t_min = value,
            ObservationField::TMax => self.t_max = value,
            ObservationField::RhMin => self.rh_min = value,
            ObservationField::RhMax => self.rh_max = value,
            ObservationField::Rs => self.rs = value,
            ObservationField::Uz => self.uz = value,
            ObservationField::Z => self.z = value,
            ObservationField::Lat => self.lat = value,
        }
    }

    pub fn with(mut self, field: ObservationField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn mean_temperature(&self) -> Option<f64> {
        match (self.t_min, self.t_max) {
            (Some(min), Some(max)) => Some((max + min) / 2.0),
            _ => None,
        }
    }

    /// Mean relative humidity, or the single bound that was supplied.
    pub fn mean_humidity(&self) -> Option<f64> {
        match (self.rh_min, self.rh_max) {
            (Some(min), Some(max)) => Some((max + min) / 2.0),
            (Some(single), None) | (None, Some(single)) => Some(single),
            (None, None) => None,
        }
    }

    /// Day of year for radiation terms. Without a date the calculation is
    /// pinned to 1 January.
    pub fn day_of_year(&self) -> u32 {
        self.date.map(|d| d.ordinal()).unwrap_or(1)
    }

    pub fn present_fields(&self) -> Vec<ObservationField> {
        ObservationField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }
}
