use serde::{Deserialize, Serialize};

/// How "current available water" is expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentDepthMode {
    /// Depletion below field capacity minus today's crop water use.
    #[default]
    RemainingAfterEtc,
    /// Raw depletion below field capacity, with today's deficit or surplus
    /// against precipitation reported separately.
    DeficitSurplus,
}

impl CurrentDepthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentDepthMode::RemainingAfterEtc => "remaining_after_etc",
            CurrentDepthMode::DeficitSurplus => "deficit_surplus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "remaining_after_etc" | "remaining" => Some(CurrentDepthMode::RemainingAfterEtc),
            "deficit_surplus" | "deficit" => Some(CurrentDepthMode::DeficitSurplus),
            _ => None,
        }
    }
}

impl std::fmt::Display for CurrentDepthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceInputs {
    /// Volumetric fraction, 0-1.
    pub current_moisture: f64,
    pub field_capacity: f64,
    /// Permanent wilting point.
    pub wilting_point: f64,
    pub irrigation_threshold: f64,
    pub kc: f64,
    pub root_depth_cm: f64,
    pub precipitation_mm: f64,
    #[serde(default)]
    pub crop_name: String,
    #[serde(default)]
    pub crop_stage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropStatus {
    Optimal,
    Moderate,
    Critical,
}

impl CropStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropStatus::Optimal => "Optimal",
            CropStatus::Moderate => "Moderate",
            CropStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for CropStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Water depths in millimetres for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub et0: f64,
    pub mode: CurrentDepthMode,
    pub total_available_water_mm: f64,
    /// Readily available water between field capacity and the threshold.
    pub net_water_mm: f64,
    pub etc_mm: f64,
    pub current_water_mm: f64,
    pub daily_balance_mm: f64,
    pub water_deficit_mm: Option<f64>,
    pub water_surplus_mm: Option<f64>,
    pub irrigate: bool,
    pub recommended_irrigation_mm: Option<f64>,
    pub crop_status: CropStatus,
    pub crop_name: String,
    pub crop_stage: String,
}
