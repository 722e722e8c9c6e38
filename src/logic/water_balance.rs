use super::validation::{validate_balance_inputs, BalanceViolation};
use crate::error::Result;
use crate::models::{BalanceInputs, BalanceReport, CropStatus, CurrentDepthMode};

/// mm of water per cm of soil per unit of volumetric fraction.
pub const ROOT_DEPTH_CM_TO_MM: f64 = 10.0;

/// Daily soil-water balance for a single root zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaterBalanceCalculator {
    mode: CurrentDepthMode,
}

impl WaterBalanceCalculator {
    pub fn new(mode: CurrentDepthMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CurrentDepthMode {
        self.mode
    }

    pub fn compute(&self, et0: f64, inputs: &BalanceInputs) -> Result<BalanceReport> {
        if !et0.is_finite() {
            return Err(BalanceViolation::NotFinite { field: "et0" }.into());
        }
        if et0 < 0.0 {
            return Err(BalanceViolation::Negative {
                field: "et0",
                value: et0,
            }
            .into());
        }
        validate_balance_inputs(inputs)?;

        let depth = inputs.root_depth_cm * ROOT_DEPTH_CM_TO_MM;
        let fc = inputs.field_capacity;

        let total_available = (fc - inputs.wilting_point) * depth;
        let net = (fc - inputs.irrigation_threshold) * depth;
        let etc = inputs.kc * et0;
        let daily_balance = inputs.precipitation_mm - etc;
        let depletion = (fc - inputs.current_moisture) * depth;

        let (current, deficit, surplus) = match self.mode {
            CurrentDepthMode::RemainingAfterEtc => (depletion - etc, None, None),
            CurrentDepthMode::DeficitSurplus => (
                depletion,
                Some((-daily_balance).max(0.0)),
                Some(daily_balance.max(0.0)),
            ),
        };

        let irrigate = inputs.current_moisture <= inputs.irrigation_threshold;
        // Bands apply to the depletion-based current depth as computed above.
        let crop_status = if current > net / 2.0 {
            CropStatus::Optimal
        } else if current > 0.0 {
            CropStatus::Moderate
        } else {
            CropStatus::Critical
        };

        tracing::debug!(
            "Balance ({}): etc={:.2} current={:.2} irrigate={}",
            self.mode,
            etc,
            current,
            irrigate
        );

        Ok(BalanceReport {
            et0,
            mode: self.mode,
            total_available_water_mm: total_available,
            net_water_mm: net,
            etc_mm: etc,
            current_water_mm: current,
            daily_balance_mm: daily_balance,
            water_deficit_mm: deficit,
            water_surplus_mm: surplus,
            irrigate,
            recommended_irrigation_mm: irrigate.then_some(net),
            crop_status,
            crop_name: inputs.crop_name.clone(),
            crop_stage: inputs.crop_stage.clone(),
        })
    }
}
