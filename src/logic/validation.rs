use crate::models::{BalanceInputs, ObservationField, ObservationSet};
use std::ops::Deref;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservationViolation {
    #[error("{field} must be a finite number")]
    NotFinite { field: ObservationField },

    #[error("t_min ({t_min}) must be lower than t_max ({t_max})")]
    TemperatureOrder { t_min: f64, t_max: f64 },

    #[error("{field} ({value}) must be between 0 and 100 %")]
    HumidityOutOfRange { field: ObservationField, value: f64 },

    #[error("rh_min ({rh_min}) must be lower than rh_max ({rh_max})")]
    HumidityOrder { rh_min: f64, rh_max: f64 },

    #[error("{field} ({value}) cannot be negative")]
    Negative { field: ObservationField, value: f64 },

    #[error("lat ({value}) must be between -90 and 90 degrees")]
    LatitudeOutOfRange { value: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BalanceViolation {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} ({value}) must be a fraction between 0 and 1")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("wilting point ({wilting_point}) must be lower than field capacity ({field_capacity})")]
    WiltingPointAboveCapacity {
        wilting_point: f64,
        field_capacity: f64,
    },

    #[error(
        "irrigation threshold ({threshold}) must lie between the wilting point ({wilting_point}) and field capacity ({field_capacity})"
    )]
    ThresholdOutOfRange {
        threshold: f64,
        wilting_point: f64,
        field_capacity: f64,
    },

    #[error("current moisture ({current}) cannot exceed field capacity ({field_capacity})")]
    MoistureAboveCapacity { current: f64, field_capacity: f64 },

    #[error("{field} ({value}) must be greater than zero")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} ({value}) cannot be negative")]
    Negative { field: &'static str, value: f64 },
}

/// An observation set that passed [`validate_observations`]. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedObservations(ObservationSet);

impl ValidatedObservations {
    pub fn into_inner(self) -> ObservationSet {
        self.0
    }
}

impl Deref for ValidatedObservations {
    type Target = ObservationSet;

    fn deref(&self) -> &ObservationSet {
        &self.0
    }
}

/// Checks every supplied field; absent fields are not an error here.
pub fn validate_observations(
    observations: &ObservationSet,
) -> Result<ValidatedObservations, ObservationViolation> {
    for field in ObservationField::ALL {
        if let Some(value) = observations.get(field) {
            if !value.is_finite() {
                return Err(ObservationViolation::NotFinite { field });
            }
        }
    }

    if let (Some(t_min), Some(t_max)) = (observations.t_min, observations.t_max) {
        if t_min >= t_max {
            return Err(ObservationViolation::TemperatureOrder { t_min, t_max });
        }
    }

    for field in [ObservationField::RhMin, ObservationField::RhMax] {
        if let Some(value) = observations.get(field) {
            if !(0.0..=100.0).contains(&value) {
                return Err(ObservationViolation::HumidityOutOfRange { field, value });
            }
        }
    }

    if let (Some(rh_min), Some(rh_max)) = (observations.rh_min, observations.rh_max) {
        if rh_min >= rh_max {
            return Err(ObservationViolation::HumidityOrder { rh_min, rh_max });
        }
    }

    for field in [ObservationField::Rs, ObservationField::Uz] {
        if let Some(value) = observations.get(field) {
            if value < 0.0 {
                return Err(ObservationViolation::Negative { field, value });
            }
        }
    }

    if let Some(value) = observations.lat {
        if !(-90.0..=90.0).contains(&value) {
            return Err(ObservationViolation::LatitudeOutOfRange { value });
        }
    }

    Ok(ValidatedObservations(observations.clone()))
}

pub fn validate_balance_inputs(inputs: &BalanceInputs) -> Result<(), BalanceViolation> {
    let numbers = [
        ("current_moisture", inputs.current_moisture),
        ("field_capacity", inputs.field_capacity),
        ("wilting_point", inputs.wilting_point),
        ("irrigation_threshold", inputs.irrigation_threshold),
        ("kc", inputs.kc),
        ("root_depth_cm", inputs.root_depth_cm),
        ("precipitation_mm", inputs.precipitation_mm),
    ];
    if let Some((field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
        return Err(BalanceViolation::NotFinite { field: *field });
    }

    // The four moisture values are the first four entries.
    for (field, value) in &numbers[..4] {
        if !(0.0..=1.0).contains(value) {
            return Err(BalanceViolation::FractionOutOfRange {
                field: *field,
                value: *value,
            });
        }
    }

    if inputs.wilting_point >= inputs.field_capacity {
        return Err(BalanceViolation::WiltingPointAboveCapacity {
            wilting_point: inputs.wilting_point,
            field_capacity: inputs.field_capacity,
        });
    }

    if inputs.irrigation_threshold < inputs.wilting_point
        || inputs.irrigation_threshold > inputs.field_capacity
    {
        return Err(BalanceViolation::ThresholdOutOfRange {
            threshold: inputs.irrigation_threshold,
            wilting_point: inputs.wilting_point,
            field_capacity: inputs.field_capacity,
        });
    }

    if inputs.current_moisture > inputs.field_capacity {
        return Err(BalanceViolation::MoistureAboveCapacity {
            current: inputs.current_moisture,
            field_capacity: inputs.field_capacity,
        });
    }

    if inputs.kc <= 0.0 {
        return Err(BalanceViolation::NotPositive {
            field: "kc",
            value: inputs.kc,
        });
    }

    if inputs.root_depth_cm <= 0.0 {
        return Err(BalanceViolation::NotPositive {
            field: "root_depth_cm",
            value: inputs.root_depth_cm,
        });
    }

    if inputs.precipitation_mm < 0.0 {
        return Err(BalanceViolation::Negative {
            field: "precipitation_mm",
            value: inputs.precipitation_mm,
        });
    }

    Ok(())
}
