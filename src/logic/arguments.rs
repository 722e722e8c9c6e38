use super::validation::ValidatedObservations;
use crate::error::{Et0Error, Result};
use crate::formulas::{arg, FormulaArgs};
use crate::models::{ArgumentShape, MethodDescriptor, ObservationField, ObservationSet};

type Assembled = std::result::Result<FormulaArgs, ObservationField>;

fn need(obs: &ObservationSet, field: ObservationField) -> std::result::Result<f64, ObservationField> {
    obs.get(field).ok_or(field)
}

fn tmean(obs: &ObservationSet) -> std::result::Result<f64, ObservationField> {
    let tmin = need(obs, ObservationField::TMin)?;
    let tmax = need(obs, ObservationField::TMax)?;
    Ok((tmax + tmin) / 2.0)
}

fn rh_mean(obs: &ObservationSet) -> std::result::Result<f64, ObservationField> {
    obs.mean_humidity().ok_or(ObservationField::RhMin)
}

fn lat_radians(obs: &ObservationSet) -> std::result::Result<f64, ObservationField> {
    Ok(need(obs, ObservationField::Lat)?.to_radians())
}

impl ArgumentShape {
    /// Shapes that reduce humidity to a daily mean, which either bound
    /// alone can supply.
    fn uses_mean_humidity(&self) -> bool {
        matches!(
            self,
            ArgumentShape::RadiationHumidity | ArgumentShape::HumidityMean
        )
    }

    fn is_satisfied(&self, obs: &ObservationSet, field: ObservationField) -> bool {
        match field {
            ObservationField::RhMin | ObservationField::RhMax if self.uses_mean_humidity() => {
                obs.mean_humidity().is_some()
            }
            _ => obs.get(field).is_some(),
        }
    }

    fn assemble(&self, obs: &ObservationSet) -> Assembled {
        let doy = obs.day_of_year() as f64;
        let args = match self {
            ArgumentShape::Combination => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::TMAX, need(obs, ObservationField::TMax)?)
                .with(arg::TMIN, need(obs, ObservationField::TMin)?)
                .with(arg::RHMAX, need(obs, ObservationField::RhMax)?)
                .with(arg::RHMIN, need(obs, ObservationField::RhMin)?)
                .with(arg::RS, need(obs, ObservationField::Rs)?)
                .with(arg::WIND, need(obs, ObservationField::Uz)?)
                .with(arg::ELEVATION, need(obs, ObservationField::Z)?)
                .with(arg::LAT, lat_radians(obs)?)
                .with(arg::DOY, doy),
            ArgumentShape::NetRadiation => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::TMAX, need(obs, ObservationField::TMax)?)
                .with(arg::TMIN, need(obs, ObservationField::TMin)?)
                .with(arg::RHMAX, need(obs, ObservationField::RhMax)?)
                .with(arg::RHMIN, need(obs, ObservationField::RhMin)?)
                .with(arg::RS, need(obs, ObservationField::Rs)?)
                .with(arg::ELEVATION, need(obs, ObservationField::Z)?)
                .with(arg::LAT, lat_radians(obs)?)
                .with(arg::DOY, doy),
            ArgumentShape::RadiationElevation => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::RS, need(obs, ObservationField::Rs)?)
                .with(arg::ELEVATION, need(obs, ObservationField::Z)?),
            ArgumentShape::RadiationHumidity => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::RS, need(obs, ObservationField::Rs)?)
                .with(arg::RH, rh_mean(obs)?),
            ArgumentShape::Radiation => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::RS, need(obs, ObservationField::Rs)?),
            ArgumentShape::TemperatureRange => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::TMAX, need(obs, ObservationField::TMax)?)
                .with(arg::TMIN, need(obs, ObservationField::TMin)?)
                .with(arg::LAT, lat_radians(obs)?)
                .with(arg::DOY, doy),
            ArgumentShape::TemperatureDaylength => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::LAT, lat_radians(obs)?)
                .with(arg::DOY, doy),
            ArgumentShape::TemperatureSite => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::TMIN, need(obs, ObservationField::TMin)?)
                .with(arg::ELEVATION, need(obs, ObservationField::Z)?)
                .with(arg::LAT_DEG, need(obs, ObservationField::Lat)?),
            ArgumentShape::HumidityMean => FormulaArgs::new()
                .with(arg::TMEAN, tmean(obs)?)
                .with(arg::RH, rh_mean(obs)?),
            ArgumentShape::HumidityAfternoon => FormulaArgs::new()
                .with(arg::TMAX, need(obs, ObservationField::TMax)?)
                .with(arg::RHMIN, need(obs, ObservationField::RhMin)?),
        };
        Ok(args)
    }
}

/// Turns validated observations into the argument bundle one method needs.
pub struct ArgumentBuilder;

impl ArgumentBuilder {
    /// Fails with `MissingObservation` before anything reaches the formula
    /// library.
    pub fn build(
        observations: &ValidatedObservations,
        descriptor: &MethodDescriptor,
    ) -> Result<FormulaArgs> {
        let missing = |field: ObservationField| Et0Error::MissingObservation {
            method: descriptor.id.to_string(),
            field,
        };

        if let Some(field) = descriptor
            .required_observations
            .iter()
            .find(|f| !descriptor.argument_shape.is_satisfied(observations, **f))
        {
            return Err(missing(*field));
        }

        descriptor.argument_shape.assemble(observations).map_err(missing)
    }
}
