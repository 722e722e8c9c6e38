//! Combination (energy balance + aerodynamic) formulas.

use super::meteo::{self, NetRadiationInputs, LAMBDA};
use super::{arg, FormulaArgs, FormulaError};

/// Terms shared by every combination formula for one day.
struct DayTerms {
    tmean: f64,
    wind: f64,
    delta: f64,
    gamma: f64,
    vpd: f64,
    rn: f64,
    pressure: f64,
    doy: f64,
}

impl DayTerms {
    fn from_args(args: &FormulaArgs) -> Result<Self, FormulaError> {
        let tmean = args.get(arg::TMEAN)?;
        let tmin = args.get(arg::TMIN)?;
        let tmax = args.get(arg::TMAX)?;
        let rhmin = args.get(arg::RHMIN)?;
        let rhmax = args.get(arg::RHMAX)?;
        let rs = args.get(arg::RS)?;
        let wind = args.get(arg::WIND)?;
        let elevation = args.get(arg::ELEVATION)?;
        let lat = args.get(arg::LAT)?;
        let doy = args.get(arg::DOY)?;

        let es = meteo::mean_saturation_vapour_pressure(tmin, tmax);
        let ea = meteo::actual_vapour_pressure(tmin, tmax, rhmin, rhmax);
        let rn = meteo::net_radiation(&NetRadiationInputs {
            tmin,
            tmax,
            ea,
            rs,
            elevation,
            lat,
            doy,
        });

        Ok(Self {
            tmean,
            wind,
            delta: meteo::vapour_pressure_slope(tmean),
            gamma: meteo::psychrometric_constant(elevation),
            vpd: (es - ea).max(0.0),
            rn,
            pressure: meteo::atmospheric_pressure(elevation),
            doy,
        })
    }

    /// Standardized reference form with numerator constant `cn` and
    /// denominator constant `cd`. Soil heat flux is zero at daily step.
    fn standardized(&self, cn: f64, cd: f64) -> f64 {
        let num = 0.408 * self.delta * self.rn
            + self.gamma * cn / (self.tmean + 273.0) * self.wind * self.vpd;
        let den = self.delta + self.gamma * (1.0 + cd * self.wind);
        num / den
    }

    /// Penman form with wind function `w` (dimensionless, multiplies 6.43).
    fn penman_with_wind_function(&self, w: f64) -> f64 {
        let num = self.delta * self.rn + self.gamma * 6.43 * w * self.vpd;
        num / (self.delta + self.gamma) / LAMBDA
    }
}

pub fn pm_fao56(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let day = DayTerms::from_args(args)?;
    Ok(day.standardized(900.0, 0.34))
}

/// ASCE standardized equation, tall (alfalfa) reference.
pub fn pm_asce(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let day = DayTerms::from_args(args)?;
    Ok(day.standardized(1600.0, 0.38))
}

/// Penman-Monteith in resistance form, grass with rs = 70 s/m.
pub fn pm(args: &FormulaArgs) -> Result<f64, FormulaError> {
    const SURFACE_RESISTANCE: f64 = 70.0;
    const CP: f64 = 1.013e-3;

    let day = DayTerms::from_args(args)?;
    if day.wind <= 0.0 {
        return Err(FormulaError::InvalidArgument {
            name: arg::WIND,
            reason: "aerodynamic resistance is undefined for calm air".into(),
        });
    }
    let ra = 208.0 / day.wind;
    let air_density = day.pressure / (1.01 * (day.tmean + 273.0) * 0.287);
    let aero = air_density * CP * day.vpd / ra * 86_400.0;

    let et = (day.delta * day.rn + aero)
        / (day.delta + day.gamma * (1.0 + SURFACE_RESISTANCE / ra))
        / LAMBDA;
    Ok(et.max(0.0))
}

/// Penman (1948) with the 1956 wind function.
pub fn penman(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let day = DayTerms::from_args(args)?;
    Ok(day.penman_with_wind_function(1.0 + 0.536 * day.wind).max(0.0))
}

/// FAO-24 Penman, adjustment factor c = 1.
pub fn fao_24(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let day = DayTerms::from_args(args)?;
    let w = day.delta / (day.delta + day.gamma);
    let wind_km_day = day.wind * 86.4;
    let fu = 0.27 * (1.0 + wind_km_day / 100.0);
    // Vapour pressure deficit in mbar.
    let et = w * day.rn / LAMBDA + (1.0 - w) * fu * day.vpd * 10.0;
    Ok(et.max(0.0))
}

/// Kimberly-Penman with day-of-year dependent wind coefficients.
pub fn kimberly_penman(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let day = DayTerms::from_args(args)?;
    let j = day.doy;
    let aw = 0.4 + 0.14 * (-((j - 173.0) / 58.0).powi(2)).exp();
    let bw = 0.605 + 0.345 * (-((j - 243.0) / 80.0).powi(2)).exp();
    Ok(day.penman_with_wind_function(aw * day.wind + bw).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::tests::summer_args;

    #[test]
    fn fao56_matches_worked_example() {
        // FAO-56 example 18 (Uccle, 6 July): 3.9 mm/day
        let et = pm_fao56(&summer_args()).unwrap();
        assert!((et - 3.9).abs() < 0.15, "got {}", et);
    }

    #[test]
    fn tall_reference_exceeds_short_reference() {
        let args = summer_args();
        assert!(pm_asce(&args).unwrap() > pm_fao56(&args).unwrap());
    }

    #[test]
    fn resistance_form_tracks_standardized_form() {
        let args = summer_args();
        let diff = (pm(&args).unwrap() - pm_fao56(&args).unwrap()).abs();
        assert!(diff < 0.3, "diff {}", diff);
    }

    #[test]
    fn resistance_form_rejects_calm_air() {
        let args = summer_args().with(arg::WIND, 0.0);
        assert!(matches!(
            pm(&args),
            Err(FormulaError::InvalidArgument { name: "wind", .. })
        ));
        // The standardized form handles calm air.
        assert!(pm_fao56(&args).unwrap() > 0.0);
    }

    #[test]
    fn stronger_wind_raises_penman_estimate() {
        let calm = penman(&summer_args().with(arg::WIND, 0.5)).unwrap();
        let windy = penman(&summer_args().with(arg::WIND, 5.0)).unwrap();
        assert!(windy > calm);
    }

    #[test]
    fn missing_wind_is_reported() {
        let mut args = FormulaArgs::new();
        for name in summer_args().names().filter(|n| *n != arg::WIND) {
            args.insert(name, summer_args().get(name).unwrap());
        }
        assert_eq!(
            fao_24(&args).unwrap_err(),
            FormulaError::MissingArgument(arg::WIND)
        );
        assert!(kimberly_penman(&summer_args()).is_ok());
    }
}
