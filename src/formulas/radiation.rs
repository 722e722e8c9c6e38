//! Radiation-based formulas.

use super::meteo::{self, NetRadiationInputs, LAMBDA};
use super::{arg, FormulaArgs, FormulaError};

pub fn priestley_taylor(args: &FormulaArgs) -> Result<f64, FormulaError> {
    const ALPHA: f64 = 1.26;

    let tmean = args.get(arg::TMEAN)?;
    let tmin = args.get(arg::TMIN)?;
    let tmax = args.get(arg::TMAX)?;
    let rhmin = args.get(arg::RHMIN)?;
    let rhmax = args.get(arg::RHMAX)?;
    let rs = args.get(arg::RS)?;
    let elevation = args.get(arg::ELEVATION)?;
    let lat = args.get(arg::LAT)?;
    let doy = args.get(arg::DOY)?;

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
    let delta = meteo::vapour_pressure_slope(tmean);
    let gamma = meteo::psychrometric_constant(elevation);

    Ok((ALPHA * delta / (delta + gamma) * rn / LAMBDA).max(0.0))
}

pub fn makkink(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let rs = args.get(arg::RS)?;
    let elevation = args.get(arg::ELEVATION)?;

    let delta = meteo::vapour_pressure_slope(tmean);
    let gamma = meteo::psychrometric_constant(elevation);
    Ok((0.61 * delta / (delta + gamma) * rs / LAMBDA - 0.12).max(0.0))
}

/// Turc (1961), with the arid-climate correction below 50 % humidity.
pub fn turc(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let rs = args.get(arg::RS)?;
    let rh = args.get(arg::RH)?;

    if tmean <= 0.0 {
        return Ok(0.0);
    }
    // Radiation in cal/cm²/day.
    let mut et = 0.013 * tmean / (tmean + 15.0) * (23.8856 * rs + 50.0);
    if rh < 50.0 {
        et *= 1.0 + (50.0 - rh) / 70.0;
    }
    Ok(et)
}

pub fn jensen_haise(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let rs = args.get(arg::RS)?;
    Ok((rs / LAMBDA * (0.025 * tmean + 0.08)).max(0.0))
}

pub fn abtew(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let rs = args.get(arg::RS)?;
    Ok(0.53 * rs / LAMBDA)
}

/// Uses extraterrestrial rather than measured radiation.
pub fn mcguinness_bordne(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let lat = args.get(arg::LAT)?;
    let doy = args.get(arg::DOY)?;

    let ra = meteo::extraterrestrial_radiation(lat, doy);
    Ok((ra / LAMBDA * (tmean + 5.0) / 68.0).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::tests::summer_args;

    #[test]
    fn makkink_never_negative_in_the_dark() {
        let args = summer_args().with(arg::RS, 0.0);
        assert_eq!(makkink(&args).unwrap(), 0.0);
    }

    #[test]
    fn turc_applies_arid_correction() {
        let humid = turc(&summer_args().with(arg::RH, 60.0)).unwrap();
        let dry = turc(&summer_args().with(arg::RH, 25.0)).unwrap();
        assert!((dry / humid - (1.0 + 25.0 / 70.0)).abs() < 1e-9);
    }

    #[test]
    fn turc_is_zero_below_freezing() {
        let args = summer_args().with(arg::TMEAN, -3.0);
        assert_eq!(turc(&args).unwrap(), 0.0);
    }

    #[test]
    fn abtew_scales_with_radiation() {
        let low = abtew(&summer_args().with(arg::RS, 10.0)).unwrap();
        let high = abtew(&summer_args().with(arg::RS, 20.0)).unwrap();
        assert!((high - 2.0 * low).abs() < 1e-9);
    }

    #[test]
    fn priestley_taylor_in_expected_range() {
        let et = priestley_taylor(&summer_args()).unwrap();
        assert!((3.5..5.5).contains(&et), "got {}", et);
    }

    #[test]
    fn mcguinness_bordne_needs_latitude() {
        let args = FormulaArgs::new()
            .with(arg::TMEAN, 20.0)
            .with(arg::DOY, 100.0);
        assert_eq!(
            mcguinness_bordne(&args).unwrap_err(),
            FormulaError::MissingArgument(arg::LAT)
        );
    }
}
