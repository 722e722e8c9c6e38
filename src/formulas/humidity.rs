//! Humidity-based formulas.

use super::meteo;
use super::{arg, FormulaArgs, FormulaError};

fn check_humidity(name: &'static str, rh: f64) -> Result<(), FormulaError> {
    if !(0.0..=100.0).contains(&rh) {
        return Err(FormulaError::InvalidArgument {
            name,
            reason: format!("{} is not a percentage", rh),
        });
    }
    Ok(())
}

pub fn romanenko(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let rh = args.get(arg::RH)?;
    check_humidity(arg::RH, rh)?;

    let et = 4.5 * (1.0 + tmean / 25.0).powi(2) * (1.0 - rh / 100.0);
    Ok(et.max(0.0))
}

pub fn schendel(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let rh = args.get(arg::RH)?;
    check_humidity(arg::RH, rh)?;

    if rh == 0.0 {
        return Err(FormulaError::InvalidArgument {
            name: arg::RH,
            reason: "Schendel is undefined for completely dry air".into(),
        });
    }
    Ok((16.0 * tmean / rh).max(0.0))
}

/// Haude, from the afternoon saturation deficit (hPa).
pub fn haude(args: &FormulaArgs) -> Result<f64, FormulaError> {
    const FACTOR: f64 = 0.26;

    let tmax = args.get(arg::TMAX)?;
    let rhmin = args.get(arg::RHMIN)?;
    check_humidity(arg::RHMIN, rhmin)?;

    let es_hpa = meteo::saturation_vapour_pressure(tmax) * 10.0;
    Ok((FACTOR * es_hpa * (1.0 - rhmin / 100.0)).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::tests::summer_args;

    #[test]
    fn saturated_air_stops_romanenko() {
        let args = summer_args().with(arg::RH, 100.0);
        assert_eq!(romanenko(&args).unwrap(), 0.0);
    }

    #[test]
    fn schendel_rejects_zero_humidity() {
        let args = summer_args().with(arg::RH, 0.0);
        assert!(matches!(
            schendel(&args),
            Err(FormulaError::InvalidArgument { name: "rh", .. })
        ));
    }

    #[test]
    fn haude_uses_afternoon_values_only() {
        let args = FormulaArgs::new()
            .with(arg::TMAX, 21.5)
            .with(arg::RHMIN, 63.0);
        let et = haude(&args).unwrap();
        assert!((2.0..3.0).contains(&et), "got {}", et);
    }

    #[test]
    fn humidity_outside_percent_is_invalid() {
        let args = summer_args().with(arg::RH, 140.0);
        assert!(romanenko(&args).is_err());
    }
}
