//! Temperature-only formulas. Radiation, where needed, is extraterrestrial.

use super::meteo::{self, LAMBDA};
use super::{arg, FormulaArgs, FormulaError};

/// Hargreaves-Samani (1985).
pub fn hargreaves(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let tmax = args.get(arg::TMAX)?;
    let tmin = args.get(arg::TMIN)?;
    let lat = args.get(arg::LAT)?;
    let doy = args.get(arg::DOY)?;

    if tmax < tmin {
        return Err(FormulaError::InvalidArgument {
            name: arg::TMAX,
            reason: "daily maximum is below the minimum".into(),
        });
    }
    let ra = meteo::extraterrestrial_radiation(lat, doy);
    let et = 0.0023 * (tmean + 17.8) * (tmax - tmin).sqrt() * ra * 0.408;
    Ok(et.max(0.0))
}

/// FAO-24 Blaney-Criddle without climatic adjustment.
pub fn blaney_criddle(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let lat = args.get(arg::LAT)?;
    let doy = args.get(arg::DOY)?;

    // Share of annual daytime hours falling on this day, in percent.
    let p = 100.0 * meteo::daylight_hours(lat, doy) / (365.0 * 12.0);
    Ok((p * (0.46 * tmean + 8.13)).max(0.0))
}

/// Hamon (1961).
pub fn hamon(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let lat = args.get(arg::LAT)?;
    let doy = args.get(arg::DOY)?;

    let daylength = meteo::daylight_hours(lat, doy) / 12.0;
    let es_mbar = meteo::saturation_vapour_pressure(tmean) * 10.0;
    let saturated_density = 216.7 * es_mbar / (tmean + 273.3);
    Ok(0.1651 * daylength * saturated_density * 1.2)
}

pub fn oudin(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let lat = args.get(arg::LAT)?;
    let doy = args.get(arg::DOY)?;

    if tmean + 5.0 <= 0.0 {
        return Ok(0.0);
    }
    let ra = meteo::extraterrestrial_radiation(lat, doy);
    Ok(ra / LAMBDA * (tmean + 5.0) / 100.0)
}

/// Linacre (1977). Latitude in degrees; dew point taken as the daily minimum.
pub fn linacre(args: &FormulaArgs) -> Result<f64, FormulaError> {
    let tmean = args.get(arg::TMEAN)?;
    let tmin = args.get(arg::TMIN)?;
    let elevation = args.get(arg::ELEVATION)?;
    let lat_deg = args.get(arg::LAT_DEG)?;

    if tmean >= 80.0 {
        return Err(FormulaError::InvalidArgument {
            name: arg::TMEAN,
            reason: "outside the range of the Linacre equation".into(),
        });
    }
    let tm = tmean + 0.006 * elevation;
    let et = (500.0 * tm / (100.0 - lat_deg.abs()) + 15.0 * (tmean - tmin)) / (80.0 - tmean);
    Ok(et.max(0.0))
}
