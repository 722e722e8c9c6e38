//! Shared FAO-56 meteorology terms. Temperatures in °C, pressures in kPa,
//! radiation in MJ/m²/day, latitude in radians.

use std::f64::consts::PI;

/// Latent heat of vaporization, MJ/kg.
pub const LAMBDA: f64 = 2.45;
/// Stefan-Boltzmann constant, MJ/K⁴/m²/day.
pub const SIGMA: f64 = 4.903e-9;
pub const SOLAR_CONSTANT: f64 = 0.0820;
/// Short grass albedo.
pub const ALBEDO: f64 = 0.23;

pub fn saturation_vapour_pressure(t: f64) -> f64 {
    0.6108 * ((17.27 * t) / (t + 237.3)).exp()
}

/// Mean saturation vapour pressure from the daily extremes.
pub fn mean_saturation_vapour_pressure(tmin: f64, tmax: f64) -> f64 {
    (saturation_vapour_pressure(tmin) + saturation_vapour_pressure(tmax)) / 2.0
}

/// Actual vapour pressure from RHmax/RHmin (FAO-56 eq. 17).
pub fn actual_vapour_pressure(tmin: f64, tmax: f64, rhmin: f64, rhmax: f64) -> f64 {
    (saturation_vapour_pressure(tmin) * rhmax / 100.0
        + saturation_vapour_pressure(tmax) * rhmin / 100.0)
        / 2.0
}

/// Slope of the saturation vapour pressure curve, kPa/°C.
pub fn vapour_pressure_slope(t: f64) -> f64 {
    4098.0 * saturation_vapour_pressure(t) / (t + 237.3).powi(2)
}

pub fn atmospheric_pressure(elevation: f64) -> f64 {
    101.3 * ((293.0 - 0.0065 * elevation) / 293.0).powf(5.26)
}

pub fn psychrometric_constant(elevation: f64) -> f64 {
    0.000665 * atmospheric_pressure(elevation)
}

fn solar_declination(doy: f64) -> f64 {
    0.409 * (2.0 * PI * doy / 365.0 - 1.39).sin()
}

fn sunset_hour_angle(lat: f64, doy: f64) -> f64 {
    let x = -lat.tan() * solar_declination(doy).tan();
    x.clamp(-1.0, 1.0).acos()
}

/// Extraterrestrial radiation Ra (FAO-56 eq. 21).
pub fn extraterrestrial_radiation(lat: f64, doy: f64) -> f64 {
    let dr = 1.0 + 0.033 * (2.0 * PI * doy / 365.0).cos();
    let delta = solar_declination(doy);
    let ws = sunset_hour_angle(lat, doy);
    24.0 * 60.0 / PI
        * SOLAR_CONSTANT
        * dr
        * (ws * lat.sin() * delta.sin() + lat.cos() * delta.cos() * ws.sin())
}

/// Maximum possible daylight hours.
pub fn daylight_hours(lat: f64, doy: f64) -> f64 {
    24.0 / PI * sunset_hour_angle(lat, doy)
}

pub fn clear_sky_radiation(ra: f64, elevation: f64) -> f64 {
    (0.75 + 2e-5 * elevation) * ra
}

pub struct NetRadiationInputs {
    pub tmin: f64,
    pub tmax: f64,
    pub ea: f64,
    pub rs: f64,
    pub elevation: f64,
    pub lat: f64,
    pub doy: f64,
}

/// Net radiation Rn = Rns - Rnl over grass.
pub fn net_radiation(i: &NetRadiationInputs) -> f64 {
    let rns = (1.0 - ALBEDO) * i.rs;
    let rso = clear_sky_radiation(extraterrestrial_radiation(i.lat, i.doy), i.elevation);
    let relative = if rso > 0.0 {
        (i.rs / rso).min(1.0)
    } else {
        1.0
    };
    let rnl = SIGMA
        * ((i.tmax + 273.16).powi(4) + (i.tmin + 273.16).powi(4))
        / 2.0
        * (0.34 - 0.14 * i.ea.max(0.0).sqrt())
        * (1.35 * relative - 0.35);
    rns - rnl
}
