//! Formula library seam.
//!
//! The dispatcher only knows a library by symbol name and a bundle of named
//! arguments. [`BuiltinLibrary`] is the native implementation shipped with
//! the crate; anything else implementing [`FormulaLibrary`] can replace it.

pub mod combination;
pub mod humidity;
pub mod meteo;
pub mod radiation;
pub mod temperature;

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Argument names understood by formula symbols.
pub mod arg {
    pub const TMEAN: &str = "tmean";
    pub const TMAX: &str = "tmax";
    pub const TMIN: &str = "tmin";
    pub const RH: &str = "rh";
    pub const RHMAX: &str = "rhmax";
    pub const RHMIN: &str = "rhmin";
    pub const RS: &str = "rs";
    pub const WIND: &str = "wind";
    pub const ELEVATION: &str = "elevation";
    /// Latitude in radians.
    pub const LAT: &str = "lat";
    /// Latitude in decimal degrees.
    pub const LAT_DEG: &str = "lat_deg";
    pub const DOY: &str = "doy";
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("missing argument '{0}'")]
    MissingArgument(&'static str),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("unknown formula symbol '{0}'")]
    UnknownSymbol(String),

    #[error("formula returned a non-finite value")]
    NonFinite,

    #[error("formula library unavailable: {0}")]
    Unavailable(String),
}

/// Named argument bundle passed to a formula symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormulaArgs {
    values: BTreeMap<&'static str, f64>,
}

impl FormulaArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: f64) -> Self {
        self.values.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &'static str, value: f64) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &'static str) -> Result<f64, FormulaError> {
        self.values
            .get(name)
            .copied()
            .ok_or(FormulaError::MissingArgument(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub trait FormulaLibrary: Send + Sync {
    fn name(&self) -> &str;

    /// Called once before any dispatch.
    fn probe(&self) -> Result<(), FormulaError>;

    /// Daily ET₀ in mm/day for `symbol`.
    fn invoke(&self, symbol: &str, args: &FormulaArgs) -> Result<f64, FormulaError>;
}

type FormulaFn = fn(&FormulaArgs) -> Result<f64, FormulaError>;

const SYMBOLS: &[(&str, FormulaFn)] = &[
    ("pm_fao56", combination::pm_fao56),
    ("pm_asce", combination::pm_asce),
    ("pm", combination::pm),
    ("penman", combination::penman),
    ("fao_24", combination::fao_24),
    ("kimberly_penman", combination::kimberly_penman),
    ("priestley_taylor", radiation::priestley_taylor),
    ("makkink", radiation::makkink),
    ("turc", radiation::turc),
    ("jensen_haise", radiation::jensen_haise),
    ("abtew", radiation::abtew),
    ("mcguinness_bordne", radiation::mcguinness_bordne),
    ("hargreaves", temperature::hargreaves),
    ("blaney_criddle", temperature::blaney_criddle),
    ("hamon", temperature::hamon),
    ("oudin", temperature::oudin),
    ("linacre", temperature::linacre),
    ("romanenko", humidity::romanenko),
    ("schendel", humidity::schendel),
    ("haude", humidity::haude),
];

/// Native daily ET₀ formulas (FAO-56 conventions, SI units).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLibrary;

impl BuiltinLibrary {
    pub fn new() -> Self {
        Self
    }

    pub fn symbols() -> impl Iterator<Item = &'static str> {
        SYMBOLS.iter().map(|(name, _)| *name)
    }
}

impl FormulaLibrary for BuiltinLibrary {
    fn name(&self) -> &str {
        "builtin"
    }

    fn probe(&self) -> Result<(), FormulaError> {
        if SYMBOLS.is_empty() {
            return Err(FormulaError::Unavailable("no formula symbols compiled in".into()));
        }
        Ok(())
    }

    fn invoke(&self, symbol: &str, args: &FormulaArgs) -> Result<f64, FormulaError> {
        let (_, formula) = SYMBOLS
            .iter()
            .find(|(name, _)| *name == symbol)
            .ok_or_else(|| FormulaError::UnknownSymbol(symbol.to_string()))?;

        let value = formula(args)?;
        if !value.is_finite() {
            return Err(FormulaError::NonFinite);
        }
        Ok(value)
    }
}
