use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "et0ops",
    version,
    about = "Compare reference evapotranspiration methods and run a daily water balance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the method catalog
    Methods {
        /// Only show one category (e.g. temperature-only)
        #[arg(long)]
        category: Option<String>,
    },
    /// Evaluate ET₀ methods for one day of observations
    Compute(ComputeArgs),
    /// Run the water balance for a known ET₀ value
    Balance(BalanceArgs),
    /// Interactive setup
    Init,
    /// Validate config and probe the formula library
    Check,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ObservationArgs {
    /// Minimum air temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    pub t_min: Option<f64>,

    /// Maximum air temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    pub t_max: Option<f64>,

    /// Minimum relative humidity (%)
    #[arg(long)]
    pub rh_min: Option<f64>,

    /// Maximum relative humidity (%)
    #[arg(long)]
    pub rh_max: Option<f64>,

    /// Solar radiation (MJ/m²/day)
    #[arg(long)]
    pub rs: Option<f64>,

    /// Wind speed at 2 m (m/s)
    #[arg(long)]
    pub uz: Option<f64>,

    /// Elevation (m); defaults to the configured site
    #[arg(long, allow_negative_numbers = true)]
    pub z: Option<f64>,

    /// Latitude (decimal degrees); defaults to the configured site
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Calculation date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub observations: ObservationArgs,

    /// Comma-separated method ids
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    pub methods: Vec<String>,

    /// Evaluate every catalogued method
    #[arg(long)]
    pub all: bool,

    /// Method whose value feeds the water balance
    #[arg(long)]
    pub select: Option<String>,

    /// Current soil moisture (volumetric fraction); enables the balance
    #[arg(long)]
    pub moisture: Option<f64>,

    /// Precipitation today (mm)
    #[arg(long, default_value_t = 0.0)]
    pub precipitation: f64,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Skip the confirmation prompt for large method sets
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BalanceArgs {
    /// Reference evapotranspiration (mm/day)
    #[arg(long)]
    pub et0: f64,

    /// Current soil moisture (volumetric fraction)
    #[arg(long)]
    pub moisture: f64,

    /// Precipitation today (mm)
    #[arg(long, default_value_t = 0.0)]
    pub precipitation: f64,

    /// Override the configured current-depth mode
    #[arg(long)]
    pub mode: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
