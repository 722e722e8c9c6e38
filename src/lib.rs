pub mod config;
pub mod error;
pub mod formulas;
pub mod logic;
pub mod models;
pub mod render;

pub use config::Config;
pub use error::{Et0Error, Result};
