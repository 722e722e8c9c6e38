use crate::logic::validation::{BalanceViolation, ObservationViolation};
use crate::models::ObservationField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Et0Error {
    #[error("Missing observation: {method} requires '{field}' ({})", .field.description())]
    MissingObservation {
        method: String,
        field: ObservationField,
    },

    #[error("Invalid observation: {0}")]
    InvalidObservation(#[from] ObservationViolation),

    #[error("Unknown method: '{0}' is not in the method catalog")]
    UnknownMethod(String),

    #[error("Formula library unavailable: {0}")]
    FormulaLibraryUnavailable(String),

    #[error("Formula evaluation failed for {method}: {detail}")]
    FormulaEvaluationFailed { method: String, detail: String },

    #[error("Invalid balance inputs: {0}")]
    InvalidBalanceInputs(#[from] BalanceViolation),

    #[error("Method not available: '{0}' has no successful result in this report")]
    MethodNotAvailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Et0Error>;
