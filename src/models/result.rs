use super::method::{MethodCategory, MethodDescriptor};
use super::observation::{ObservationField, ObservationSet};
use serde::{Deserialize, Serialize};

/// Why a single method produced no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodFailure {
    MissingObservation { field: ObservationField },
    UnknownMethod,
    EvaluationFailed { detail: String },
    TimedOut { after_ms: u64 },
}

impl std::fmt::Display for MethodFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodFailure::MissingObservation { field } => {
                write!(f, "missing observation '{}' ({})", field, field.description())
            }
            MethodFailure::UnknownMethod => write!(f, "method is not in the catalog"),
            MethodFailure::EvaluationFailed { detail } => write!(f, "evaluation failed: {}", detail),
            MethodFailure::TimedOut { after_ms } => {
                write!(f, "formula did not return within {} ms", after_ms)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResult {
    /// ET₀ in mm/day, rounded to 3 decimals.
    Success { value: f64 },
    Failure { reason: MethodFailure },
}

impl MethodResult {
    pub fn success(value: f64) -> Self {
        MethodResult::Success { value }
    }

    pub fn failure(reason: MethodFailure) -> Self {
        MethodResult::Failure { reason }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MethodResult::Success { value } => Some(*value),
            MethodResult::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&MethodFailure> {
        match self {
            MethodResult::Success { .. } => None,
            MethodResult::Failure { reason } => Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResult::Success { .. })
    }

    pub fn status_str(&self) -> &'static str {
        match self {
            MethodResult::Success { .. } => "ok",
            MethodResult::Failure { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodOutcome {
    pub method_id: String,
    pub display_name: String,
    pub category: Option<MethodCategory>,
    pub result: MethodResult,
}

impl MethodOutcome {
    pub fn for_method(descriptor: &MethodDescriptor, result: MethodResult) -> Self {
        Self {
            method_id: descriptor.id.to_string(),
            display_name: descriptor.display_name.to_string(),
            category: Some(descriptor.category),
            result,
        }
    }

    pub fn unknown(method_id: &str) -> Self {
        Self {
            method_id: method_id.to_string(),
            display_name: method_id.to_string(),
            category: None,
            result: MethodResult::failure(MethodFailure::UnknownMethod),
        }
    }
}

/// Outcome of one dispatch: every requested method, in request order.
/// A new dispatch produces a new report; reports are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    pub observations: ObservationSet,
    pub outcomes: Vec<MethodOutcome>,
}

impl ComparativeReport {
    pub fn new(observations: ObservationSet, outcomes: Vec<MethodOutcome>) -> Self {
        Self {
            observations,
            outcomes,
        }
    }

    pub fn get(&self, method_id: &str) -> Option<&MethodOutcome> {
        self.outcomes.iter().find(|o| o.method_id == method_id)
    }

    pub fn successes(&self) -> impl Iterator<Item = (&MethodOutcome, f64)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.value().map(|v| (o, v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&MethodOutcome, &MethodFailure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.failure_reason().map(|r| (o, r)))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Statistics {
    Available {
        mean: f64,
        min: f64,
        max: f64,
        std_dev: f64,
    },
    /// No method succeeded.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub statistics: Statistics,
}

/// Evaporative demand bands used when interpreting an ET₀ value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DemandClass {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl DemandClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandClass::Low => "Low",
            DemandClass::Moderate => "Moderate",
            DemandClass::High => "High",
            DemandClass::VeryHigh => "Very High",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DemandClass::Low => "Low evaporative demand",
            DemandClass::Moderate => "Typical evaporative demand for temperate climates",
            DemandClass::High => "High evaporative demand, warm climate",
            DemandClass::VeryHigh => "Very high evaporative demand, arid conditions",
        }
    }
}

impl std::fmt::Display for DemandClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, result: MethodResult) -> MethodOutcome {
        MethodOutcome {
            method_id: id.to_string(),
            display_name: id.to_string(),
            category: None,
            result,
        }
    }

    #[test]
    fn report_splits_successes_and_failures() {
        let report = ComparativeReport::new(
            ObservationSet::default(),
            vec![
                outcome("a", MethodResult::success(4.2)),
                outcome("b", MethodResult::failure(MethodFailure::UnknownMethod)),
                outcome("c", MethodResult::success(3.9)),
            ],
        );

        let ok: Vec<&str> = report.successes().map(|(o, _)| o.method_id.as_str()).collect();
        assert_eq!(ok, vec!["a", "c"]);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn failure_messages_name_the_field() {
        let reason = MethodFailure::MissingObservation {
            field: ObservationField::Rs,
        };
        let msg = reason.to_string();
        assert!(msg.contains("rs"));
        assert!(msg.contains("Solar radiation"));
    }

    #[test]
    fn method_result_serializes_with_status_tag() {
        let json = serde_json::to_string(&MethodResult::success(5.123)).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("5.123"));
    }
}
