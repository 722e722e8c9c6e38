use crate::error::{Et0Error, Result};
use crate::models::{ComparativeReport, DemandClass, Statistics, Summary};

/// Success/failure counts plus descriptive statistics over the successful
/// values. Standard deviation is the population form.
pub fn summarize(report: &ComparativeReport) -> Summary {
    let values: Vec<f64> = report.successes().map(|(_, v)| v).collect();
    let succeeded = values.len();
    let failed = report.len() - succeeded;

    let statistics = if values.is_empty() {
        Statistics::Unavailable
    } else {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Statistics::Available {
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        }
    };

    Summary {
        succeeded,
        failed,
        statistics,
    }
}

pub fn select(report: &ComparativeReport, method_id: &str) -> Result<f64> {
    report
        .get(method_id)
        .and_then(|o| o.result.value())
        .ok_or_else(|| Et0Error::MethodNotAvailable(method_id.to_string()))
}

/// Keeps the previous choice while it still has a value, otherwise falls
/// back to the first successful method.
pub fn resolve_selection(report: &ComparativeReport, previous: Option<&str>) -> Option<String> {
    if let Some(id) = previous {
        if select(report, id).is_ok() {
            return Some(id.to_string());
        }
        tracing::debug!("Previous selection '{}' has no value, falling back", id);
    }

    report.successes().next().map(|(o, _)| o.method_id.clone())
}

pub fn classify_demand(et0: f64) -> DemandClass {
    if et0 < 2.0 {
        DemandClass::Low
    } else if et0 < 4.0 {
        DemandClass::Moderate
    } else if et0 < 6.0 {
        DemandClass::High
    } else {
        DemandClass::VeryHigh
    }
}
