use super::balance::BalanceReport;
use super::observation::{ObservationField, ObservationSet};
use super::result::{ComparativeReport, MethodResult};
use chrono::{DateTime, Local};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One flat row for tabular output. Column order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRecord {
    fields: Vec<(&'static str, String)>,
}

impl ExportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: &'static str, value: impl Into<String>) {
        self.fields.push((column, value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ExportRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

fn fmt_mm(value: f64) -> String {
    format!("{:.3}", value)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt_mm).unwrap_or_default()
}

fn push_observations(record: &mut ExportRecord, observations: &ObservationSet) {
    for field in ObservationField::ALL {
        let value = observations
            .get(field)
            .map(|v| v.to_string())
            .unwrap_or_default();
        record.push(field.as_str(), value);
    }
}

impl ComparativeReport {
    /// One record per method. `exported_at` is supplied by the caller.
    pub fn export_records(&self, exported_at: DateTime<Local>) -> Vec<ExportRecord> {
        let stamp = exported_at.format(TIMESTAMP_FORMAT).to_string();

        self.outcomes
            .iter()
            .map(|outcome| {
                let mut record = ExportRecord::new();
                record.push("method_id", outcome.method_id.clone());
                record.push("method_name", outcome.display_name.clone());
                record.push(
                    "category",
                    outcome.category.map(|c| c.as_str()).unwrap_or_default(),
                );
                record.push("status", outcome.result.status_str());
                match &outcome.result {
                    MethodResult::Success { value } => {
                        record.push("et0_mm_day", fmt_mm(*value));
                        record.push("detail", "");
                    }
                    MethodResult::Failure { reason } => {
                        record.push("et0_mm_day", "");
                        record.push("detail", reason.to_string());
                    }
                }
                push_observations(&mut record, &self.observations);
                record.push("calculated_at", stamp.clone());
                record
            })
            .collect()
    }
}

impl BalanceReport {
    pub fn export_record(&self, exported_at: DateTime<Local>) -> ExportRecord {
        let mut record = ExportRecord::new();
        record.push("crop", self.crop_name.clone());
        record.push("stage", self.crop_stage.clone());
        record.push("et0_mm_day", fmt_mm(self.et0));
        record.push("mode", self.mode.as_str());
        record.push("total_available_water_mm", fmt_mm(self.total_available_water_mm));
        record.push("net_water_mm", fmt_mm(self.net_water_mm));
        record.push("etc_mm", fmt_mm(self.etc_mm));
        record.push("current_water_mm", fmt_mm(self.current_water_mm));
        record.push("daily_balance_mm", fmt_mm(self.daily_balance_mm));
        record.push("water_deficit_mm", fmt_opt(self.water_deficit_mm));
        record.push("water_surplus_mm", fmt_opt(self.water_surplus_mm));
        record.push("irrigate", if self.irrigate { "yes" } else { "no" });
        record.push(
            "recommended_irrigation_mm",
            fmt_opt(self.recommended_irrigation_mm),
        );
        record.push("crop_status", self.crop_status.as_str());
        record.push("calculated_at", exported_at.format(TIMESTAMP_FORMAT).to_string());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CropStatus, CurrentDepthMode, MethodCategory, MethodFailure, MethodOutcome,
    };
    use chrono::TimeZone;

    fn stamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    fn sample_report() -> ComparativeReport {
        let observations = ObservationSet::new()
            .with(ObservationField::TMin, 12.0)
            .with(ObservationField::TMax, 26.5);
        ComparativeReport::new(
            observations,
            vec![
                MethodOutcome {
                    method_id: "hargreaves".into(),
                    display_name: "Hargreaves".into(),
                    category: Some(MethodCategory::TemperatureOnly),
                    result: MethodResult::success(4.387),
                },
                MethodOutcome {
                    method_id: "pm_fao56".into(),
                    display_name: "FAO-56 Penman-Monteith".into(),
                    category: Some(MethodCategory::PenmanMonteith),
                    result: MethodResult::failure(MethodFailure::MissingObservation {
                        field: ObservationField::Rs,
                    }),
                },
                MethodOutcome {
                    method_id: "oudin".into(),
                    display_name: "Oudin".into(),
                    category: Some(MethodCategory::TemperatureOnly),
                    result: MethodResult::success(2.05),
                },
            ],
        )
    }

    #[test]
    fn comparative_export_recovers_et0_values() {
        let report = sample_report();
        let records = report.export_records(stamp());
        assert_eq!(records.len(), report.len());

        for (record, outcome) in records.iter().zip(&report.outcomes) {
            assert_eq!(record.get("method_id"), Some(outcome.method_id.as_str()));
            let column = record.get("et0_mm_day").unwrap();
            match outcome.result.value() {
                Some(expected) => {
                    let parsed: f64 = column.parse().unwrap();
                    assert!((parsed - expected).abs() < 0.0005);
                }
                None => assert!(column.is_empty()),
            }
        }
    }

    #[test]
    fn comparative_export_carries_inputs_and_timestamp() {
        let records = sample_report().export_records(stamp());
        let first = &records[0];
        assert_eq!(first.get("t_min"), Some("12"));
        assert_eq!(first.get("t_max"), Some("26.5"));
        assert_eq!(first.get("rs"), Some(""));
        assert_eq!(first.get("calculated_at"), Some("2024-03-15 09:30:00"));
        assert!(records[1].get("detail").unwrap().contains("rs"));
    }

    #[test]
    fn balance_export_is_single_flat_row() {
        let report = BalanceReport {
            et0: 5.0,
            mode: CurrentDepthMode::RemainingAfterEtc,
            total_available_water_mm: 100.0,
            net_water_mm: 50.0,
            etc_mm: 5.0,
            current_water_mm: 70.0,
            daily_balance_mm: -5.0,
            water_deficit_mm: None,
            water_surplus_mm: None,
            irrigate: true,
            recommended_irrigation_mm: Some(50.0),
            crop_status: CropStatus::Optimal,
            crop_name: "Maize".into(),
            crop_stage: "Mid-season".into(),
        };

        let record = report.export_record(stamp());
        assert_eq!(record.get("net_water_mm"), Some("50.000"));
        assert_eq!(record.get("irrigate"), Some("yes"));
        assert_eq!(record.get("water_deficit_mm"), Some(""));
        assert_eq!(record.columns().last(), Some("calculated_at"));
    }

    #[test]
    fn export_record_serializes_as_ordered_map() {
        let mut record = ExportRecord::new();
        record.push("b", "2");
        record.push("a", "1");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"b":"2","a":"1"}"#);
    }
}
