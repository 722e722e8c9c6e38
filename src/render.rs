//! Plain-text tables for the terminal.

use crate::logic::aggregator::classify_demand;
use crate::logic::MethodRegistry;
use crate::models::{
    BalanceReport, ComparativeReport, MethodCategory, MethodResult, ObservationField, Statistics,
    Summary,
};

const RULE_WIDTH: usize = 72;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn fmt_mm(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".into())
}

pub fn print_methods(registry: &MethodRegistry, only: Option<MethodCategory>) {
    for category in MethodCategory::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }

        println!("{}", category);
        println!("{}", rule());
        for id in registry.list_by_category(category) {
            let Ok(method) = registry.describe(id) else {
                continue;
            };
            let fields: Vec<&str> = method
                .required_observations
                .iter()
                .map(ObservationField::as_str)
                .collect();
            println!(
                "  {:<18} {:<26} {}",
                method.id,
                method.display_name,
                fields.join(", ")
            );
        }
        println!();
    }
}

pub fn print_report(report: &ComparativeReport, summary: &Summary, selected: Option<&str>) {
    println!(
        "{:<2}{:<18} {:<26} {:>10}  {}",
        "", "METHOD", "NAME", "ET0 mm/d", "NOTE"
    );
    println!("{}", rule());

    for outcome in &report.outcomes {
        let marker = if selected == Some(outcome.method_id.as_str()) {
            "*"
        } else {
            ""
        };
        let note = match &outcome.result {
            MethodResult::Success { value } => classify_demand(*value).to_string(),
            MethodResult::Failure { reason } => reason.to_string(),
        };
        println!(
            "{:<2}{:<18} {:<26} {:>10}  {}",
            marker,
            outcome.method_id,
            outcome.display_name,
            fmt_mm(outcome.result.value()),
            note
        );
    }

    println!("{}", rule());
    println!(
        "{} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    match summary.statistics {
        Statistics::Available {
            mean,
            min,
            max,
            std_dev,
        } => {
            println!(
                "mean {:.3}  min {:.3}  max {:.3}  std dev {:.3}  ({})",
                mean,
                min,
                max,
                std_dev,
                classify_demand(mean).description()
            );
        }
        Statistics::Unavailable => println!("No method produced a value."),
    }
}

pub fn print_balance(report: &BalanceReport) {
    println!();
    if report.crop_name.is_empty() {
        println!("Water balance ({})", report.mode);
    } else {
        println!(
            "Water balance: {} {} ({})",
            report.crop_name, report.crop_stage, report.mode
        );
    }
    println!("{}", rule());

    let rows = [
        ("ET0 (mm/day)", Some(report.et0)),
        ("Crop ETc (mm)", Some(report.etc_mm)),
        ("Total available water (mm)", Some(report.total_available_water_mm)),
        ("Readily available water (mm)", Some(report.net_water_mm)),
        ("Current available water (mm)", Some(report.current_water_mm)),
        ("Daily balance (mm)", Some(report.daily_balance_mm)),
        ("Deficit (mm)", report.water_deficit_mm),
        ("Surplus (mm)", report.water_surplus_mm),
    ];
    for (label, value) in rows {
        if value.is_some() {
            println!("  {:<30} {:>10}", label, fmt_mm(value));
        }
    }

    println!("  {:<30} {:>10}", "Crop status", report.crop_status);
    match report.recommended_irrigation_mm {
        Some(mm) if report.irrigate => {
            println!("  Irrigate: apply {:.1} mm", mm);
        }
        _ => println!("  No irrigation needed"),
    }
}
