//! Read-only rendering of prediction results and health reports. All
//! numbers and wording come from the core types; no rule lives here.

use crate::cli::output;
use crate::client::HealthReport;
use crate::prediction::{FieldValue, PredictionResult};
use crate::schema::{self, FieldKey, FieldKind};

fn risk_level(probability: f64) -> &'static str {
    if probability < 0.3 {
        "Low"
    } else if probability < 0.7 {
        "Medium"
    } else {
        "High"
    }
}

/// Human-readable rendering of one field value, resolving selection values
/// to their declared labels.
fn display_value(key: FieldKey, value: FieldValue) -> String {
    if let FieldKind::Selection { choices } = schema::definition_of(key).kind {
        if let FieldValue::Choice(chosen) = value {
            if let Some(choice) = choices.iter().find(|c| c.value == chosen) {
                return choice.label.to_string();
            }
        }
    }
    value.raw()
}

pub fn render_result(result: &PredictionResult) {
    output::section("Prediction Results");
    let percentage = (result.probability * 100.0).round();
    println!(
        "Heart disease risk: {percentage:.0}% ({} risk level)",
        risk_level(result.probability)
    );
    println!();
    println!(
        "Recommended drugs ({} requested):",
        result.requested_drug_count
    );
    if result.recommended_drugs.is_empty() {
        println!("  (none returned)");
    }
    for (index, drug) in result.recommended_drugs.iter().enumerate() {
        println!("  {}. {drug}", index + 1);
    }
    println!();
    println!("Patient data:");
    for key in FieldKey::ALL {
        if let Some(value) = result.patient_data.value(key) {
            println!(
                "  {}: {}",
                schema::definition_of(key).label,
                display_value(key, value)
            );
        }
    }
    println!();
    println!("Model: {}", result.model_identifier);
    println!(
        "Predicted: {}",
        result.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

pub fn render_empty_results() {
    output::section("No Results Found");
    println!("No prediction has been made yet, or the stored result expired.");
    println!("Start a new prediction to see a heart disease risk assessment.");
}

pub fn render_health(report: &HealthReport) {
    if report.status == "healthy" {
        output::success(format!(
            "API is healthy | Database: {}",
            report.database.as_deref().unwrap_or("Unknown")
        ));
    } else {
        output::warning(format!("API status: {}", report.status));
    }
}
