use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::Utc;

use cardio_core::client::{HealthReport, PredictionApi};
use cardio_core::errors::ApiError;
use cardio_core::prediction::{FieldValue, PredictionRequest, PredictionResult};
use cardio_core::schema::FieldKey;

/// Raw form values for the reference patient used across suites.
#[allow(dead_code)]
pub fn reference_patient() -> Vec<(FieldKey, String)> {
    [
        (FieldKey::Age, "55"),
        (FieldKey::Sex, "1"),
        (FieldKey::Cp, "2"),
        (FieldKey::Trestbps, "130"),
        (FieldKey::Chol, "246"),
        (FieldKey::Fbs, "0"),
        (FieldKey::Restecg, "0"),
        (FieldKey::Thalach, "150"),
        (FieldKey::Exang, "0"),
        (FieldKey::Oldpeak, "1.5"),
        (FieldKey::Slope, "1"),
        (FieldKey::Ca, "0"),
        (FieldKey::Thal, "2"),
        (FieldKey::NumDrugs, "3"),
    ]
    .into_iter()
    .map(|(key, raw)| (key, raw.to_string()))
    .collect()
}

/// Scripted stand-in for the remote service. Counts outbound predict calls
/// and answers with either a fixed failure or a result synthesized from the
/// request it received.
pub struct ScriptedApi {
    pub probability: f64,
    pub drugs: Vec<String>,
    pub failure: Option<ApiError>,
    pub predict_calls: Rc<Cell<usize>>,
}

impl ScriptedApi {
    #[allow(dead_code)]
    pub fn succeeding(probability: f64, drugs: &[&str]) -> Self {
        Self {
            probability,
            drugs: drugs.iter().map(|d| d.to_string()).collect(),
            failure: None,
            predict_calls: Rc::new(Cell::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn failing(failure: ApiError) -> Self {
        Self {
            probability: 0.0,
            drugs: Vec::new(),
            failure: Some(failure),
            predict_calls: Rc::new(Cell::new(0)),
        }
    }
}

impl PredictionApi for ScriptedApi {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        self.predict_calls.set(self.predict_calls.get() + 1);
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(PredictionResult {
            probability: self.probability,
            recommended_drugs: self.drugs.clone(),
            patient_data: request.clone(),
            requested_drug_count: request.requested_drug_count(),
            generated_at: Utc::now(),
            model_identifier: "scripted-model".into(),
        })
    }

    fn fetch_sample_values(&self) -> Result<BTreeMap<FieldKey, FieldValue>, ApiError> {
        // The service's documented sample patient.
        let samples = [
            (FieldKey::Age, FieldValue::Choice(43)),
            (FieldKey::Sex, FieldValue::Choice(0)),
            (FieldKey::Cp, FieldValue::Choice(3)),
            (FieldKey::Trestbps, FieldValue::Choice(120)),
            (FieldKey::Chol, FieldValue::Choice(239)),
            (FieldKey::Fbs, FieldValue::Choice(1)),
            (FieldKey::Restecg, FieldValue::Choice(1)),
            (FieldKey::Thalach, FieldValue::Choice(152)),
            (FieldKey::Exang, FieldValue::Choice(0)),
            (FieldKey::Oldpeak, FieldValue::Number(0.8)),
            (FieldKey::Slope, FieldValue::Choice(1)),
            (FieldKey::Ca, FieldValue::Choice(0)),
            (FieldKey::Thal, FieldValue::Choice(3)),
            (FieldKey::NumDrugs, FieldValue::Choice(5)),
        ];
        Ok(samples.into_iter().collect())
    }

    fn check_health(&self) -> Result<HealthReport, ApiError> {
        Ok(HealthReport {
            status: "healthy".into(),
            database: Some("Local JSON".into()),
        })
    }

    fn list_predictions(&self) -> Result<Vec<serde_json::Value>, ApiError> {
        Ok(Vec::new())
    }
}
