//! Prediction Client.
//!
//! Performs the remote calls and collapses every failure mode into the
//! [`ApiError`] taxonomy: no response at all is `Network`, a non-2xx answer
//! is `Server` with the server-supplied message when one is present, and a
//! response that does not match the expected shape is `Malformed`.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::errors::ApiError;
use crate::prediction::{FieldValue, PredictionRequest, PredictionResult};
use crate::schema::FieldKey;

/// Result of the read-only health probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

/// Remote service surface consumed by the workflow. Implemented over HTTP
/// in production and by scripted doubles in tests.
pub trait PredictionApi {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError>;

    /// Fetches sample field values used to pre-populate the form.
    fn fetch_sample_values(&self) -> Result<BTreeMap<FieldKey, FieldValue>, ApiError>;

    /// Read-only probe; no side effects on any other component.
    fn check_health(&self) -> Result<HealthReport, ApiError>;

    /// Past results held server-side. Debug surface, unused by the core flow.
    fn list_predictions(&self) -> Result<Vec<serde_json::Value>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct WirePrediction {
    probability_of_heart_disease: f64,
    recommended_drugs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: WirePrediction,
    num_drugs_requested: u32,
    timestamp: DateTime<Utc>,
    model_used: String,
}

#[derive(Debug, Deserialize)]
struct SampleDataResponse {
    sample_data: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Deserialize)]
struct PredictionListResponse {
    predictions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP client over the prediction service, with a bounded wait on every
/// call. Exceeding the bound is classified as `Network`.
pub struct HttpPredictionClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        parse_body(status, &body)
    }
}

impl PredictionApi for HttpPredictionClient {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        let url = self.endpoint("/predict");
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;
        let wire: PredictResponse = parse_body(status, &body)?;
        build_result(request, wire)
    }

    fn fetch_sample_values(&self) -> Result<BTreeMap<FieldKey, FieldValue>, ApiError> {
        let wire: SampleDataResponse = self.get_json("/sample-data")?;
        Ok(typed_sample_values(wire))
    }

    fn check_health(&self) -> Result<HealthReport, ApiError> {
        self.get_json("/health")
    }

    fn list_predictions(&self) -> Result<Vec<serde_json::Value>, ApiError> {
        let wire: PredictionListResponse = self.get_json("/predictions")?;
        Ok(wire.predictions)
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        tracing::debug!(error = %err, "request timed out");
    } else {
        tracing::debug!(error = %err, "transport failure");
    }
    ApiError::Network
}

/// Classifies a complete HTTP exchange: non-2xx becomes `Server` with the
/// body's `error`/`message` field when present, an undecodable success body
/// becomes `Malformed`.
fn parse_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(server_error(status, body));
    }
    serde_json::from_str(body).map_err(|err| {
        tracing::debug!(error = %err, "undecodable response body");
        ApiError::Malformed
    })
}

fn server_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or_else(|| format!("Server error ({status})"));
    ApiError::Server { status, message }
}

/// Normalizes the wire response into a [`PredictionResult`], attaching the
/// request as the patient data copy. A probability outside `[0, 1]` fails
/// the shape invariant and is classified as `Malformed`.
fn build_result(
    request: &PredictionRequest,
    wire: PredictResponse,
) -> Result<PredictionResult, ApiError> {
    let result = PredictionResult {
        probability: wire.prediction.probability_of_heart_disease,
        recommended_drugs: wire.prediction.recommended_drugs,
        patient_data: request.clone(),
        requested_drug_count: wire.num_drugs_requested,
        generated_at: wire.timestamp,
        model_identifier: wire.model_used,
    };
    if !result.is_well_formed() {
        tracing::debug!(probability = result.probability, "probability out of range");
        return Err(ApiError::Malformed);
    }
    Ok(result)
}

fn typed_sample_values(wire: SampleDataResponse) -> BTreeMap<FieldKey, FieldValue> {
    wire.sample_data
        .into_iter()
        .filter_map(|(raw_key, value)| match raw_key.parse::<FieldKey>() {
            Ok(key) => Some((key, value)),
            Err(_) => {
                tracing::debug!(key = %raw_key, "ignoring unknown sample field");
                None
            }
        })
        .collect()
}
