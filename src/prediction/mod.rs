//! Core prediction data model: typed field values, the validated request
//! sent to the remote service, and the normalized result cached client-side.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::IncompleteRequest;
use crate::schema::{self, FieldKey};

/// A validated, typed field value.
///
/// Selections carry the chosen option's integer value; numeric fields carry
/// the parsed number. Equality is numeric, so a whole number compares equal
/// regardless of which variant a round trip produced.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Choice(i64),
    Number(f64),
}

impl FieldValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Choice(value) => *value as f64,
            FieldValue::Number(value) => *value,
        }
    }

    /// Renders the value back into the raw string form the form engine uses.
    pub fn raw(&self) -> String {
        match self {
            FieldValue::Choice(value) => value.to_string(),
            FieldValue::Number(value) => value.to_string(),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_f64() == other.as_f64()
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Choice(value) => serializer.serialize_i64(*value),
            FieldValue::Number(value) => {
                // Whole numbers go over the wire as integers.
                if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                    serializer.serialize_i64(*value as i64)
                } else {
                    serializer.serialize_f64(*value)
                }
            }
        }
    }
}

/// Fully validated patient parameter set, serialized as the flat JSON
/// object the remote service expects (one entry per field key).
///
/// Constructed only by the form engine's validation path, so a request
/// never omits a required field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    fields: BTreeMap<FieldKey, FieldValue>,
}

impl PredictionRequest {
    pub(crate) fn from_fields(
        fields: BTreeMap<FieldKey, FieldValue>,
    ) -> Result<Self, IncompleteRequest> {
        for key in FieldKey::ALL {
            if schema::definition_of(key).required && !fields.contains_key(&key) {
                return Err(IncompleteRequest(key.as_str()));
            }
        }
        Ok(Self { fields })
    }

    pub fn value(&self, key: FieldKey) -> Option<FieldValue> {
        self.fields.get(&key).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldKey, FieldValue)> + '_ {
        self.fields.iter().map(|(key, value)| (*key, *value))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of drug recommendations the caller asked for.
    pub fn requested_drug_count(&self) -> u32 {
        self.value(FieldKey::NumDrugs)
            .map(|value| value.as_f64().round() as u32)
            .unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for PredictionRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = BTreeMap::<FieldKey, FieldValue>::deserialize(deserializer)?;
        PredictionRequest::from_fields(fields).map_err(serde::de::Error::custom)
    }
}

/// The service's answer to one submission plus the request metadata,
/// normalized into the shape cached client-side. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of heart disease, in `[0, 1]`.
    pub probability: f64,
    /// Recommended drugs in service order; duplicates are kept as-is, and
    /// the length is not required to match `requested_drug_count`.
    pub recommended_drugs: Vec<String>,
    /// Copy of the request this result answers.
    pub patient_data: PredictionRequest,
    pub requested_drug_count: u32,
    pub generated_at: DateTime<Utc>,
    pub model_identifier: String,
}

impl PredictionResult {
    /// Shape invariant enforced at every trust boundary.
    pub fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.probability)
    }
}
