//! Form Engine.
//!
//! Turns raw per-field input into a validated [`PredictionRequest`] or a set
//! of per-field errors, while preventing duplicate concurrent submission.
//! Validation is independent per field; there are no cross-field rules.
//!
//! State machine: `Idle -> (begin, validation passes) -> Submitting ->
//! (finish) -> Idle`. A failed validation keeps the form in `Idle` with the
//! error map populated. There is no cancellation path.

use std::collections::BTreeMap;

use crate::client::PredictionApi;
use crate::errors::{FieldError, FormError};
use crate::prediction::{FieldValue, PredictionRequest, PredictionResult};
use crate::schema::{self, FieldKey, FieldKind};

/// Mutable state of the capture form: raw values as entered, per-field
/// validation errors, and the single submission guard.
#[derive(Debug, Default)]
pub struct FormState {
    values: BTreeMap<FieldKey, String>,
    errors: BTreeMap<FieldKey, FieldError>,
    submitting: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the raw value verbatim and clears that field's prior error.
    /// No type coercion happens until validation.
    pub fn set_value(&mut self, key: FieldKey, raw: impl Into<String>) {
        self.values.insert(key, raw.into());
        self.errors.remove(&key);
    }

    /// Bulk-sets every key present in `values`. Fields absent from the
    /// mapping keep their current value; nothing is validated.
    pub fn load_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (FieldKey, String)>,
    {
        for (key, raw) in values {
            self.set_value(key, raw);
        }
    }

    /// Clears all values and errors. Rejected while a submission is in
    /// flight, since abandonment is not supported.
    pub fn reset(&mut self) -> Result<(), FormError> {
        if self.submitting {
            return Err(FormError::AlreadyInFlight);
        }
        self.values.clear();
        self.errors.clear();
        Ok(())
    }

    pub fn value(&self, key: FieldKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn error(&self, key: FieldKey) -> Option<FieldError> {
        self.errors.get(&key).copied()
    }

    pub fn errors(&self) -> &BTreeMap<FieldKey, FieldError> {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates every field against the schema registry and builds the
    /// typed request. On failure the full set of per-field errors is
    /// returned so all problems can be shown at once.
    pub fn validate(&self) -> Result<PredictionRequest, BTreeMap<FieldKey, FieldError>> {
        let mut fields = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for key in FieldKey::ALL {
            let definition = schema::definition_of(key);
            let raw = self.values.get(&key).map(|s| s.trim()).unwrap_or("");
            if raw.is_empty() {
                if definition.required {
                    errors.insert(key, FieldError::Required);
                }
                continue;
            }
            match definition.kind {
                FieldKind::Number { min, max, .. } => match raw.parse::<f64>() {
                    Ok(value) if (min..=max).contains(&value) => {
                        fields.insert(key, FieldValue::Number(value));
                    }
                    _ => {
                        errors.insert(key, FieldError::OutOfRange { min, max });
                    }
                },
                FieldKind::Selection { choices } => match raw.parse::<i64>() {
                    Ok(value) if choices.iter().any(|choice| choice.value == value) => {
                        fields.insert(key, FieldValue::Choice(value));
                    }
                    _ => {
                        errors.insert(key, FieldError::InvalidChoice);
                    }
                },
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // Completeness over required keys holds by construction here; a
        // violation would be a registry bug, surfaced as a validation error.
        PredictionRequest::from_fields(fields).map_err(|missing| {
            let mut errors = BTreeMap::new();
            if let Ok(key) = missing.0.parse() {
                errors.insert(key, FieldError::Required);
            }
            errors
        })
    }

    /// Validates and, on success, transitions to `Submitting`, handing the
    /// caller the request to send. A call while already submitting is
    /// rejected synchronously without touching any state.
    pub fn begin_submission(&mut self) -> Result<PredictionRequest, FormError> {
        if self.submitting {
            return Err(FormError::AlreadyInFlight);
        }
        match self.validate() {
            Ok(request) => {
                self.errors.clear();
                self.submitting = true;
                Ok(request)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(FormError::Invalid(errors))
            }
        }
    }

    /// Transitions back to `Idle`. Called on completion, success or failure.
    pub fn finish_submission(&mut self) {
        self.submitting = false;
    }

    /// Runs the full submission cycle against `client`: validate, guard,
    /// send, and return to `Idle` whatever the outcome.
    pub fn submit<C: PredictionApi>(
        &mut self,
        client: &C,
    ) -> Result<PredictionResult, FormError> {
        let request = self.begin_submission()?;
        let outcome = client.predict(&request);
        self.finish_submission();
        Ok(outcome?)
    }
}
