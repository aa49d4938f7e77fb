use std::collections::BTreeMap;

use thiserror::Error;

use crate::schema::FieldKey;

/// Raised when a raw string does not name any registered field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field key `{0}`")]
pub struct UnknownField(pub String);

/// Raised when a prediction request would omit a required field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prediction request is missing required field `{0}`")]
pub struct IncompleteRequest(pub &'static str);

/// Per-field validation failure, rendered inline next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Enter a number between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },
    #[error("Select one of the listed options")]
    InvalidChoice,
}

/// Normalized failure classification for every remote-call outcome.
///
/// The prediction client collapses all transport and server failures into
/// this taxonomy so the presentation layer needs exactly one rendering path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Connectivity failure or timeout; no response was received.
    #[error("Network error - please check your connection")]
    Network,
    /// The service answered outside the 200-299 range.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The response could not be decoded into the expected shape.
    #[error("The prediction service returned an unexpected response")]
    Malformed,
}

/// Error type covering the submission state machine of the form engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    /// A second submission was attempted while one is outstanding. Pure
    /// guard, never user-visible.
    #[error("a submission is already in flight")]
    AlreadyInFlight,
    /// One or more fields failed validation; the map holds every failure so
    /// all problems can be shown at once.
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(BTreeMap<FieldKey, FieldError>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Error type that captures common storage and configuration failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Invalid(String),
}
