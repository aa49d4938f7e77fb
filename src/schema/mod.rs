//! Field Schema Registry.
//!
//! Declarative table describing every input field of the risk assessment
//! form: label, value kind, numeric bounds or enumerated choices, and help
//! text. Pure data, defined once at build time. Both the presentation layer
//! and the validation layer consult this registry; no field rule lives
//! anywhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::UnknownField;

/// Closed enumeration of every field the prediction service understands.
///
/// The variant order is the canonical field order; wire names are the
/// snake_case renderings shared with the remote service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
    NumDrugs,
}

impl FieldKey {
    /// Canonical ordered list of all fields.
    pub const ALL: [FieldKey; 14] = [
        FieldKey::Age,
        FieldKey::Sex,
        FieldKey::Cp,
        FieldKey::Trestbps,
        FieldKey::Chol,
        FieldKey::Fbs,
        FieldKey::Restecg,
        FieldKey::Thalach,
        FieldKey::Exang,
        FieldKey::Oldpeak,
        FieldKey::Slope,
        FieldKey::Ca,
        FieldKey::Thal,
        FieldKey::NumDrugs,
    ];

    /// Stable wire identifier shared with the remote service.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Age => "age",
            FieldKey::Sex => "sex",
            FieldKey::Cp => "cp",
            FieldKey::Trestbps => "trestbps",
            FieldKey::Chol => "chol",
            FieldKey::Fbs => "fbs",
            FieldKey::Restecg => "restecg",
            FieldKey::Thalach => "thalach",
            FieldKey::Exang => "exang",
            FieldKey::Oldpeak => "oldpeak",
            FieldKey::Slope => "slope",
            FieldKey::Ca => "ca",
            FieldKey::Thal => "thal",
            FieldKey::NumDrugs => "num_drugs",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == raw)
            .ok_or_else(|| UnknownField(raw.to_string()))
    }
}

/// One selectable option of a selection field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: i64,
    pub label: &'static str,
}

/// Supported value kinds for form fields.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Numeric input with inclusive bounds. `step` is advisory and used for
    /// input hints only, never for validation.
    Number {
        min: f64,
        max: f64,
        step: Option<f64>,
    },
    /// One value out of a fixed set of choices.
    Selection { choices: &'static [Choice] },
}

/// Declarative description of a single input field. Immutable.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub key: FieldKey,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
}

const SEX_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "Female" },
    Choice { value: 1, label: "Male" },
];

const CP_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "Typical Angina" },
    Choice { value: 1, label: "Atypical Angina" },
    Choice { value: 2, label: "Non-anginal Pain" },
    Choice { value: 3, label: "Asymptomatic" },
];

const FBS_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "<= 120 mg/dl" },
    Choice { value: 1, label: "> 120 mg/dl" },
];

const RESTECG_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "Normal" },
    Choice { value: 1, label: "ST-T Wave Abnormality" },
    Choice { value: 2, label: "Left Ventricular Hypertrophy" },
];

const EXANG_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "No" },
    Choice { value: 1, label: "Yes" },
];

const SLOPE_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "Upsloping" },
    Choice { value: 1, label: "Flat" },
    Choice { value: 2, label: "Downsloping" },
];

const CA_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "0" },
    Choice { value: 1, label: "1" },
    Choice { value: 2, label: "2" },
    Choice { value: 3, label: "3" },
];

const THAL_CHOICES: &[Choice] = &[
    Choice { value: 0, label: "Normal" },
    Choice { value: 1, label: "Fixed Defect" },
    Choice { value: 2, label: "Reversible Defect" },
    Choice { value: 3, label: "Unknown" },
];

// Indexed by FieldKey discriminant; an order mismatch is caught by tests.
static DEFINITIONS: [FieldDefinition; 14] = [
    FieldDefinition {
        key: FieldKey::Age,
        label: "Age",
        kind: FieldKind::Number {
            min: 1.0,
            max: 120.0,
            step: None,
        },
        required: true,
        help: Some("Patient age in years"),
    },
    FieldDefinition {
        key: FieldKey::Sex,
        label: "Sex",
        kind: FieldKind::Selection {
            choices: SEX_CHOICES,
        },
        required: true,
        help: Some("Patient gender"),
    },
    FieldDefinition {
        key: FieldKey::Cp,
        label: "Chest Pain Type",
        kind: FieldKind::Selection {
            choices: CP_CHOICES,
        },
        required: true,
        help: Some("Type of chest pain experienced"),
    },
    FieldDefinition {
        key: FieldKey::Trestbps,
        label: "Resting Blood Pressure",
        kind: FieldKind::Number {
            min: 80.0,
            max: 250.0,
            step: None,
        },
        required: true,
        help: Some("Resting blood pressure in mm Hg"),
    },
    FieldDefinition {
        key: FieldKey::Chol,
        label: "Cholesterol",
        kind: FieldKind::Number {
            min: 100.0,
            max: 600.0,
            step: None,
        },
        required: true,
        help: Some("Serum cholesterol in mg/dl"),
    },
    FieldDefinition {
        key: FieldKey::Fbs,
        label: "Fasting Blood Sugar",
        kind: FieldKind::Selection {
            choices: FBS_CHOICES,
        },
        required: true,
        help: Some("Fasting blood sugar level"),
    },
    FieldDefinition {
        key: FieldKey::Restecg,
        label: "Resting ECG",
        kind: FieldKind::Selection {
            choices: RESTECG_CHOICES,
        },
        required: true,
        help: Some("Resting electrocardiographic results"),
    },
    FieldDefinition {
        key: FieldKey::Thalach,
        label: "Maximum Heart Rate",
        kind: FieldKind::Number {
            min: 60.0,
            max: 220.0,
            step: None,
        },
        required: true,
        help: Some("Maximum heart rate achieved during exercise"),
    },
    FieldDefinition {
        key: FieldKey::Exang,
        label: "Exercise Induced Angina",
        kind: FieldKind::Selection {
            choices: EXANG_CHOICES,
        },
        required: true,
        help: Some("Exercise induced angina"),
    },
    FieldDefinition {
        key: FieldKey::Oldpeak,
        label: "ST Depression",
        kind: FieldKind::Number {
            min: 0.0,
            max: 10.0,
            step: Some(0.1),
        },
        required: true,
        help: Some("ST depression induced by exercise relative to rest"),
    },
    FieldDefinition {
        key: FieldKey::Slope,
        label: "Slope of Peak Exercise ST Segment",
        kind: FieldKind::Selection {
            choices: SLOPE_CHOICES,
        },
        required: true,
        help: Some("Slope of the peak exercise ST segment"),
    },
    FieldDefinition {
        key: FieldKey::Ca,
        label: "Number of Major Vessels",
        kind: FieldKind::Selection {
            choices: CA_CHOICES,
        },
        required: true,
        help: Some("Number of major vessels colored by fluoroscopy"),
    },
    FieldDefinition {
        key: FieldKey::Thal,
        label: "Thalassemia",
        kind: FieldKind::Selection {
            choices: THAL_CHOICES,
        },
        required: true,
        help: Some("Thalassemia type"),
    },
    FieldDefinition {
        key: FieldKey::NumDrugs,
        label: "Number of Recommended Drugs",
        kind: FieldKind::Number {
            min: 1.0,
            max: 10.0,
            step: None,
        },
        required: true,
        help: Some("Number of drugs to recommend"),
    },
];

/// Looks up the definition for a field. Total over the closed key set.
pub fn definition_of(key: FieldKey) -> &'static FieldDefinition {
    &DEFINITIONS[key as usize]
}

/// Advisory grouping of fields into rows, used for layout only.
pub fn field_groups() -> &'static [&'static [FieldKey]] {
    &[
        &[FieldKey::Age, FieldKey::Sex, FieldKey::Cp],
        &[FieldKey::Trestbps, FieldKey::Chol, FieldKey::Fbs],
        &[FieldKey::Restecg, FieldKey::Thalach, FieldKey::Exang],
        &[FieldKey::Oldpeak, FieldKey::Slope, FieldKey::Ca],
        &[FieldKey::Thal, FieldKey::NumDrugs],
    ]
}
