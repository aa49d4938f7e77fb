//! Result Store.
//!
//! Single authoritative holder of the most recent prediction. Bridges the
//! in-memory hand-off between the capture and results views with a durable
//! JSON fallback that survives restarts. The durable copy is best-effort:
//! a failed write never blocks the in-memory flow, and a corrupt or
//! unreadable entry is silently discarded rather than surfaced.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::prediction::PredictionResult;
use crate::utils::{ensure_dir, write_atomic};

const STORE_FILE: &str = "last_prediction.json";

/// Bumped whenever the durable shape changes; newer entries than the binary
/// understands are treated like corrupt ones.
pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredPrediction {
    schema_version: u32,
    result: PredictionResult,
}

pub struct ResultStore {
    current: Option<PredictionResult>,
    path: PathBuf,
}

impl ResultStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self {
            current: None,
            path: dir.join(STORE_FILE),
        })
    }

    pub fn durable_path(&self) -> &Path {
        &self.path
    }

    /// Stores the result in memory and mirrors it to durable storage,
    /// overwriting any prior entry. The durable write is best-effort.
    pub fn remember(&mut self, result: PredictionResult) {
        self.current = Some(result);
        if let Err(err) = self.write_durable() {
            tracing::warn!(error = %err, "failed to persist prediction result");
        }
    }

    /// Returns the most recent prediction: the in-memory copy when present,
    /// otherwise the durable one. An entry that cannot be decoded into a
    /// well-formed result self-heals by being deleted and reported absent.
    pub fn recall(&mut self) -> Option<PredictionResult> {
        if let Some(result) = &self.current {
            return Some(result.clone());
        }
        match self.read_durable() {
            Ok(Some(result)) => {
                self.current = Some(result.clone());
                Some(result)
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable prediction entry");
                self.discard_durable();
                None
            }
        }
    }

    /// Removes both the in-memory and the durable copy.
    pub fn clear(&mut self) {
        self.current = None;
        self.discard_durable();
    }

    fn write_durable(&self) -> Result<(), StorageError> {
        let entry = StoredPrediction {
            schema_version: STORE_SCHEMA_VERSION,
            // Stored entries always exist alongside a current result.
            result: self.current.clone().ok_or_else(|| {
                StorageError::Invalid("no prediction result to persist".into())
            })?,
        };
        let json = serde_json::to_string_pretty(&entry)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    fn read_durable(&self) -> Result<Option<PredictionResult>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let entry: StoredPrediction = serde_json::from_str(&data)?;
        if entry.schema_version > STORE_SCHEMA_VERSION {
            return Err(StorageError::Invalid(format!(
                "stored prediction uses schema version {}",
                entry.schema_version
            )));
        }
        if !entry.result.is_well_formed() {
            return Err(StorageError::Invalid(
                "stored prediction fails shape validation".into(),
            ));
        }
        Ok(Some(entry.result))
    }

    fn discard_durable(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(error = %err, "failed to remove prediction entry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::prediction::PredictionRequest;
    use crate::schema::FieldKey;

    fn sample_result(probability: f64) -> PredictionResult {
        let mut fields = BTreeMap::new();
        for key in FieldKey::ALL {
            fields.insert(key, crate::prediction::FieldValue::Choice(1));
        }
        PredictionResult {
            probability,
            recommended_drugs: vec!["Aspirin".into(), "Statin".into()],
            patient_data: PredictionRequest::from_fields(fields).unwrap(),
            requested_drug_count: 2,
            generated_at: Utc::now(),
            model_identifier: "test-model".into(),
        }
    }

    fn store_with_temp_dir() -> (ResultStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = ResultStore::new(temp.path()).expect("result store");
        (store, temp)
    }

    #[test]
    fn remember_then_recall_round_trips() {
        let (mut store, _guard) = store_with_temp_dir();
        let result = sample_result(0.42);
        store.remember(result.clone());
        assert_eq!(store.recall(), Some(result));
    }

    #[test]
    fn recall_falls_back_to_durable_copy() {
        let temp = TempDir::new().unwrap();
        let result = sample_result(0.42);
        {
            let mut store = ResultStore::new(temp.path()).unwrap();
            store.remember(result.clone());
        }
        let mut fresh = ResultStore::new(temp.path()).unwrap();
        assert_eq!(fresh.recall(), Some(result));
    }

    #[test]
    fn corrupt_entry_is_deleted_and_reported_absent() {
        let (mut store, _guard) = store_with_temp_dir();
        fs::write(store.durable_path(), "{not json").unwrap();
        assert_eq!(store.recall(), None);
        assert!(!store.durable_path().exists());
    }

    #[test]
    fn out_of_shape_entry_is_filtered_at_the_boundary() {
        let temp = TempDir::new().unwrap();
        {
            let mut store = ResultStore::new(temp.path()).unwrap();
            store.remember(sample_result(0.42));
        }
        let path = temp.path().join(STORE_FILE);
        let tampered = fs::read_to_string(&path)
            .unwrap()
            .replace("0.42", "17.0");
        fs::write(&path, tampered).unwrap();

        let mut store = ResultStore::new(temp.path()).unwrap();
        assert_eq!(store.recall(), None);
        assert!(!path.exists());
    }

    #[test]
    fn newer_schema_version_is_treated_as_absent() {
        let (mut store, _guard) = store_with_temp_dir();
        let entry = StoredPrediction {
            schema_version: STORE_SCHEMA_VERSION + 1,
            result: sample_result(0.5),
        };
        fs::write(
            store.durable_path(),
            serde_json::to_string(&entry).unwrap(),
        )
        .unwrap();
        assert_eq!(store.recall(), None);
        assert!(!store.durable_path().exists());
    }

    #[test]
    fn clear_removes_both_copies() {
        let (mut store, _guard) = store_with_temp_dir();
        store.remember(sample_result(0.3));
        store.clear();
        assert_eq!(store.recall(), None);
        assert!(!store.durable_path().exists());
    }

    #[test]
    fn remember_overwrites_prior_entry() {
        let (mut store, _guard) = store_with_temp_dir();
        store.remember(sample_result(0.2));
        store.remember(sample_result(0.8));
        assert_eq!(store.recall().map(|r| r.probability), Some(0.8));
    }
}
