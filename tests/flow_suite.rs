mod common;

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use cardio_core::errors::{ApiError, FormError};
use cardio_core::flow::{FlowController, ResultsView, View};
use cardio_core::prediction::FieldValue;
use cardio_core::schema::FieldKey;
use cardio_core::store::ResultStore;

use common::{reference_patient, ScriptedApi};

const STORE_FILE: &str = "last_prediction.json";

fn controller(api: ScriptedApi, dir: &TempDir) -> FlowController<ScriptedApi> {
    let store = ResultStore::new(dir.path()).unwrap();
    FlowController::new(api, store, Duration::ZERO)
}

#[test]
fn successful_submission_walks_through_confirmation_to_results() {
    let temp = TempDir::new().unwrap();
    let mut flow = controller(ScriptedApi::succeeding(0.42, &["A", "B", "C"]), &temp);

    flow.form_mut().load_values(reference_patient());
    let result = flow.submit().unwrap();

    assert_eq!(result.probability, 0.42);
    assert_eq!(result.recommended_drugs, vec!["A", "B", "C"]);
    assert_eq!(result.requested_drug_count, 3);
    assert_eq!(result.patient_data.field_count(), 14);
    assert_eq!(
        result.patient_data.value(FieldKey::Age),
        Some(FieldValue::Number(55.0))
    );

    assert_eq!(flow.view(), View::Confirmation);
    flow.advance_to_results();
    assert_eq!(flow.view(), View::Results);
    assert_eq!(flow.enter_results(), ResultsView::Ready(result));

    assert!(temp.path().join(STORE_FILE).exists());
}

#[test]
fn server_failure_leaves_form_idle_and_nothing_remembered() {
    let temp = TempDir::new().unwrap();
    let failure = ApiError::Server {
        status: 500,
        message: "model unavailable".into(),
    };
    let mut flow = controller(ScriptedApi::failing(failure.clone()), &temp);

    flow.form_mut().load_values(reference_patient());
    match flow.submit() {
        Err(FormError::Api(err)) => assert_eq!(err, failure),
        other => panic!("expected api failure, got {other:?}"),
    }

    assert!(!flow.form().is_submitting());
    assert_eq!(flow.view(), View::Capture);
    assert_eq!(flow.enter_results(), ResultsView::Empty);
    assert!(!temp.path().join(STORE_FILE).exists());
}

#[test]
fn in_flight_submission_never_sends_a_second_request() {
    let temp = TempDir::new().unwrap();
    let api = ScriptedApi::succeeding(0.1, &["A"]);
    let calls = api.predict_calls.clone();
    let mut flow = controller(api, &temp);

    flow.form_mut().load_values(reference_patient());
    flow.form_mut().begin_submission().unwrap();

    match flow.submit() {
        Err(FormError::AlreadyInFlight) => {}
        other => panic!("expected in-flight rejection, got {other:?}"),
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn cold_entry_recovers_the_durable_result() {
    let temp = TempDir::new().unwrap();
    let expected = {
        let mut flow = controller(ScriptedApi::succeeding(0.42, &["A", "B", "C"]), &temp);
        flow.form_mut().load_values(reference_patient());
        flow.submit().unwrap()
    };

    let mut fresh = controller(ScriptedApi::succeeding(0.0, &[]), &temp);
    assert_eq!(fresh.enter_results(), ResultsView::Ready(expected));
}

#[test]
fn cold_entry_with_corrupt_storage_renders_the_empty_state() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(STORE_FILE), "{not json").unwrap();

    let mut flow = controller(ScriptedApi::succeeding(0.0, &[]), &temp);
    assert_eq!(flow.enter_results(), ResultsView::Empty);
    assert!(!temp.path().join(STORE_FILE).exists());
}

#[test]
fn new_prediction_discards_both_copies_and_clears_the_form() {
    let temp = TempDir::new().unwrap();
    let mut flow = controller(ScriptedApi::succeeding(0.42, &["A"]), &temp);

    flow.form_mut().load_values(reference_patient());
    flow.submit().unwrap();
    flow.new_prediction().unwrap();

    assert_eq!(flow.view(), View::Capture);
    assert_eq!(flow.form().value(FieldKey::Age), None);
    assert_eq!(flow.enter_results(), ResultsView::Empty);
    assert!(!temp.path().join(STORE_FILE).exists());
}

#[test]
fn sample_values_populate_a_form_that_validates_cleanly() {
    let temp = TempDir::new().unwrap();
    let mut flow = controller(ScriptedApi::succeeding(0.0, &[]), &temp);

    flow.load_sample().unwrap();
    let request = flow.form().validate().unwrap();
    assert_eq!(request.field_count(), 14);
    assert_eq!(request.requested_drug_count(), 5);
}
