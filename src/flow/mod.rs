//! Navigation Controller.
//!
//! Sequences the three views (capture, transient confirmation, results) and
//! decides what the results view renders: the in-flight hand-off copy when
//! one exists, else the durable copy, else an explicit empty state. A cold
//! entry to the results view never redirects.

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use crate::client::{HealthReport, PredictionApi};
use crate::errors::{ApiError, FormError};
use crate::form::FormState;
use crate::prediction::{FieldValue, PredictionResult};
use crate::schema::FieldKey;
use crate::store::ResultStore;

/// The three views of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Capture,
    Confirmation,
    Results,
}

/// What the results view should render.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Ready(PredictionResult),
    /// No prediction exists anywhere; offer to start a new one.
    Empty,
}

/// Drives the capture form, the prediction client, and the result store
/// through the workflow. One instance per form lifecycle.
pub struct FlowController<C: PredictionApi> {
    form: FormState,
    client: C,
    store: ResultStore,
    view: View,
    pending: Option<PredictionResult>,
    confirmation_delay: Duration,
}

impl<C: PredictionApi> FlowController<C> {
    pub fn new(client: C, store: ResultStore, confirmation_delay: Duration) -> Self {
        Self {
            form: FormState::new(),
            client,
            store,
            view: View::Capture,
            pending: None,
            confirmation_delay,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Runs one submission: validate, guard, send, and on success remember
    /// the result and move to the confirmation view. Any failure leaves the
    /// form idle and the view unchanged so the user can retry manually.
    pub fn submit(&mut self) -> Result<PredictionResult, FormError> {
        let result = self.form.submit(&self.client)?;
        self.store.remember(result.clone());
        self.pending = Some(result.clone());
        self.view = View::Confirmation;
        Ok(result)
    }

    /// Holds the confirmation view for the configured delay, then moves on.
    pub fn advance_to_results(&mut self) {
        if !self.confirmation_delay.is_zero() {
            thread::sleep(self.confirmation_delay);
        }
        self.view = View::Results;
    }

    /// Entry point of the results view, warm or cold. The in-flight copy
    /// wins over the durable one; absence renders an explicit empty state.
    pub fn enter_results(&mut self) -> ResultsView {
        self.view = View::Results;
        if let Some(result) = self.pending.clone() {
            return ResultsView::Ready(result);
        }
        match self.store.recall() {
            Some(result) => {
                tracing::debug!("results recovered from durable storage");
                ResultsView::Ready(result)
            }
            None => ResultsView::Empty,
        }
    }

    /// Discards the held result and returns to an empty capture view.
    pub fn new_prediction(&mut self) -> Result<(), FormError> {
        self.form.reset()?;
        self.store.clear();
        self.pending = None;
        self.view = View::Capture;
        Ok(())
    }

    /// Populates the form with sample values from the service.
    pub fn load_sample(&mut self) -> Result<(), ApiError> {
        let samples = self.client.fetch_sample_values()?;
        self.form.load_values(raw_values(samples));
        Ok(())
    }

    pub fn health(&self) -> Result<HealthReport, ApiError> {
        self.client.check_health()
    }
}

fn raw_values(
    samples: BTreeMap<FieldKey, FieldValue>,
) -> impl Iterator<Item = (FieldKey, String)> {
    samples.into_iter().map(|(key, value)| (key, value.raw()))
}
