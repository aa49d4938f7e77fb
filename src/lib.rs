#![doc(test(attr(deny(warnings))))]

//! Cardio Core drives the client-side workflow of a heart disease risk
//! assessment tool: schema-driven capture and validation of patient
//! parameters, submission to a remote prediction service, and persistence of
//! the latest result across sessions.

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod flow;
pub mod form;
pub mod prediction;
pub mod schema;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cardio Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
