pub mod output;
pub mod render;
mod shell;

pub use shell::run_cli;

use thiserror::Error;

use crate::errors::{ApiError, StorageError};

/// Failures that abort the interactive shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Form(#[from] crate::errors::FormError),
}
