//! Unified error types surfaced by the runtime API.
//!
//! Player-facing refusals are not errors here: they are rendered and returned
//! as [`crate::ActionOutcome::Rejected`]. Only collaborator faults propagate.
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Presenter(#[from] PresenterError),

    #[error("runtime requires {0} to be configured before building")]
    MissingComponent(&'static str),
}

/// Failure reported by a presentation backend.
#[derive(Debug, Error)]
#[error("presenter failed: {message}")]
pub struct PresenterError {
    pub message: String,
}

impl PresenterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
