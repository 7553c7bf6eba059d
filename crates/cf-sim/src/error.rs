//! Error types for transient runs.

use thiserror::Error;

/// Errors encountered during a transient run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Event error: {message}")]
    Event { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<cf_solver::SolverError> for SimError {
    fn from(e: cf_solver::SolverError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<cf_components::ComponentError> for SimError {
    fn from(e: cf_components::ComponentError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<cf_core::CfError> for SimError {
    fn from(e: cf_core::CfError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
