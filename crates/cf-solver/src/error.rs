//! Error types for network assembly and solving.

use cf_components::ComponentError;
use cf_core::CfError;
use thiserror::Error;

/// Errors that can occur while assembling or solving a system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Configuration error: {what}")]
    Config { what: String },

    #[error("Unknown component: {name}")]
    UnknownComponent { name: String },

    #[error("{component} has no variable named {variable}")]
    UnknownVariable { component: String, variable: String },

    #[error("{component} :: solve called before setup")]
    NotSetUp { component: String },

    #[error("Invalid solver options: {what}")]
    InvalidOptions { what: &'static str },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for CfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Config { .. } => CfError::InvalidArg {
                what: "system configuration",
            },
            SolverError::UnknownComponent { .. } | SolverError::UnknownVariable { .. } => {
                CfError::InvalidArg {
                    what: "connection endpoint",
                }
            }
            SolverError::NotSetUp { .. } => CfError::Invariant {
                what: "component solved before setup",
            },
            SolverError::InvalidOptions { what } => CfError::InvalidArg { what },
            SolverError::Component(_) => CfError::InvalidArg { what: "component" },
        }
    }
}
