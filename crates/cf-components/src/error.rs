//! Error types for component operations.

use cf_core::CfError;
use cf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while setting up or solving a component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("{component} :: configuration error: {message}")]
    Config { component: String, message: String },

    #[error("{component} :: {variable} :: initial value is not set")]
    UnboundInput { component: String, variable: String },

    #[error("{component} :: {variable} :: {message}")]
    InvalidValue {
        component: String,
        variable: String,
        message: String,
    },

    #[error(
        "{component} :: node {node} did not converge in {iterations} iterations (residual {residual:e})"
    )]
    NodeNotConverged {
        component: String,
        node: usize,
        iterations: usize,
        residual: f64,
    },

    #[error("{component} :: solve called before setup")]
    NotSetUp { component: String },

    #[error("{component} :: {source}")]
    InComponent {
        component: String,
        #[source]
        source: Box<ComponentError>,
    },

    #[error("Fluid model error: {0}")]
    Fluid(#[from] FluidError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    /// Attach the owning component's name to errors that do not carry one yet.
    pub fn in_component(self, component: &str) -> Self {
        match self {
            e @ (ComponentError::NonPhysical { .. }
            | ComponentError::InvalidArg { .. }
            | ComponentError::ConvergenceFailed { .. }
            | ComponentError::Fluid(_)) => ComponentError::InComponent {
                component: component.to_string(),
                source: Box::new(e),
            },
            other => other,
        }
    }
}

impl From<CfError> for ComponentError {
    fn from(e: CfError) -> Self {
        match e {
            CfError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            CfError::InvalidArg { what } => ComponentError::InvalidArg { what },
            CfError::Mesh { what } => ComponentError::InvalidArg { what },
            CfError::Invariant { what } => ComponentError::InvalidArg { what },
        }
    }
}
