//! Fluid property errors.

use cf_core::CfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// State outside the backend's valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Property backend rejected the state.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<CfError> for FluidError {
    fn from(err: CfError) -> Self {
        match err {
            CfError::NonFinite { what, .. } => FluidError::NonPhysical { what },
            CfError::InvalidArg { what } => FluidError::InvalidArg { what },
            other => FluidError::Backend {
                message: other.to_string(),
            },
        }
    }
}
