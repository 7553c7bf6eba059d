//! Errors shared by every channelflow crate.

use thiserror::Error;

pub type CfResult<T> = Result<T, CfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Rejected node layout.
    #[error("Invalid mesh: {what}")]
    Mesh { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
