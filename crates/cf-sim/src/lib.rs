//! Transient driver for channelflow systems.
//!
//! Provides:
//! - Fixed-step time marching around the network fixed-point loop
//! - Scheduled input changes applied at the start of a step
//! - Per-step and total wall-clock accounting

pub mod error;
pub mod schedule;
pub mod transient;

pub use error::{SimError, SimResult};
pub use schedule::{Schedule, ScheduledEvent};
pub use transient::{
    StepRecord, TransientOptions, TransientReport, run_transient, run_transient_with_progress,
};
