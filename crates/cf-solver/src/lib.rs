//! Network solver for channelflow systems.
//!
//! A [`System`] owns components and the connections between their variables.
//! [`solve_steady`] drives the block Gauss-Seidel fixed point: every
//! component is solved in registration order, each one after the values it
//! depends on have been copied in from their sources, until the change in all
//! outputs falls below tolerance.

pub mod connection;
pub mod error;
pub mod steady;
pub mod system;

pub use connection::{Connection, VarRef};
pub use error::{SolverError, SolverResult};
pub use steady::{SteadyOptions, SteadyReport, solve_steady, solve_step};
pub use system::{Lifecycle, System};
