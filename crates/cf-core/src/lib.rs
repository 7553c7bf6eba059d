//! cf-core: stable foundation for channelflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float helpers)
//! - ids (compact component identifiers)
//! - mesh (1D node/cell partitions)
//! - timing (wall-clock measurement and formatting)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod mesh;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CfError, CfResult};
pub use ids::*;
pub use mesh::Mesh1D;
pub use numeric::*;
pub use units::*;
