//! cf-fluids: equation-of-state models for channelflow.
//!
//! Provides:
//! - `EquationOfState` trait: the only fluid interface the solver sees
//! - `ConstantFluid`: fixed transport and caloric properties
//! - `IdealGas`: ideal gas with constant specific heats
//! - `CoolPropFluid` (feature `coolprop`): real pure-fluid properties via `rfluids`
//!
//! # Example
//!
//! ```
//! use cf_fluids::{EquationOfState, IdealGas};
//!
//! let h2 = IdealGas::new("hydrogen", 14_290.0, 0.18, 2.016, 0.88e-5).unwrap();
//! let rho = h2.density(300.0, 1.0e6).unwrap();
//! assert!(rho > 0.0);
//! ```

pub mod constant;
#[cfg(feature = "coolprop")]
pub mod coolprop;
pub mod error;
pub mod ideal_gas;
pub mod model;

// Re-exports for ergonomics
pub use constant::ConstantFluid;
#[cfg(feature = "coolprop")]
pub use coolprop::CoolPropFluid;
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGas;
pub use model::{EquationOfState, FluidProps};
