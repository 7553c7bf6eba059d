//! cf-components: component library for channelflow networks.
//!
//! Provides:
//! - Typed variables (scalar, mesh field, flow state) with two-slot history
//! - Closure correlations (Reynolds, Prandtl, friction factor, Nusselt)
//! - Stagnation/static flow conversions
//! - `FlowChannel1D`: 1D area-averaged mass/momentum/energy channel solver
//! - `WallHeatSource`: convective heat deposition from a wall
//!
//! All components implement the `Component` trait and are driven by the
//! network fixed-point loop in `cf-solver`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cf_components::{ChannelGeometry, Component, FlowChannel1D, FlowState, HeatTransferMode};
//! use cf_core::{Mesh1D, units::{k, kgps, m, m2, pa}};
//! use cf_fluids::ConstantFluid;
//!
//! let fluid = Arc::new(ConstantFluid::new(0.166, 5192.6, 3.226e-5, 0.2256).unwrap());
//! let geometry = ChannelGeometry::new(m2(7.2548e-3), m(0.4108), m(0.0)).unwrap();
//! let mut channel = FlowChannel1D::new(
//!     "fc1",
//!     Mesh1D::uniform(0.0, 1.0, 11).unwrap(),
//!     geometry,
//!     fluid,
//!     HeatTransferMode::Adiabatic,
//! );
//! channel
//!     .inputs
//!     .inlet
//!     .set_initial(FlowState::new(k(300.0), pa(1.0e6), kgps(1.0e-2)))
//!     .unwrap();
//! channel.setup().unwrap();
//! channel.solve(None).unwrap();
//! let outlet = channel.outputs.outlet.flow_state_value().unwrap();
//! println!("outlet T0 = {} K", outlet.t0);
//! ```

pub mod common;
pub mod correlations;
pub mod error;
pub mod flow_channel;
pub mod stagnation;
pub mod traits;
pub mod variable;
pub mod wall_heat;

// Re-exports
pub use correlations::Closures;
pub use error::{ComponentError, ComponentResult};
pub use flow_channel::{
    ChannelGeometry, ChannelInputs, ChannelOutputs, ChannelSettings, FlowChannel1D,
    HeatTransferMode,
};
pub use stagnation::{static_to_stagnation, stagnation_to_static};
pub use traits::Component;
pub use variable::{FlowState, Location, VarKind, VarValue, Variable};
pub use wall_heat::{WallHeatInputs, WallHeatOutputs, WallHeatSource};
