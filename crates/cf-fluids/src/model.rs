//! Equation-of-state trait and validation helpers.

use crate::error::{FluidError, FluidResult};

/// Properties evaluated together at one (T, P) state.
///
/// The channel solver refreshes all of these whenever a node's temperature or
/// pressure moves, so backends may override [`EquationOfState::props`] to do it
/// in a single call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidProps {
    /// Density [kg/m³]
    pub rho: f64,
    /// Specific heat at constant pressure [J/(kg·K)]
    pub cp: f64,
    /// Dynamic viscosity [Pa·s]
    pub mu: f64,
    /// Thermal conductivity [W/(m·K)]
    pub k: f64,
    /// Specific internal energy [J/kg]
    pub e: f64,
}

/// Equation of state for a single-phase fluid.
///
/// All quantities are SI: temperature in K, pressure in Pa. Implementations
/// must be deterministic and free of side effects.
pub trait EquationOfState: Send + Sync {
    /// Model name (for logging).
    fn name(&self) -> &str;

    /// Density [kg/m³].
    fn density(&self, t: f64, p: f64) -> FluidResult<f64>;

    /// Specific heat at constant pressure [J/(kg·K)].
    fn specific_heat(&self, t: f64, p: f64) -> FluidResult<f64>;

    /// Dynamic viscosity [Pa·s].
    fn viscosity(&self, t: f64, p: f64) -> FluidResult<f64>;

    /// Thermal conductivity [W/(m·K)].
    fn conductivity(&self, t: f64, p: f64) -> FluidResult<f64>;

    /// Specific internal energy [J/kg].
    fn internal_energy(&self, t: f64, p: f64) -> FluidResult<f64>;

    /// Inverse of `internal_energy`: temperature [K] from internal energy and pressure.
    fn temperature(&self, e: f64, p: f64) -> FluidResult<f64>;

    /// All state properties at (T, P).
    fn props(&self, t: f64, p: f64) -> FluidResult<FluidProps> {
        Ok(FluidProps {
            rho: self.density(t, p)?,
            cp: self.specific_heat(t, p)?,
            mu: self.viscosity(t, p)?,
            k: self.conductivity(t, p)?,
            e: self.internal_energy(t, p)?,
        })
    }
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: f64) -> FluidResult<()> {
        if !t.is_finite() || t <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: f64) -> FluidResult<()> {
        if !p.is_finite() || p <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure a state (T, P) is physical.
    pub fn validate_state(t: f64, p: f64) -> FluidResult<()> {
        validate_temperature(t)?;
        validate_pressure(p)
    }

    /// Ensure a model parameter is positive and finite.
    pub fn validate_positive(v: f64, what: &'static str) -> FluidResult<f64> {
        if !v.is_finite() || v <= 0.0 {
            return Err(FluidError::InvalidArg { what });
        }
        Ok(v)
    }

    /// Ensure internal energy is finite (can be negative).
    pub fn validate_energy(e: f64) -> FluidResult<()> {
        if !e.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "internal energy must be finite",
            });
        }
        Ok(())
    }
}
