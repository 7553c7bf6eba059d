//! Constant-property fluid.

use crate::error::FluidResult;
use crate::model::{EquationOfState, validation};

/// Fluid whose density and transport properties do not depend on state.
///
/// Enthalpy is `cp * T`, so internal energy is `cp * T - P / rho`. With a
/// fixed density this keeps stagnation enthalpy constant through friction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantFluid {
    rho: f64,
    cp: f64,
    mu: f64,
    k: f64,
}

impl ConstantFluid {
    /// Create a constant fluid from density [kg/m³], cp [J/(kg·K)],
    /// viscosity [Pa·s] and conductivity [W/(m·K)].
    pub fn new(rho: f64, cp: f64, mu: f64, k: f64) -> FluidResult<Self> {
        Ok(Self {
            rho: validation::validate_positive(rho, "density must be positive")?,
            cp: validation::validate_positive(cp, "cp must be positive")?,
            mu: validation::validate_positive(mu, "viscosity must be positive")?,
            k: validation::validate_positive(k, "conductivity must be positive")?,
        })
    }

    pub fn enthalpy(&self, t: f64) -> f64 {
        self.cp * t
    }
}

impl EquationOfState for ConstantFluid {
    fn name(&self) -> &str {
        "constant"
    }

    fn density(&self, t: f64, p: f64) -> FluidResult<f64> {
        validation::validate_state(t, p)?;
        Ok(self.rho)
    }

    fn specific_heat(&self, t: f64, p: f64) -> FluidResult<f64> {
        validation::validate_state(t, p)?;
        Ok(self.cp)
    }

    fn viscosity(&self, t: f64, p: f64) -> FluidResult<f64> {
        validation::validate_state(t, p)?;
        Ok(self.mu)
    }

    fn conductivity(&self, t: f64, p: f64) -> FluidResult<f64> {
        validation::validate_state(t, p)?;
        Ok(self.k)
    }

    fn internal_energy(&self, t: f64, p: f64) -> FluidResult<f64> {
        validation::validate_state(t, p)?;
        Ok(self.enthalpy(t) - p / self.rho)
    }

    fn temperature(&self, e: f64, p: f64) -> FluidResult<f64> {
        validation::validate_energy(e)?;
        validation::validate_pressure(p)?;
        let t = (e + p / self.rho) / self.cp;
        validation::validate_temperature(t)?;
        Ok(t)
    }
}
