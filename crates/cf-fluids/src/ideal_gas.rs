//! Calorically perfect ideal gas.

use crate::error::{FluidError, FluidResult};
use crate::model::{EquationOfState, validation};
use cf_core::units::constants::R_UNIVERSAL;

/// Ideal gas with constant specific heats and transport properties.
///
/// - density: `P / (R T)` with `R = R_universal / M`
/// - internal energy: `cv T` with `cv = cp - R`
#[derive(Debug, Clone, PartialEq)]
pub struct IdealGas {
    name: String,
    cp: f64,
    cv: f64,
    r: f64,
    k: f64,
    mu: f64,
}

impl IdealGas {
    /// Create an ideal gas from cp [J/(kg·K)], conductivity [W/(m·K)],
    /// molar mass [kg/kmol] and viscosity [Pa·s].
    pub fn new(
        name: impl Into<String>,
        cp: f64,
        k: f64,
        molar_mass: f64,
        mu: f64,
    ) -> FluidResult<Self> {
        let cp = validation::validate_positive(cp, "cp must be positive")?;
        let molar_mass = validation::validate_positive(molar_mass, "molar mass must be positive")?;
        let r = R_UNIVERSAL / molar_mass;
        let cv = cp - r;
        if cv <= 0.0 {
            return Err(FluidError::InvalidArg {
                what: "cp must exceed the specific gas constant",
            });
        }
        Ok(Self {
            name: name.into(),
            cp,
            cv,
            r,
            k: validation::validate_positive(k, "conductivity must be positive")?,
            mu: validation::validate_positive(mu, "viscosity must be positive")?,
        })
    }

    /// Specific gas constant [J/(kg·K)].
    pub fn gas_constant(&self) -> f64 {
        self.r
    }

    pub fn cv(&self) -> f64 {
        self.cv
    }
}

impl EquationOfState for IdealGas {
    fn name(&self) -> &str {
        &self.name
    }

    fn density(&self, t: f64, p: f64) -> FluidResult<f64> {
        validation::validate_state(t, p)?;
        Ok(p / (self.r * t))
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
        Ok(self.cv * t)
    }

    fn temperature(&self, e: f64, p: f64) -> FluidResult<f64> {
        validation::validate_energy(e)?;
        validation::validate_pressure(p)?;
        let t = e / self.cv;
        validation::validate_temperature(t)?;
        Ok(t)
    }
}
