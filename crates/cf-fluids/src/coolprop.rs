//! CoolProp-backed pure fluid (feature `coolprop`).

use crate::error::{FluidError, FluidResult};
use crate::model::{EquationOfState, FluidProps, validation};
use rfluids::prelude::*;
use rfluids::substance::Pure;

/// Real-fluid properties for a pure substance, evaluated by CoolProp through `rfluids`.
pub struct CoolPropFluid {
    pure: Pure,
    name: String,
}

fn backend(what: &str, e: impl std::fmt::Display) -> FluidError {
    FluidError::Backend {
        message: format!("rfluids error getting {what}: {e}"),
    }
}

impl CoolPropFluid {
    pub fn new(pure: Pure, name: impl Into<String>) -> Self {
        Self {
            pure,
            name: name.into(),
        }
    }

    /// Normal hydrogen, the usual propellant for heated channels.
    pub fn hydrogen() -> Self {
        Self::new(Pure::Hydrogen, "hydrogen")
    }

    /// Look up a supported substance by lowercase name.
    pub fn from_name(name: &str) -> FluidResult<Self> {
        let pure = match name {
            "hydrogen" => Pure::Hydrogen,
            "helium" => Pure::Helium,
            "nitrogen" => Pure::Nitrogen,
            "oxygen" => Pure::Oxygen,
            "methane" => Pure::Methane,
            "water" => Pure::Water,
            "air" => Pure::Air,
            _ => {
                return Err(FluidError::InvalidArg {
                    what: "unsupported CoolProp substance",
                });
            }
        };
        Ok(Self::new(pure, name))
    }

    fn at_tp(&self, t: f64, p: f64) -> FluidResult<Fluid> {
        validation::validate_state(t, p)?;
        Fluid::from(self.pure)
            .in_state(FluidInput::pressure(p), FluidInput::temperature(t))
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error at P={p} Pa, T={t} K: {e}"),
            })
    }
}

impl EquationOfState for CoolPropFluid {
    fn name(&self) -> &str {
        &self.name
    }

    fn density(&self, t: f64, p: f64) -> FluidResult<f64> {
        self.at_tp(t, p)?
            .density()
            .map_err(|e| backend("density", e))
    }

    fn specific_heat(&self, t: f64, p: f64) -> FluidResult<f64> {
        self.at_tp(t, p)?
            .specific_heat()
            .map_err(|e| backend("specific heat", e))
    }

    fn viscosity(&self, t: f64, p: f64) -> FluidResult<f64> {
        self.at_tp(t, p)?
            .dynamic_viscosity()
            .map_err(|e| backend("viscosity", e))
    }

    fn conductivity(&self, t: f64, p: f64) -> FluidResult<f64> {
        self.at_tp(t, p)?
            .conductivity()
            .map_err(|e| backend("conductivity", e))
    }

    fn internal_energy(&self, t: f64, p: f64) -> FluidResult<f64> {
        self.at_tp(t, p)?
            .internal_energy()
            .map_err(|e| backend("internal energy", e))
    }

    /// Bisection on T such that e(T, P) = e_target.
    fn temperature(&self, e: f64, p: f64) -> FluidResult<f64> {
        const T_MIN: f64 = 20.0;
        const T_MAX: f64 = 2000.0;
        const MAX_ITER: usize = 100;

        validation::validate_energy(e)?;
        let mut t_low = T_MIN;
        let mut t_high = T_MAX;
        let e_low = self.internal_energy(t_low, p)?;
        let e_high = self.internal_energy(t_high, p)?;
        if e < e_low || e > e_high {
            return Err(FluidError::OutOfRange {
                what: "internal energy outside valid range for given pressure",
            });
        }

        let tol = 1e-6_f64.max(e.abs() * 1e-12);
        for _ in 0..MAX_ITER {
            let t_mid = 0.5 * (t_low + t_high);
            let e_mid = self.internal_energy(t_mid, p)?;
            if (e_mid - e).abs() < tol {
                return Ok(t_mid);
            }
            if e_mid < e {
                t_low = t_mid;
            } else {
                t_high = t_mid;
            }
        }

        // Return best estimate if we hit max iterations
        Ok(0.5 * (t_low + t_high))
    }

    fn props(&self, t: f64, p: f64) -> FluidResult<FluidProps> {
        let mut fluid = self.at_tp(t, p)?;
        Ok(FluidProps {
            rho: fluid.density().map_err(|e| backend("density", e))?,
            cp: fluid
                .specific_heat()
                .map_err(|e| backend("specific heat", e))?,
            mu: fluid
                .dynamic_viscosity()
                .map_err(|e| backend("viscosity", e))?,
            k: fluid
                .conductivity()
                .map_err(|e| backend("conductivity", e))?,
            e: fluid
                .internal_energy()
                .map_err(|e| backend("internal energy", e))?,
        })
    }
}
