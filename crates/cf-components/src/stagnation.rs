//! Conversions between stagnation and static flow states.

use cf_fluids::EquationOfState;

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use crate::variable::FlowState;

/// Static temperature [K] and pressure [Pa] recovered from a flow state.
///
/// Fixed-point iteration starting from the stagnation values. Each pass
/// evaluates density and specific heat at the current guess, then sets
/// `T = T0 - u²/(2 cp)` and `P = P0 - ρu²/2` with `u = ṁ/(ρA)`. Stops when
/// the relative change `sqrt((ΔT/T)² + (ΔP/P)²)` drops below `tol`.
pub fn stagnation_to_static(
    fluid: &dyn EquationOfState,
    state: FlowState,
    area: f64,
    tol: f64,
    max_iter: usize,
) -> ComponentResult<(f64, f64)> {
    let (mut t, mut p) = (state.t0, state.p0);
    for _ in 0..max_iter {
        let rho = fluid.density(t, p)?;
        let cp = fluid.specific_heat(t, p)?;
        let u = state.mdot / (rho * area);
        let t_new = check_finite(state.t0 - u * u / (2.0 * cp), "inlet static temperature")?;
        let p_new = check_finite(state.p0 - 0.5 * rho * u * u, "inlet static pressure")?;
        if t_new <= 0.0 || p_new <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "inlet dynamic head exceeds stagnation state",
            });
        }

        let change = (((t_new - t) / t_new).powi(2) + ((p_new - p) / p_new).powi(2)).sqrt();
        t = t_new;
        p = p_new;
        if change < tol {
            return Ok((t, p));
        }
    }
    Err(ComponentError::ConvergenceFailed {
        what: "stagnation-to-static inlet conversion",
    })
}

/// Stagnation flow state from static temperature and pressure.
///
/// `T0 = T + u²/(2 cp)`, `P0 = P + ρu²/2` with `u = ṁ/(ρA)`; mass flow is carried
/// through unchanged.
pub fn static_to_stagnation(
    fluid: &dyn EquationOfState,
    t: f64,
    p: f64,
    mdot: f64,
    area: f64,
) -> ComponentResult<FlowState> {
    let rho = fluid.density(t, p)?;
    let cp = fluid.specific_heat(t, p)?;
    let u = mdot / (rho * area);
    let t0 = check_finite(t + u * u / (2.0 * cp), "stagnation temperature")?;
    let p0 = check_finite(p + 0.5 * rho * u * u, "stagnation pressure")?;
    Ok(FlowState::from_si(t0, p0, mdot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_fluids::{ConstantFluid, IdealGas};

    const AREA: f64 = 7.2548e-3;

    fn hydrogen_like() -> ConstantFluid {
        ConstantFluid::new(0.166, 5192.6, 3.226e-5, 0.2256).unwrap()
    }

    #[test]
    fn constant_density_static_state() {
        let fluid = hydrogen_like();
        let inlet = FlowState::from_si(300.0, 1.0e6, 1.0e-2);
        let (t, p) = stagnation_to_static(&fluid, inlet, AREA, 1e-10, 50).unwrap();

        let u = 1.0e-2 / (0.166 * AREA);
        assert!((t - (300.0 - u * u / (2.0 * 5192.6))).abs() < 1e-9);
        assert!((p - (1.0e6 - 0.5 * 0.166 * u * u)).abs() < 1e-6);
    }

    #[test]
    fn zero_flow_static_equals_stagnation() {
        let fluid = hydrogen_like();
        let inlet = FlowState::from_si(300.0, 1.0e6, 0.0);
        let (t, p) = stagnation_to_static(&fluid, inlet, AREA, 1e-10, 5).unwrap();
        assert_eq!((t, p), (300.0, 1.0e6));
    }

    #[test]
    fn round_trip_ideal_gas() {
        let h2 = IdealGas::new("H2", 14_300.0, 0.18, 2.016, 8.9e-6).unwrap();
        let inlet = FlowState::from_si(372.0, 6.0e6, 7.7e-4);
        let area = std::f64::consts::PI * 0.0015_f64.powi(2);
        let (t, p) = stagnation_to_static(&h2, inlet, area, 1e-12, 100).unwrap();
        let back = static_to_stagnation(&h2, t, p, inlet.mdot, area).unwrap();
        assert!((back.t0 - inlet.t0).abs() / inlet.t0 < 1e-9);
        assert!((back.p0 - inlet.p0).abs() / inlet.p0 < 1e-9);
        assert_eq!(back.mdot, inlet.mdot);
    }

    #[test]
    fn choked_inlet_is_rejected() {
        let fluid = hydrogen_like();
        let inlet = FlowState::from_si(300.0, 10.0, 1.0);
        assert!(stagnation_to_static(&fluid, inlet, 1e-4, 1e-8, 50).is_err());
    }

    #[test]
    fn iteration_cap_reports_failure() {
        let h2 = IdealGas::new("H2", 14_300.0, 0.18, 2.016, 8.9e-6).unwrap();
        let inlet = FlowState::from_si(372.0, 6.0e6, 7.7e-4);
        let err = stagnation_to_static(&h2, inlet, 7.0e-6, 0.0, 3).unwrap_err();
        assert!(matches!(err, ComponentError::ConvergenceFailed { .. }));
    }
}
