//! Fixed-point iteration over a system.

use tracing::{info, warn};

use crate::error::{SolverError, SolverResult};
use crate::system::System;

/// Outer loop controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteadyOptions {
    /// Converged once the system residual is at or below this value.
    pub tol: f64,
    /// Iterations after the initial solve.
    pub max_iter: usize,
}

impl Default for SteadyOptions {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

impl SteadyOptions {
    fn validate(&self) -> SolverResult<()> {
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(SolverError::InvalidOptions {
                what: "tolerance must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Outcome of one fixed-point solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SteadyReport {
    pub converged: bool,
    /// Passes over the components after the initial solve.
    pub iterations: usize,
    /// Final system residual.
    pub residual: f64,
    /// Residual after the initial solve followed by one entry per iteration.
    pub history: Vec<f64>,
}

/// Set up every component and iterate the system to a steady state.
pub fn solve_steady(system: &mut System, opts: &SteadyOptions) -> SolverResult<SteadyReport> {
    opts.validate()?;
    system.setup()?;
    info!("Steady state solver is starting.");
    solve_step(system, None, opts)
}

/// Run the fixed-point loop on an already set-up system.
///
/// The initial solve uses whatever inputs the components hold. Each later
/// iteration copies connected sources into a component right before solving
/// it. Hitting `max_iter` is not an error: the report carries
/// `converged = false` and the state is kept.
pub fn solve_step(
    system: &mut System,
    dt: Option<f64>,
    opts: &SteadyOptions,
) -> SolverResult<SteadyReport> {
    opts.validate()?;
    let n = system.len();

    for index in 0..n {
        system.solve_at(index, dt)?;
    }
    let mut residual = system.residual();
    let mut history = vec![residual];

    info!("");
    info!("     {:<9}     {:<12}", "Iteration", "Residual");
    info!("     {:<9}     {:<12.6E}", "Initial", residual);

    for iteration in 1..=opts.max_iter {
        for index in 0..n {
            system.propagate_into(index)?;
            system.solve_at(index, dt)?;
        }
        residual = system.residual();
        history.push(residual);
        info!("     {:<9}     {:<12.6E}", iteration, residual);

        if residual <= opts.tol {
            info!("Converged in {iteration} iterations.");
            return Ok(SteadyReport {
                converged: true,
                iterations: iteration,
                residual,
                history,
            });
        }
    }

    warn!(
        "Max iterations ({}) reached without convergence (residual {:.6E}).",
        opts.max_iter, residual
    );
    Ok(SteadyReport {
        converged: false,
        iterations: opts.max_iter,
        residual,
        history,
    })
}
