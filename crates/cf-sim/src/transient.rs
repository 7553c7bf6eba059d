//! Fixed-step transient runner.

use cf_core::timing::{StepTimer, Stopwatch, format_duration};
use cf_solver::{SteadyOptions, SteadyReport, System, solve_step};
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::schedule::Schedule;

/// Options for transient runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransientOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Simulated duration (seconds)
    pub duration: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Fixed-point tolerance per step
    pub tol: f64,
    /// Fixed-point iteration cap per step
    pub max_iter: usize,
}

impl Default for TransientOptions {
    fn default() -> Self {
        Self {
            dt: 1.0,
            duration: 1.0,
            max_steps: 100_000,
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

impl TransientOptions {
    fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "duration must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }

    /// `ceil(duration / dt)`, capped at `max_steps`.
    pub fn step_count(&self) -> usize {
        // Guard against 0.3 / 0.1 rounding up to an extra step.
        let steps = (self.duration / self.dt - 1e-9).ceil().max(0.0) as usize;
        steps.min(self.max_steps)
    }

    fn steady(&self) -> SteadyOptions {
        SteadyOptions {
            tol: self.tol,
            max_iter: self.max_iter,
        }
    }
}

/// Outcome of one time step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    /// 1-based step number
    pub step: usize,
    /// Simulated time at the end of the step (seconds)
    pub time_s: f64,
    pub solve: SteadyReport,
    /// Wall-clock time spent on the step (seconds)
    pub wall_s: f64,
    pub events_fired: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransientReport {
    pub steps: Vec<StepRecord>,
    /// Wall-clock time for the whole run (seconds)
    pub wall_s: f64,
}

impl TransientReport {
    pub fn all_converged(&self) -> bool {
        self.steps.iter().all(|s| s.solve.converged)
    }

    pub fn final_time(&self) -> f64 {
        self.steps.last().map_or(0.0, |s| s.time_s)
    }
}

/// Run a transient simulation.
pub fn run_transient(
    system: &mut System,
    opts: &TransientOptions,
    schedule: Schedule,
) -> SimResult<TransientReport> {
    run_transient_with_progress(system, opts, schedule, |_| {})
}

/// Run a transient simulation, calling `on_step` after every step.
///
/// The system is set up once. Each step marches the system, applies the
/// events due by the end of the step, then runs the fixed-point loop with
/// the step's `dt`.
pub fn run_transient_with_progress<F>(
    system: &mut System,
    opts: &TransientOptions,
    mut schedule: Schedule,
    mut on_step: F,
) -> SimResult<TransientReport>
where
    F: FnMut(&StepRecord),
{
    opts.validate()?;
    let steady = opts.steady();
    let n_steps = opts.step_count();

    info!("Setting up system...");
    system.setup()?;
    info!("Starting solution loop ({n_steps} steps, dt = {} s).", opts.dt);

    let run_clock = Stopwatch::start();
    let mut timer = StepTimer::new();
    let mut steps = Vec::with_capacity(n_steps);

    for step in 1..=n_steps {
        let time_s = step as f64 * opts.dt;
        info!("Time step {step}: t = {time_s} s");
        let clock = Stopwatch::start();

        system.march();
        let events_fired = schedule.apply_due(system, time_s)?;
        let solve = solve_step(system, Some(opts.dt), &steady)?;
        if !solve.converged {
            warn!("Time step {step} did not converge (residual {:.6E}).", solve.residual);
        }

        let wall_s = clock.elapsed_s();
        timer.record(wall_s);
        debug!(step, wall_s, "step complete");

        let record = StepRecord {
            step,
            time_s,
            solve,
            wall_s,
            events_fired,
        };
        on_step(&record);
        steps.push(record);
    }

    if !schedule.pending().is_empty() {
        warn!(
            "{} scheduled event(s) fall after the end of the run and were not applied.",
            schedule.pending().len()
        );
    }

    let wall_s = run_clock.elapsed_s();
    info!("Computation Time was {}", format_duration(wall_s));
    if timer.count() > 0 {
        debug!(
            average_s = timer.average_seconds(),
            longest_s = timer.longest_seconds(),
            "step timing"
        );
    }

    Ok(TransientReport { steps, wall_s })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_defaults() {
        let opts = TransientOptions::default();
        assert_eq!(opts.dt, 1.0);
        assert_eq!(opts.step_count(), 1);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn step_count_rounds_up() {
        let opts = TransientOptions {
            dt: 0.1,
            duration: 0.3,
            ..Default::default()
        };
        assert_eq!(opts.step_count(), 3);

        let opts = TransientOptions {
            dt: 0.4,
            duration: 1.0,
            ..Default::default()
        };
        assert_eq!(opts.step_count(), 3);
    }

    #[test]
    fn step_count_capped() {
        let opts = TransientOptions {
            dt: 1e-3,
            duration: 10.0,
            max_steps: 50,
            ..Default::default()
        };
        assert_eq!(opts.step_count(), 50);
    }

    #[test]
    fn invalid_options_rejected() {
        let bad_dt = TransientOptions {
            dt: 0.0,
            ..Default::default()
        };
        assert!(bad_dt.validate().is_err());
        let bad_duration = TransientOptions {
            duration: -1.0,
            ..Default::default()
        };
        assert!(bad_duration.validate().is_err());
        let no_steps = TransientOptions {
            max_steps: 0,
            ..Default::default()
        };
        assert!(no_steps.validate().is_err());
    }

    #[test]
    fn empty_system_runs() {
        let mut system = System::new();
        let opts = TransientOptions {
            dt: 0.5,
            duration: 1.0,
            ..Default::default()
        };
        let report = run_transient(&mut system, &opts, Schedule::default()).unwrap();
        assert_eq!(report.steps.len(), 2);
        assert!(report.all_converged());
        assert_eq!(report.final_time(), 1.0);
    }
}
