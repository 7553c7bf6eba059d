//! Time-ordered input changes for transient runs.

use cf_components::VarValue;
use cf_solver::{System, VarRef};
use tracing::info;

use crate::error::{SimError, SimResult};

/// Set `target` to `value` once simulated time reaches `time_s`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent {
    pub time_s: f64,
    pub target: VarRef,
    pub value: VarValue,
}

/// Pending events, consumed in time order.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    events: Vec<ScheduledEvent>,
    next: usize,
}

impl Schedule {
    pub fn new(mut events: Vec<ScheduledEvent>) -> SimResult<Self> {
        if events.iter().any(|e| !e.time_s.is_finite() || e.time_s < 0.0) {
            return Err(SimError::InvalidArg {
                what: "event times must be finite and non-negative",
            });
        }
        events.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        Ok(Self { events, next: 0 })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events not applied yet.
    pub fn pending(&self) -> &[ScheduledEvent] {
        &self.events[self.next..]
    }

    /// Apply every pending event with `time_s <= t`, returning how many fired.
    pub fn apply_due(&mut self, system: &mut System, t: f64) -> SimResult<usize> {
        let mut fired = 0;
        while let Some(event) = self.events.get(self.next) {
            if event.time_s > t {
                break;
            }
            system
                .set_input(&event.target, event.value.clone())
                .map_err(|e| SimError::Event {
                    message: format!("event at t = {} s: {e}", event.time_s),
                })?;
            info!(
                time_s = event.time_s,
                variable = %event.target.variable,
                "scheduled event applied"
            );
            self.next += 1;
            fired += 1;
        }
        Ok(fired)
    }
}
