//! Wall-clock timing for solver runs.
//!
//! The transient driver accumulates per-step solve time with [`StepTimer`]
//! and reports totals with [`format_duration`].

use std::time::Instant;

/// A running wall-clock measurement.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

impl Stopwatch {
    /// Start measuring now.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since `start`.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Accumulates wall-clock time over repeated measurements (one per time step).
#[derive(Debug, Clone, Default)]
pub struct StepTimer {
    total_s: f64,
    count: usize,
    longest_s: f64,
}

impl StepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one measurement.
    pub fn record(&mut self, duration_s: f64) {
        self.total_s += duration_s;
        self.count += 1;
        self.longest_s = self.longest_s.max(duration_s);
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_s
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Longest single measurement seen so far.
    pub fn longest_seconds(&self) -> f64 {
        self.longest_s
    }

    pub fn average_seconds(&self) -> f64 {
        if self.count > 0 {
            self.total_s / self.count as f64
        } else {
            0.0
        }
    }
}

const INTERVALS: [(&str, u64); 5] = [
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Human-readable duration, e.g. `"1 hour, 2 minutes, 5 seconds"`.
///
/// Durations under one second are printed with fractional seconds.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 1.0 {
        return format!("{:.5} seconds", seconds.max(0.0));
    }

    let mut remaining = seconds as u64;
    let mut parts = Vec::new();
    for (name, span) in INTERVALS {
        let count = remaining / span;
        if count > 0 {
            remaining -= count * span;
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {name}{plural}"));
        }
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_second_durations_keep_fraction() {
        assert_eq!(format_duration(0.25), "0.25000 seconds");
    }

    #[test]
    fn durations_are_split_into_units() {
        assert_eq!(format_duration(1.0), "1 second");
        assert_eq!(format_duration(3_725.0), "1 hour, 2 minutes, 5 seconds");
        assert_eq!(format_duration(2.0 * 86_400.0 + 60.0), "2 days, 1 minute");
    }

    #[test]
    fn step_timer_accumulates() {
        let mut timer = StepTimer::new();
        timer.record(0.5);
        timer.record(1.5);
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.total_seconds(), 2.0);
        assert_eq!(timer.average_seconds(), 1.0);
        assert_eq!(timer.longest_seconds(), 1.5);
    }

    #[test]
    fn stopwatch_is_monotonic() {
        let watch = Stopwatch::start();
        let a = watch.elapsed_s();
        let b = watch.elapsed_s();
        assert!(b >= a);
    }
}
