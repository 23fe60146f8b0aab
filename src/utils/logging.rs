use log::{Level, log_enabled, trace, warn};
use std::time::{Duration, Instant};

/// Traces how long a labelled section takes. Silent unless trace logging is on.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            trace!("begin {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            trace!("end {} after {} µs", self.label, self.start.elapsed().as_micros());
        }
    }
}

/// Logs a warning when one step took longer than `budget_ms`.
/// Returns whether the budget was exceeded.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("Physics step took {elapsed_ms:.2} ms, over the {budget_ms:.2} ms budget");
        return true;
    }
    false
}
