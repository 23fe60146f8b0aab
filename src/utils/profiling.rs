use std::time::{Duration, Instant};

use log::debug;

/// Per-step timings and counts, filled in by [`crate::PhysicsWorld::step`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PhysicsProfiler {
    pub integrator_time: Duration,
    pub broad_phase_time: Duration,
    pub narrow_phase_time: Duration,
    pub solver_time: Duration,
    pub total_frame_time: Duration,

    pub body_count: usize,
    pub candidate_pair_count: usize,
    pub contact_count: usize,
}

impl PhysicsProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn share(&self, phase: Duration) -> f32 {
        let total = self.total_frame_time.as_secs_f32();
        if total > 0.0 {
            phase.as_secs_f32() / total * 100.0
        } else {
            0.0
        }
    }

    /// Writes the last step's breakdown to the debug log.
    pub fn report(&self) {
        if self.total_frame_time.is_zero() {
            return;
        }

        debug!(
            "step {:.3} ms | bodies {} | candidates {} | contacts {}",
            self.total_frame_time.as_secs_f32() * 1000.0,
            self.body_count,
            self.candidate_pair_count,
            self.contact_count
        );
        for (name, phase) in [
            ("integrator", self.integrator_time),
            ("broad phase", self.broad_phase_time),
            ("narrow phase", self.narrow_phase_time),
            ("solver", self.solver_time),
        ] {
            debug!(
                "  {name:<12} {:.3} ms ({:.1}%)",
                phase.as_secs_f32() * 1000.0,
                self.share(phase)
            );
        }
    }
}

/// Adds the elapsed time to `output` when dropped.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_timer_accumulates() {
        let mut elapsed = Duration::ZERO;
        {
            let _timer = PhaseTimer::new(&mut elapsed);
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(elapsed >= Duration::from_millis(2));
    }

    #[test]
    fn share_is_zero_without_total() {
        let profiler = PhysicsProfiler::default();
        assert_eq!(profiler.share(Duration::from_millis(1)), 0.0);
    }
}
