//! Per-step and per-run performance metrics.

use std::time::Duration;

/// Wall-clock time spent in each phase of the most recent step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Whole step.
    pub total_us: u64,
    /// Applying due stimuli.
    pub stimulate_us: u64,
    /// Diffusion kernel.
    pub diffuse_us: u64,
    /// Trackers.
    pub track_us: u64,
    /// Ionic kernel.
    pub react_us: u64,
    /// Due commands.
    pub command_us: u64,
}

/// Outcome of one call to [`Model::run`](crate::Model::run).
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Steps executed by this call.
    pub steps: u64,
    /// Simulation time after the last executed step.
    pub final_time: f64,
    /// Whether a command ended the run before `t_max`.
    pub stopped_early: bool,
    /// Wall-clock duration of the call.
    pub wall_time: Duration,
}

impl RunSummary {
    /// Mean wall time per step, or zero if no step ran.
    pub fn mean_step_time(&self) -> Duration {
        match u32::try_from(self.steps) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.wall_time / n,
            Err(_) => Duration::from_secs_f64(self.wall_time.as_secs_f64() / self.steps as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.stimulate_us + m.diffuse_us + m.track_us + m.react_us + m.command_us, 0);
    }

    #[test]
    fn mean_step_time_divides_wall_time() {
        let s = RunSummary {
            steps: 4,
            final_time: 0.04,
            stopped_early: false,
            wall_time: Duration::from_millis(8),
        };
        assert_eq!(s.mean_step_time(), Duration::from_millis(2));
    }

    #[test]
    fn mean_step_time_of_empty_run_is_zero() {
        let s = RunSummary {
            steps: 0,
            final_time: 0.0,
            stopped_early: false,
            wall_time: Duration::from_millis(3),
        };
        assert_eq!(s.mean_step_time(), Duration::ZERO);
    }
}
