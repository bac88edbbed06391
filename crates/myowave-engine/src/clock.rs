//! Simulation clock.

/// Relative tolerance when deciding whether `t_max / dt` is integral.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// Step counter and derived simulation time.
///
/// `t` is always recomputed from the step count, so `t == step * dt`
/// holds exactly after any number of steps. The run ends once `step`
/// reaches [`terminal_step`](Self::terminal_step).
#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    dt: f64,
    t_max: f64,
    step: u64,
    t: f64,
    terminal_step: u64,
    stopped_early: bool,
}

impl Clock {
    /// Clock at step zero.
    ///
    /// The terminal step is `ceil(t_max / dt)`, except that a quotient
    /// within rounding error of an integer counts as that integer, so
    /// `t_max = 1.0, dt = 0.1` runs exactly ten steps.
    pub fn new(dt: f64, t_max: f64) -> Self {
        Self {
            dt,
            t_max,
            step: 0,
            t: 0.0,
            terminal_step: steps_for(t_max, dt),
            stopped_early: false,
        }
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Current simulation time.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Steps completed.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Configured duration.
    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    /// Step count at which the run ends.
    pub fn terminal_step(&self) -> u64 {
        self.terminal_step
    }

    /// Whether the terminal step has been reached.
    pub fn is_finished(&self) -> bool {
        self.step >= self.terminal_step
    }

    /// Whether [`finish`](Self::finish) cut the run short.
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }

    /// Count one completed step.
    pub fn advance(&mut self) {
        self.step += 1;
        self.t = self.step as f64 * self.dt;
    }

    /// Jump to an arbitrary step.
    pub fn set_step(&mut self, step: u64) {
        self.step = step;
        self.t = step as f64 * self.dt;
    }

    /// Jump to the terminal step so the run loop exits at its next check.
    pub fn finish(&mut self) {
        if self.step < self.terminal_step {
            self.stopped_early = true;
            self.set_step(self.terminal_step);
        }
    }
}

fn steps_for(t_max: f64, dt: f64) -> u64 {
    let n = t_max / dt;
    let nearest = n.round();
    if (n - nearest).abs() <= STEP_COUNT_TOLERANCE * nearest.max(1.0) {
        nearest as u64
    } else {
        n.ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_exact_multiple_of_dt() {
        let mut c = Clock::new(0.01, 100.0);
        for _ in 0..12_345 {
            c.advance();
        }
        assert_eq!(c.t(), 12_345.0 * 0.01);
        assert_eq!(c.step(), 12_345);
    }

    #[test]
    fn representable_ratio_rounds_to_integer() {
        assert_eq!(Clock::new(0.1, 1.0).terminal_step(), 10);
        assert_eq!(Clock::new(0.01, 0.3).terminal_step(), 30);
        assert_eq!(Clock::new(0.02, 500.0).terminal_step(), 25_000);
    }

    #[test]
    fn fractional_ratio_rounds_up() {
        assert_eq!(Clock::new(0.3, 1.0).terminal_step(), 4);
    }

    #[test]
    fn zero_duration_is_finished_at_start() {
        let c = Clock::new(0.01, 0.0);
        assert_eq!(c.terminal_step(), 0);
        assert!(c.is_finished());
    }

    #[test]
    fn finish_marks_early_stop() {
        let mut c = Clock::new(0.5, 10.0);
        c.advance();
        c.finish();
        assert!(c.is_finished());
        assert!(c.stopped_early());
        assert_eq!(c.t(), c.step() as f64 * 0.5);
    }

    #[test]
    fn finish_at_end_is_not_early() {
        let mut c = Clock::new(0.5, 1.0);
        c.advance();
        c.advance();
        c.finish();
        assert!(!c.stopped_early());
    }
}
