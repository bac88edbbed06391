//! Stimulation protocols.
//!
//! A [`StimulusSchedule`] holds any number of [`Stimulus`] objects and
//! is asked once per step, before diffusion, to apply whatever is due.
//! Stimuli write the potential of tissue cells only.

use myowave_core::{CellKind, GridShape};

use crate::error::SimError;
use crate::region::BoxRegion;

/// What a stimulus may touch during one step.
pub struct StimulusContext<'a> {
    /// Time at the start of the step.
    pub t: f64,
    /// Time step.
    pub dt: f64,
    /// Grid shape.
    pub shape: &'a GridShape,
    /// Cell classification.
    pub mesh: &'a [CellKind],
    /// Current potential.
    pub u: &'a mut [f64],
}

/// One scheduled intervention on the potential.
pub trait Stimulus: Send {
    /// Reset to the not-yet-applied state and check against the grid.
    /// Called once per model initialization.
    fn ready(&mut self, dt: f64, shape: &GridShape) -> Result<(), SimError>;

    /// Whether the stimulus has nothing left to do.
    fn is_done(&self) -> bool;

    /// Apply the stimulus if it is due.
    fn stimulate(&mut self, ctx: &mut StimulusContext<'_>);
}

/// An event at `time` counts as due once `t` is within half a step of it.
#[inline]
pub(crate) fn is_due(t: f64, time: f64, dt: f64) -> bool {
    t >= time - 0.5 * dt
}

fn for_each_tissue_cell(
    region: &BoxRegion,
    shape: &GridShape,
    mesh: &[CellKind],
    mut f: impl FnMut(usize),
) {
    region.for_each_cell(shape, |c| {
        if mesh[c].is_tissue() {
            f(c)
        }
    });
}

// ── VoltageStimulus ───────────────────────────────────────────────

/// Sets the potential of a region to a fixed value once, at `time`.
#[derive(Clone, Debug)]
pub struct VoltageStimulus {
    time: f64,
    value: f64,
    region: BoxRegion,
    done: bool,
}

impl VoltageStimulus {
    /// Stimulus applying `value` to `region` at `time`.
    pub fn new(time: f64, value: f64, region: BoxRegion) -> Self {
        Self {
            time,
            value,
            region,
            done: false,
        }
    }
}

impl Stimulus for VoltageStimulus {
    fn ready(&mut self, _dt: f64, shape: &GridShape) -> Result<(), SimError> {
        self.region.check(shape)?;
        self.done = false;
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn stimulate(&mut self, ctx: &mut StimulusContext<'_>) {
        if self.done || !is_due(ctx.t, self.time, ctx.dt) {
            return;
        }
        let value = self.value;
        let u = &mut *ctx.u;
        for_each_tissue_cell(&self.region, ctx.shape, ctx.mesh, |c| u[c] = value);
        self.done = true;
    }
}

// ── CurrentStimulus ───────────────────────────────────────────────

/// Injects a constant current into a region for a duration.
///
/// Each active step adds `current * dt` to the potential.
#[derive(Clone, Debug)]
pub struct CurrentStimulus {
    time: f64,
    duration: f64,
    current: f64,
    region: BoxRegion,
    done: bool,
}

impl CurrentStimulus {
    /// Stimulus injecting `current` into `region` from `time` for `duration`.
    pub fn new(time: f64, duration: f64, current: f64, region: BoxRegion) -> Self {
        Self {
            time,
            duration,
            current,
            region,
            done: false,
        }
    }
}

impl Stimulus for CurrentStimulus {
    fn ready(&mut self, _dt: f64, shape: &GridShape) -> Result<(), SimError> {
        self.region.check(shape)?;
        self.done = false;
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn stimulate(&mut self, ctx: &mut StimulusContext<'_>) {
        if self.done || !is_due(ctx.t, self.time, ctx.dt) {
            return;
        }
        if is_due(ctx.t, self.time + self.duration, ctx.dt) {
            self.done = true;
            return;
        }
        let du = self.current * ctx.dt;
        let u = &mut *ctx.u;
        for_each_tissue_cell(&self.region, ctx.shape, ctx.mesh, |c| u[c] += du);
    }
}

// ── StimulusSchedule ──────────────────────────────────────────────

/// Ordered collection of stimuli.
#[derive(Default)]
pub struct StimulusSchedule {
    stimuli: Vec<Box<dyn Stimulus>>,
}

impl StimulusSchedule {
    /// Empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stimulus. Stimuli due in the same step apply in
    /// insertion order.
    pub fn add(&mut self, stimulus: impl Stimulus + 'static) -> &mut Self {
        self.stimuli.push(Box::new(stimulus));
        self
    }

    /// Number of stimuli.
    pub fn len(&self) -> usize {
        self.stimuli.len()
    }

    /// Whether the schedule holds no stimuli.
    pub fn is_empty(&self) -> bool {
        self.stimuli.is_empty()
    }

    /// Whether every stimulus has finished.
    pub fn is_exhausted(&self) -> bool {
        self.stimuli.iter().all(|s| s.is_done())
    }

    /// Reset every stimulus for a new run.
    pub fn ready(&mut self, dt: f64, shape: &GridShape) -> Result<(), SimError> {
        for s in &mut self.stimuli {
            s.ready(dt, shape)?;
        }
        Ok(())
    }

    /// Apply every stimulus that is due.
    pub fn stimulate_next(&mut self, ctx: &mut StimulusContext<'_>) {
        for s in &mut self.stimuli {
            if !s.is_done() {
                s.stimulate(ctx);
            }
        }
    }
}

impl std::fmt::Debug for StimulusSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StimulusSchedule")
            .field("len", &self.stimuli.len())
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}
