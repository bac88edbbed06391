//! The time stepper.
//!
//! [`Model`] owns the tissue, the cell model, the state buffers and the
//! collaborator schedules. Each step runs five phases in a fixed order:
//!
//! 1. stimuli write the potential `u`,
//! 2. the diffusion kernel writes `u_new` from `u`,
//! 3. trackers observe the diffused, not yet reacted state,
//! 4. the cell model adds the reaction term into `u_new`,
//! 5. the clock advances, the buffers swap and due commands run.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──initialize()──▶ Initialized ──run()/step()──▶ Running ──▶ Finished
//!        ▲                                                                    │
//!        └──────────────────────────── initialize() ◀─────────────────────────┘
//! ```
//!
//! `initialize()` may be called from any phase and always starts a
//! fresh run.

use std::fmt;
use std::time::Instant;

use myowave_core::{Diffusivity, FieldAccess, FieldAccessMut, FieldView};
use myowave_ionic::IonicModel;
use myowave_state::{state_hash, StateStore};
use myowave_tissue::{CardiacTissue, DiffusionKernel, Stencil, TissueError, Weights};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::command::{Command, CommandContext, CommandSchedule};
use crate::config::{ConfigError, SimulationConfig};
use crate::error::SimError;
use crate::fields::{DiffusedView, StateFields};
use crate::metrics::{RunSummary, StepMetrics};
use crate::stimulus::{Stimulus, StimulusContext, StimulusSchedule};
use crate::tracker::{Tracker, TrackerSet};

const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Model>();
    }
};

// ── ModelPhase ────────────────────────────────────────────────────

/// Lifecycle phase of a [`Model`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelPhase {
    /// Built but not yet initialized.
    Uninitialized,
    /// State allocated; no step taken.
    Initialized,
    /// At least one step taken, clock not at its end.
    Running,
    /// Clock reached its terminal step.
    Finished,
}

// ── Model ─────────────────────────────────────────────────────────

/// A cardiac tissue simulation.
pub struct Model {
    tissue: CardiacTissue,
    ionic: Box<dyn IonicModel>,
    stencil: Option<Box<dyn Stencil + Send + Sync>>,
    preset_weights: Option<Weights>,
    config: SimulationConfig,
    stimuli: StimulusSchedule,
    trackers: TrackerSet,
    commands: CommandSchedule,
    phase: ModelPhase,
    clock: Clock,
    fields: Option<StateFields>,
    kernel: Option<DiffusionKernel>,
    metrics: StepMetrics,
}

impl Model {
    /// Start building a model of `tissue` driven by `ionic`.
    pub fn builder(tissue: CardiacTissue, ionic: impl IonicModel + 'static) -> ModelBuilder {
        ModelBuilder::new(tissue, ionic)
    }

    /// Allocate fresh state and prepare every collaborator.
    ///
    /// Computes the diffusion weights (unless precomputed weights were
    /// supplied), selects the kernel, allocates the state at the cell
    /// model's initial values and, if a load directory is configured,
    /// overwrites it from disk. Stimuli, trackers and commands are then
    /// reset against the resulting state.
    pub fn initialize(&mut self) -> Result<(), SimError> {
        self.config.validate()?;
        let SimulationConfig { dt, dr, t_max, .. } = self.config;
        let diffusivity = self.diffusivity();
        diffusivity
            .validate()
            .map_err(|reason| ConfigError::InvalidDiffusivity { reason })?;

        let shape = self.tissue.shape().clone();
        let limit = diffusivity.stable_dt(dr, shape.ndim());
        if dt > limit {
            warn!(dt, limit, "time step exceeds the explicit stability limit");
        }

        match (&self.preset_weights, &self.stencil) {
            (Some(w), _) => self.tissue.set_weights(w.clone())?,
            (None, Some(s)) => self.tissue.compute_weights_with(s.as_ref(), dr, dt, diffusivity)?,
            (None, None) => self.tissue.compute_weights(dr, dt, diffusivity)?,
        }
        let weights = self.tissue.weights().ok_or(TissueError::WeightsNotComputed)?;
        let kernel = DiffusionKernel::select(&shape, weights)?;

        let mut fields = StateFields::new(shape.clone(), self.ionic.as_ref());
        if let Some(dir) = self.config.load_target() {
            StateStore::new(dir).load(&mut fields)?;
            fields.u_new.copy_from_slice(&fields.u);
        }

        self.stimuli.ready(dt, &shape)?;
        self.trackers.initialize(&fields, dt)?;
        self.commands.initialize(&fields)?;

        info!(
            model = self.ionic.name(),
            dims = ?shape.dims(),
            tissue = self.tissue.tissue_count(),
            stencil = ?kernel.kind(),
            state_vars = ?fields.state_vars(),
            "model initialized"
        );

        self.clock = Clock::new(dt, t_max);
        self.fields = Some(fields);
        self.kernel = Some(kernel);
        self.metrics = StepMetrics::default();
        self.phase = ModelPhase::Initialized;
        Ok(())
    }

    /// Run until the clock reaches `t_max` or a command stops it.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        self.check_runnable()?;
        let start = Instant::now();
        info!(
            t = self.clock.t(),
            terminal_step = self.clock.terminal_step(),
            "run started"
        );
        self.phase = ModelPhase::Running;
        let mut steps = 0;
        let mut final_time = self.clock.t();
        while !self.clock.is_finished() {
            final_time = self.advance()?;
            steps += 1;
        }
        self.finish()?;
        let summary = RunSummary {
            steps,
            final_time,
            stopped_early: self.clock.stopped_early(),
            wall_time: start.elapsed(),
        };
        info!(
            steps = summary.steps,
            final_time = summary.final_time,
            stopped_early = summary.stopped_early,
            wall_ms = summary.wall_time.as_millis() as u64,
            "run finished"
        );
        Ok(summary)
    }

    /// Advance a single step, finishing the run if the clock is done.
    ///
    /// A clock that is already terminal right after initialization
    /// (`t_max = 0`) finishes the run without stepping and returns the
    /// untouched metrics.
    pub fn step(&mut self) -> Result<&StepMetrics, SimError> {
        self.check_runnable()?;
        if self.clock.is_finished() {
            self.finish()?;
            return Ok(&self.metrics);
        }
        self.phase = ModelPhase::Running;
        self.advance()?;
        if self.clock.is_finished() {
            self.finish()?;
        }
        Ok(&self.metrics)
    }

    fn check_runnable(&self) -> Result<(), SimError> {
        match self.phase {
            ModelPhase::Uninitialized => Err(SimError::NotInitialized),
            ModelPhase::Finished => Err(SimError::AlreadyFinished),
            ModelPhase::Initialized | ModelPhase::Running => Ok(()),
        }
    }

    /// One full step. Returns the time reached, before any command
    /// moves the clock.
    fn advance(&mut self) -> Result<f64, SimError> {
        let Self {
            tissue,
            ionic,
            stimuli,
            trackers,
            commands,
            clock,
            fields,
            kernel,
            metrics,
            ..
        } = self;
        let (Some(fields), Some(kernel)) = (fields.as_mut(), kernel.as_ref()) else {
            return Err(SimError::NotInitialized);
        };
        let weights = tissue.weights().ok_or(TissueError::WeightsNotComputed)?;
        let shape = tissue.shape();
        let mesh = tissue.mesh();
        let (t, step, dt) = (clock.t(), clock.step(), clock.dt());
        let start = Instant::now();

        let phase = Instant::now();
        stimuli.stimulate_next(&mut StimulusContext {
            t,
            dt,
            shape,
            mesh,
            u: &mut fields.u,
        });
        metrics.stimulate_us = phase.elapsed().as_micros() as u64;

        let phase = Instant::now();
        kernel.apply(&mut fields.u_new, &fields.u, weights, mesh);
        metrics.diffuse_us = phase.elapsed().as_micros() as u64;

        let phase = Instant::now();
        trackers.tracker_next(t, step, &DiffusedView::new(fields));
        metrics.track_us = phase.elapsed().as_micros() as u64;

        let phase = Instant::now();
        ionic.react(&mut fields.u_new, &fields.u, &mut fields.aux, mesh, dt);
        metrics.react_us = phase.elapsed().as_micros() as u64;

        clock.advance();
        fields.swap();
        let reached = clock.t();

        let phase = Instant::now();
        commands.execute_next(&mut CommandContext {
            clock,
            fields,
            mesh,
        })?;
        metrics.command_us = phase.elapsed().as_micros() as u64;

        metrics.total_us = start.elapsed().as_micros() as u64;
        Ok(reached)
    }

    fn finish(&mut self) -> Result<(), SimError> {
        self.phase = ModelPhase::Finished;
        if let (Some(dir), Some(fields)) = (self.config.save_target(), &self.fields) {
            let saved = StateStore::new(dir).save(fields)?;
            debug!(fields = saved, "final state persisted");
        }
        Ok(())
    }

    fn diffusivity(&self) -> Diffusivity {
        self.config
            .diffusivity
            .unwrap_or_else(|| self.ionic.default_diffusivity())
    }

    // ── Accessors ─────────────────────────────────────────────────

    /// Current lifecycle phase.
    pub fn phase(&self) -> ModelPhase {
        self.phase
    }

    /// Run clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Run configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulated tissue, including the weights of the last initialization.
    pub fn tissue(&self) -> &CardiacTissue {
        &self.tissue
    }

    /// Cell model.
    pub fn ionic(&self) -> &dyn IonicModel {
        self.ionic.as_ref()
    }

    /// State buffers, once initialized.
    pub fn fields(&self) -> Option<&StateFields> {
        self.fields.as_ref()
    }

    /// Current potential, once initialized.
    pub fn potential(&self) -> Option<&[f64]> {
        self.fields.as_ref().map(StateFields::potential)
    }

    /// Any declared state variable by name.
    pub fn field(&self, name: &str) -> Option<FieldView<'_>> {
        self.fields.as_ref()?.field(name)
    }

    /// Overwrite one cell of a state variable between steps.
    pub fn set_field_value(&mut self, name: &str, cell: usize, value: f64) -> Result<(), SimError> {
        let fields = self.fields.as_mut().ok_or(SimError::NotInitialized)?;
        fields.set_value(name, cell, value)?;
        Ok(())
    }

    /// Trackers with their accumulated output.
    pub fn trackers(&self) -> &TrackerSet {
        &self.trackers
    }

    /// Phase timings of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// FNV-1a digest of every state variable, once initialized.
    pub fn state_hash(&self) -> Option<u64> {
        self.fields.as_ref().map(|f| state_hash(f))
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("ionic", &self.ionic.name())
            .field("shape", self.tissue.shape())
            .field("phase", &self.phase)
            .field("clock", &self.clock)
            .field("stimuli", &self.stimuli)
            .field("trackers", &self.trackers)
            .field("commands", &self.commands)
            .finish()
    }
}

// ── ModelBuilder ──────────────────────────────────────────────────

/// Assembles a [`Model`].
///
/// Setters are infallible; every check happens in [`build`](Self::build)
/// or, for anything that depends on the grid, in
/// [`Model::initialize`].
pub struct ModelBuilder {
    tissue: CardiacTissue,
    ionic: Box<dyn IonicModel>,
    config: SimulationConfig,
    stencil: Option<Box<dyn Stencil + Send + Sync>>,
    weights: Option<Weights>,
    stimuli: StimulusSchedule,
    trackers: TrackerSet,
    commands: CommandSchedule,
    error: Option<SimError>,
}

impl ModelBuilder {
    /// Builder with default configuration and no collaborators.
    pub fn new(tissue: CardiacTissue, ionic: impl IonicModel + 'static) -> Self {
        Self {
            tissue,
            ionic: Box::new(ionic),
            config: SimulationConfig::default(),
            stencil: None,
            weights: None,
            stimuli: StimulusSchedule::new(),
            trackers: TrackerSet::new(),
            commands: CommandSchedule::new(),
            error: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Time step.
    pub fn dt(mut self, dt: f64) -> Self {
        self.config.dt = dt;
        self
    }

    /// Grid spacing.
    pub fn dr(mut self, dr: f64) -> Self {
        self.config.dr = dr;
        self
    }

    /// Simulated duration.
    pub fn t_max(mut self, t_max: f64) -> Self {
        self.config.t_max = t_max;
        self
    }

    /// Diffusion coefficients overriding the cell model's default.
    pub fn diffusivity(mut self, diffusivity: Diffusivity) -> Self {
        self.config.diffusivity = Some(diffusivity);
        self
    }

    /// Stencil used for weight computation instead of the automatic choice.
    pub fn stencil(mut self, stencil: impl Stencil + Send + Sync + 'static) -> Self {
        self.stencil = Some(Box::new(stencil));
        self
    }

    /// Precomputed weights, installed instead of computing them.
    pub fn weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Add a stimulus.
    pub fn stimulus(mut self, stimulus: impl Stimulus + 'static) -> Self {
        self.stimuli.add(stimulus);
        self
    }

    /// Add a named tracker.
    pub fn tracker(mut self, name: impl Into<String>, tracker: impl Tracker + 'static) -> Self {
        if let Err(e) = self.trackers.add(name, tracker) {
            self.error.get_or_insert(e);
        }
        self
    }

    /// Add a command.
    pub fn command(mut self, command: impl Command + 'static) -> Self {
        self.commands.add(command);
        self
    }

    /// Directory the final state is saved to.
    pub fn save_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.save_dir = Some(dir.into());
        self
    }

    /// Directory the initial state is loaded from.
    pub fn load_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.load_dir = Some(dir.into());
        self
    }

    /// Validate and assemble the model in [`ModelPhase::Uninitialized`].
    pub fn build(self) -> Result<Model, SimError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.config.validate()?;
        let clock = Clock::new(self.config.dt, self.config.t_max);
        Ok(Model {
            tissue: self.tissue,
            ionic: self.ionic,
            stencil: self.stencil,
            preset_weights: self.weights,
            config: self.config,
            stimuli: self.stimuli,
            trackers: self.trackers,
            commands: self.commands,
            phase: ModelPhase::Uninitialized,
            clock,
            fields: None,
            kernel: None,
            metrics: StepMetrics::default(),
        })
    }
}
