//! Scripted interventions executed after each step.
//!
//! Commands run once the buffers have been swapped, so they see the
//! completed step. Unlike trackers they may write any state variable
//! and move the clock, which is how a run is ended early.

use myowave_core::{CellKind, FieldAccess, FieldAccessMut, FieldError};
use tracing::info;

use crate::clock::Clock;
use crate::error::SimError;
use crate::fields::StateFields;
use crate::region::BoxRegion;
use crate::stimulus::is_due;

/// Mutable access handed to a command.
pub struct CommandContext<'a> {
    /// Run clock, already advanced past the completed step.
    pub clock: &'a mut Clock,
    /// Model state.
    pub fields: &'a mut StateFields,
    /// Cell classification.
    pub mesh: &'a [CellKind],
}

/// One scheduled intervention.
pub trait Command: Send {
    /// Simulation time at which the command runs.
    fn time(&self) -> f64;

    /// Check the command against freshly initialized state.
    fn initialize(&mut self, _fields: &dyn FieldAccess) -> Result<(), SimError> {
        Ok(())
    }

    /// Perform the intervention.
    fn execute(&mut self, ctx: &mut CommandContext<'_>) -> Result<(), SimError>;
}

// ── StopAt ────────────────────────────────────────────────────────

/// Ends the run at `time` by jumping the clock to its terminal step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopAt {
    /// Stop time.
    pub time: f64,
}

impl StopAt {
    /// Stop command at `time`.
    pub fn new(time: f64) -> Self {
        Self { time }
    }
}

impl Command for StopAt {
    fn time(&self) -> f64 {
        self.time
    }

    fn execute(&mut self, ctx: &mut CommandContext<'_>) -> Result<(), SimError> {
        info!(t = ctx.clock.t(), step = ctx.clock.step(), "stop command ending run");
        ctx.clock.finish();
        Ok(())
    }
}

// ── SetField ──────────────────────────────────────────────────────

/// Sets a named field to a value over a region of tissue cells.
///
/// Without a region every tissue cell is set.
#[derive(Clone, Debug, PartialEq)]
pub struct SetField {
    /// Execution time.
    pub time: f64,
    /// Target field name.
    pub field: String,
    /// Value written.
    pub value: f64,
    /// Cells written, or `None` for the whole grid.
    pub region: Option<BoxRegion>,
}

impl SetField {
    /// Command writing `value` into `field` at `time`.
    pub fn new(time: f64, field: impl Into<String>, value: f64, region: Option<BoxRegion>) -> Self {
        Self {
            time,
            field: field.into(),
            value,
            region,
        }
    }
}

impl Command for SetField {
    fn time(&self) -> f64 {
        self.time
    }

    fn initialize(&mut self, fields: &dyn FieldAccess) -> Result<(), SimError> {
        if fields.field(&self.field).is_none() {
            return Err(FieldError::UnknownField {
                name: self.field.clone(),
            }
            .into());
        }
        if let Some(region) = &self.region {
            region.check(fields.shape())?;
        }
        Ok(())
    }

    fn execute(&mut self, ctx: &mut CommandContext<'_>) -> Result<(), SimError> {
        let cells = match &self.region {
            Some(region) => region.cells(ctx.fields.shape()),
            None => (0..ctx.mesh.len()).collect(),
        };
        for c in cells {
            if ctx.mesh[c].is_tissue() {
                ctx.fields.set_value(&self.field, c, self.value)?;
            }
        }
        Ok(())
    }
}

// ── CommandSchedule ───────────────────────────────────────────────

/// Commands in insertion order, each executed once when due.
#[derive(Default)]
pub struct CommandSchedule {
    commands: Vec<Box<dyn Command>>,
    executed: Vec<bool>,
}

impl CommandSchedule {
    /// Empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn add(&mut self, command: impl Command + 'static) -> &mut Self {
        self.commands.push(Box::new(command));
        self.executed.push(false);
        self
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands not yet executed.
    pub fn pending(&self) -> usize {
        self.executed.iter().filter(|&&e| !e).count()
    }

    /// Mark every command pending and check it against `fields`.
    pub fn initialize(&mut self, fields: &dyn FieldAccess) -> Result<(), SimError> {
        self.executed.iter_mut().for_each(|e| *e = false);
        for command in &mut self.commands {
            command.initialize(fields)?;
        }
        Ok(())
    }

    /// Execute every pending command whose time has been reached.
    pub fn execute_next(&mut self, ctx: &mut CommandContext<'_>) -> Result<(), SimError> {
        for (command, executed) in self.commands.iter_mut().zip(self.executed.iter_mut()) {
            if *executed || !is_due(ctx.clock.t(), command.time(), ctx.clock.dt()) {
                continue;
            }
            *executed = true;
            command.execute(ctx)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CommandSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSchedule")
            .field("len", &self.commands.len())
            .field("pending", &self.pending())
            .finish()
    }
}
