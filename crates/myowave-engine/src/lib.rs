//! Time stepping for cardiac tissue simulations.
//!
//! [`Model`] couples the diffusion kernel of a [`CardiacTissue`] with
//! the reaction step of an [`IonicModel`] and drives three kinds of
//! collaborators around them:
//!
//! - [`Stimulus`] objects write the potential before diffusion,
//! - [`Tracker`] objects observe the diffused state before reaction,
//! - [`Command`] objects run after each step and may change anything,
//!   including the clock.
//!
//! Optional state persistence through [`SimulationConfig::save_dir`]
//! and [`SimulationConfig::load_dir`] saves the final state of a run and
//! restores it at the next initialization.
//!
//! [`CardiacTissue`]: myowave_tissue::CardiacTissue
//! [`IonicModel`]: myowave_ionic::IonicModel

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod fields;
pub mod metrics;
pub mod model;
pub mod region;
pub mod stimulus;
pub mod tracker;

pub use clock::Clock;
pub use command::{Command, CommandContext, CommandSchedule, SetField, StopAt};
pub use config::{ConfigError, SimulationConfig};
pub use error::SimError;
pub use fields::{DiffusedView, StateFields};
pub use metrics::{RunSummary, StepMetrics};
pub use model::{Model, ModelBuilder, ModelPhase};
pub use region::{BoxRegion, RegionError};
pub use stimulus::{CurrentStimulus, Stimulus, StimulusContext, StimulusSchedule, VoltageStimulus};
pub use tracker::{
    ActivationTimeTracker, FieldSampler, PeriodTracker, Sample, Tracker, TrackerSet,
};
