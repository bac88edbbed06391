//! Errors surfaced by the model.

use std::error::Error;
use std::fmt;

use myowave_core::FieldError;
use myowave_state::StateError;
use myowave_tissue::TissueError;

use crate::config::ConfigError;
use crate::region::RegionError;

/// Errors from initializing or running a [`Model`](crate::Model).
#[derive(Debug)]
pub enum SimError {
    /// `run()` or `step()` was called before `initialize()`.
    NotInitialized,
    /// `run()` or `step()` was called after the run finished.
    AlreadyFinished,
    /// The run configuration is invalid.
    Config(ConfigError),
    /// Weight computation or kernel selection failed.
    Tissue(TissueError),
    /// Saving or restoring state failed.
    State(StateError),
    /// A named field access failed.
    Field(FieldError),
    /// A stimulus or command region does not fit the grid.
    Region(RegionError),
    /// Two collaborators were registered under the same name.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "model has not been initialized"),
            Self::AlreadyFinished => write!(f, "model run has already finished"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Tissue(e) => write!(f, "tissue: {e}"),
            Self::State(e) => write!(f, "state: {e}"),
            Self::Field(e) => write!(f, "field: {e}"),
            Self::Region(e) => write!(f, "region: {e}"),
            Self::DuplicateName { name } => write!(f, "name '{name}' is already registered"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Tissue(e) => Some(e),
            Self::State(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::Region(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TissueError> for SimError {
    fn from(e: TissueError) -> Self {
        Self::Tissue(e)
    }
}

impl From<StateError> for SimError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

impl From<FieldError> for SimError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<RegionError> for SimError {
    fn from(e: RegionError) -> Self {
        Self::Region(e)
    }
}
