//! Run configuration, validation, and error types.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use myowave_core::Diffusivity;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The invalid value.
        value: f64,
    },
    /// `dr` is NaN, infinite, zero, or negative.
    InvalidSpacing {
        /// The invalid value.
        value: f64,
    },
    /// `t_max` is NaN, infinite, or negative.
    InvalidDuration {
        /// The invalid value.
        value: f64,
    },
    /// Diffusion coefficients are invalid.
    InvalidDiffusivity {
        /// Description of which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeStep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidSpacing { value } => {
                write!(f, "dr must be finite and positive, got {value}")
            }
            Self::InvalidDuration { value } => {
                write!(f, "t_max must be finite and non-negative, got {value}")
            }
            Self::InvalidDiffusivity { reason } => write!(f, "invalid diffusivity: {reason}"),
        }
    }
}

impl Error for ConfigError {}

// ── SimulationConfig ───────────────────────────────────────────────

/// Numerical and I/O settings of one simulation run.
///
/// Units follow the chosen cell model: phenomenological models use
/// dimensionless time, ionic models milliseconds. `dr` is in the same
/// length unit as the diffusion coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Time step. Default: 0.01.
    pub dt: f64,
    /// Grid spacing. Default: 0.25.
    pub dr: f64,
    /// Simulated duration. Default: 10.0.
    pub t_max: f64,
    /// Diffusion coefficients. `None` uses the cell model's default.
    pub diffusivity: Option<Diffusivity>,
    /// Directory the final state is saved to. `None` or empty disables saving.
    pub save_dir: Option<PathBuf>,
    /// Directory the initial state is loaded from. `None` or empty disables loading.
    pub load_dir: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            dr: 0.25,
            t_max: 10.0,
            diffusivity: None,
            save_dir: None,
            load_dir: None,
        }
    }
}

impl SimulationConfig {
    /// Validate all numerical settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { value: self.dt });
        }
        if !self.dr.is_finite() || self.dr <= 0.0 {
            return Err(ConfigError::InvalidSpacing { value: self.dr });
        }
        if !self.t_max.is_finite() || self.t_max < 0.0 {
            return Err(ConfigError::InvalidDuration { value: self.t_max });
        }
        if let Some(d) = &self.diffusivity {
            d.validate()
                .map_err(|reason| ConfigError::InvalidDiffusivity { reason })?;
        }
        Ok(())
    }

    /// Save directory, if one is configured and non-empty.
    pub fn save_target(&self) -> Option<&Path> {
        non_empty(self.save_dir.as_deref())
    }

    /// Load directory, if one is configured and non-empty.
    pub fn load_target(&self) -> Option<&Path> {
        non_empty(self.load_dir.as_deref())
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
