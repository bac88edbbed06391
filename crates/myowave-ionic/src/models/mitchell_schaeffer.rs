use myowave_core::{Diffusivity, StateVarDef, UpdateForm};

use crate::kernel::CellModel;

const VARS: &[StateVarDef] = &[StateVarDef::new("h", 1.0, UpdateForm::ForwardEuler)];

/// Mitchell-Schaeffer two-current model.
///
/// ```text
/// du/dt = h u^2 (1 - u) / tau_in - u / tau_out
/// dh/dt = (1 - h) / tau_open    if u < u_gate
///         -h / tau_close        otherwise
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MitchellSchaeffer {
    /// Inward current time constant.
    pub tau_in: f64,
    /// Outward current time constant.
    pub tau_out: f64,
    /// Gate opening time constant.
    pub tau_open: f64,
    /// Gate closing time constant.
    pub tau_close: f64,
    /// Gate switching potential.
    pub u_gate: f64,
}

impl Default for MitchellSchaeffer {
    fn default() -> Self {
        Self {
            tau_in: 0.3,
            tau_out: 6.0,
            tau_open: 120.0,
            tau_close: 150.0,
            u_gate: 0.13,
        }
    }
}

impl CellModel for MitchellSchaeffer {
    fn name(&self) -> &'static str {
        "mitchell-schaeffer"
    }

    fn state_vars(&self) -> &'static [StateVarDef] {
        VARS
    }

    fn initial_potential(&self) -> f64 {
        0.0
    }

    fn default_diffusivity(&self) -> Diffusivity {
        Diffusivity::isotropic(1.0)
    }

    fn activation_threshold(&self) -> f64 {
        0.5
    }

    #[inline]
    fn step_cell(&self, u: f64, state: &mut [f64], dt: f64) -> f64 {
        let h = state[0];
        let dh = if u < self.u_gate {
            (1.0 - h) / self.tau_open
        } else {
            -h / self.tau_close
        };
        state[0] = h + dt * dh;
        h * u * u * (1.0 - u) / self.tau_in - u / self.tau_out
    }
}
