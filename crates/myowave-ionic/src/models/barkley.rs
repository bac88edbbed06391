use myowave_core::{Diffusivity, StateVarDef, UpdateForm};

use crate::kernel::CellModel;

const VARS: &[StateVarDef] = &[StateVarDef::new("v", 0.0, UpdateForm::ForwardEuler)];

/// Barkley two-variable model.
///
/// ```text
/// du/dt = u (1 - u)(u - (v + b) / a) / eap
/// dv/dt = u - v
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Barkley {
    /// Threshold scale.
    pub a: f64,
    /// Threshold offset.
    pub b: f64,
    /// Time-scale separation.
    pub eap: f64,
}

impl Default for Barkley {
    fn default() -> Self {
        Self {
            a: 0.75,
            b: 0.02,
            eap: 0.02,
        }
    }
}

impl CellModel for Barkley {
    fn name(&self) -> &'static str {
        "barkley"
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
        let v = state[0];
        state[0] = v + dt * (u - v);
        u * (1.0 - u) * (u - (v + self.b) / self.a) / self.eap
    }
}
