use myowave_core::{Diffusivity, StateVarDef, UpdateForm};

use crate::kernel::CellModel;

const VARS: &[StateVarDef] = &[StateVarDef::new("v", 0.0, UpdateForm::ForwardEuler)];

/// Aliev-Panfilov two-variable model.
///
/// ```text
/// du/dt = -k u (u - a)(u - 1) - u v
/// dv/dt = (eap + mu1 v / (mu2 + u)) (-v - k u (u - a - 1))
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AlievPanfilov {
    /// Excitation threshold.
    pub a: f64,
    /// Strength of the fast current.
    pub k: f64,
    /// Baseline recovery rate.
    pub eap: f64,
    /// Recovery coupling numerator.
    pub mu1: f64,
    /// Recovery coupling offset.
    pub mu2: f64,
}

impl Default for AlievPanfilov {
    fn default() -> Self {
        Self {
            a: 0.1,
            k: 8.0,
            eap: 0.01,
            mu1: 0.2,
            mu2: 0.3,
        }
    }
}

impl CellModel for AlievPanfilov {
    fn name(&self) -> &'static str {
        "aliev-panfilov"
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
        let du = -self.k * u * (u - self.a) * (u - 1.0) - u * v;
        let eps = self.eap + self.mu1 * v / (self.mu2 + u);
        state[0] = v + dt * eps * (-v - self.k * u * (u - self.a - 1.0));
        du
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_is_a_fixed_point() {
        let m = AlievPanfilov::default();
        let mut s = [0.0];
        assert_eq!(m.step_cell(0.0, &mut s, 0.01), 0.0);
        assert_eq!(s[0], 0.0);
    }

    #[test]
    fn subthreshold_perturbation_decays() {
        let m = AlievPanfilov::default();
        let mut s = [0.0];
        let mut u = 0.05;
        for _ in 0..1000 {
            u += 0.01 * m.step_cell(u, &mut s, 0.01);
        }
        assert!(u < 0.01, "u = {u}");
    }
}
