use myowave_core::{Diffusivity, StateVarDef, UpdateForm};

use crate::kernel::CellModel;
use crate::util::step;

const VARS: &[StateVarDef] = &[
    StateVarDef::new("v", 1.0, UpdateForm::ForwardEuler),
    StateVarDef::new("w", 1.0, UpdateForm::ForwardEuler),
];

/// Fenton-Karma three-variable model.
///
/// Three phenomenological currents: a fast inward `J_fi` gated by `v`,
/// a slow outward `J_so` and a slow inward `J_si` gated by `w`.
/// Defaults reproduce the Beeler-Reuter fit.
#[derive(Clone, Debug, PartialEq)]
pub struct FentonKarma {
    /// Fast inward current time constant.
    pub tau_d: f64,
    /// Outward current time constant above `u_c`.
    pub tau_r: f64,
    /// Slow inward current time constant.
    pub tau_si: f64,
    /// Outward current time constant below `u_c`.
    pub tau_0: f64,
    /// `v` closing time constant.
    pub tau_v_plus: f64,
    /// `v` opening time constant for `u_v <= u < u_c`.
    pub tau_v1_minus: f64,
    /// `v` opening time constant for `u < u_v`.
    pub tau_v2_minus: f64,
    /// `w` closing time constant.
    pub tau_w_plus: f64,
    /// `w` opening time constant.
    pub tau_w_minus: f64,
    /// Excitation threshold.
    pub u_c: f64,
    /// `v` time constant switch.
    pub u_v: f64,
    /// Slow inward activation midpoint.
    pub u_csi: f64,
    /// Slow inward activation steepness.
    pub k: f64,
}

impl Default for FentonKarma {
    fn default() -> Self {
        Self {
            tau_d: 0.25,
            tau_r: 33.33,
            tau_si: 29.0,
            tau_0: 12.5,
            tau_v_plus: 3.33,
            tau_v1_minus: 1250.0,
            tau_v2_minus: 19.6,
            tau_w_plus: 870.0,
            tau_w_minus: 41.0,
            u_c: 0.13,
            u_v: 0.04,
            u_csi: 0.85,
            k: 10.0,
        }
    }
}

impl CellModel for FentonKarma {
    fn name(&self) -> &'static str {
        "fenton-karma"
    }

    fn state_vars(&self) -> &'static [StateVarDef] {
        VARS
    }

    fn initial_potential(&self) -> f64 {
        0.0
    }

    fn default_diffusivity(&self) -> Diffusivity {
        Diffusivity::isotropic(0.1)
    }

    fn activation_threshold(&self) -> f64 {
        0.5
    }

    #[inline]
    fn step_cell(&self, u: f64, state: &mut [f64], dt: f64) -> f64 {
        let (v, w) = (state[0], state[1]);
        let p = step(u - self.u_c);
        let q = step(u - self.u_v);

        let j_fi = -v * p * (1.0 - u) * (u - self.u_c) / self.tau_d;
        let j_so = u * (1.0 - p) / self.tau_0 + p / self.tau_r;
        let j_si = -w * (1.0 + (self.k * (u - self.u_csi)).tanh()) / (2.0 * self.tau_si);

        let tau_v_minus = q * self.tau_v1_minus + (1.0 - q) * self.tau_v2_minus;
        state[0] = v + dt * ((1.0 - p) * (1.0 - v) / tau_v_minus - p * v / self.tau_v_plus);
        state[1] = w + dt * ((1.0 - p) * (1.0 - w) / self.tau_w_minus - p * w / self.tau_w_plus);

        -(j_fi + j_so + j_si)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_barely_moves() {
        let m = FentonKarma::default();
        let mut s = [1.0, 1.0];
        let mut u = 0.0;
        for _ in 0..10_000 {
            u += 0.02 * m.step_cell(u, &mut s, 0.02);
        }
        assert!(u.abs() < 1e-6, "u = {u}");
        assert!((s[0] - 1.0).abs() < 1e-12 && (s[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn action_potential_fires_and_recovers() {
        let m = FentonKarma::default();
        let mut s = [1.0, 1.0];
        let mut u = 0.3;
        let mut peak = u;
        for _ in 0..50_000 {
            u += 0.02 * m.step_cell(u, &mut s, 0.02);
            peak = peak.max(u);
        }
        assert!(peak > 0.8, "peak = {peak}");
        assert!(u < 0.1, "u = {u}");
    }
}
