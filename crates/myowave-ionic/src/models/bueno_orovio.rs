use myowave_core::{Diffusivity, StateVarDef, UpdateForm};

use crate::kernel::CellModel;
use crate::util::step;

const VARS: &[StateVarDef] = &[
    StateVarDef::new("v", 1.0, UpdateForm::ForwardEuler),
    StateVarDef::new("w", 1.0, UpdateForm::ForwardEuler),
    StateVarDef::new("s", 0.0, UpdateForm::ForwardEuler),
];

/// Bueno-Orovio, Cherry and Fenton minimal ventricular model.
///
/// Four variables reproduce the restitution of detailed human
/// ventricular models. Defaults are the epicardial parameter set.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct BuenoOrovio {
    pub u_o: f64,
    pub u_u: f64,
    pub theta_v: f64,
    pub theta_w: f64,
    pub theta_v_minus: f64,
    pub theta_o: f64,
    pub tau_v1_minus: f64,
    pub tau_v2_minus: f64,
    pub tau_v_plus: f64,
    pub tau_w1_minus: f64,
    pub tau_w2_minus: f64,
    pub k_w_minus: f64,
    pub u_w_minus: f64,
    pub tau_w_plus: f64,
    pub tau_fi: f64,
    pub tau_o1: f64,
    pub tau_o2: f64,
    pub tau_so1: f64,
    pub tau_so2: f64,
    pub k_so: f64,
    pub u_so: f64,
    pub tau_s1: f64,
    pub tau_s2: f64,
    pub k_s: f64,
    pub u_s: f64,
    pub tau_si: f64,
    pub tau_w_inf: f64,
    pub w_inf_star: f64,
}

impl Default for BuenoOrovio {
    fn default() -> Self {
        Self {
            u_o: 0.0,
            u_u: 1.55,
            theta_v: 0.3,
            theta_w: 0.13,
            theta_v_minus: 0.006,
            theta_o: 0.006,
            tau_v1_minus: 60.0,
            tau_v2_minus: 1150.0,
            tau_v_plus: 1.4506,
            tau_w1_minus: 60.0,
            tau_w2_minus: 15.0,
            k_w_minus: 65.0,
            u_w_minus: 0.03,
            tau_w_plus: 200.0,
            tau_fi: 0.11,
            tau_o1: 400.0,
            tau_o2: 6.0,
            tau_so1: 30.0181,
            tau_so2: 0.9957,
            k_so: 2.0458,
            u_so: 0.65,
            tau_s1: 2.7342,
            tau_s2: 16.0,
            k_s: 2.0994,
            u_s: 0.9087,
            tau_si: 1.8875,
            tau_w_inf: 0.07,
            w_inf_star: 0.94,
        }
    }
}

impl CellModel for BuenoOrovio {
    fn name(&self) -> &'static str {
        "bueno-orovio"
    }

    fn state_vars(&self) -> &'static [StateVarDef] {
        VARS
    }

    fn initial_potential(&self) -> f64 {
        0.0
    }

    fn default_diffusivity(&self) -> Diffusivity {
        Diffusivity::isotropic(0.1171)
    }

    fn activation_threshold(&self) -> f64 {
        0.5
    }

    #[inline]
    fn step_cell(&self, u: f64, state: &mut [f64], dt: f64) -> f64 {
        let (v, w, s) = (state[0], state[1], state[2]);
        let m = step(u - self.theta_v);
        let p = step(u - self.theta_w);
        let q = step(u - self.theta_v_minus);
        let r = step(u - self.theta_o);

        let tau_v_minus = (1.0 - q) * self.tau_v1_minus + q * self.tau_v2_minus;
        let tau_w_minus = self.tau_w1_minus
            + (self.tau_w2_minus - self.tau_w1_minus)
                * (1.0 + (self.k_w_minus * (u - self.u_w_minus)).tanh())
                / 2.0;
        let tau_so = self.tau_so1
            + (self.tau_so2 - self.tau_so1) * (1.0 + (self.k_so * (u - self.u_so)).tanh()) / 2.0;
        let tau_s = (1.0 - p) * self.tau_s1 + p * self.tau_s2;
        let tau_o = (1.0 - r) * self.tau_o1 + r * self.tau_o2;

        let v_inf = 1.0 - q;
        let w_inf = (1.0 - r) * (1.0 - u / self.tau_w_inf) + r * self.w_inf_star;

        let j_fi = -v * m * (u - self.theta_v) * (self.u_u - u) / self.tau_fi;
        let j_so = (u - self.u_o) * (1.0 - p) / tau_o + p / tau_so;
        let j_si = -p * w * s / self.tau_si;

        state[0] = v + dt * ((1.0 - m) * (v_inf - v) / tau_v_minus - m * v / self.tau_v_plus);
        state[1] = w + dt * ((1.0 - p) * (w_inf - w) / tau_w_minus - p * w / self.tau_w_plus);
        state[2] = s + dt * ((1.0 + (self.k_s * (u - self.u_s)).tanh()) / 2.0 - s) / tau_s;

        -(j_fi + j_so + j_si)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_is_stationary() {
        let m = BuenoOrovio::default();
        let mut s = [1.0, 1.0, 0.0];
        let du = m.step_cell(0.0, &mut s, 0.01);
        assert_eq!(du, 0.0);
        assert_eq!((s[0], s[1]), (1.0, 1.0));
    }

    #[test]
    fn action_potential_fires_and_recovers() {
        let m = BuenoOrovio::default();
        let mut s = [1.0, 1.0, 0.0];
        let mut u = 0.5;
        let mut peak = u;
        let mut t_repol = None;
        let dt = 0.01;
        for n in 0..100_000 {
            u += dt * m.step_cell(u, &mut s, dt);
            peak = peak.max(u);
            if t_repol.is_none() && peak > 1.0 && u < 0.3 {
                t_repol = Some(n as f64 * dt);
            }
        }
        assert!(peak > 1.0, "peak = {peak}");
        let apd = t_repol.expect("cell never repolarized");
        assert!(apd > 100.0 && apd < 500.0, "APD = {apd}");
        assert!(u < 0.05, "u = {u}");
    }
}
