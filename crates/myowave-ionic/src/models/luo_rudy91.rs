use myowave_core::{Diffusivity, StateVarDef, UpdateForm};

use crate::kernel::CellModel;
use crate::util::x_over_expm1;

const VARS: &[StateVarDef] = &[
    StateVarDef::new("m", 0.0017, UpdateForm::RushLarsen),
    StateVarDef::new("h", 0.9832, UpdateForm::RushLarsen),
    StateVarDef::new("j", 0.995484, UpdateForm::RushLarsen),
    StateVarDef::new("d", 0.000003, UpdateForm::RushLarsen),
    StateVarDef::new("f", 1.0, UpdateForm::RushLarsen),
    StateVarDef::new("x", 0.0057, UpdateForm::RushLarsen),
    StateVarDef::new("cai", 0.0002, UpdateForm::ForwardEuler),
];

const K_O: f64 = 5.4;
const K_I: f64 = 145.0;
const NA_O: f64 = 140.0;
const NA_I: f64 = 18.0;
const PR_NAK: f64 = 0.01833;
const E_B: f64 = -59.87;
/// RT/F in millivolts at 37 C.
const RT_F: f64 = 8314.0 * 310.0 / 96485.0;

/// Luo-Rudy 1991 guinea-pig ventricular model.
///
/// Six Hodgkin-Huxley gates advanced with Rush-Larsen and intracellular
/// calcium with forward Euler. Potential in mV, time in ms, currents in
/// uA/uF.
#[derive(Clone, Debug, PartialEq)]
pub struct LuoRudy91 {
    /// Fast sodium conductance.
    pub g_na: f64,
    /// Slow inward conductance.
    pub g_si: f64,
    /// Time-dependent potassium conductance.
    pub g_k: f64,
    /// Inward rectifier conductance.
    pub g_k1: f64,
    /// Plateau potassium conductance.
    pub g_kp: f64,
    /// Background conductance.
    pub g_b: f64,
}

impl Default for LuoRudy91 {
    fn default() -> Self {
        Self {
            g_na: 23.0,
            g_si: 0.09,
            g_k: 0.282 * (K_O / 5.4f64).sqrt(),
            g_k1: 0.6047 * (K_O / 5.4f64).sqrt(),
            g_kp: 0.0183,
            g_b: 0.03921,
        }
    }
}

/// Rush-Larsen update from opening and closing rates.
#[inline]
fn gate(x: f64, alpha: f64, beta: f64, dt: f64) -> f64 {
    let rate = alpha + beta;
    let x_inf = alpha / rate;
    x_inf - (x_inf - x) * (-dt * rate).exp()
}

impl CellModel for LuoRudy91 {
    fn name(&self) -> &'static str {
        "luo-rudy-91"
    }

    fn state_vars(&self) -> &'static [StateVarDef] {
        VARS
    }

    fn initial_potential(&self) -> f64 {
        -84.3801107371
    }

    fn default_diffusivity(&self) -> Diffusivity {
        Diffusivity::isotropic(0.1)
    }

    fn activation_threshold(&self) -> f64 {
        -40.0
    }

    fn step_cell(&self, v: f64, state: &mut [f64], dt: f64) -> f64 {
        let (m, h, j, d, f, x, cai) = (
            state[0], state[1], state[2], state[3], state[4], state[5], state[6],
        );
        debug_assert!(cai > 0.0, "cai must be positive, got {cai}");

        let e_na = RT_F * (NA_O / NA_I).ln();
        let e_si = 7.7 - 13.0287 * cai.ln();
        let e_k = RT_F * ((K_O + PR_NAK * NA_O) / (K_I + PR_NAK * NA_I)).ln();
        let e_k1 = RT_F * (K_O / K_I).ln();

        // Fast sodium.
        let alpha_m = 3.2 * x_over_expm1(-0.1 * (v + 47.13));
        let beta_m = 0.08 * (-v / 11.0).exp();
        let (alpha_h, beta_h, alpha_j, beta_j) = if v >= -40.0 {
            (
                0.0,
                1.0 / (0.13 * (1.0 + ((v + 10.66) / -11.1).exp())),
                0.0,
                0.3 * (-2.535e-7 * v).exp() / (1.0 + (-0.1 * (v + 32.0)).exp()),
            )
        } else {
            (
                0.135 * ((80.0 + v) / -6.8).exp(),
                3.56 * (0.079 * v).exp() + 3.1e5 * (0.35 * v).exp(),
                (-1.2714e5 * (0.2444 * v).exp() - 3.474e-5 * (-0.04391 * v).exp())
                    * (v + 37.78)
                    / (1.0 + (0.311 * (v + 79.23)).exp()),
                0.1212 * (-0.01052 * v).exp() / (1.0 + (-0.1378 * (v + 40.14)).exp()),
            )
        };
        let i_na = self.g_na * m * m * m * h * j * (v - e_na);

        // Slow inward.
        let alpha_d = 0.095 * (-0.01 * (v - 5.0)).exp() / (1.0 + (-0.072 * (v - 5.0)).exp());
        let beta_d = 0.07 * (-0.017 * (v + 44.0)).exp() / (1.0 + (0.05 * (v + 44.0)).exp());
        let alpha_f = 0.012 * (-0.008 * (v + 28.0)).exp() / (1.0 + (0.15 * (v + 28.0)).exp());
        let beta_f = 0.0065 * (-0.02 * (v + 30.0)).exp() / (1.0 + (-0.2 * (v + 30.0)).exp());
        let i_si = self.g_si * d * f * (v - e_si);

        // Time-dependent potassium.
        let alpha_x = 0.0005 * (0.083 * (v + 50.0)).exp() / (1.0 + (0.057 * (v + 50.0)).exp());
        let beta_x = 0.0013 * (-0.06 * (v + 20.0)).exp() / (1.0 + (-0.04 * (v + 20.0)).exp());
        let xi = if v > -100.0 {
            2.837 * 0.04 / (x_over_expm1(0.04 * (v + 77.0)) * (0.04 * (v + 35.0)).exp())
        } else {
            1.0
        };
        let i_k = self.g_k * x * xi * (v - e_k);

        // Time-independent potassium.
        let alpha_k1 = 1.02 / (1.0 + (0.2385 * (v - e_k1 - 59.215)).exp());
        let beta_k1 = (0.49124 * (0.08032 * (v - e_k1 + 5.476)).exp()
            + (0.06175 * (v - e_k1 - 594.31)).exp())
            / (1.0 + (-0.5143 * (v - e_k1 + 4.753)).exp());
        let k1_inf = alpha_k1 / (alpha_k1 + beta_k1);
        let i_k1 = self.g_k1 * k1_inf * (v - e_k1);

        let kp = 1.0 / (1.0 + ((7.488 - v) / 5.98).exp());
        let i_kp = self.g_kp * kp * (v - e_k1);
        let i_b = self.g_b * (v - E_B);

        state[0] = gate(m, alpha_m, beta_m, dt);
        state[1] = gate(h, alpha_h, beta_h, dt);
        state[2] = gate(j, alpha_j, beta_j, dt);
        state[3] = gate(d, alpha_d, beta_d, dt);
        state[4] = gate(f, alpha_f, beta_f, dt);
        state[5] = gate(x, alpha_x, beta_x, dt);
        state[6] = cai + dt * (-1e-4 * i_si + 0.07 * (1e-4 - cai));

        -(i_na + i_si + i_k + i_k1 + i_kp + i_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial() -> Vec<f64> {
        VARS.iter().map(|d| d.initial).collect()
    }

    #[test]
    fn singular_points_are_finite() {
        let m = LuoRudy91::default();
        for v in [-47.13, -77.0, -100.0, -40.0] {
            let mut s = initial();
            let du = m.step_cell(v, &mut s, 0.01);
            assert!(du.is_finite(), "du/dt at {v} mV");
            assert!(s.iter().all(|x| x.is_finite()), "state at {v} mV");
        }
    }

    #[test]
    fn alpha_m_limit_matches_neighbourhood() {
        let at = |v: f64| 3.2 * x_over_expm1(-0.1 * (v + 47.13));
        assert!((at(-47.13) - 3.2).abs() < 1e-12);
        assert!((at(-47.13 + 1e-6) - at(-47.13)).abs() < 1e-6);
    }

    #[test]
    fn gates_stay_in_unit_interval() {
        let m = LuoRudy91::default();
        let mut v = -100.0;
        while v <= 60.0 {
            let mut s = initial();
            m.step_cell(v, &mut s, 0.05);
            for (def, x) in VARS.iter().zip(&s).take(6) {
                assert!((0.0..=1.0).contains(x), "{} = {x} at {v} mV", def.name);
            }
            v += 0.25;
        }
    }

    #[test]
    fn action_potential_fires_and_repolarizes() {
        let m = LuoRudy91::default();
        let mut s = initial();
        let mut v = -40.0;
        let mut peak = v;
        let dt = 0.01;
        for _ in 0..80_000 {
            v += dt * m.step_cell(v, &mut s, dt);
            peak = peak.max(v);
        }
        assert!(peak > 20.0, "peak = {peak}");
        assert!(v < -70.0, "v = {v}");
    }
}
