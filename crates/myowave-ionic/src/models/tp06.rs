use myowave_core::{Diffusivity, StateVarDef, UpdateForm};

use crate::kernel::CellModel;
use crate::util::{rush_larsen, x_over_expm1};

const VARS: &[StateVarDef] = &[
    StateVarDef::new("cai", 0.000126, UpdateForm::Buffered),
    StateVarDef::new("casr", 3.64, UpdateForm::Buffered),
    StateVarDef::new("cass", 0.00036, UpdateForm::Buffered),
    StateVarDef::new("nai", 8.604, UpdateForm::ForwardEuler),
    StateVarDef::new("ki", 136.89, UpdateForm::ForwardEuler),
    StateVarDef::new("m", 0.00172, UpdateForm::RushLarsen),
    StateVarDef::new("h", 0.7444, UpdateForm::RushLarsen),
    StateVarDef::new("j", 0.7045, UpdateForm::RushLarsen),
    StateVarDef::new("xr1", 0.00621, UpdateForm::RushLarsen),
    StateVarDef::new("xr2", 0.4712, UpdateForm::RushLarsen),
    StateVarDef::new("xs", 0.0095, UpdateForm::RushLarsen),
    StateVarDef::new("r", 2.42e-8, UpdateForm::RushLarsen),
    StateVarDef::new("s", 0.999998, UpdateForm::RushLarsen),
    StateVarDef::new("d", 3.373e-5, UpdateForm::RushLarsen),
    StateVarDef::new("f", 0.7888, UpdateForm::RushLarsen),
    StateVarDef::new("f2", 0.9755, UpdateForm::RushLarsen),
    StateVarDef::new("fcass", 0.9953, UpdateForm::RushLarsen),
    StateVarDef::new("rr", 0.9073, UpdateForm::ForwardEuler),
    StateVarDef::new("oo", 0.0, UpdateForm::Algebraic),
];

// Extracellular concentrations (mM).
const K_O: f64 = 5.4;
const CA_O: f64 = 2.0;
const NA_O: f64 = 140.0;

// Compartment volumes (uL) and membrane capacitance (uF).
const V_C: f64 = 0.016404;
const V_SR: f64 = 0.001094;
const V_SS: f64 = 0.00005468;
const CAPACITANCE: f64 = 0.185;

// Buffering.
const BUF_C: f64 = 0.2;
const K_BUF_C: f64 = 0.001;
const BUF_SR: f64 = 10.0;
const K_BUF_SR: f64 = 0.3;
const BUF_SS: f64 = 0.4;
const K_BUF_SS: f64 = 0.00025;

// Calcium handling.
const V_MAX_UP: f64 = 0.006375;
const K_UP: f64 = 0.00025;
const V_REL: f64 = 0.102;
const K1_: f64 = 0.15;
const K2_: f64 = 0.045;
const K3: f64 = 0.060;
const K4: f64 = 0.005;
const EC: f64 = 1.5;
const MAX_SR: f64 = 2.5;
const MIN_SR: f64 = 1.0;
const V_LEAK: f64 = 0.00036;
const V_XFER: f64 = 0.0038;

const R: f64 = 8314.472;
const F: f64 = 96485.3415;
const T: f64 = 310.0;
const RT_F: f64 = R * T / F;

const P_KNA: f64 = 0.03;
const KM_K: f64 = 1.0;
const KM_NA: f64 = 40.0;
const KM_NAI: f64 = 87.5;
const KM_CA: f64 = 1.38;
const K_SAT: f64 = 0.1;
const N_NACA: f64 = 0.35;
const K_PCA: f64 = 0.0005;

const INV_VC_F2: f64 = 1.0 / (2.0 * V_C * F);
const INV_VC_F: f64 = 1.0 / (V_C * F);
const INV_VSS_F2: f64 = 1.0 / (2.0 * V_SS * F);

/// ten Tusscher-Panfilov 2006 human ventricular model, epicardial cell.
///
/// Potential in mV, time in ms, currents in pA/pF. Gates use
/// Rush-Larsen; the three calcium pools use the closed-form rapid
/// buffering update; `nai`, `ki` and the ryanodine receptor state `rr`
/// use forward Euler and `oo` is recomputed algebraically.
#[derive(Clone, Debug, PartialEq)]
pub struct TenTusscherPanfilov {
    /// Fast sodium conductance.
    pub g_na: f64,
    /// L-type calcium permeability.
    pub g_cal: f64,
    /// Transient outward conductance.
    pub g_to: f64,
    /// Rapid delayed rectifier conductance.
    pub g_kr: f64,
    /// Slow delayed rectifier conductance.
    pub g_ks: f64,
    /// Inward rectifier conductance.
    pub g_k1: f64,
    /// Sarcolemmal calcium pump conductance.
    pub g_pca: f64,
    /// Plateau potassium conductance.
    pub g_pk: f64,
    /// Background sodium conductance.
    pub g_bna: f64,
    /// Background calcium conductance.
    pub g_bca: f64,
    /// Sodium-calcium exchanger maximum.
    pub k_naca: f64,
    /// Sodium-potassium pump maximum.
    pub p_nak: f64,
}

impl Default for TenTusscherPanfilov {
    fn default() -> Self {
        Self {
            g_na: 14.838,
            g_cal: 3.980e-5,
            g_to: 0.294,
            g_kr: 0.153,
            g_ks: 0.392,
            g_k1: 5.405,
            g_pca: 0.1238,
            g_pk: 0.0146,
            g_bna: 0.00029,
            g_bca: 0.000592,
            k_naca: 1000.0,
            p_nak: 2.724,
        }
    }
}

/// Closed-form update of a calcium pool with rapid buffering.
#[inline]
fn buffered(ca: f64, delta: f64, total: f64, k: f64) -> f64 {
    let bound = total * ca / (ca + k);
    let b = total - bound - delta - ca + k;
    let c = k * (bound + delta + ca);
    ((b * b + 4.0 * c).sqrt() - b) / 2.0
}

impl CellModel for TenTusscherPanfilov {
    fn name(&self) -> &'static str {
        "ten-tusscher-panfilov-06"
    }

    fn state_vars(&self) -> &'static [StateVarDef] {
        VARS
    }

    fn initial_potential(&self) -> f64 {
        -85.23
    }

    fn default_diffusivity(&self) -> Diffusivity {
        Diffusivity::isotropic(0.154)
    }

    fn activation_threshold(&self) -> f64 {
        -40.0
    }

    fn step_cell(&self, v: f64, s: &mut [f64], dt: f64) -> f64 {
        let (cai, casr, cass, nai, ki) = (s[0], s[1], s[2], s[3], s[4]);
        let (m, h, j, xr1, xr2, xs, r, sg) = (s[5], s[6], s[7], s[8], s[9], s[10], s[11], s[12]);
        let (d, f, f2, fcass, rr) = (s[13], s[14], s[15], s[16], s[17]);
        debug_assert!(cai > 0.0 && nai > 0.0 && ki > 0.0, "concentrations must be positive");

        let e_k = RT_F * (K_O / ki).ln();
        let e_na = RT_F * (NA_O / nai).ln();
        let e_ks = RT_F * ((K_O + P_KNA * NA_O) / (ki + P_KNA * nai)).ln();
        let e_ca = 0.5 * RT_F * (CA_O / cai).ln();

        let a_k1 = 0.1 / (1.0 + (0.06 * (v - e_k - 200.0)).exp());
        let b_k1 = (3.0 * (0.0002 * (v - e_k + 100.0)).exp() + (0.1 * (v - e_k - 10.0)).exp())
            / (1.0 + (-0.5 * (v - e_k)).exp());
        let rec_ik1 = a_k1 / (a_k1 + b_k1);
        let rec_inak = 1.0 / (1.0 + 0.1245 * (-0.1 * v / RT_F).exp() + 0.0353 * (-v / RT_F).exp());
        let rec_ipk = 1.0 / (1.0 + ((25.0 - v) / 5.98).exp());

        let i_na = self.g_na * m * m * m * h * j * (v - e_na);
        let x_cal = 2.0 * (v - 15.0) / RT_F;
        let i_cal = self.g_cal
            * d
            * f
            * f2
            * fcass
            * 2.0
            * F
            * (0.25 * x_cal.exp() * cass - CA_O)
            * x_over_expm1(x_cal);
        let i_to = self.g_to * r * sg * (v - e_k);
        let i_kr = self.g_kr * (K_O / 5.4f64).sqrt() * xr1 * xr2 * (v - e_k);
        let i_ks = self.g_ks * xs * xs * (v - e_ks);
        let i_k1 = self.g_k1 * rec_ik1 * (v - e_k);
        let i_naca = self.k_naca
            * (1.0 / (KM_NAI.powi(3) + NA_O.powi(3)))
            * (1.0 / (KM_CA + CA_O))
            * (1.0 / (1.0 + K_SAT * ((N_NACA - 1.0) * v / RT_F).exp()))
            * ((N_NACA * v / RT_F).exp() * nai.powi(3) * CA_O
                - ((N_NACA - 1.0) * v / RT_F).exp() * NA_O.powi(3) * cai * 2.5);
        let i_nak = self.p_nak * (K_O / (K_O + KM_K)) * (nai / (nai + KM_NA)) * rec_inak;
        let i_pca = self.g_pca * cai / (K_PCA + cai);
        let i_pk = self.g_pk * rec_ipk * (v - e_k);
        let i_bna = self.g_bna * (v - e_na);
        let i_bca = self.g_bca * (v - e_ca);

        let i_tot = i_kr + i_ks + i_k1 + i_to + i_na + i_bna + i_cal + i_bca + i_nak + i_naca
            + i_pca
            + i_pk;

        // Calcium handling.
        let k_casr = MAX_SR - (MAX_SR - MIN_SR) / (1.0 + (EC / casr) * (EC / casr));
        let k1 = K1_ / k_casr;
        let k2 = K2_ * k_casr;
        let rr_new = rr + dt * (K4 * (1.0 - rr) - k2 * cass * rr);
        let oo = k1 * cass * cass * rr_new / (K3 + k1 * cass * cass);

        let i_rel = V_REL * oo * (casr - cass);
        let i_leak = V_LEAK * (casr - cai);
        let i_up = V_MAX_UP / (1.0 + K_UP * K_UP / (cai * cai));
        let i_xfer = V_XFER * (cass - cai);

        let casr_new = buffered(casr, dt * (i_up - i_rel - i_leak), BUF_SR, K_BUF_SR);
        let cass_new = buffered(
            cass,
            dt * (-i_xfer * (V_C / V_SS) + i_rel * (V_SR / V_SS)
                - i_cal * INV_VSS_F2 * CAPACITANCE),
            BUF_SS,
            K_BUF_SS,
        );
        let cai_new = buffered(
            cai,
            dt * (-(i_bca + i_pca - 2.0 * i_naca) * INV_VC_F2 * CAPACITANCE
                - (i_up - i_leak) * (V_SR / V_C)
                + i_xfer),
            BUF_C,
            K_BUF_C,
        );
        let nai_new =
            nai + dt * (-(i_na + i_bna + 3.0 * i_nak + 3.0 * i_naca) * INV_VC_F * CAPACITANCE);
        let ki_new = ki
            + dt * (-(i_k1 + i_to + i_kr + i_ks - 2.0 * i_nak + i_pk) * INV_VC_F * CAPACITANCE);

        // Gates.
        let am = 1.0 / (1.0 + ((-60.0 - v) / 5.0).exp());
        let bm = 0.1 / (1.0 + ((v + 35.0) / 5.0).exp()) + 0.1 / (1.0 + ((v - 50.0) / 200.0).exp());
        let m_inf = 1.0 / (1.0 + ((-56.86 - v) / 9.03).exp()).powi(2);

        let h_inf = 1.0 / (1.0 + ((v + 71.55) / 7.43).exp()).powi(2);
        let (tau_h, tau_j) = if v >= -40.0 {
            let bh = 0.77 / (0.13 * (1.0 + (-(v + 10.66) / 11.1).exp()));
            let bj = 0.6 * (0.057 * v).exp() / (1.0 + (-0.1 * (v + 32.0)).exp());
            (1.0 / bh, 1.0 / bj)
        } else {
            let ah = 0.057 * (-(v + 80.0) / 6.8).exp();
            let bh = 2.7 * (0.079 * v).exp() + 3.1e5 * (0.3485 * v).exp();
            let aj = (-2.5428e4 * (0.2444 * v).exp() - 6.948e-6 * (-0.04391 * v).exp())
                * (v + 37.78)
                / (1.0 + (0.311 * (v + 79.23)).exp());
            let bj = 0.02424 * (-0.01052 * v).exp() / (1.0 + (-0.1378 * (v + 40.14)).exp());
            (1.0 / (ah + bh), 1.0 / (aj + bj))
        };

        let xr1_inf = 1.0 / (1.0 + ((-26.0 - v) / 7.0).exp());
        let tau_xr1 =
            450.0 / (1.0 + ((-45.0 - v) / 10.0).exp()) * 6.0 / (1.0 + ((v + 30.0) / 11.5).exp());
        let xr2_inf = 1.0 / (1.0 + ((v + 88.0) / 24.0).exp());
        let tau_xr2 =
            3.0 / (1.0 + ((-60.0 - v) / 20.0).exp()) * 1.12 / (1.0 + ((v - 60.0) / 20.0).exp());
        let xs_inf = 1.0 / (1.0 + ((-5.0 - v) / 14.0).exp());
        let tau_xs = 1400.0 / (1.0 + ((5.0 - v) / 6.0).exp()).sqrt()
            * (1.0 / (1.0 + ((v - 35.0) / 15.0).exp()))
            + 80.0;

        let r_inf = 1.0 / (1.0 + ((20.0 - v) / 6.0).exp());
        let tau_r = 9.5 * (-(v + 40.0).powi(2) / 1800.0).exp() + 0.8;
        let s_inf = 1.0 / (1.0 + ((v + 20.0) / 5.0).exp());
        let tau_s = 85.0 * (-(v + 45.0).powi(2) / 320.0).exp()
            + 5.0 / (1.0 + ((v - 20.0) / 5.0).exp())
            + 3.0;

        let d_inf = 1.0 / (1.0 + ((-8.0 - v) / 7.5).exp());
        let tau_d = (1.4 / (1.0 + ((-35.0 - v) / 13.0).exp()) + 0.25)
            * (1.4 / (1.0 + ((v + 5.0) / 5.0).exp()))
            + 1.0 / (1.0 + ((50.0 - v) / 20.0).exp());
        let f_inf = 1.0 / (1.0 + ((v + 20.0) / 7.0).exp());
        let tau_f = 1102.5 * (-(v + 27.0).powi(2) / 225.0).exp()
            + 200.0 / (1.0 + ((13.0 - v) / 10.0).exp())
            + 180.0 / (1.0 + ((v + 30.0) / 10.0).exp())
            + 20.0;
        let f2_inf = 0.67 / (1.0 + ((v + 35.0) / 7.0).exp()) + 0.33;
        let tau_f2 = 600.0 * (-(v + 25.0).powi(2) / 170.0).exp()
            + 31.0 / (1.0 + ((25.0 - v) / 10.0).exp())
            + 16.0 / (1.0 + ((v + 30.0) / 10.0).exp());
        let cass_ratio = (cass_new / 0.05).powi(2);
        let fcass_inf = 0.6 / (1.0 + cass_ratio) + 0.4;
        let tau_fcass = 80.0 / (1.0 + cass_ratio) + 2.0;

        s[0] = cai_new;
        s[1] = casr_new;
        s[2] = cass_new;
        s[3] = nai_new;
        s[4] = ki_new;
        s[5] = rush_larsen(m, m_inf, am * bm, dt);
        s[6] = rush_larsen(h, h_inf, tau_h, dt);
        s[7] = rush_larsen(j, h_inf, tau_j, dt);
        s[8] = rush_larsen(xr1, xr1_inf, tau_xr1, dt);
        s[9] = rush_larsen(xr2, xr2_inf, tau_xr2, dt);
        s[10] = rush_larsen(xs, xs_inf, tau_xs, dt);
        s[11] = rush_larsen(r, r_inf, tau_r, dt);
        s[12] = rush_larsen(sg, s_inf, tau_s, dt);
        s[13] = rush_larsen(d, d_inf, tau_d, dt);
        s[14] = rush_larsen(f, f_inf, tau_f, dt);
        s[15] = rush_larsen(f2, f2_inf, tau_f2, dt);
        s[16] = rush_larsen(fcass, fcass_inf, tau_fcass, dt);
        s[17] = rr_new;
        s[18] = oo;

        -i_tot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial() -> Vec<f64> {
        VARS.iter().map(|d| d.initial).collect()
    }

    #[test]
    fn buffered_update_is_a_fixed_point_without_flux() {
        let ca = 0.0002;
        assert!((buffered(ca, 0.0, BUF_C, K_BUF_C) - ca).abs() < 1e-15);
    }

    #[test]
    fn l_type_singularity_is_finite() {
        let m = TenTusscherPanfilov::default();
        for v in [15.0, 15.0 + 1e-12, 15.0 - 1e-12] {
            let mut s = initial();
            let du = m.step_cell(v, &mut s, 0.02);
            assert!(du.is_finite(), "du/dt at {v} mV");
            assert!(s.iter().all(|x| x.is_finite()), "state at {v} mV");
        }
    }

    #[test]
    fn sweep_stays_finite_and_positive() {
        let m = TenTusscherPanfilov::default();
        let mut v = -100.0;
        while v <= 60.0 {
            let mut s = initial();
            let du = m.step_cell(v, &mut s, 0.02);
            assert!(du.is_finite(), "du/dt at {v} mV");
            assert!(s[..5].iter().all(|&c| c > 0.0), "concentration at {v} mV");
            v += 0.5;
        }
    }

    #[test]
    fn rest_is_nearly_stationary() {
        let m = TenTusscherPanfilov::default();
        let mut s = initial();
        let mut v = m.initial_potential();
        for _ in 0..10_000 {
            v += 0.02 * m.step_cell(v, &mut s, 0.02);
        }
        assert!((v - m.initial_potential()).abs() < 2.0, "v = {v}");
    }

    #[test]
    fn stimulated_cell_fires_and_repolarizes() {
        let m = TenTusscherPanfilov::default();
        let mut s = initial();
        let mut v = m.initial_potential();
        let mut peak = v;
        let dt = 0.02;
        for n in 0..30_000 {
            let stim = if n < 50 { 52.0 } else { 0.0 };
            v += dt * (m.step_cell(v, &mut s, dt) + stim);
            peak = peak.max(v);
        }
        assert!(peak > 20.0, "peak = {peak}");
        assert!(v < -75.0, "v = {v}");
    }
}
