//! Numerical helpers shared by the cell models.

/// Exact exponential update of a gate obeying `dx/dt = (x_inf - x) / tau`.
#[inline]
pub(crate) fn rush_larsen(x: f64, x_inf: f64, tau: f64, dt: f64) -> f64 {
    x_inf - (x_inf - x) * (-dt / tau).exp()
}

/// `x / (exp(x) - 1)`, continuous at `x = 0` where it equals one.
#[inline]
pub(crate) fn x_over_expm1(x: f64) -> f64 {
    if x.abs() < 1e-9 {
        1.0 - 0.5 * x
    } else {
        x / x.exp_m1()
    }
}

/// Heaviside step with `H(0) = 1`.
#[inline]
pub(crate) fn step(x: f64) -> f64 {
    if x >= 0.0 {
        1.0
    } else {
        0.0
    }
}
