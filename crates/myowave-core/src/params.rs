//! Diffusion coefficients.

/// Longitudinal and transverse diffusion coefficients.
///
/// `along` (`D_al`) applies parallel to the local fiber direction and
/// `across` (`D_ac`) perpendicular to it. Isotropic stencils only use
/// `along`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diffusivity {
    /// Longitudinal coefficient `D_al`.
    pub along: f64,
    /// Transverse coefficient `D_ac`.
    pub across: f64,
}

impl Diffusivity {
    /// Same coefficient in every direction.
    pub const fn isotropic(d: f64) -> Self {
        Self {
            along: d,
            across: d,
        }
    }

    /// Distinct longitudinal and transverse coefficients.
    pub const fn anisotropic(along: f64, across: f64) -> Self {
        Self { along, across }
    }

    /// Check that both coefficients are finite, non-negative and that
    /// `along >= across`.
    pub fn validate(&self) -> Result<(), String> {
        if !self.along.is_finite() || self.along < 0.0 {
            return Err(format!(
                "D_al must be finite and non-negative, got {}",
                self.along
            ));
        }
        if !self.across.is_finite() || self.across < 0.0 {
            return Err(format!(
                "D_ac must be finite and non-negative, got {}",
                self.across
            ));
        }
        if self.across > self.along {
            return Err(format!(
                "D_ac ({}) must not exceed D_al ({})",
                self.across, self.along
            ));
        }
        Ok(())
    }

    /// Largest explicit time step that keeps forward Euler diffusion
    /// stable on a grid with spacing `dr` in `ndim` dimensions.
    pub fn stable_dt(&self, dr: f64, ndim: usize) -> f64 {
        let d = self.along.max(self.across);
        if d == 0.0 {
            return f64::INFINITY;
        }
        dr * dr / (2.0 * ndim as f64 * d)
    }
}

impl Default for Diffusivity {
    fn default() -> Self {
        Self::isotropic(1.0)
    }
}
