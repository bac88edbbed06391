//! Per-cell conductivity.

use crate::error::TissueError;

/// Scalar in `[0, 1]` multiplying the diffusion coefficients.
///
/// Values below one model locally impaired conduction.
#[derive(Clone, Debug, PartialEq)]
pub enum Conductivity {
    /// Same value in every cell.
    Uniform(f64),
    /// One value per cell, row-major.
    PerCell(Vec<f64>),
}

impl Conductivity {
    /// Value at a cell.
    #[inline]
    pub fn at(&self, cell: usize) -> f64 {
        match self {
            Self::Uniform(c) => *c,
            Self::PerCell(values) => values[cell],
        }
    }

    /// Check the range of every value and, for per-cell data, the length.
    pub fn validate(&self, cell_count: usize) -> Result<(), TissueError> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        match self {
            Self::Uniform(c) => {
                if !in_range(*c) {
                    return Err(TissueError::ConductivityOutOfRange {
                        cell: None,
                        value: *c,
                    });
                }
            }
            Self::PerCell(values) => {
                if values.len() != cell_count {
                    return Err(TissueError::LengthMismatch {
                        what: "conductivity",
                        expected: cell_count,
                        found: values.len(),
                    });
                }
                if let Some((cell, &value)) =
                    values.iter().enumerate().find(|&(_, &v)| !in_range(v))
                {
                    return Err(TissueError::ConductivityOutOfRange {
                        cell: Some(cell),
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for Conductivity {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}
