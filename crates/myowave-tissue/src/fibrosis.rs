//! Seeded fibrosis pattern generators.

use myowave_core::CellKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::TissueError;
use crate::tissue::CardiacTissue;

/// Pattern converting tissue cells to fibrosis.
///
/// Only cells currently classified as tissue are converted; empty cells
/// and the halo are left alone. The same seed always yields the same
/// pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FibrosisPattern {
    /// Each tissue cell independently becomes fibrotic with
    /// probability `density`.
    Diffuse {
        /// Fraction of cells converted, in `[0, 1]`.
        density: f64,
        /// RNG seed.
        seed: u64,
    },
    /// The interior is tiled into blocks of `width` cells across and
    /// `length` cells along the last axis; each block becomes a
    /// fibrotic strand with probability `density`.
    Structural {
        /// Fraction of blocks converted, in `[0, 1]`.
        density: f64,
        /// Strand extent along the last axis.
        length: usize,
        /// Strand extent along the other axes.
        width: usize,
        /// RNG seed.
        seed: u64,
    },
}

impl FibrosisPattern {
    /// Check the pattern parameters.
    pub fn validate(&self) -> Result<(), TissueError> {
        let density = match *self {
            Self::Diffuse { density, .. } => density,
            Self::Structural {
                density,
                length,
                width,
                ..
            } => {
                if length == 0 || width == 0 {
                    return Err(TissueError::InvalidFibrosis {
                        reason: format!("strand size {length}x{width} must be non-zero"),
                    });
                }
                density
            }
        };
        if !(0.0..=1.0).contains(&density) {
            return Err(TissueError::InvalidFibrosis {
                reason: format!("density must be in [0, 1], got {density}"),
            });
        }
        Ok(())
    }

    /// Apply the pattern. Returns the number of cells converted.
    pub fn apply(&self, tissue: &mut CardiacTissue) -> Result<usize, TissueError> {
        self.validate()?;
        let mut converted = 0usize;
        match *self {
            Self::Diffuse { density, seed } => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                tissue.map_interior(|_, kind| {
                    if kind.is_tissue() && rng.random::<f64>() < density {
                        converted += 1;
                        CellKind::Fibrosis
                    } else {
                        kind
                    }
                });
            }
            Self::Structural {
                density,
                length,
                width,
                seed,
            } => {
                let shape = tissue.shape().clone();
                let ndim = shape.ndim();
                // Block index of each interior cell, last axis tiled by `length`.
                let block_of = |cell: usize| -> Vec<usize> {
                    shape
                        .coord(cell)
                        .iter()
                        .enumerate()
                        .map(|(axis, &c)| {
                            let extent = if axis + 1 == ndim { length } else { width };
                            (c - 1) / extent
                        })
                        .collect()
                };
                let blocks_per_axis: Vec<usize> = shape
                    .dims()
                    .iter()
                    .enumerate()
                    .map(|(axis, &len)| {
                        let extent = if axis + 1 == ndim { length } else { width };
                        (len - 2).div_ceil(extent)
                    })
                    .collect();
                let block_count: usize = blocks_per_axis.iter().product();
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let fibrotic: Vec<bool> = (0..block_count)
                    .map(|_| rng.random::<f64>() < density)
                    .collect();
                tissue.map_interior(|cell, kind| {
                    let block = block_of(cell);
                    let flat = block
                        .iter()
                        .zip(&blocks_per_axis)
                        .fold(0, |acc, (&b, &n)| acc * n + b);
                    if kind.is_tissue() && fibrotic[flat] {
                        converted += 1;
                        CellKind::Fibrosis
                    } else {
                        kind
                    }
                });
            }
        }
        debug!(pattern = ?self, converted, "applied fibrosis pattern");
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myowave_core::GridShape;

    fn tissue() -> CardiacTissue {
        CardiacTissue::new(GridShape::new_2d(42, 42).unwrap())
    }

    #[test]
    fn same_seed_same_pattern() {
        let mut a = tissue();
        let mut b = tissue();
        let p = FibrosisPattern::Diffuse {
            density: 0.3,
            seed: 7,
        };
        p.apply(&mut a).unwrap();
        p.apply(&mut b).unwrap();
        assert_eq!(a.mesh(), b.mesh());
    }

    #[test]
    fn diffuse_density_is_roughly_respected() {
        let mut t = tissue();
        let n = FibrosisPattern::Diffuse {
            density: 0.25,
            seed: 1,
        }
        .apply(&mut t)
        .unwrap();
        let frac = n as f64 / 1600.0;
        assert!((0.18..0.32).contains(&frac), "fraction {frac}");
        assert_eq!(t.tissue_count() + n, 1600);
    }

    #[test]
    fn zero_density_changes_nothing() {
        let mut t = tissue();
        let n = FibrosisPattern::Structural {
            density: 0.0,
            length: 8,
            width: 2,
            seed: 3,
        }
        .apply(&mut t)
        .unwrap();
        assert_eq!(n, 0);
        assert_eq!(t.tissue_count(), 1600);
    }

    #[test]
    fn full_density_structural_covers_interior() {
        let mut t = tissue();
        let n = FibrosisPattern::Structural {
            density: 1.0,
            length: 8,
            width: 2,
            seed: 3,
        }
        .apply(&mut t)
        .unwrap();
        assert_eq!(n, 1600);
        assert_eq!(t.mesh()[0], CellKind::Empty);
    }

    #[test]
    fn bad_density_rejected() {
        let mut t = tissue();
        assert!(matches!(
            FibrosisPattern::Diffuse {
                density: 1.5,
                seed: 0
            }
            .apply(&mut t),
            Err(TissueError::InvalidFibrosis { .. })
        ));
    }
}
