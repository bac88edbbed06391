//! The diffusion kernel.
//!
//! Applies a precomputed [`Weights`] array to the potential:
//!
//! ```text
//! u_new[c] = sum_k w[c][k] * u[c + off[k]]      for tissue cells c
//! ```
//!
//! Reads come only from `u` and writes go only to `u_new`, so cells are
//! independent. With the `parallel` feature the loop runs on the rayon
//! pool; results are identical either way. Non-tissue cells are never
//! written.

use myowave_core::{CellKind, GridShape};
use smallvec::SmallVec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::TissueError;
use crate::weights::{StencilKind, Weights};

/// A diffusion kernel bound to one grid and stencil variant.
#[derive(Clone, Debug)]
pub struct DiffusionKernel {
    kind: StencilKind,
    offsets: SmallVec<[isize; 19]>,
    cells: usize,
}

impl DiffusionKernel {
    /// Select the kernel matching a weights array.
    ///
    /// The variant is inferred from the row length; a row length that
    /// no stencil for this dimensionality produces is rejected with
    /// [`TissueError::IncorrectWeightsShape`].
    pub fn select(shape: &GridShape, weights: &Weights) -> Result<Self, TissueError> {
        let (cells, k) = weights.shape();
        let kind = StencilKind::from_row_len(shape.ndim(), cells, k)?;
        if cells != shape.cell_count() {
            return Err(TissueError::LengthMismatch {
                what: "weights",
                expected: shape.cell_count(),
                found: cells,
            });
        }
        Ok(Self {
            kind,
            offsets: kind.flat_offsets(shape),
            cells,
        })
    }

    /// Stencil variant this kernel applies.
    pub fn kind(&self) -> StencilKind {
        self.kind
    }

    /// Write the diffused potential of every tissue cell into `u_new`.
    ///
    /// # Panics
    ///
    /// Panics if the slices do not all cover the kernel's grid, or if a
    /// tissue cell lies on the grid edge (the mesh was not bounded).
    pub fn apply(&self, u_new: &mut [f64], u: &[f64], weights: &Weights, mesh: &[CellKind]) {
        assert_eq!(u_new.len(), self.cells, "u_new length");
        assert_eq!(u.len(), self.cells, "u length");
        assert_eq!(mesh.len(), self.cells, "mesh length");
        assert_eq!(weights.shape().0, self.cells, "weights length");
        match self.offsets.len() {
            5 => apply_k::<5>(u_new, u, weights.as_slice(), mesh, &self.offsets),
            7 => apply_k::<7>(u_new, u, weights.as_slice(), mesh, &self.offsets),
            9 => apply_k::<9>(u_new, u, weights.as_slice(), mesh, &self.offsets),
            19 => apply_k::<19>(u_new, u, weights.as_slice(), mesh, &self.offsets),
            k => unreachable!("no stencil has {k} weights"),
        }
    }
}

#[inline(always)]
fn cell_sum<const K: usize>(cell: usize, row: &[f64], u: &[f64], offsets: &[isize; K]) -> f64 {
    let mut acc = 0.0;
    for k in 0..K {
        acc += row[k] * u[(cell as isize + offsets[k]) as usize];
    }
    acc
}

fn apply_k<const K: usize>(
    u_new: &mut [f64],
    u: &[f64],
    weights: &[f64],
    mesh: &[CellKind],
    offsets: &[isize],
) {
    let mut offs = [0isize; K];
    offs.copy_from_slice(offsets);

    #[cfg(feature = "parallel")]
    {
        u_new
            .par_iter_mut()
            .zip(weights.par_chunks_exact(K))
            .zip(mesh.par_iter())
            .enumerate()
            .for_each(|(cell, ((out, row), kind))| {
                if kind.is_tissue() {
                    *out = cell_sum::<K>(cell, row, u, &offs);
                }
            });
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (cell, ((out, row), kind)) in u_new
            .iter_mut()
            .zip(weights.chunks_exact(K))
            .zip(mesh.iter())
            .enumerate()
        {
            if kind.is_tissue() {
                *out = cell_sum::<K>(cell, row, u, &offs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_rejects_unknown_row_length() {
        let shape = GridShape::new_2d(4, 4).unwrap();
        let w = Weights::from_raw(16, 7, vec![0.0; 16 * 7]).unwrap();
        match DiffusionKernel::select(&shape, &w) {
            Err(TissueError::IncorrectWeightsShape { found, expected }) => {
                assert_eq!(found, (16, 7));
                assert_eq!(expected, [(16, 5), (16, 9)]);
            }
            other => panic!("expected IncorrectWeightsShape, got {other:?}"),
        }
    }

    #[test]
    fn select_rejects_wrong_cell_count() {
        let shape = GridShape::new_2d(4, 4).unwrap();
        let w = Weights::from_raw(15, 5, vec![0.0; 15 * 5]).unwrap();
        assert!(matches!(
            DiffusionKernel::select(&shape, &w),
            Err(TissueError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn identity_weights_copy_tissue_and_skip_the_rest() {
        let shape = GridShape::new_2d(3, 3).unwrap();
        let mut data = vec![0.0; 9 * 5];
        data[4 * 5 + 2] = 1.0;
        let w = Weights::from_raw(9, 5, data).unwrap();
        let mut mesh = vec![CellKind::Empty; 9];
        mesh[4] = CellKind::Tissue;
        let kernel = DiffusionKernel::select(&shape, &w).unwrap();
        let u: Vec<f64> = (0..9).map(f64::from).collect();
        let mut u_new = vec![-1.0; 9];
        kernel.apply(&mut u_new, &u, &w, &mesh);
        assert_eq!(u_new[4], 4.0);
        assert!(u_new.iter().enumerate().all(|(c, &v)| c == 4 || v == -1.0));
    }
}
