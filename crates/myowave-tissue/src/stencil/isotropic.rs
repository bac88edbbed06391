use tracing::debug;

use super::{unit, Stencil, StencilInput};
use crate::error::TissueError;
use crate::weights::{StencilKind, Weights};

/// Standard second-order Laplacian with face-averaged conductivity.
///
/// The coefficient toward each face neighbour is
/// `0.5 * (c_i + c_j) * D_al * dt / dr^2`. Faces touching a non-tissue
/// cell carry no flux, which gives a no-flux boundary around every
/// tissue region. Only `D_al` is used.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsotropicStencil;

impl Stencil for IsotropicStencil {
    fn kind(&self, ndim: usize) -> StencilKind {
        StencilKind::isotropic(ndim)
    }

    fn weights(&self, input: &StencilInput<'_>) -> Result<Weights, TissueError> {
        let ndim = input.shape.ndim();
        let kind = self.kind(ndim);
        let cells = input.shape.cell_count();
        let self_idx = kind.self_index();
        let d = input.diffusivity.along;
        let scale = input.scale();

        let mut weights = Weights::zeros(cells, kind.k());
        let mut tissue = 0usize;
        for cell in 0..cells {
            if !input.is_tissue(cell) {
                continue;
            }
            tissue += 1;
            let c_self = input.conductivity.at(cell);
            let row = weights.row_mut(cell);
            let mut sum = 0.0;
            for axis in 0..ndim {
                for dir in [-1i8, 1] {
                    let delta = unit(axis, dir);
                    let n = input.neighbour(cell, delta);
                    if !input.is_tissue(n) {
                        continue;
                    }
                    let w = 0.5 * (d * c_self + d * input.conductivity.at(n)) * scale;
                    if let Some(k) = kind.index_of(delta) {
                        row[k] = w;
                        sum += w;
                    }
                }
            }
            row[self_idx] = -sum + 1.0;
        }
        debug!(?kind, tissue, "computed isotropic weights");
        Ok(weights)
    }
}
