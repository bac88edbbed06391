use tracing::debug;

use super::{add, unit, Stencil, StencilInput};
use crate::error::TissueError;
use crate::fibers::face_direction;
use crate::weights::{StencilKind, Weights};

/// Tensor diffusion `div(D grad u)` with `D = D_ac I + (D_al - D_ac) f f^T`.
///
/// The flux through each cell face is evaluated at the face centre.
/// The face fiber is the normalized sum of the fibers of the two cells
/// sharing the face and the face conductivity is their mean. The flux
/// along the face normal `a` is
///
/// ```text
/// F_a = D_aa (u[hi] - u[lo]) + sum_b M_ab (S_up + S_down) / 2
/// D_aa = (D_ac + (D_al - D_ac) f_a^2) c
/// M_ab = 0.5 (D_al - D_ac) f_a f_b c
/// ```
///
/// where `S_up` and `S_down` are the tangential differences across the
/// two 2x2 half-blocks on either side of the face. A half-block whose
/// cells are not all conducting contributes nothing, which suppresses
/// the cross term near irregular boundaries. Each cell's weights are
/// assembled from its face fluxes, so the scheme is conservative and
/// every row sums to one after the identity is added.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnisotropicStencil;

/// Accumulator slot of a displacement within the 3x3x3 block.
#[inline]
fn slot(d: [i8; 3]) -> usize {
    ((d[0] + 1) * 9 + (d[1] + 1) * 3 + (d[2] + 1)) as usize
}

/// Whether the half-block spanned by face `(lo, hi)` and tangential
/// displacement `eb` may carry a cross-derivative term. The whole 2x2
/// block must conduct; the face cells are checked by the caller.
fn half_block_valid(input: &StencilInput<'_>, lo: usize, hi: usize, eb: [i8; 3]) -> bool {
    input.is_tissue(input.neighbour(lo, eb)) && input.is_tissue(input.neighbour(hi, eb))
}

impl Stencil for AnisotropicStencil {
    fn kind(&self, ndim: usize) -> StencilKind {
        StencilKind::anisotropic(ndim)
    }

    fn weights(&self, input: &StencilInput<'_>) -> Result<Weights, TissueError> {
        let fibers = input.fibers.ok_or(TissueError::MissingFiberData)?;
        let ndim = input.shape.ndim();
        let kind = self.kind(ndim);
        let cells = input.shape.cell_count();
        let d_al = input.diffusivity.along;
        let d_ac = input.diffusivity.across;
        let scale = input.scale();
        let self_idx = kind.self_index();

        let mut weights = Weights::zeros(cells, kind.k());
        let mut tissue = 0usize;
        for cell in 0..cells {
            if !input.is_tissue(cell) {
                continue;
            }
            tissue += 1;
            let mut acc = [0.0f64; 27];
            for a in 0..ndim {
                for side in [1i8, -1] {
                    // Face between lo and hi = lo + e_a, relative to `cell`.
                    let lo_d = if side == 1 { [0; 3] } else { unit(a, -1) };
                    let hi_d = add(lo_d, unit(a, 1));
                    let lo = input.neighbour(cell, lo_d);
                    let hi = input.neighbour(cell, hi_d);
                    if !input.is_tissue(lo) || !input.is_tissue(hi) {
                        continue;
                    }
                    let f = face_direction(fibers.at(lo), fibers.at(hi));
                    let c_face = 0.5 * (input.conductivity.at(lo) + input.conductivity.at(hi));
                    let sign = f64::from(side);

                    let major = (d_ac + (d_al - d_ac) * f[a] * f[a]) * c_face;
                    acc[slot(hi_d)] += sign * major;
                    acc[slot(lo_d)] -= sign * major;

                    for b in (0..ndim).filter(|&b| b != a) {
                        let minor = 0.5 * (d_al - d_ac) * f[a] * f[b] * c_face;
                        if minor == 0.0 {
                            continue;
                        }
                        let c = 0.5 * sign * minor;
                        let up = unit(b, 1);
                        let down = unit(b, -1);
                        if half_block_valid(input, lo, hi, up) {
                            acc[slot(add(lo_d, up))] += c;
                            acc[slot(add(hi_d, up))] += c;
                            acc[slot(lo_d)] -= c;
                            acc[slot(hi_d)] -= c;
                        }
                        if half_block_valid(input, lo, hi, down) {
                            acc[slot(lo_d)] += c;
                            acc[slot(hi_d)] += c;
                            acc[slot(add(lo_d, down))] -= c;
                            acc[slot(add(hi_d, down))] -= c;
                        }
                    }
                }
            }
            let row = weights.row_mut(cell);
            for (k, &delta) in kind.offsets().iter().enumerate() {
                row[k] = acc[slot(delta)] * scale;
            }
            row[self_idx] += 1.0;
        }
        debug!(?kind, tissue, "computed anisotropic weights");
        Ok(weights)
    }
}
