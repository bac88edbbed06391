//! Diffusion stencils.
//!
//! A [`Stencil`] turns a tissue description and a pair of diffusion
//! coefficients into a [`Weights`] array. Both stencils fold the
//! `dt / dr^2` factor into the weights and add one to the self weight
//! of every tissue cell, so the diffusion kernel is a single weighted
//! sum per cell.

mod anisotropic;
mod isotropic;

pub use anisotropic::AnisotropicStencil;
pub use isotropic::IsotropicStencil;

use myowave_core::{CellKind, Diffusivity, GridShape};

use crate::conductivity::Conductivity;
use crate::error::TissueError;
use crate::fibers::Fibers;
use crate::weights::{StencilKind, Weights};

/// Everything a stencil reads.
#[derive(Clone, Copy, Debug)]
pub struct StencilInput<'a> {
    pub(crate) shape: &'a GridShape,
    pub(crate) mesh: &'a [CellKind],
    pub(crate) conductivity: &'a Conductivity,
    pub(crate) fibers: Option<&'a Fibers>,
    pub(crate) diffusivity: Diffusivity,
    pub(crate) dt: f64,
    pub(crate) dr: f64,
}

impl<'a> StencilInput<'a> {
    /// Validate and bundle stencil inputs.
    ///
    /// Checks step sizes, coefficients, array lengths, fiber shape and
    /// that every halo cell is empty, so stencils can read the
    /// neighbours of any tissue cell without bounds concerns.
    pub fn new(
        shape: &'a GridShape,
        mesh: &'a [CellKind],
        conductivity: &'a Conductivity,
        fibers: Option<&'a Fibers>,
        diffusivity: Diffusivity,
        dt: f64,
        dr: f64,
    ) -> Result<Self, TissueError> {
        for (name, value) in [("dt", dt), ("dr", dr)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TissueError::InvalidStep { name, value });
            }
        }
        diffusivity
            .validate()
            .map_err(|reason| TissueError::InvalidDiffusivity { reason })?;
        let cells = shape.cell_count();
        if mesh.len() != cells {
            return Err(TissueError::LengthMismatch {
                what: "mesh",
                expected: cells,
                found: mesh.len(),
            });
        }
        conductivity.validate(cells)?;
        if let Some(f) = fibers {
            f.check_shape(shape)?;
        }
        if let Some(cell) = (0..cells).find(|&c| mesh[c] != CellKind::Empty && shape.is_halo(c)) {
            return Err(TissueError::HaloNotEmpty { cell });
        }
        Ok(Self {
            shape,
            mesh,
            conductivity,
            fibers,
            diffusivity,
            dt,
            dr,
        })
    }

    /// `dt / dr^2`.
    pub(crate) fn scale(&self) -> f64 {
        self.dt / (self.dr * self.dr)
    }

    /// Flat index of `cell` displaced by `delta`.
    #[inline]
    pub(crate) fn neighbour(&self, cell: usize, delta: [i8; 3]) -> usize {
        let off = self.shape.offset(&delta[..self.shape.ndim()]);
        (cell as isize + off) as usize
    }

    #[inline]
    pub(crate) fn is_tissue(&self, cell: usize) -> bool {
        self.mesh[cell].is_tissue()
    }
}

/// Computes per-cell diffusion weights.
pub trait Stencil {
    /// Variant produced for a grid of `ndim` axes.
    fn kind(&self, ndim: usize) -> StencilKind;

    /// Compute the weights array.
    fn weights(&self, input: &StencilInput<'_>) -> Result<Weights, TissueError>;
}

/// Unit displacement along one axis.
#[inline]
pub(crate) fn unit(axis: usize, dir: i8) -> [i8; 3] {
    let mut d = [0i8; 3];
    d[axis] = dir;
    d
}

#[inline]
pub(crate) fn add(a: [i8; 3], b: [i8; 3]) -> [i8; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}
