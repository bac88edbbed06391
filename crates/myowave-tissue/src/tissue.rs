//! Cardiac tissue: mesh, conductivity, fibers and cached weights.

use myowave_core::{CellKind, Diffusivity, GridShape};
use tracing::debug;

use crate::conductivity::Conductivity;
use crate::error::TissueError;
use crate::fibers::Fibers;
use crate::stencil::{AnisotropicStencil, IsotropicStencil, Stencil, StencilInput};
use crate::weights::Weights;

/// A structured grid of cardiac tissue.
///
/// The outermost layer of cells along every axis is kept empty so that
/// stencils can read the neighbours of any tissue cell. Constructors
/// enforce this via [`add_boundaries`](Self::add_boundaries) and every
/// mesh mutation that would break it is rejected. Any change to the
/// geometry, conductivity or fibers drops the cached weights.
#[derive(Clone, Debug)]
pub struct CardiacTissue {
    shape: GridShape,
    mesh: Vec<CellKind>,
    conductivity: Conductivity,
    fibers: Option<Fibers>,
    weights: Option<Weights>,
}

impl CardiacTissue {
    /// All-tissue grid surrounded by an empty halo, unit conductivity,
    /// no fibers.
    pub fn new(shape: GridShape) -> Self {
        let mesh = vec![CellKind::Tissue; shape.cell_count()];
        let mut tissue = Self {
            shape,
            mesh,
            conductivity: Conductivity::default(),
            fibers: None,
            weights: None,
        };
        tissue.add_boundaries();
        tissue
    }

    /// Tissue from an explicit mesh. The halo is cleared.
    pub fn from_mesh(shape: GridShape, mesh: Vec<CellKind>) -> Result<Self, TissueError> {
        if mesh.len() != shape.cell_count() {
            return Err(TissueError::LengthMismatch {
                what: "mesh",
                expected: shape.cell_count(),
                found: mesh.len(),
            });
        }
        let mut tissue = Self {
            shape,
            mesh,
            conductivity: Conductivity::default(),
            fibers: None,
            weights: None,
        };
        tissue.add_boundaries();
        Ok(tissue)
    }

    /// Tissue from raw mesh codes (`0` empty, `1` tissue, `2` fibrosis).
    pub fn from_codes(shape: GridShape, codes: &[u8]) -> Result<Self, TissueError> {
        Self::from_mesh(shape, codes.iter().map(|&c| CellKind::from(c)).collect())
    }

    /// Set every cell on the outermost layer of every axis to empty.
    pub fn add_boundaries(&mut self) {
        for cell in 0..self.mesh.len() {
            if self.shape.is_halo(cell) {
                self.mesh[cell] = CellKind::Empty;
            }
        }
        self.weights = None;
    }

    /// Grid shape.
    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    /// Cell classification, row-major.
    pub fn mesh(&self) -> &[CellKind] {
        &self.mesh
    }

    /// Classify one cell. Halo cells can only be set to empty.
    pub fn set_cell(&mut self, coord: &[usize], kind: CellKind) -> Result<(), TissueError> {
        let cell = self
            .shape
            .flat_index(coord)
            .ok_or_else(|| TissueError::CoordOutOfBounds {
                coord: coord.to_vec(),
            })?;
        if kind != CellKind::Empty && self.shape.is_halo(cell) {
            return Err(TissueError::HaloNotEmpty { cell });
        }
        self.mesh[cell] = kind;
        self.weights = None;
        Ok(())
    }

    /// Apply `f` to every interior cell's classification.
    pub fn map_interior(&mut self, mut f: impl FnMut(usize, CellKind) -> CellKind) {
        for cell in 0..self.mesh.len() {
            if !self.shape.is_halo(cell) {
                self.mesh[cell] = f(cell, self.mesh[cell]);
            }
        }
        self.weights = None;
    }

    /// Number of excitable cells.
    pub fn tissue_count(&self) -> usize {
        self.mesh.iter().filter(|k| k.is_tissue()).count()
    }

    /// Conductivity field.
    pub fn conductivity(&self) -> &Conductivity {
        &self.conductivity
    }

    /// Replace the conductivity field.
    pub fn set_conductivity(&mut self, conductivity: Conductivity) -> Result<(), TissueError> {
        conductivity.validate(self.shape.cell_count())?;
        self.conductivity = conductivity;
        self.weights = None;
        Ok(())
    }

    /// Fiber field, if any.
    pub fn fibers(&self) -> Option<&Fibers> {
        self.fibers.as_ref()
    }

    /// Set the fiber field, making diffusion anisotropic.
    pub fn set_fibers(&mut self, fibers: Fibers) -> Result<(), TissueError> {
        fibers.check_shape(&self.shape)?;
        self.fibers = Some(fibers);
        self.weights = None;
        Ok(())
    }

    /// Remove the fiber field, making diffusion isotropic.
    pub fn clear_fibers(&mut self) {
        self.fibers = None;
        self.weights = None;
    }

    /// Compute and store weights, choosing the isotropic stencil when no
    /// fibers are set and the anisotropic one otherwise.
    pub fn compute_weights(
        &mut self,
        dr: f64,
        dt: f64,
        diffusivity: Diffusivity,
    ) -> Result<(), TissueError> {
        if self.fibers.is_some() {
            self.compute_weights_with(&AnisotropicStencil, dr, dt, diffusivity)
        } else {
            self.compute_weights_with(&IsotropicStencil, dr, dt, diffusivity)
        }
    }

    /// Compute and store weights with an explicit stencil.
    pub fn compute_weights_with(
        &mut self,
        stencil: &dyn Stencil,
        dr: f64,
        dt: f64,
        diffusivity: Diffusivity,
    ) -> Result<(), TissueError> {
        let input = StencilInput::new(
            &self.shape,
            &self.mesh,
            &self.conductivity,
            self.fibers.as_ref(),
            diffusivity,
            dt,
            dr,
        )?;
        let weights = stencil.weights(&input)?;
        debug!(
            kind = ?stencil.kind(self.shape.ndim()),
            cells = self.shape.cell_count(),
            dr,
            dt,
            "stored tissue weights"
        );
        self.weights = Some(weights);
        Ok(())
    }

    /// Most recently computed or supplied weights.
    pub fn weights(&self) -> Option<&Weights> {
        self.weights.as_ref()
    }

    /// Install precomputed weights. Only the cell count is checked here;
    /// the row length is checked when a diffusion kernel is selected.
    pub fn set_weights(&mut self, weights: Weights) -> Result<(), TissueError> {
        let (cells, _) = weights.shape();
        if cells != self.shape.cell_count() {
            return Err(TissueError::LengthMismatch {
                what: "weights",
                expected: self.shape.cell_count(),
                found: cells,
            });
        }
        self.weights = Some(weights);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::StencilKind;

    fn tissue_2d(rows: usize, cols: usize) -> CardiacTissue {
        CardiacTissue::new(GridShape::new_2d(rows, cols).unwrap())
    }

    #[test]
    fn new_tissue_has_empty_halo() {
        let t = tissue_2d(5, 6);
        assert_eq!(t.tissue_count(), 3 * 4);
        assert_eq!(t.mesh()[0], CellKind::Empty);
    }

    #[test]
    fn from_codes_clears_halo() {
        let shape = GridShape::new_2d(3, 3).unwrap();
        let t = CardiacTissue::from_codes(shape, &[1; 9]).unwrap();
        assert_eq!(t.tissue_count(), 1);
    }

    #[test]
    fn from_mesh_checks_length() {
        let shape = GridShape::new_2d(3, 3).unwrap();
        assert!(matches!(
            CardiacTissue::from_mesh(shape, vec![CellKind::Tissue; 8]),
            Err(TissueError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn halo_cells_cannot_become_tissue() {
        let mut t = tissue_2d(4, 4);
        assert!(matches!(
            t.set_cell(&[0, 2], CellKind::Tissue),
            Err(TissueError::HaloNotEmpty { .. })
        ));
        assert!(t.set_cell(&[1, 2], CellKind::Fibrosis).is_ok());
        assert_eq!(t.tissue_count(), 3);
    }

    #[test]
    fn fibers_select_anisotropic_stencil() {
        let mut t = tissue_2d(6, 6);
        t.compute_weights(0.25, 0.01, Diffusivity::isotropic(1.0))
            .unwrap();
        assert_eq!(t.weights().unwrap().k(), StencilKind::Isotropic2D.k());

        let fibers = Fibers::uniform(t.shape(), &[1.0, 0.0]).unwrap();
        t.set_fibers(fibers).unwrap();
        assert!(t.weights().is_none());
        t.compute_weights(0.25, 0.01, Diffusivity::anisotropic(1.0, 0.5))
            .unwrap();
        assert_eq!(t.weights().unwrap().k(), StencilKind::Anisotropic2D.k());
    }

    #[test]
    fn forced_anisotropic_without_fibers_fails() {
        let mut t = tissue_2d(6, 6);
        assert_eq!(
            t.compute_weights_with(&AnisotropicStencil, 0.25, 0.01, Diffusivity::isotropic(1.0)),
            Err(TissueError::MissingFiberData)
        );
    }

    #[test]
    fn mismatched_fibers_rejected() {
        let mut t = tissue_2d(6, 6);
        let other = GridShape::new_2d(6, 7).unwrap();
        let fibers = Fibers::uniform(&other, &[1.0, 0.0]).unwrap();
        assert!(matches!(
            t.set_fibers(fibers),
            Err(TissueError::FiberShapeMismatch { .. })
        ));
    }

    #[test]
    fn invalid_steps_rejected() {
        let mut t = tissue_2d(6, 6);
        assert_eq!(
            t.compute_weights(0.0, 0.01, Diffusivity::isotropic(1.0)),
            Err(TissueError::InvalidStep {
                name: "dr",
                value: 0.0
            })
        );
        assert!(matches!(
            t.compute_weights(0.25, f64::NAN, Diffusivity::isotropic(1.0)),
            Err(TissueError::InvalidStep { name: "dt", .. })
        ));
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let mut t = tissue_2d(12, 9);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        t.set_fibers(Fibers::uniform(t.shape(), &[h, h]).unwrap())
            .unwrap();
        let d = Diffusivity::anisotropic(1.0, 1.0 / 9.0);
        t.compute_weights(0.25, 0.01, d).unwrap();
        let first = t.weights().unwrap().clone();
        t.compute_weights(0.25, 0.01, d).unwrap();
        let second = t.weights().unwrap();
        assert!(first
            .as_slice()
            .iter()
            .zip(second.as_slice())
            .all(|(a, b)| a.to_bits() == b.to_bits()));
    }
}
