//! Stencil variants, their neighbour index maps and the weights array.

use myowave_core::GridShape;
use smallvec::SmallVec;

use crate::error::TissueError;

/// 2D isotropic: the four face neighbours and the cell itself.
const ISO_2D: [[i8; 3]; 5] = [[-1, 0, 0], [0, -1, 0], [0, 0, 0], [0, 1, 0], [1, 0, 0]];

/// 3D isotropic: the six face neighbours and the cell itself.
const ISO_3D: [[i8; 3]; 7] = [
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, -1],
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, 0],
    [1, 0, 0],
];

/// 2D anisotropic: the full 3x3 block, row-major.
const ANISO_2D: [[i8; 3]; 9] = [
    [-1, -1, 0],
    [-1, 0, 0],
    [-1, 1, 0],
    [0, -1, 0],
    [0, 0, 0],
    [0, 1, 0],
    [1, -1, 0],
    [1, 0, 0],
    [1, 1, 0],
];

/// 3D anisotropic: the 3x3x3 block without its 8 corners, row-major.
const ANISO_3D: [[i8; 3]; 19] = [
    [-1, -1, 0],
    [-1, 0, -1],
    [-1, 0, 0],
    [-1, 0, 1],
    [-1, 1, 0],
    [0, -1, -1],
    [0, -1, 0],
    [0, -1, 1],
    [0, 0, -1],
    [0, 0, 0],
    [0, 0, 1],
    [0, 1, -1],
    [0, 1, 0],
    [0, 1, 1],
    [1, -1, 0],
    [1, 0, -1],
    [1, 0, 0],
    [1, 0, 1],
    [1, 1, 0],
];

/// The four stencil variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilKind {
    /// 5-point 2D Laplacian.
    Isotropic2D,
    /// 9-point 2D tensor diffusion.
    Anisotropic2D,
    /// 7-point 3D Laplacian.
    Isotropic3D,
    /// 19-point 3D tensor diffusion.
    Anisotropic3D,
}

impl StencilKind {
    /// Isotropic variant for a dimensionality.
    pub fn isotropic(ndim: usize) -> Self {
        if ndim == 3 {
            Self::Isotropic3D
        } else {
            Self::Isotropic2D
        }
    }

    /// Anisotropic variant for a dimensionality.
    pub fn anisotropic(ndim: usize) -> Self {
        if ndim == 3 {
            Self::Anisotropic3D
        } else {
            Self::Anisotropic2D
        }
    }

    /// Resolve the variant from a weights row length.
    ///
    /// Fails with [`TissueError::IncorrectWeightsShape`] when `k` is not
    /// one of the two row lengths valid for `ndim`.
    pub fn from_row_len(ndim: usize, cells: usize, k: usize) -> Result<Self, TissueError> {
        let (iso, aniso) = (Self::isotropic(ndim), Self::anisotropic(ndim));
        if k == iso.k() {
            Ok(iso)
        } else if k == aniso.k() {
            Ok(aniso)
        } else {
            Err(TissueError::IncorrectWeightsShape {
                found: (cells, k),
                expected: [(cells, iso.k()), (cells, aniso.k())],
            })
        }
    }

    /// Neighbour displacements in weight-index order, padded to 3 axes.
    pub fn offsets(self) -> &'static [[i8; 3]] {
        match self {
            Self::Isotropic2D => &ISO_2D,
            Self::Anisotropic2D => &ANISO_2D,
            Self::Isotropic3D => &ISO_3D,
            Self::Anisotropic3D => &ANISO_3D,
        }
    }

    /// Number of weights per cell.
    pub fn k(self) -> usize {
        self.offsets().len()
    }

    /// Index of the self weight within a row.
    pub fn self_index(self) -> usize {
        self.k() / 2
    }

    /// Number of grid axes.
    pub fn ndim(self) -> usize {
        match self {
            Self::Isotropic2D | Self::Anisotropic2D => 2,
            Self::Isotropic3D | Self::Anisotropic3D => 3,
        }
    }

    /// Weight index of a displacement, if the stencil contains it.
    pub fn index_of(self, delta: [i8; 3]) -> Option<usize> {
        self.offsets().iter().position(|&o| o == delta)
    }

    /// Signed flat offsets on a concrete grid, in weight-index order.
    pub fn flat_offsets(self, shape: &GridShape) -> SmallVec<[isize; 19]> {
        let ndim = shape.ndim();
        self.offsets()
            .iter()
            .map(|delta| shape.offset(&delta[..ndim]))
            .collect()
    }
}

/// Per-cell diffusion weights, `k` per cell, row-major.
///
/// Rows of non-tissue cells are all zero. Rows of tissue cells include
/// the identity on the self weight, so a row sums to one.
#[derive(Clone, Debug, PartialEq)]
pub struct Weights {
    cells: usize,
    k: usize,
    data: Vec<f64>,
}

impl Weights {
    /// Wrap a raw `cells x k` array.
    pub fn from_raw(cells: usize, k: usize, data: Vec<f64>) -> Result<Self, TissueError> {
        if data.len() != cells * k {
            return Err(TissueError::LengthMismatch {
                what: "weights",
                expected: cells * k,
                found: data.len(),
            });
        }
        Ok(Self { cells, k, data })
    }

    pub(crate) fn zeros(cells: usize, k: usize) -> Self {
        Self {
            cells,
            k,
            data: vec![0.0; cells * k],
        }
    }

    /// `(cells, k)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.cells, self.k)
    }

    /// Weights per cell.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Row of one cell.
    pub fn row(&self, cell: usize) -> &[f64] {
        &self.data[cell * self.k..(cell + 1) * self.k]
    }

    pub(crate) fn row_mut(&mut self, cell: usize) -> &mut [f64] {
        &mut self.data[cell * self.k..(cell + 1) * self.k]
    }

    /// Flat data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
