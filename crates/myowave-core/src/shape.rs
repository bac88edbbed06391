//! Structured grid shapes with row-major indexing.

use smallvec::SmallVec;

use crate::error::ShapeError;

/// Grid coordinate, one index per axis.
pub type Coord = SmallVec<[usize; 3]>;

/// Shape of a 2D or 3D structured Cartesian grid.
///
/// Cells are stored row-major: the last axis is contiguous. Every axis
/// must be at least three cells long so that a one-cell halo leaves
/// room for an interior.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    dims: SmallVec<[usize; 3]>,
    strides: SmallVec<[usize; 3]>,
}

impl GridShape {
    /// Smallest allowed extent along any axis.
    pub const MIN_AXIS_LEN: usize = 3;

    /// Create a shape from per-axis extents.
    pub fn new(dims: &[usize]) -> Result<Self, ShapeError> {
        if dims.len() != 2 && dims.len() != 3 {
            return Err(ShapeError::InvalidRank { rank: dims.len() });
        }
        for (axis, &len) in dims.iter().enumerate() {
            if len < Self::MIN_AXIS_LEN {
                return Err(ShapeError::AxisTooSmall { axis, len });
            }
        }
        let mut total: usize = 1;
        for &len in dims {
            total = total
                .checked_mul(len)
                .ok_or(ShapeError::CellCountOverflow)?;
        }
        let mut strides: SmallVec<[usize; 3]> = smallvec::smallvec![1; dims.len()];
        for axis in (0..dims.len() - 1).rev() {
            strides[axis] = strides[axis + 1] * dims[axis + 1];
        }
        Ok(Self {
            dims: dims.iter().copied().collect(),
            strides,
        })
    }

    /// A 2D grid of `rows x cols` cells.
    pub fn new_2d(rows: usize, cols: usize) -> Result<Self, ShapeError> {
        Self::new(&[rows, cols])
    }

    /// A 3D grid of `nx x ny x nz` cells.
    pub fn new_3d(nx: usize, ny: usize, nz: usize) -> Result<Self, ShapeError> {
        Self::new(&[nx, ny, nz])
    }

    /// Number of axes (2 or 3).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Extent of each axis.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Flat-index stride of each axis.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Total number of cells, halo included.
    pub fn cell_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Flat index of a coordinate, or `None` if it lies outside the grid.
    pub fn flat_index(&self, coord: &[usize]) -> Option<usize> {
        if coord.len() != self.ndim() {
            return None;
        }
        let mut idx = 0;
        for ((&c, &len), &stride) in coord.iter().zip(&self.dims).zip(&self.strides) {
            if c >= len {
                return None;
            }
            idx += c * stride;
        }
        Some(idx)
    }

    /// Coordinate of a flat index.
    pub fn coord(&self, mut idx: usize) -> Coord {
        let mut coord: Coord = smallvec::smallvec![0; self.ndim()];
        for (axis, &stride) in self.strides.iter().enumerate() {
            coord[axis] = idx / stride;
            idx %= stride;
        }
        coord
    }

    /// Whether the flat index lies on the outermost layer of any axis.
    pub fn is_halo(&self, idx: usize) -> bool {
        let coord = self.coord(idx);
        coord
            .iter()
            .zip(&self.dims)
            .any(|(&c, &len)| c == 0 || c + 1 == len)
    }

    /// Signed flat offset of a neighbour displacement.
    pub fn offset(&self, delta: &[i8]) -> isize {
        delta
            .iter()
            .zip(&self.strides)
            .map(|(&d, &s)| d as isize * s as isize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strides_are_row_major() {
        let s = GridShape::new_3d(4, 5, 6).unwrap();
        assert_eq!(s.strides(), &[30, 6, 1]);
        assert_eq!(s.cell_count(), 120);
    }

    #[test]
    fn rank_one_rejected() {
        assert_eq!(
            GridShape::new(&[10]),
            Err(ShapeError::InvalidRank { rank: 1 })
        );
    }

    #[test]
    fn short_axis_rejected() {
        assert_eq!(
            GridShape::new_2d(10, 2),
            Err(ShapeError::AxisTooSmall { axis: 1, len: 2 })
        );
    }

    #[test]
    fn out_of_range_coord_has_no_index() {
        let s = GridShape::new_2d(4, 4).unwrap();
        assert_eq!(s.flat_index(&[4, 0]), None);
        assert_eq!(s.flat_index(&[1, 1, 1]), None);
    }

    #[test]
    fn halo_detection() {
        let s = GridShape::new_2d(4, 5).unwrap();
        assert!(s.is_halo(0));
        assert!(s.is_halo(s.flat_index(&[3, 2]).unwrap()));
        assert!(!s.is_halo(s.flat_index(&[1, 1]).unwrap()));
    }

    #[test]
    fn offsets_follow_strides() {
        let s = GridShape::new_3d(4, 5, 6).unwrap();
        assert_eq!(s.offset(&[-1, 0, 0]), -30);
        assert_eq!(s.offset(&[0, 1, -1]), 5);
    }

    proptest! {
        #[test]
        fn coord_inverts_flat_index(
            nx in 3usize..12, ny in 3usize..12, nz in 3usize..12, seed in 0usize..10_000,
        ) {
            let s = GridShape::new_3d(nx, ny, nz).unwrap();
            let idx = seed % s.cell_count();
            let coord = s.coord(idx);
            prop_assert_eq!(s.flat_index(&coord), Some(idx));
        }
    }
}
