//! Axis-aligned box regions of a grid.

use std::error::Error;
use std::fmt;

use myowave_core::{Coord, GridShape};

/// Errors from checking a region against a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionError {
    /// The region has a different number of axes than the grid.
    RankMismatch {
        /// Grid rank.
        expected: usize,
        /// Region rank.
        found: usize,
    },
    /// An upper bound exceeds the grid extent.
    OutOfBounds {
        /// Offending axis.
        axis: usize,
        /// Exclusive upper bound.
        hi: usize,
        /// Grid extent along the axis.
        len: usize,
    },
    /// A lower bound exceeds its upper bound.
    Inverted {
        /// Offending axis.
        axis: usize,
    },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankMismatch { expected, found } => {
                write!(f, "region has {found} axes, grid has {expected}")
            }
            Self::OutOfBounds { axis, hi, len } => {
                write!(f, "region end {hi} on axis {axis} exceeds extent {len}")
            }
            Self::Inverted { axis } => write!(f, "region start exceeds end on axis {axis}"),
        }
    }
}

impl Error for RegionError {}

/// Half-open box `[lo, hi)` of grid coordinates, halo included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxRegion {
    lo: Coord,
    hi: Coord,
}

impl BoxRegion {
    /// Box from inclusive lower and exclusive upper corners.
    ///
    /// # Panics
    ///
    /// Panics if the corners have different lengths.
    pub fn new(lo: &[usize], hi: &[usize]) -> Self {
        assert_eq!(lo.len(), hi.len(), "region corners differ in rank");
        Self {
            lo: Coord::from_slice(lo),
            hi: Coord::from_slice(hi),
        }
    }

    /// The whole grid.
    pub fn full(shape: &GridShape) -> Self {
        Self {
            lo: shape.dims().iter().map(|_| 0).collect(),
            hi: Coord::from_slice(shape.dims()),
        }
    }

    /// Inclusive lower corner.
    pub fn lo(&self) -> &[usize] {
        &self.lo
    }

    /// Exclusive upper corner.
    pub fn hi(&self) -> &[usize] {
        &self.hi
    }

    /// Check that the box lies within `shape`.
    pub fn check(&self, shape: &GridShape) -> Result<(), RegionError> {
        if self.lo.len() != shape.ndim() {
            return Err(RegionError::RankMismatch {
                expected: shape.ndim(),
                found: self.lo.len(),
            });
        }
        let bounds = self.lo.iter().zip(&self.hi).zip(shape.dims());
        for (axis, ((&lo, &hi), &len)) in bounds.enumerate() {
            if lo > hi {
                return Err(RegionError::Inverted { axis });
            }
            if hi > len {
                return Err(RegionError::OutOfBounds { axis, hi, len });
            }
        }
        Ok(())
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.lo
            .iter()
            .zip(&self.hi)
            .map(|(&l, &h)| h.saturating_sub(l))
            .product()
    }

    /// Whether the box covers no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `f` with the flat index of every covered cell in row-major
    /// order. The region must have passed [`check`](Self::check).
    pub fn for_each_cell(&self, shape: &GridShape, mut f: impl FnMut(usize)) {
        if self.is_empty() {
            return;
        }
        let strides = shape.strides();
        let mut coord = self.lo.clone();
        loop {
            let flat: usize = coord.iter().zip(strides).map(|(&c, &s)| c * s).sum();
            f(flat);
            // odometer increment, last axis fastest
            let mut axis = coord.len();
            loop {
                if axis == 0 {
                    return;
                }
                axis -= 1;
                coord[axis] += 1;
                if coord[axis] < self.hi[axis] {
                    break;
                }
                coord[axis] = self.lo[axis];
            }
        }
    }

    /// Flat indices of every covered cell.
    pub fn cells(&self, shape: &GridShape) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        self.for_each_cell(shape, |c| out.push(c));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_row_major() {
        let shape = GridShape::new_2d(4, 5).unwrap();
        let r = BoxRegion::new(&[1, 2], &[3, 4]);
        assert_eq!(r.cells(&shape), vec![7, 8, 12, 13]);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn three_d_box() {
        let shape = GridShape::new_3d(3, 3, 3).unwrap();
        let r = BoxRegion::new(&[1, 1, 0], &[2, 2, 3]);
        assert_eq!(r.cells(&shape), vec![12, 13, 14]);
    }

    #[test]
    fn full_covers_everything() {
        let shape = GridShape::new_2d(3, 4).unwrap();
        let r = BoxRegion::full(&shape);
        assert_eq!(r.cells(&shape), (0..12).collect::<Vec<_>>());
        assert!(r.check(&shape).is_ok());
    }

    #[test]
    fn empty_box_visits_nothing() {
        let shape = GridShape::new_2d(4, 4).unwrap();
        let r = BoxRegion::new(&[2, 2], &[2, 4]);
        assert!(r.is_empty());
        assert!(r.cells(&shape).is_empty());
    }

    #[test]
    fn check_rejects_overhang() {
        let shape = GridShape::new_2d(4, 4).unwrap();
        match BoxRegion::new(&[0, 0], &[5, 4]).check(&shape) {
            Err(RegionError::OutOfBounds { axis: 0, hi: 5, len: 4 }) => {}
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn check_rejects_wrong_rank() {
        let shape = GridShape::new_2d(4, 4).unwrap();
        assert!(matches!(
            BoxRegion::new(&[0, 0, 0], &[1, 1, 1]).check(&shape),
            Err(RegionError::RankMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn check_rejects_inverted() {
        let shape = GridShape::new_2d(4, 4).unwrap();
        assert!(matches!(
            BoxRegion::new(&[3, 0], &[1, 4]).check(&shape),
            Err(RegionError::Inverted { axis: 0 })
        ));
    }
}
