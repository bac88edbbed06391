//! Fiber orientation field.

use myowave_core::GridShape;
use smallvec::SmallVec;

use crate::error::TissueError;

/// Per-cell fiber direction, 2 or 3 components per cell.
///
/// Stored row-major with the component axis last, so the shape is the
/// grid shape plus one trailing axis. Vectors need not be unit length;
/// stencils normalize face-averaged directions themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct Fibers {
    dims: SmallVec<[usize; 3]>,
    components: usize,
    data: Vec<f64>,
}

impl Fibers {
    /// Wrap raw fiber data for a grid with extents `dims`.
    pub fn new(dims: &[usize], components: usize, data: Vec<f64>) -> Result<Self, TissueError> {
        let cells: usize = dims.iter().product();
        let mut found: Vec<usize> = dims.to_vec();
        found.push(components);
        if components != 2 && components != 3 {
            let mut expected = dims.to_vec();
            expected.push(dims.len());
            return Err(TissueError::FiberShapeMismatch { expected, found });
        }
        if data.len() != cells * components {
            return Err(TissueError::LengthMismatch {
                what: "fibers",
                expected: cells * components,
                found: data.len(),
            });
        }
        Ok(Self {
            dims: dims.iter().copied().collect(),
            components,
            data,
        })
    }

    /// The same direction in every cell.
    pub fn uniform(shape: &GridShape, direction: &[f64]) -> Result<Self, TissueError> {
        let cells = shape.cell_count();
        let mut data = Vec::with_capacity(cells * direction.len());
        for _ in 0..cells {
            data.extend_from_slice(direction);
        }
        Self::new(shape.dims(), direction.len(), data)
    }

    /// Grid extents the fibers were built for.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Components per cell (2 or 3).
    pub fn components(&self) -> usize {
        self.components
    }

    /// Raw row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Direction at a cell, zero-padded to three components.
    #[inline]
    pub fn at(&self, cell: usize) -> [f64; 3] {
        let base = cell * self.components;
        let mut f = [0.0; 3];
        f[..self.components].copy_from_slice(&self.data[base..base + self.components]);
        f
    }

    /// Check that the fibers belong to a grid of this shape.
    pub fn check_shape(&self, shape: &GridShape) -> Result<(), TissueError> {
        if self.dims.as_slice() != shape.dims() {
            let mut expected = shape.dims().to_vec();
            expected.push(self.components);
            let mut found = self.dims.to_vec();
            found.push(self.components);
            return Err(TissueError::FiberShapeMismatch { expected, found });
        }
        Ok(())
    }
}

/// Normalized sum of two fiber vectors, or zero if they cancel.
#[inline]
pub(crate) fn face_direction(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let s = [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
    let norm = (s[0] * s[0] + s[1] * s[1] + s[2] * s[2]).sqrt();
    if norm > 0.0 {
        [s[0] / norm, s[1] / norm, s[2] / norm]
    } else {
        [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_components_rejected() {
        match Fibers::new(&[3, 3], 4, vec![0.0; 36]) {
            Err(TissueError::FiberShapeMismatch { found, .. }) => {
                assert_eq!(found, vec![3, 3, 4]);
            }
            other => panic!("expected FiberShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn data_length_checked() {
        match Fibers::new(&[3, 3], 2, vec![0.0; 17]) {
            Err(TissueError::LengthMismatch { expected: 18, .. }) => {}
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn shape_mismatch_against_grid() {
        let shape = GridShape::new_2d(4, 4).unwrap();
        let fibers = Fibers::uniform(&GridShape::new_2d(4, 5).unwrap(), &[0.0, 1.0]).unwrap();
        assert!(matches!(
            fibers.check_shape(&shape),
            Err(TissueError::FiberShapeMismatch { .. })
        ));
    }

    #[test]
    fn two_component_fibers_pad_to_three() {
        let shape = GridShape::new_2d(3, 3).unwrap();
        let fibers = Fibers::uniform(&shape, &[0.6, 0.8]).unwrap();
        assert_eq!(fibers.at(4), [0.6, 0.8, 0.0]);
    }

    #[test]
    fn opposite_fibers_give_zero_face_direction() {
        assert_eq!(face_direction([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]), [0.0; 3]);
        let f = face_direction([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((f[0] - h).abs() < 1e-15 && (f[1] - h).abs() < 1e-15);
    }
}
