//! Error types shared across the workspace.

use std::error::Error;
use std::fmt;

/// Errors from constructing a [`GridShape`](crate::GridShape).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// Only 2D and 3D grids are supported.
    InvalidRank {
        /// Number of axes requested.
        rank: usize,
    },
    /// An axis is too short to hold a halo and an interior.
    AxisTooSmall {
        /// Offending axis.
        axis: usize,
        /// Its extent.
        len: usize,
    },
    /// The total cell count does not fit in `usize`.
    CellCountOverflow,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank { rank } => {
                write!(f, "grid must have 2 or 3 axes, got {rank}")
            }
            Self::AxisTooSmall { axis, len } => {
                write!(f, "axis {axis} has length {len}, minimum is 3")
            }
            Self::CellCountOverflow => write!(f, "cell count overflows usize"),
        }
    }
}

impl Error for ShapeError {}

/// Errors from named field access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// No state variable with this name exists.
    UnknownField {
        /// The requested name.
        name: String,
    },
    /// A cell index is outside the grid.
    CellOutOfRange {
        /// The requested cell.
        cell: usize,
        /// Number of cells in the grid.
        cell_count: usize,
    },
    /// A whole-field write had the wrong number of values.
    LengthMismatch {
        /// Field being written.
        name: String,
        /// Number of values expected.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { name } => write!(f, "unknown field '{name}'"),
            Self::CellOutOfRange { cell, cell_count } => {
                write!(f, "cell {cell} out of range for {cell_count} cells")
            }
            Self::LengthMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "field '{name}' expects {expected} values, got {found}"
            ),
        }
    }
}

impl Error for FieldError {}
