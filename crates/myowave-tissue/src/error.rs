//! Error types for tissue construction and weight computation.

use std::error::Error;
use std::fmt;

use myowave_core::ShapeError;

/// Errors raised while building a tissue or computing its weights.
///
/// All of these are configuration errors: they are raised eagerly at
/// the point of misuse and are not expected to be recovered from.
#[derive(Clone, Debug, PartialEq)]
pub enum TissueError {
    /// The grid shape itself is invalid.
    Shape(ShapeError),
    /// An anisotropic stencil was requested but no fibers are set.
    MissingFiberData,
    /// Fiber data does not match the grid.
    FiberShapeMismatch {
        /// Expected shape: grid dims plus a trailing component axis.
        expected: Vec<usize>,
        /// Shape that was supplied.
        found: Vec<usize>,
    },
    /// A weights array has a row length that no stencil for this
    /// dimensionality produces.
    IncorrectWeightsShape {
        /// Offending `(cells, k)` shape.
        found: (usize, usize),
        /// The two valid shapes: isotropic and anisotropic.
        expected: [(usize, usize); 2],
    },
    /// A kernel was requested before any weights were computed or set.
    WeightsNotComputed,
    /// A per-cell array has the wrong number of entries.
    LengthMismatch {
        /// What was being set.
        what: &'static str,
        /// Number of grid cells.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },
    /// A conductivity value is outside `[0, 1]`.
    ConductivityOutOfRange {
        /// Offending cell, or `None` for a uniform value.
        cell: Option<usize>,
        /// The value.
        value: f64,
    },
    /// A coordinate lies outside the grid.
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: Vec<usize>,
    },
    /// A halo cell is not empty.
    HaloNotEmpty {
        /// Flat index of the offending cell.
        cell: usize,
    },
    /// `dr` or `dt` is not finite and positive.
    InvalidStep {
        /// Which parameter.
        name: &'static str,
        /// The value.
        value: f64,
    },
    /// Diffusion coefficients failed validation.
    InvalidDiffusivity {
        /// Description of the failure.
        reason: String,
    },
    /// A fibrosis pattern has invalid parameters.
    InvalidFibrosis {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for TissueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(e) => write!(f, "shape: {e}"),
            Self::MissingFiberData => {
                write!(f, "anisotropic stencil requires fiber data, none set")
            }
            Self::FiberShapeMismatch { expected, found } => {
                write!(f, "fiber shape {found:?} does not match expected {expected:?}")
            }
            Self::IncorrectWeightsShape { found, expected } => write!(
                f,
                "weights shape {found:?} matches no stencil, expected {:?} or {:?}",
                expected[0], expected[1]
            ),
            Self::WeightsNotComputed => write!(f, "no weights computed for this tissue"),
            Self::LengthMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what} has {found} entries, grid has {expected} cells"),
            Self::ConductivityOutOfRange { cell, value } => match cell {
                Some(c) => write!(f, "conductivity {value} at cell {c} is outside [0, 1]"),
                None => write!(f, "conductivity {value} is outside [0, 1]"),
            },
            Self::CoordOutOfBounds { coord } => {
                write!(f, "coordinate {coord:?} is outside the grid")
            }
            Self::HaloNotEmpty { cell } => {
                write!(f, "halo cell {cell} must be empty; call add_boundaries first")
            }
            Self::InvalidStep { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::InvalidDiffusivity { reason } => write!(f, "invalid diffusivity: {reason}"),
            Self::InvalidFibrosis { reason } => write!(f, "invalid fibrosis pattern: {reason}"),
        }
    }
}

impl Error for TissueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for TissueError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}
