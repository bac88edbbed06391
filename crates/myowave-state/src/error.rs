//! Error types for state persistence.

use std::fmt;
use std::io;

use myowave_core::FieldError;

/// Errors from saving or loading model state.
#[derive(Debug)]
pub enum StateError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The file does not start with `b"MYOW"`.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// The stored grid shape differs from the model's.
    ShapeMismatch {
        /// Field being loaded.
        field: String,
        /// Model grid dimensions.
        expected: Vec<usize>,
        /// Dimensions found in the file.
        found: Vec<usize>,
    },
    /// A declared state variable has no file in the load directory.
    MissingField {
        /// Field name.
        field: String,
    },
    /// The target rejected a field write.
    Field(FieldError),
    /// The file could not be decoded (truncated or inconsistent).
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"MYOW\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::ShapeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field '{field}' has shape {found:?}, model grid is {expected:?}"
            ),
            Self::MissingField { field } => write!(f, "no saved data for field '{field}'"),
            Self::Field(e) => write!(f, "field write failed: {e}"),
            Self::Malformed { detail } => write!(f, "malformed field file: {detail}"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StateError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<FieldError> for StateError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}
