//! Core types and traits for the myowave cardiac simulation engine.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: mesh cell
//! codes, grid shapes, diffusion coefficients, state-variable
//! descriptors, named field views, error types and the field access
//! traits used by trackers, commands and state persistence.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod field;
pub mod params;
pub mod shape;
pub mod traits;

pub use cell::CellKind;
pub use error::{FieldError, ShapeError};
pub use field::{FieldRegistry, FieldSlot, FieldView, StateVarDef, UpdateForm, POTENTIAL};
pub use params::Diffusivity;
pub use shape::{Coord, GridShape};
pub use traits::{FieldAccess, FieldAccessMut};
