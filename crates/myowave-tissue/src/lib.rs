//! Tissue geometry and the diffusion half of the reaction-diffusion step.
//!
//! A [`CardiacTissue`] owns the mesh classification, per-cell
//! conductivity and optional fiber orientation. From these and a pair
//! of diffusion coefficients a [`Stencil`] produces a [`Weights`] array
//! (one row of neighbour coefficients per cell), which the
//! [`DiffusionKernel`] applies to the potential every step.
//!
//! # Stencils
//!
//! - [`IsotropicStencil`]: 5-point (2D) or 7-point (3D) Laplacian
//! - [`AnisotropicStencil`]: 9-point (2D) or 19-point (3D) tensor
//!   diffusion following the local fiber direction
//!
//! # Fibrosis
//!
//! [`FibrosisPattern`] converts tissue cells to fibrosis with a seeded
//! RNG, so a seed reproduces a pattern exactly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod conductivity;
pub mod diffusion;
pub mod error;
pub mod fibers;
pub mod fibrosis;
pub mod stencil;
pub mod tissue;
pub mod weights;

pub use conductivity::Conductivity;
pub use diffusion::DiffusionKernel;
pub use error::TissueError;
pub use fibers::Fibers;
pub use fibrosis::FibrosisPattern;
pub use stencil::{AnisotropicStencil, IsotropicStencil, Stencil, StencilInput};
pub use tissue::CardiacTissue;
pub use weights::{StencilKind, Weights};
