//! Ionic cell models and the reaction half of the reaction-diffusion step.
//!
//! A cell model implements [`CellModel`]: it declares its auxiliary
//! state variables and advances one cell by one explicit step. Every
//! `CellModel` is automatically an [`IonicModel`], the object-safe
//! strategy the engine holds, whose [`react`](IonicModel::react) runs
//! the per-cell update over the whole grid.
//!
//! # Models
//!
//! | model | auxiliary variables |
//! |---|---|
//! | [`AlievPanfilov`] | 1 |
//! | [`Barkley`] | 1 |
//! | [`MitchellSchaeffer`] | 1 |
//! | [`FentonKarma`] | 2 |
//! | [`BuenoOrovio`] | 3 |
//! | [`LuoRudy91`] | 7 |
//! | [`TenTusscherPanfilov`] | 19 |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod kernel;
pub mod models;
pub mod states;
mod util;

pub use kernel::{react_cells, CellModel, IonicModel};
pub use models::{
    AlievPanfilov, Barkley, BuenoOrovio, FentonKarma, LuoRudy91, MitchellSchaeffer,
    TenTusscherPanfilov,
};
pub use states::CellStates;
