//! myowave: electrical wave propagation in cardiac tissue.
//!
//! This is the facade crate re-exporting the public API of every
//! myowave sub-crate. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use myowave::prelude::*;
//!
//! // A 64x64 slab of tissue, excited along its left edge.
//! let tissue = CardiacTissue::new(GridShape::new_2d(64, 64).unwrap());
//! let mut model = Model::builder(tissue, AlievPanfilov::default())
//!     .dt(0.01)
//!     .dr(0.25)
//!     .t_max(5.0)
//!     .stimulus(VoltageStimulus::new(0.0, 1.0, BoxRegion::new(&[0, 0], &[64, 4])))
//!     .tracker("act", ActivationTimeTracker::new(0.5))
//!     .build()
//!     .unwrap();
//! model.initialize().unwrap();
//! let summary = model.run().unwrap();
//! assert_eq!(summary.steps, 500);
//!
//! let act = model.trackers().get::<ActivationTimeTracker>("act").unwrap();
//! assert!(act.activated_count() > 64);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`grid`] | `myowave-core` | Cell kinds, grid shapes, diffusivity, named field access |
//! | [`tissue`] | `myowave-tissue` | Tissue, stencils, weights, diffusion kernel, fibrosis |
//! | [`ionic`] | `myowave-ionic` | Cell model traits and the bundled cell models |
//! | [`state`] | `myowave-state` | State files, state hashing and comparison |
//! | [`engine`] | `myowave-engine` | Model time stepper, stimuli, trackers, commands |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid shapes, cell kinds and field access traits (`myowave-core`).
pub use myowave_core as grid;

/// Tissue geometry and the diffusion half of the step (`myowave-tissue`).
///
/// [`tissue::CardiacTissue`] holds the mesh, conductivity and fibers;
/// [`tissue::DiffusionKernel`] applies the stencil weights.
pub use myowave_tissue as tissue;

/// Cell models and the reaction half of the step (`myowave-ionic`).
pub use myowave_ionic as ionic;

/// Persistence of model state (`myowave-state`).
pub use myowave_state as state;

/// The time stepper and its collaborators (`myowave-engine`).
pub use myowave_engine as engine;

/// Common imports for typical myowave usage.
///
/// ```rust
/// use myowave::prelude::*;
/// ```
pub mod prelude {
    // Grid and fields
    pub use myowave_core::{CellKind, Diffusivity, FieldAccess, FieldAccessMut, GridShape};

    // Tissue
    pub use myowave_tissue::{CardiacTissue, Conductivity, Fibers, FibrosisPattern};

    // Cell models
    pub use myowave_ionic::{
        AlievPanfilov, Barkley, BuenoOrovio, FentonKarma, IonicModel, LuoRudy91, MitchellSchaeffer,
        TenTusscherPanfilov,
    };

    // Persistence
    pub use myowave_state::{state_hash, StateStore};

    // Engine
    pub use myowave_engine::{
        ActivationTimeTracker, BoxRegion, Command, CurrentStimulus, FieldSampler, Model,
        ModelPhase, PeriodTracker, RunSummary, SetField, SimError, SimulationConfig, Stimulus,
        StopAt, Tracker, VoltageStimulus,
    };
}
