//! The cell-model traits and the grid-wide reaction driver.

use std::fmt;

use myowave_core::{CellKind, Diffusivity, StateVarDef};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::states::CellStates;

/// A single-cell ionic model.
///
/// Implementors describe one cell: which auxiliary variables it carries
/// and how one explicit step changes them. Grid iteration, tissue
/// masking and the potential update live in [`react_cells`], so a model
/// never sees neighbours or non-tissue cells.
///
/// The potential is not part of `state`. [`step_cell`](Self::step_cell)
/// advances the auxiliary variables in place and returns the reaction
/// rate `du/dt`, computed from the values at the start of the step.
pub trait CellModel: Clone + fmt::Debug + Send + Sync + 'static {
    /// Short identifier, e.g. `"aliev-panfilov"`.
    fn name(&self) -> &'static str;

    /// Auxiliary variables in per-cell storage order.
    fn state_vars(&self) -> &'static [StateVarDef];

    /// Resting potential assigned to every cell at initialization.
    fn initial_potential(&self) -> f64;

    /// Coefficients used when the run configuration does not set any.
    fn default_diffusivity(&self) -> Diffusivity;

    /// Potential above which a cell counts as activated.
    fn activation_threshold(&self) -> f64;

    /// Advance one cell by `dt` and return `du/dt`.
    ///
    /// `state` holds exactly `state_vars().len()` values.
    fn step_cell(&self, u: f64, state: &mut [f64], dt: f64) -> f64;
}

/// Object-safe reaction strategy held by the engine.
///
/// Every [`CellModel`] implements this through a blanket impl; custom
/// implementations are only needed for models that are not per-cell.
pub trait IonicModel: fmt::Debug + Send + Sync {
    /// Short identifier.
    fn name(&self) -> &str;

    /// Auxiliary variables in per-cell storage order.
    fn state_vars(&self) -> &[StateVarDef];

    /// Resting potential.
    fn initial_potential(&self) -> f64;

    /// Default diffusion coefficients.
    fn default_diffusivity(&self) -> Diffusivity;

    /// Activation threshold.
    fn activation_threshold(&self) -> f64;

    /// Add the reaction increment to `u_new` and advance `states` for
    /// every tissue cell. Non-tissue cells are left untouched.
    fn react(
        &self,
        u_new: &mut [f64],
        u: &[f64],
        states: &mut CellStates,
        mesh: &[CellKind],
        dt: f64,
    );
}

impl<M: CellModel> IonicModel for M {
    fn name(&self) -> &str {
        CellModel::name(self)
    }

    fn state_vars(&self) -> &[StateVarDef] {
        CellModel::state_vars(self)
    }

    fn initial_potential(&self) -> f64 {
        CellModel::initial_potential(self)
    }

    fn default_diffusivity(&self) -> Diffusivity {
        CellModel::default_diffusivity(self)
    }

    fn activation_threshold(&self) -> f64 {
        CellModel::activation_threshold(self)
    }

    fn react(
        &self,
        u_new: &mut [f64],
        u: &[f64],
        states: &mut CellStates,
        mesh: &[CellKind],
        dt: f64,
    ) {
        react_cells(self, u_new, u, states, mesh, dt);
    }
}

/// Run `model` over every tissue cell.
///
/// Each cell reads `u[c]` and its own state record and writes only
/// `u_new[c]` and that record, so the loop is data parallel.
///
/// # Panics
///
/// Panics if the buffers disagree on the number of cells.
pub fn react_cells<M: CellModel>(
    model: &M,
    u_new: &mut [f64],
    u: &[f64],
    states: &mut CellStates,
    mesh: &[CellKind],
    dt: f64,
) {
    let cells = u.len();
    assert_eq!(u_new.len(), cells, "u_new length");
    assert_eq!(mesh.len(), cells, "mesh length");
    assert_eq!(states.cells(), cells, "state cell count");

    let n_vars = states.n_vars();
    if n_vars == 0 {
        react_stateless(model, u_new, u, mesh, dt);
        return;
    }

    #[cfg(feature = "parallel")]
    {
        u_new
            .par_iter_mut()
            .zip(u.par_iter())
            .zip(states.as_mut_slice().par_chunks_exact_mut(n_vars))
            .zip(mesh.par_iter())
            .for_each(|(((un, &u0), record), kind)| {
                if kind.is_tissue() {
                    *un += dt * model.step_cell(u0, record, dt);
                }
            });
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (((un, &u0), record), kind) in u_new
            .iter_mut()
            .zip(u.iter())
            .zip(states.as_mut_slice().chunks_exact_mut(n_vars))
            .zip(mesh.iter())
        {
            if kind.is_tissue() {
                *un += dt * model.step_cell(u0, record, dt);
            }
        }
    }
}

fn react_stateless<M: CellModel>(
    model: &M,
    u_new: &mut [f64],
    u: &[f64],
    mesh: &[CellKind],
    dt: f64,
) {
    for ((un, &u0), kind) in u_new.iter_mut().zip(u).zip(mesh) {
        if kind.is_tissue() {
            *un += dt * model.step_cell(u0, &mut [], dt);
        }
    }
}
