//! Benchmark profiles for the myowave workspace.
//!
//! - [`reference_model`]: 100x100 Aliev-Panfilov slab (10K cells) with a
//!   planar wave already launched
//! - [`stress_model`]: 316x316 slab (~100K cells), same setup
//! - [`ionic_model`]: reference slab driven by any cell model
//! - [`oblique_tissue`]: slab with uniform fibers at 30 degrees, for the
//!   anisotropic stencils

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use myowave_core::GridShape;
use myowave_engine::{BoxRegion, Model, SimError, VoltageStimulus};
use myowave_ionic::{AlievPanfilov, IonicModel};
use myowave_tissue::{CardiacTissue, Fibers, TissueError};

/// Duration long enough that benchmark loops never finish a run.
const OPEN_ENDED: f64 = 1.0e9;

/// Build and initialize an `n x n` model of `ionic` with a planar
/// stimulus on the left edge.
///
/// dt = 0.01 and dr = 0.25 keep the explicit scheme stable for every
/// bundled model's default diffusivity.
pub fn ionic_model(n: usize, ionic: impl IonicModel + 'static) -> Result<Model, SimError> {
    let shape = GridShape::new_2d(n, n).map_err(TissueError::from)?;
    let rest = ionic.initial_potential();
    let stim = rest + 2.0 * (ionic.activation_threshold() - rest);
    let mut model = Model::builder(CardiacTissue::new(shape), ionic)
        .dt(0.01)
        .dr(0.25)
        .t_max(OPEN_ENDED)
        .stimulus(VoltageStimulus::new(0.0, stim, BoxRegion::new(&[0, 0], &[n, 4])))
        .build()?;
    model.initialize()?;
    Ok(model)
}

/// 100x100 Aliev-Panfilov reference profile.
pub fn reference_model() -> Result<Model, SimError> {
    ionic_model(100, AlievPanfilov::default())
}

/// 316x316 Aliev-Panfilov stress profile.
pub fn stress_model() -> Result<Model, SimError> {
    ionic_model(316, AlievPanfilov::default())
}

/// All-tissue slab of `shape` with uniform fibers at 30 degrees to the
/// last axis, lying in the plane of the last two axes.
pub fn oblique_tissue(shape: GridShape) -> Result<CardiacTissue, TissueError> {
    let (s, c) = 30f64.to_radians().sin_cos();
    let direction: Vec<f64> = match shape.ndim() {
        2 => vec![s, c],
        _ => vec![0.0, s, c],
    };
    let fibers = Fibers::uniform(&shape, &direction)?;
    let mut tissue = CardiacTissue::new(shape);
    tissue.set_fibers(fibers)?;
    Ok(tissue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use myowave_engine::ModelPhase;
    use myowave_ionic::TenTusscherPanfilov;

    #[test]
    fn reference_model_steps() {
        let mut m = reference_model().unwrap();
        assert_eq!(m.phase(), ModelPhase::Initialized);
        for _ in 0..5 {
            m.step().unwrap();
        }
        assert_eq!(m.clock().step(), 5);
        assert!(m.potential().unwrap().iter().all(|u| u.is_finite()));
    }

    #[test]
    fn ionic_profiles_expose_model_fields() {
        let m = ionic_model(10, TenTusscherPanfilov::default()).unwrap();
        assert!(m.field("cai").is_some());
    }

    #[test]
    fn oblique_fibers_fit_both_ranks() {
        let t2 = oblique_tissue(GridShape::new_2d(10, 10).unwrap()).unwrap();
        assert_eq!(t2.fibers().unwrap().components(), 2);
        let t3 = oblique_tissue(GridShape::new_3d(6, 6, 6).unwrap()).unwrap();
        assert_eq!(t3.fibers().unwrap().components(), 3);
    }
}
