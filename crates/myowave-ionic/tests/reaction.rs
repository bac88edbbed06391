//! Grid-level behaviour of the reaction step for every built-in model.

use myowave_core::CellKind;
use myowave_ionic::{
    AlievPanfilov, Barkley, BuenoOrovio, CellStates, FentonKarma, IonicModel, LuoRudy91,
    MitchellSchaeffer, TenTusscherPanfilov,
};
use proptest::prelude::*;

fn all_models() -> Vec<Box<dyn IonicModel>> {
    vec![
        Box::new(AlievPanfilov::default()),
        Box::new(Barkley::default()),
        Box::new(MitchellSchaeffer::default()),
        Box::new(FentonKarma::default()),
        Box::new(BuenoOrovio::default()),
        Box::new(LuoRudy91::default()),
        Box::new(TenTusscherPanfilov::default()),
    ]
}

fn kind_strategy() -> impl Strategy<Value = CellKind> {
    prop_oneof![
        Just(CellKind::Empty),
        Just(CellKind::Tissue),
        Just(CellKind::Fibrosis),
    ]
}

#[test]
fn model_names_are_unique() {
    let models = all_models();
    let mut names: Vec<&str> = models.iter().map(|m| m.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), models.len());
}

#[test]
fn state_variable_names_are_unique_and_exclude_potential() {
    for model in all_models() {
        let mut names: Vec<&str> = model.state_vars().iter().map(|d| d.name).collect();
        assert!(!names.contains(&"u"), "{} declares u", model.name());
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before, "{} repeats a name", model.name());
    }
}

#[test]
fn default_diffusivities_are_valid() {
    for model in all_models() {
        assert!(model.default_diffusivity().validate().is_ok(), "{}", model.name());
    }
}

#[test]
fn resting_tissue_stays_finite() {
    let mesh = vec![CellKind::Tissue; 16];
    for model in all_models() {
        let u0 = model.initial_potential();
        let mut u = vec![u0; 16];
        let mut states = CellStates::new(16, model.state_vars());
        for _ in 0..500 {
            let mut u_new = u.clone();
            model.react(&mut u_new, &u, &mut states, &mesh, 0.01);
            u = u_new;
        }
        assert!(u.iter().all(|v| v.is_finite()), "{}", model.name());
        assert!(
            states.as_slice().iter().all(|v| v.is_finite()),
            "{}",
            model.name()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn non_tissue_cells_are_untouched(
        mesh in prop::collection::vec(kind_strategy(), 1..40),
        seed_u in -1.0f64..1.0,
    ) {
        for model in all_models() {
            let cells = mesh.len();
            let u: Vec<f64> = (0..cells)
                .map(|c| model.initial_potential() + seed_u * (c % 3) as f64)
                .collect();
            let mut u_new = vec![7.0; cells];
            let mut states = CellStates::new(cells, model.state_vars());
            let before = states.clone();
            model.react(&mut u_new, &u, &mut states, &mesh, 0.01);
            for (c, kind) in mesh.iter().enumerate() {
                if !kind.is_tissue() {
                    prop_assert_eq!(u_new[c], 7.0);
                    prop_assert_eq!(states.cell(c), before.cell(c));
                }
            }
        }
    }

    #[test]
    fn identical_cells_react_identically(cells in 2usize..30) {
        for model in all_models() {
            let mesh = vec![CellKind::Tissue; cells];
            let u = vec![model.initial_potential(); cells];
            let mut u_new = u.clone();
            let mut states = CellStates::new(cells, model.state_vars());
            model.react(&mut u_new, &u, &mut states, &mesh, 0.01);
            for c in 1..cells {
                prop_assert_eq!(u_new[c].to_bits(), u_new[0].to_bits());
                prop_assert_eq!(states.cell(c), states.cell(0));
            }
        }
    }
}
