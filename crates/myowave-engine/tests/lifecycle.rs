//! Run loop behaviour seen from outside: clock exactness, phase order,
//! early termination and collaborator wiring.

use std::any::Any;

use myowave_core::{FieldAccess, POTENTIAL};
use myowave_engine::{
    ActivationTimeTracker, BoxRegion, CurrentStimulus, FieldSampler, Model, ModelPhase, SetField,
    SimError, StopAt, Tracker, VoltageStimulus,
};
use myowave_ionic::{AlievPanfilov, CellModel, MitchellSchaeffer};
use myowave_test_utils::{slab_2d, slab_3d};

/// Records the clock and the centre potential seen by trackers.
#[derive(Default)]
struct Probe {
    seen: Vec<(f64, u64)>,
    centre: Vec<f64>,
    cell: usize,
}

impl Tracker for Probe {
    fn initialize(&mut self, fields: &dyn FieldAccess, _dt: f64) -> Result<(), SimError> {
        self.seen.clear();
        self.centre.clear();
        self.cell = fields.shape().cell_count() / 2;
        Ok(())
    }

    fn track(&mut self, t: f64, step: u64, fields: &dyn FieldAccess) {
        self.seen.push((t, step));
        if let Some(u) = fields.field(POTENTIAL) {
            self.centre.push(u.get(self.cell).unwrap_or(f64::NAN));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn clock_time_is_exact_multiple_of_dt() {
    let dt = 0.01;
    let mut m = Model::builder(slab_2d(8, 8), AlievPanfilov::default())
        .dt(dt)
        .t_max(7.77)
        .tracker("probe", Probe::default())
        .build()
        .unwrap();
    m.initialize().unwrap();
    let summary = m.run().unwrap();

    assert_eq!(summary.steps, 777);
    assert_eq!(m.clock().step(), 777);
    assert_eq!(m.clock().t(), 777.0 * dt);
    assert_eq!(summary.final_time, 777.0 * dt);

    let probe = m.trackers().get::<Probe>("probe").unwrap();
    assert_eq!(probe.seen.len(), 777);
    for (i, &(t, step)) in probe.seen.iter().enumerate() {
        assert_eq!(step, i as u64);
        assert_eq!(t, step as f64 * dt, "drift at step {step}");
    }
}

#[test]
fn zero_duration_runs_no_steps() {
    let mut m = Model::builder(slab_2d(5, 5), AlievPanfilov::default())
        .t_max(0.0)
        .build()
        .unwrap();
    m.initialize().unwrap();
    let summary = m.run().unwrap();
    assert_eq!(summary.steps, 0);
    assert_eq!(m.phase(), ModelPhase::Finished);
}

#[test]
fn stop_command_ends_run_early() {
    let mut m = Model::builder(slab_2d(8, 8), AlievPanfilov::default())
        .dt(0.01)
        .t_max(10.0)
        .command(StopAt::new(0.5))
        .build()
        .unwrap();
    m.initialize().unwrap();
    let summary = m.run().unwrap();
    assert!(summary.stopped_early);
    assert_eq!(summary.steps, 50);
    assert!((summary.final_time - 0.5).abs() < 1e-12);
    assert!(m.clock().is_finished());
    assert_eq!(m.phase(), ModelPhase::Finished);
}

#[test]
fn trackers_see_diffused_state_before_reaction() {
    // One half-excited cell in a sea of rest. Trackers must see the value
    // after diffusion alone; the reaction, evaluated at the start-of-step
    // potential, is added afterwards.
    let dt = 0.01;
    let dr = 0.25;
    let u0 = 0.5;
    let mut m = Model::builder(slab_2d(7, 7), AlievPanfilov::default())
        .dt(dt)
        .dr(dr)
        .t_max(dt)
        .tracker("probe", Probe::default())
        .build()
        .unwrap();
    m.initialize().unwrap();
    let centre = 24;
    m.set_field_value("u", centre, u0).unwrap();
    m.run().unwrap();

    let model = AlievPanfilov::default();
    let d = model.default_diffusivity().along;
    let diffused = u0 * (1.0 - 4.0 * d * dt / (dr * dr));
    let reaction = model.step_cell(u0, &mut [0.0], dt);
    assert!(reaction.abs() > 0.1);

    let probe = m.trackers().get::<Probe>("probe").unwrap();
    let seen = probe.centre[0];
    assert!((seen - diffused).abs() < 1e-12, "tracker saw {seen}, expected {diffused}");
    let after = m.potential().unwrap()[centre];
    assert_eq!(after, seen + dt * reaction);
}

#[test]
fn stimuli_and_commands_drive_the_state() {
    let centre = 10 * 20 + 10;
    let mut m = Model::builder(slab_2d(20, 20), MitchellSchaeffer::default())
        .dt(0.01)
        .t_max(20.0)
        .stimulus(CurrentStimulus::new(1.0, 2.0, 0.5, BoxRegion::new(&[1, 1], &[4, 19])))
        .command(SetField::new(15.0, "h", 1.0, None))
        .tracker("act", ActivationTimeTracker::new(0.5))
        .tracker("h", FieldSampler::new("h", vec![centre], 200))
        .build()
        .unwrap();
    m.initialize().unwrap();
    m.run().unwrap();

    let act = m.trackers().get::<ActivationTimeTracker>("act").unwrap();
    let near = act.time_at(2 * 20 + 10).unwrap();
    let far = act.time_at(15 * 20 + 10).unwrap();
    assert!(near >= 1.0 && near < far, "near {near}, far {far}");
    assert!(act.time_at(0).is_none());

    // The gate closes after activation and is reopened by the command at t = 15.
    let h = m.trackers().get::<FieldSampler>("h").unwrap();
    assert_eq!(h.samples().len(), 10);
    assert_eq!(h.samples()[0].values, vec![1.0]);
    assert!(h.samples()[7].values[0] < 0.99, "{:?}", h.samples()[7]);
    assert!(h.samples()[8].values[0] > 0.99, "{:?}", h.samples()[8]);
}

#[test]
fn voltage_stimulus_touches_only_tissue() {
    let mut m = Model::builder(slab_2d(6, 6), AlievPanfilov::default())
        .dt(0.01)
        .t_max(0.01)
        .stimulus(VoltageStimulus::new(0.0, 1.0, BoxRegion::new(&[0, 0], &[6, 2])))
        .build()
        .unwrap();
    m.initialize().unwrap();
    m.run().unwrap();
    let u = m.potential().unwrap();
    assert_eq!(u[0], 0.0);
    assert_eq!(u[6], 0.0);
    assert!(u[7] > 0.5);
}

#[test]
fn reinitialize_starts_a_fresh_run() {
    let mut m = Model::builder(slab_2d(8, 8), AlievPanfilov::default())
        .dt(0.01)
        .t_max(1.0)
        .stimulus(VoltageStimulus::new(0.0, 1.0, BoxRegion::new(&[1, 1], &[4, 4])))
        .build()
        .unwrap();
    m.initialize().unwrap();
    m.run().unwrap();
    let first = m.state_hash().unwrap();

    m.initialize().unwrap();
    assert_eq!(m.phase(), ModelPhase::Initialized);
    assert!(m.potential().unwrap().iter().all(|&u| u == 0.0));
    m.run().unwrap();
    assert_eq!(m.state_hash().unwrap(), first);
}

#[test]
fn three_dimensional_slab_conducts() {
    let n = 12;
    let mut m = Model::builder(slab_3d(n, n, n), AlievPanfilov::default())
        .dt(0.01)
        .dr(0.25)
        .t_max(5.0)
        .stimulus(VoltageStimulus::new(0.0, 1.0, BoxRegion::new(&[0, 0, 0], &[n, n, 3])))
        .tracker("act", ActivationTimeTracker::new(0.5))
        .build()
        .unwrap();
    m.initialize().unwrap();
    m.run().unwrap();

    let act = m.trackers().get::<ActivationTimeTracker>("act").unwrap();
    let at = |k: usize| act.time_at((6 * n + 6) * n + k);
    let (near, far) = (at(4).unwrap(), at(9).unwrap());
    assert!(far > near, "near {near}, far {far}");
    let halo = m.potential().unwrap()[0];
    assert_eq!(halo, 0.0);
}

mod clock_props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn run_lands_exactly_on_step_count(dt in 0.001f64..0.1, n in 1u64..300) {
            let mut m = Model::builder(slab_2d(5, 5), AlievPanfilov::default())
                .dt(dt)
                .dr(1.0)
                .t_max(n as f64 * dt)
                .build()
                .unwrap();
            m.initialize().unwrap();
            let summary = m.run().unwrap();
            prop_assert_eq!(summary.steps, n);
            prop_assert_eq!(m.clock().t(), n as f64 * dt);
        }
    }
}
