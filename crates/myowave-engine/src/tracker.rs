//! Read-only observers of the model state.
//!
//! Trackers run once per step between diffusion and reaction. They see
//! the diffused potential before the reaction term is added, read any
//! field by name and keep their own output. They never write state.

use std::any::Any;

use indexmap::IndexMap;
use myowave_core::{FieldAccess, FieldError, POTENTIAL};

use crate::error::SimError;

/// An observer invoked once per step.
pub trait Tracker: Send + Any {
    /// Allocate output and check that the fields and cells the tracker
    /// reads exist. Called once per model initialization and discards
    /// previous output.
    fn initialize(&mut self, fields: &dyn FieldAccess, dt: f64) -> Result<(), SimError>;

    /// Observe the state of step `step`, which started at time `t`.
    fn track(&mut self, t: f64, step: u64, fields: &dyn FieldAccess);

    /// Upcast for retrieving the concrete tracker after a run.
    fn as_any(&self) -> &dyn Any;
}

fn check_cells(cells: &[usize], cell_count: usize) -> Result<(), FieldError> {
    match cells.iter().find(|&&c| c >= cell_count) {
        Some(&cell) => Err(FieldError::CellOutOfRange { cell, cell_count }),
        None => Ok(()),
    }
}

fn check_field(fields: &dyn FieldAccess, name: &str) -> Result<(), FieldError> {
    match fields.field(name) {
        Some(_) => Ok(()),
        None => Err(FieldError::UnknownField {
            name: name.to_string(),
        }),
    }
}

// ── ActivationTimeTracker ─────────────────────────────────────────

/// First time each cell's potential reaches a threshold.
#[derive(Clone, Debug)]
pub struct ActivationTimeTracker {
    threshold: f64,
    times: Vec<f64>,
}

impl ActivationTimeTracker {
    /// Tracker recording crossings of `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            times: Vec::new(),
        }
    }

    /// Activation time per cell, NaN where the threshold was never reached.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Activation time of one cell, if it activated.
    pub fn time_at(&self, cell: usize) -> Option<f64> {
        self.times.get(cell).copied().filter(|t| !t.is_nan())
    }

    /// Number of cells that have activated.
    pub fn activated_count(&self) -> usize {
        self.times.iter().filter(|t| !t.is_nan()).count()
    }
}

impl Tracker for ActivationTimeTracker {
    fn initialize(&mut self, fields: &dyn FieldAccess, _dt: f64) -> Result<(), SimError> {
        check_field(fields, POTENTIAL)?;
        self.times = vec![f64::NAN; fields.shape().cell_count()];
        Ok(())
    }

    fn track(&mut self, t: f64, _step: u64, fields: &dyn FieldAccess) {
        let Some(u) = fields.field(POTENTIAL) else {
            return;
        };
        for (time, v) in self.times.iter_mut().zip(u.iter()) {
            if time.is_nan() && v >= self.threshold {
                *time = t;
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ── PeriodTracker ─────────────────────────────────────────────────

/// Upward threshold crossings at a set of detector cells.
///
/// Successive crossing times give the local activation period, e.g. of
/// a re-entrant wave passing a fixed point.
#[derive(Clone, Debug)]
pub struct PeriodTracker {
    threshold: f64,
    detectors: Vec<usize>,
    above: Vec<bool>,
    crossings: Vec<Vec<f64>>,
}

impl PeriodTracker {
    /// Tracker watching `detectors` (flat cell indices) for upward
    /// crossings of `threshold`.
    pub fn new(threshold: f64, detectors: Vec<usize>) -> Self {
        Self {
            threshold,
            detectors,
            above: Vec::new(),
            crossings: Vec::new(),
        }
    }

    /// Detector cells in the order given.
    pub fn detectors(&self) -> &[usize] {
        &self.detectors
    }

    /// Crossing times at detector `i`.
    pub fn crossings(&self, i: usize) -> &[f64] {
        self.crossings.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Intervals between successive crossings at detector `i`.
    pub fn periods(&self, i: usize) -> Vec<f64> {
        self.crossings(i).windows(2).map(|w| w[1] - w[0]).collect()
    }
}

impl Tracker for PeriodTracker {
    fn initialize(&mut self, fields: &dyn FieldAccess, _dt: f64) -> Result<(), SimError> {
        check_cells(&self.detectors, fields.shape().cell_count())?;
        let u = fields.field(POTENTIAL).ok_or_else(|| FieldError::UnknownField {
            name: POTENTIAL.to_string(),
        })?;
        self.above = self
            .detectors
            .iter()
            .map(|&c| u.get(c).is_some_and(|v| v >= self.threshold))
            .collect();
        self.crossings = vec![Vec::new(); self.detectors.len()];
        Ok(())
    }

    fn track(&mut self, t: f64, _step: u64, fields: &dyn FieldAccess) {
        let Some(u) = fields.field(POTENTIAL) else {
            return;
        };
        for (i, &cell) in self.detectors.iter().enumerate() {
            let Some(v) = u.get(cell) else { continue };
            let now_above = v >= self.threshold;
            if now_above && !self.above[i] {
                self.crossings[i].push(t);
            }
            self.above[i] = now_above;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ── FieldSampler ──────────────────────────────────────────────────

/// Values of one field at selected cells, at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Time at the start of the sampled step.
    pub t: f64,
    /// One value per sampled cell.
    pub values: Vec<f64>,
}

/// Samples any named field at fixed cells every `every` steps.
#[derive(Clone, Debug)]
pub struct FieldSampler {
    field: String,
    cells: Vec<usize>,
    every: u64,
    samples: Vec<Sample>,
}

impl FieldSampler {
    /// Sampler of `field` at `cells`. An interval of zero samples every step.
    pub fn new(field: impl Into<String>, cells: Vec<usize>, every: u64) -> Self {
        Self {
            field: field.into(),
            cells,
            every: every.max(1),
            samples: Vec::new(),
        }
    }

    /// Sampled field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Collected samples in time order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl Tracker for FieldSampler {
    fn initialize(&mut self, fields: &dyn FieldAccess, _dt: f64) -> Result<(), SimError> {
        check_field(fields, &self.field)?;
        check_cells(&self.cells, fields.shape().cell_count())?;
        self.samples.clear();
        Ok(())
    }

    fn track(&mut self, t: f64, step: u64, fields: &dyn FieldAccess) {
        if step % self.every != 0 {
            return;
        }
        let Some(view) = fields.field(&self.field) else {
            return;
        };
        let values = self
            .cells
            .iter()
            .map(|&c| view.get(c).unwrap_or(f64::NAN))
            .collect();
        self.samples.push(Sample { t, values });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ── TrackerSet ────────────────────────────────────────────────────

/// Named collection of trackers, invoked in insertion order.
#[derive(Default)]
pub struct TrackerSet {
    trackers: IndexMap<String, Box<dyn Tracker>>,
}

impl TrackerSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tracker under `name`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        tracker: impl Tracker + 'static,
    ) -> Result<&mut Self, SimError> {
        let name = name.into();
        if self.trackers.contains_key(&name) {
            return Err(SimError::DuplicateName { name });
        }
        self.trackers.insert(name, Box::new(tracker));
        Ok(self)
    }

    /// Number of trackers.
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Registered names in invocation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trackers.keys().map(String::as_str)
    }

    /// Tracker registered under `name`, if it has type `T`.
    pub fn get<T: Tracker>(&self, name: &str) -> Option<&T> {
        self.trackers.get(name)?.as_any().downcast_ref::<T>()
    }

    /// Initialize every tracker.
    pub fn initialize(&mut self, fields: &dyn FieldAccess, dt: f64) -> Result<(), SimError> {
        for tracker in self.trackers.values_mut() {
            tracker.initialize(fields, dt)?;
        }
        Ok(())
    }

    /// Invoke every tracker on the state of the step in progress.
    pub fn tracker_next(&mut self, t: f64, step: u64, fields: &dyn FieldAccess) {
        for tracker in self.trackers.values_mut() {
            tracker.track(t, step, fields);
        }
    }
}

impl std::fmt::Debug for TrackerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.trackers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myowave_core::{FieldAccessMut, GridShape};
    use myowave_test_utils::MockFields;

    fn fields() -> MockFields {
        let mut f = MockFields::new(GridShape::new_2d(3, 3).unwrap());
        f.add_field("u", 0.0).add_field("v", 0.25);
        f
    }

    #[test]
    fn activation_time_records_first_crossing_only() {
        let mut f = fields();
        let mut tr = ActivationTimeTracker::new(0.5);
        tr.initialize(&f, 0.1).unwrap();
        f.set_value("u", 4, 0.6).unwrap();
        tr.track(1.0, 10, &f);
        f.set_value("u", 4, 0.0).unwrap();
        tr.track(2.0, 20, &f);
        f.set_value("u", 4, 0.9).unwrap();
        tr.track(3.0, 30, &f);
        assert_eq!(tr.time_at(4), Some(1.0));
        assert_eq!(tr.time_at(0), None);
        assert_eq!(tr.activated_count(), 1);
    }

    #[test]
    fn period_tracker_counts_upward_crossings() {
        let mut f = fields();
        let mut tr = PeriodTracker::new(0.5, vec![4]);
        tr.initialize(&f, 0.1).unwrap();
        for (t, v) in [(0.0, 0.1), (1.0, 0.7), (2.0, 0.8), (3.0, 0.2), (5.0, 0.6), (6.0, 0.1)] {
            f.set_value("u", 4, v).unwrap();
            tr.track(t, 0, &f);
        }
        assert_eq!(tr.crossings(0), &[1.0, 5.0]);
        assert_eq!(tr.periods(0), vec![4.0]);
        assert!(tr.crossings(3).is_empty());
    }

    #[test]
    fn period_tracker_rejects_out_of_range_detector() {
        let mut tr = PeriodTracker::new(0.5, vec![9]);
        match tr.initialize(&fields(), 0.1) {
            Err(SimError::Field(FieldError::CellOutOfRange { cell: 9, .. })) => {}
            other => panic!("expected CellOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn sampler_respects_interval_and_field() {
        let f = fields();
        let mut tr = FieldSampler::new("v", vec![0, 8], 5);
        tr.initialize(&f, 0.1).unwrap();
        for step in 0..11 {
            tr.track(step as f64 * 0.1, step, &f);
        }
        let steps: Vec<f64> = tr.samples().iter().map(|s| s.t).collect();
        assert_eq!(steps, vec![0.0, 0.5, 1.0]);
        assert_eq!(tr.samples()[0].values, vec![0.25, 0.25]);
    }

    #[test]
    fn sampler_rejects_unknown_field() {
        let mut tr = FieldSampler::new("cai", vec![0], 1);
        assert!(matches!(
            tr.initialize(&fields(), 0.1),
            Err(SimError::Field(FieldError::UnknownField { .. }))
        ));
    }

    #[test]
    fn set_downcasts_by_name() {
        let mut set = TrackerSet::new();
        set.add("act", ActivationTimeTracker::new(0.5)).unwrap();
        set.add("period", PeriodTracker::new(0.5, vec![])).unwrap();
        assert!(set.get::<ActivationTimeTracker>("act").is_some());
        assert!(set.get::<PeriodTracker>("act").is_none());
        assert!(matches!(
            set.add("act", ActivationTimeTracker::new(0.1)),
            Err(SimError::DuplicateName { .. })
        ));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["act", "period"]);
    }
}
