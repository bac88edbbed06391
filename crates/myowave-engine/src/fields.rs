//! Model state buffers behind named field access.

use myowave_core::{
    FieldAccess, FieldAccessMut, FieldError, FieldRegistry, FieldSlot, FieldView, GridShape,
};
use myowave_ionic::{CellStates, IonicModel};

/// Potential double buffer plus per-cell auxiliary state.
///
/// `u` holds the state at the current time. `u_new` is scratch space
/// for the step in progress and is exposed only to trackers, through
/// [`DiffusedView`]. Every declared variable is reachable by name.
#[derive(Clone, Debug)]
pub struct StateFields {
    shape: GridShape,
    pub(crate) u: Vec<f64>,
    pub(crate) u_new: Vec<f64>,
    pub(crate) aux: CellStates,
    registry: FieldRegistry,
}

impl StateFields {
    /// Fresh state for `model` on `shape`: every cell at the model's
    /// resting potential and initial auxiliary values.
    pub fn new(shape: GridShape, model: &dyn IonicModel) -> Self {
        let cells = shape.cell_count();
        let u0 = model.initial_potential();
        Self {
            u: vec![u0; cells],
            u_new: vec![u0; cells],
            aux: CellStates::new(cells, model.state_vars()),
            registry: FieldRegistry::new(model.state_vars()),
            shape,
        }
    }

    /// Current potential.
    pub fn potential(&self) -> &[f64] {
        &self.u
    }

    /// Auxiliary state.
    pub fn aux(&self) -> &CellStates {
        &self.aux
    }

    /// Exchange the potential buffers.
    pub(crate) fn swap(&mut self) {
        std::mem::swap(&mut self.u, &mut self.u_new);
    }

    fn slot(&self, name: &str) -> Result<FieldSlot, FieldError> {
        self.registry
            .get(name)
            .ok_or_else(|| FieldError::UnknownField {
                name: name.to_string(),
            })
    }
}

impl FieldAccess for StateFields {
    fn shape(&self) -> &GridShape {
        &self.shape
    }

    fn state_vars(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    fn field(&self, name: &str) -> Option<FieldView<'_>> {
        match self.registry.get(name)? {
            FieldSlot::Potential => Some(FieldView::Contiguous(&self.u)),
            FieldSlot::Aux(i) => Some(self.aux.view(i)),
        }
    }
}

impl FieldAccessMut for StateFields {
    fn set_value(&mut self, name: &str, cell: usize, value: f64) -> Result<(), FieldError> {
        match self.slot(name)? {
            FieldSlot::Potential => {
                let cell_count = self.u.len();
                let slot = self
                    .u
                    .get_mut(cell)
                    .ok_or(FieldError::CellOutOfRange { cell, cell_count })?;
                *slot = value;
                Ok(())
            }
            FieldSlot::Aux(i) => self.aux.set(i, cell, value),
        }
    }

    fn write_field(&mut self, name: &str, values: &[f64]) -> Result<(), FieldError> {
        match self.slot(name)? {
            FieldSlot::Potential => {
                if values.len() != self.u.len() {
                    return Err(FieldError::LengthMismatch {
                        name: name.to_string(),
                        expected: self.u.len(),
                        found: values.len(),
                    });
                }
                self.u.copy_from_slice(values);
                Ok(())
            }
            FieldSlot::Aux(i) => self.aux.write_var(i, name, values),
        }
    }
}

/// Read-only view handed to trackers between diffusion and reaction.
///
/// The potential resolves to the freshly diffused buffer; auxiliary
/// variables still hold their values from the start of the step.
pub struct DiffusedView<'a> {
    fields: &'a StateFields,
}

impl<'a> DiffusedView<'a> {
    pub(crate) fn new(fields: &'a StateFields) -> Self {
        Self { fields }
    }
}

impl FieldAccess for DiffusedView<'_> {
    fn shape(&self) -> &GridShape {
        &self.fields.shape
    }

    fn state_vars(&self) -> Vec<&'static str> {
        self.fields.state_vars()
    }

    fn field(&self, name: &str) -> Option<FieldView<'_>> {
        match self.fields.registry.get(name)? {
            FieldSlot::Potential => Some(FieldView::Contiguous(&self.fields.u_new)),
            FieldSlot::Aux(i) => Some(self.fields.aux.view(i)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myowave_ionic::{AlievPanfilov, LuoRudy91};

    fn fields() -> StateFields {
        StateFields::new(GridShape::new_2d(3, 4).unwrap(), &LuoRudy91::default())
    }

    #[test]
    fn every_declared_variable_is_readable() {
        let f = fields();
        assert_eq!(
            f.state_vars(),
            vec!["u", "m", "h", "j", "d", "f", "x", "cai"]
        );
        for name in f.state_vars() {
            assert_eq!(f.field(name).unwrap().len(), 12, "{name}");
        }
        assert_eq!(f.field("cai").unwrap().get(5), Some(0.0002));
        assert!(f.field("nai").is_none());
    }

    #[test]
    fn writes_hit_the_right_buffer() {
        let mut f = fields();
        f.set_value("u", 3, 10.0).unwrap();
        f.set_value("h", 3, 0.5).unwrap();
        assert_eq!(f.potential()[3], 10.0);
        assert_eq!(f.aux().cell(3)[1], 0.5);
        assert_eq!(f.aux().cell(3)[0], 0.0017);
    }

    #[test]
    fn unknown_name_and_bad_cell_are_errors() {
        let mut f = fields();
        assert!(matches!(
            f.set_value("nope", 0, 1.0),
            Err(FieldError::UnknownField { .. })
        ));
        assert!(matches!(
            f.set_value("u", 12, 1.0),
            Err(FieldError::CellOutOfRange { cell: 12, cell_count: 12 })
        ));
        assert!(matches!(
            f.write_field("u", &[0.0; 3]),
            Err(FieldError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn diffused_view_reads_scratch_potential() {
        let mut f = StateFields::new(GridShape::new_2d(3, 3).unwrap(), &AlievPanfilov::default());
        f.u_new[4] = 0.7;
        let view = DiffusedView::new(&f);
        assert_eq!(view.field("u").unwrap().get(4), Some(0.7));
        assert_eq!(f.field("u").unwrap().get(4), Some(0.0));
        f.swap();
        assert_eq!(f.potential()[4], 0.7);
    }
}
