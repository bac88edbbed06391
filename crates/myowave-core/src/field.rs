//! State-variable descriptors, the named field registry and field views.

use indexmap::IndexMap;

/// Name of the diffusing transmembrane potential field.
pub const POTENTIAL: &str = "u";

/// Integration form used for one state variable.
///
/// Each variable of a cell model has exactly one fixed form. Changing
/// it changes the numerical scheme, so the form is part of the model's
/// declaration rather than a runtime switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateForm {
    /// `x += dt * dx/dt`.
    ForwardEuler,
    /// `x = x_inf - (x_inf - x) * exp(-dt / tau)`.
    RushLarsen,
    /// Closed-form rapid-buffering update of a calcium pool.
    Buffered,
    /// Recomputed algebraically each step from other variables.
    Algebraic,
}

/// Declaration of one auxiliary state variable of a cell model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateVarDef {
    /// Field name used for named access and persistence.
    pub name: &'static str,
    /// Value assigned at model initialization.
    pub initial: f64,
    /// Fixed integration form.
    pub form: UpdateForm,
}

impl StateVarDef {
    /// Declare a state variable.
    pub const fn new(name: &'static str, initial: f64, form: UpdateForm) -> Self {
        Self {
            name,
            initial,
            form,
        }
    }
}

/// Storage slot a named field resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSlot {
    /// The potential buffer.
    Potential,
    /// Auxiliary variable at this position in the per-cell state.
    Aux(usize),
}

/// Ordered map from field name to storage slot.
///
/// Built once from a cell model's declaration, so a lookup either hits
/// a real buffer or fails; there is no way to add fields afterwards.
#[derive(Clone, Debug, Default)]
pub struct FieldRegistry {
    slots: IndexMap<&'static str, FieldSlot>,
}

impl FieldRegistry {
    /// Registry with the potential first, then the auxiliary variables
    /// in declaration order.
    pub fn new(aux: &[StateVarDef]) -> Self {
        let mut slots = IndexMap::with_capacity(aux.len() + 1);
        slots.insert(POTENTIAL, FieldSlot::Potential);
        for (i, def) in aux.iter().enumerate() {
            slots.insert(def.name, FieldSlot::Aux(i));
        }
        Self { slots }
    }

    /// Resolve a field name.
    pub fn get(&self, name: &str) -> Option<FieldSlot> {
        self.slots.get(name).copied()
    }

    /// Field names in state-variable order.
    pub fn names(&self) -> Vec<&'static str> {
        self.slots.keys().copied().collect()
    }

    /// Number of registered fields, potential included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Read-only view of one named field, one value per cell.
///
/// The potential is stored contiguously. Auxiliary variables are stored
/// interleaved per cell, so their views are strided.
#[derive(Clone, Copy, Debug)]
pub enum FieldView<'a> {
    /// One value per element.
    Contiguous(&'a [f64]),
    /// Every `stride`-th value starting at `offset`.
    Strided {
        /// Interleaved backing storage.
        data: &'a [f64],
        /// Position of the variable within a cell's record.
        offset: usize,
        /// Record length.
        stride: usize,
    },
}

impl<'a> FieldView<'a> {
    /// Number of cells covered by the view.
    pub fn len(&self) -> usize {
        match *self {
            Self::Contiguous(data) => data.len(),
            Self::Strided { data, stride, .. } => data.len() / stride,
        }
    }

    /// True if the view covers no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at a cell.
    #[inline]
    pub fn get(&self, cell: usize) -> Option<f64> {
        match *self {
            Self::Contiguous(data) => data.get(cell).copied(),
            Self::Strided {
                data,
                offset,
                stride,
            } => data.get(cell * stride + offset).copied(),
        }
    }

    /// Iterate over all cell values in order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = f64> + 'a> {
        match *self {
            Self::Contiguous(data) => Box::new(data.iter().copied()),
            Self::Strided {
                data,
                offset,
                stride,
            } => Box::new(data.iter().skip(offset).step_by(stride).copied()),
        }
    }

    /// Copy into an owned contiguous buffer.
    pub fn to_vec(&self) -> Vec<f64> {
        match *self {
            Self::Contiguous(data) => data.to_vec(),
            Self::Strided { .. } => self.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUX: &[StateVarDef] = &[
        StateVarDef::new("v", 1.0, UpdateForm::ForwardEuler),
        StateVarDef::new("w", 0.5, UpdateForm::RushLarsen),
    ];

    #[test]
    fn registry_orders_potential_first() {
        let reg = FieldRegistry::new(AUX);
        assert_eq!(reg.names(), vec!["u", "v", "w"]);
        assert_eq!(reg.get("u"), Some(FieldSlot::Potential));
        assert_eq!(reg.get("w"), Some(FieldSlot::Aux(1)));
        assert_eq!(reg.get("x"), None);
    }

    #[test]
    fn strided_view_picks_one_variable() {
        let data = [1.0, 10.0, 2.0, 20.0, 3.0, 30.0];
        let view = FieldView::Strided {
            data: &data,
            offset: 1,
            stride: 2,
        };
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(2), Some(30.0));
        assert_eq!(view.get(3), None);
        assert_eq!(view.to_vec(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn contiguous_view_reads_through() {
        let data = [4.0, 5.0];
        let view = FieldView::Contiguous(&data);
        assert_eq!(view.iter().sum::<f64>(), 9.0);
        assert!(!view.is_empty());
    }
}
