//! Named field access.
//!
//! Trackers, commands and state persistence never see storage layout;
//! they read and write state variables by name through these traits.

use crate::error::FieldError;
use crate::field::FieldView;
use crate::shape::GridShape;

/// Read access to the named state variables of a simulation.
pub trait FieldAccess {
    /// Shape every field conforms to.
    fn shape(&self) -> &GridShape;

    /// Names of all state variables, potential first, in declaration order.
    fn state_vars(&self) -> Vec<&'static str>;

    /// View of a named field, or `None` if the name is not declared.
    fn field(&self, name: &str) -> Option<FieldView<'_>>;
}

/// Write access to the named state variables of a simulation.
pub trait FieldAccessMut: FieldAccess {
    /// Overwrite one cell of a named field.
    fn set_value(&mut self, name: &str, cell: usize, value: f64) -> Result<(), FieldError>;

    /// Overwrite a whole named field. `values` must hold one value per cell.
    fn write_field(&mut self, name: &str, values: &[f64]) -> Result<(), FieldError>;
}
