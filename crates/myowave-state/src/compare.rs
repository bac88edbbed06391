//! Cell-level comparison of two model states.

use std::fmt;

use myowave_core::FieldAccess;

/// First cell at which two states differ.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDivergence {
    /// Field name.
    pub field: String,
    /// Flat cell index, or `None` if the field is missing on one side
    /// or the two sides disagree on cell count.
    pub cell: Option<usize>,
    /// Value on the left, if present.
    pub left: Option<f64>,
    /// Value on the right, if present.
    pub right: Option<f64>,
}

impl fmt::Display for FieldDivergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell {
            Some(cell) => write!(
                f,
                "field '{}' differs at cell {cell}: {:?} vs {:?}",
                self.field, self.left, self.right
            ),
            None => write!(f, "field '{}' differs in presence or length", self.field),
        }
    }
}

/// Locate the first bitwise difference between two states.
///
/// Fields are visited in the left side's declaration order, then any
/// field only the right side declares. Returns `None` when every field
/// matches bit for bit.
pub fn first_divergence(
    left: &dyn FieldAccess,
    right: &dyn FieldAccess,
) -> Option<FieldDivergence> {
    let left_names = left.state_vars();
    let right_names = right.state_vars();
    let only_right = right_names.iter().filter(|n| !left_names.contains(*n));
    for name in left_names.iter().chain(only_right) {
        let (a, b) = match (left.field(name), right.field(name)) {
            (Some(a), Some(b)) if a.len() == b.len() => (a, b),
            _ => {
                return Some(FieldDivergence {
                    field: name.to_string(),
                    cell: None,
                    left: None,
                    right: None,
                })
            }
        };
        if let Some((cell, (x, y))) = a
            .iter()
            .zip(b.iter())
            .enumerate()
            .find(|(_, (x, y))| x.to_bits() != y.to_bits())
        {
            return Some(FieldDivergence {
                field: name.to_string(),
                cell: Some(cell),
                left: Some(x),
                right: Some(y),
            });
        }
    }
    None
}
