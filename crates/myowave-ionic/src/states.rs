//! Interleaved per-cell auxiliary state.

use myowave_core::{FieldError, FieldView, StateVarDef};

/// Auxiliary state of every cell, stored as one record per cell.
///
/// Record layout follows the model's declaration order, so a cell's
/// variables are adjacent in memory and the reaction kernel can hand
/// each cell a single mutable slice.
#[derive(Clone, Debug, PartialEq)]
pub struct CellStates {
    n_vars: usize,
    cells: usize,
    data: Vec<f64>,
}

impl CellStates {
    /// Allocate state for `cells` cells, each initialized from `defs`.
    pub fn new(cells: usize, defs: &[StateVarDef]) -> Self {
        let record: Vec<f64> = defs.iter().map(|d| d.initial).collect();
        let mut data = Vec::with_capacity(cells * record.len());
        for _ in 0..cells {
            data.extend_from_slice(&record);
        }
        Self {
            n_vars: defs.len(),
            cells,
            data,
        }
    }

    /// Variables per cell.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// State record of one cell.
    pub fn cell(&self, cell: usize) -> &[f64] {
        &self.data[cell * self.n_vars..(cell + 1) * self.n_vars]
    }

    /// Mutable state record of one cell.
    pub fn cell_mut(&mut self, cell: usize) -> &mut [f64] {
        &mut self.data[cell * self.n_vars..(cell + 1) * self.n_vars]
    }

    /// Strided view of one variable across all cells.
    pub fn view(&self, var: usize) -> FieldView<'_> {
        FieldView::Strided {
            data: &self.data,
            offset: var,
            stride: self.n_vars,
        }
    }

    /// Overwrite one variable of one cell.
    pub fn set(&mut self, var: usize, cell: usize, value: f64) -> Result<(), FieldError> {
        if cell >= self.cells {
            return Err(FieldError::CellOutOfRange {
                cell,
                cell_count: self.cells,
            });
        }
        self.data[cell * self.n_vars + var] = value;
        Ok(())
    }

    /// Overwrite one variable across all cells.
    pub fn write_var(&mut self, var: usize, name: &str, values: &[f64]) -> Result<(), FieldError> {
        if values.len() != self.cells {
            return Err(FieldError::LengthMismatch {
                name: name.to_string(),
                expected: self.cells,
                found: values.len(),
            });
        }
        for (record, &v) in self.data.chunks_exact_mut(self.n_vars).zip(values) {
            record[var] = v;
        }
        Ok(())
    }

    /// Flat interleaved storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat interleaved storage.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}
