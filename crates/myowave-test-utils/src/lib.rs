//! Test utilities and mock types for myowave development.
//!
//! Provides a HashMap-backed [`MockFields`] implementing the named field
//! access traits, tissue fixtures in [`fixtures`] and a scratch
//! directory helper for persistence tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;
use std::path::PathBuf;

use myowave_core::{FieldAccess, FieldAccessMut, FieldError, FieldView, GridShape};

pub use fixtures::{patchy_tissue, slab_2d, slab_3d};

/// Fresh, empty scratch directory under the system temp dir.
///
/// The name combines `tag` with the process id so concurrent test
/// binaries do not collide. Any previous contents are removed.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("myowave-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Mock implementation of [`FieldAccess`] and [`FieldAccessMut`].
///
/// Fields are stored contiguously in declaration order. Pre-populate
/// with [`add_field`](MockFields::add_field) before passing to code
/// under test.
pub struct MockFields {
    shape: GridShape,
    order: Vec<&'static str>,
    fields: HashMap<&'static str, Vec<f64>>,
}

impl MockFields {
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            order: Vec::new(),
            fields: HashMap::new(),
        }
    }

    /// Declare a field filled with `value`.
    pub fn add_field(&mut self, name: &'static str, value: f64) -> &mut Self {
        if !self.fields.contains_key(name) {
            self.order.push(name);
        }
        self.fields
            .insert(name, vec![value; self.shape.cell_count()]);
        self
    }

    /// Read back a field for assertions.
    pub fn get_field(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(|v| v.as_slice())
    }
}

impl FieldAccess for MockFields {
    fn shape(&self) -> &GridShape {
        &self.shape
    }

    fn state_vars(&self) -> Vec<&'static str> {
        self.order.clone()
    }

    fn field(&self, name: &str) -> Option<FieldView<'_>> {
        self.fields
            .get(name)
            .map(|v| FieldView::Contiguous(v.as_slice()))
    }
}

impl FieldAccessMut for MockFields {
    fn set_value(&mut self, name: &str, cell: usize, value: f64) -> Result<(), FieldError> {
        let data = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FieldError::UnknownField {
                name: name.to_string(),
            })?;
        let cell_count = data.len();
        let slot = data
            .get_mut(cell)
            .ok_or(FieldError::CellOutOfRange { cell, cell_count })?;
        *slot = value;
        Ok(())
    }

    fn write_field(&mut self, name: &str, values: &[f64]) -> Result<(), FieldError> {
        let data = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FieldError::UnknownField {
                name: name.to_string(),
            })?;
        if data.len() != values.len() {
            return Err(FieldError::LengthMismatch {
                name: name.to_string(),
                expected: data.len(),
                found: values.len(),
            });
        }
        data.copy_from_slice(values);
        Ok(())
    }
}

/// Assert two buffers are equal bit for bit, reporting the first difference.
pub fn assert_bit_identical(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len(), "length differs");
    if let Some((i, (x, y))) = a
        .iter()
        .zip(b)
        .enumerate()
        .find(|(_, (x, y))| x.to_bits() != y.to_bits())
    {
        panic!("buffers differ at {i}: {x} vs {y}");
    }
}
