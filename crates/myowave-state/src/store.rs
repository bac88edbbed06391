//! Directory-backed store of model state.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use myowave_core::{FieldAccess, FieldAccessMut, FieldError};
use tracing::{debug, info};

use crate::codec::{decode_field, encode_field, FieldRecord};
use crate::error::StateError;
use crate::FIELD_EXTENSION;

/// Saves and loads every declared state variable of a model, one file
/// per field, in a single directory.
///
/// # Examples
///
/// ```
/// use myowave_core::{FieldAccess, GridShape};
/// use myowave_state::StateStore;
/// # use myowave_core::{FieldAccessMut, FieldError, FieldView};
/// # struct One(GridShape, Vec<f64>);
/// # impl FieldAccess for One {
/// #     fn shape(&self) -> &GridShape { &self.0 }
/// #     fn state_vars(&self) -> Vec<&'static str> { vec!["u"] }
/// #     fn field(&self, name: &str) -> Option<FieldView<'_>> {
/// #         (name == "u").then(|| FieldView::Contiguous(&self.1))
/// #     }
/// # }
/// # impl FieldAccessMut for One {
/// #     fn set_value(&mut self, _: &str, c: usize, v: f64) -> Result<(), FieldError> {
/// #         self.1[c] = v; Ok(())
/// #     }
/// #     fn write_field(&mut self, _: &str, v: &[f64]) -> Result<(), FieldError> {
/// #         self.1.copy_from_slice(v); Ok(())
/// #     }
/// # }
///
/// let shape = GridShape::new_2d(3, 3).unwrap();
/// let dir = std::env::temp_dir().join(format!("myowave-doc-{}", std::process::id()));
/// let store = StateStore::new(&dir);
///
/// let saved = One(shape.clone(), (0..9).map(f64::from).collect());
/// store.save(&saved).unwrap();
///
/// let mut restored = One(shape, vec![0.0; 9]);
/// store.load(&mut restored).unwrap();
/// assert_eq!(restored.1, saved.1);
/// # std::fs::remove_dir_all(&dir).unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Store rooted at `dir`. Nothing is touched until a save or load.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding one field.
    pub fn path_for(&self, field: &str) -> PathBuf {
        self.dir.join(format!("{field}.{FIELD_EXTENSION}"))
    }

    /// Write every declared state variable. Creates the directory if
    /// needed and overwrites existing files. Returns the number of
    /// fields written.
    pub fn save(&self, fields: &dyn FieldAccess) -> Result<usize, StateError> {
        fs::create_dir_all(&self.dir)?;
        let dims = fields.shape().dims();
        let names = fields.state_vars();
        for &name in &names {
            let view = fields.field(name).ok_or_else(|| FieldError::UnknownField {
                name: name.to_string(),
            })?;
            let path = self.path_for(name);
            let mut w = BufWriter::new(File::create(&path)?);
            encode_field(&mut w, name, dims, view)?;
            w.flush()?;
            debug!(field = name, path = %path.display(), "saved field");
        }
        info!(dir = %self.dir.display(), fields = names.len(), "state saved");
        Ok(names.len())
    }

    /// Restore every declared state variable.
    ///
    /// All files are decoded and checked against the target's grid
    /// before anything is written, so a failed load leaves the target
    /// unchanged. Returns the number of fields restored.
    pub fn load(&self, fields: &mut dyn FieldAccessMut) -> Result<usize, StateError> {
        let expected = fields.shape().dims().to_vec();
        let names = fields.state_vars();
        let mut records = Vec::with_capacity(names.len());
        for &name in &names {
            let record = self.read(name)?;
            if record.name != name {
                return Err(StateError::Malformed {
                    detail: format!(
                        "file for '{name}' holds field '{}'",
                        record.name
                    ),
                });
            }
            if record.dims != expected {
                return Err(StateError::ShapeMismatch {
                    field: name.to_string(),
                    expected,
                    found: record.dims,
                });
            }
            records.push(record);
        }
        for record in &records {
            fields.write_field(&record.name, &record.values)?;
        }
        info!(dir = %self.dir.display(), fields = records.len(), "state loaded");
        Ok(records.len())
    }

    /// Decode one field file.
    pub fn read(&self, field: &str) -> Result<FieldRecord, StateError> {
        let path = self.path_for(field);
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StateError::MissingField {
                field: field.to_string(),
            },
            _ => StateError::Io(e),
        })?;
        decode_field(&mut BufReader::new(file))
    }
}
