//! Binary encode/decode of a single field file.

use std::io::{Read, Write};

use myowave_core::FieldView;

use crate::error::StateError;
use crate::{FORMAT_VERSION, MAGIC};

/// Largest rank a field file may declare.
const MAX_RANK: u8 = 3;

/// Values preallocated before any data is read.
const PREALLOC_LIMIT: usize = 1 << 20;

/// A decoded field file.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRecord {
    /// Field name stored in the file.
    pub name: String,
    /// Grid dimensions, halo included.
    pub dims: Vec<usize>,
    /// One value per cell in flat row-major order.
    pub values: Vec<f64>,
}

// ── Primitive writers ───────────────────────────────────────────

fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), StateError> {
    w.write_all(&[v])?;
    Ok(())
}

fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), StateError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), StateError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

fn read_u8(r: &mut dyn Read) -> Result<u8, StateError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32_le(r: &mut dyn Read) -> Result<u32, StateError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64_le(r: &mut dyn Read) -> Result<u64, StateError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_f64_le(r: &mut dyn Read) -> Result<f64, StateError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn to_usize(v: u64, what: &str) -> Result<usize, StateError> {
    usize::try_from(v).map_err(|_| StateError::Malformed {
        detail: format!("{what} {v} does not fit in usize"),
    })
}

// ── Field encode/decode ─────────────────────────────────────────

/// Encode one field.
///
/// `values` must hold exactly one value per cell of `dims`.
pub fn encode_field(
    w: &mut dyn Write,
    name: &str,
    dims: &[usize],
    values: FieldView<'_>,
) -> Result<(), StateError> {
    let rank = u8::try_from(dims.len())
        .ok()
        .filter(|&r| r <= MAX_RANK)
        .ok_or_else(|| StateError::Malformed {
            detail: format!("rank {} exceeds {MAX_RANK}", dims.len()),
        })?;
    let cells: usize = dims.iter().product();
    if values.len() != cells {
        return Err(StateError::Malformed {
            detail: format!("{} values for {cells} cells", values.len()),
        });
    }
    let name_len = u32::try_from(name.len()).map_err(|_| StateError::Malformed {
        detail: "field name too long".to_string(),
    })?;

    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u32_le(w, name_len)?;
    w.write_all(name.as_bytes())?;
    write_u8(w, rank)?;
    for &d in dims {
        write_u64_le(w, d as u64)?;
    }
    write_u64_le(w, cells as u64)?;
    for v in values.iter() {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Decode and validate one field.
pub fn decode_field(r: &mut dyn Read) -> Result<FieldRecord, StateError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(StateError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(StateError::UnsupportedVersion { found: version });
    }

    let name_len = read_u32_le(r)? as usize;
    let mut name = vec![0u8; name_len.min(PREALLOC_LIMIT)];
    r.read_exact(&mut name)?;
    if name.len() != name_len {
        return Err(StateError::Malformed {
            detail: format!("field name of {name_len} bytes"),
        });
    }
    let name = String::from_utf8(name).map_err(|e| StateError::Malformed {
        detail: format!("invalid UTF-8 field name: {e}"),
    })?;

    let rank = read_u8(r)?;
    if rank > MAX_RANK {
        return Err(StateError::Malformed {
            detail: format!("rank {rank} exceeds {MAX_RANK}"),
        });
    }
    let mut dims = Vec::with_capacity(rank as usize);
    for _ in 0..rank {
        dims.push(to_usize(read_u64_le(r)?, "dimension")?);
    }
    let count = to_usize(read_u64_le(r)?, "value count")?;
    let cells = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| StateError::Malformed {
            detail: format!("dimensions {dims:?} overflow"),
        })?;
    if count != cells {
        return Err(StateError::Malformed {
            detail: format!("{count} values for dimensions {dims:?}"),
        });
    }

    let mut values = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for _ in 0..count {
        values.push(read_f64_le(r)?);
    }
    Ok(FieldRecord { name, dims, values })
}
