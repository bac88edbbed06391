//! Hashing of full model state.
//!
//! FNV-1a over the raw bits of every value. Not cryptographic; used for
//! fast equality checks between runs.

use myowave_core::FieldAccess;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash every declared state variable of `fields`.
///
/// Field names are folded in at each boundary, so the same data under
/// different names or in a different order hashes differently. Values
/// are hashed by bit pattern: `0.0` and `-0.0` differ.
pub fn state_hash(fields: &dyn FieldAccess) -> u64 {
    let mut hash = FNV_OFFSET;
    for name in fields.state_vars() {
        for &b in name.as_bytes() {
            hash = fnv1a_byte(hash, b);
        }
        hash = fnv1a_byte(hash, 0);
        if let Some(view) = fields.field(name) {
            for v in view.iter() {
                hash = fnv1a_u64(hash, v.to_bits());
            }
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use myowave_core::GridShape;
    use myowave_test_utils::MockFields;

    fn fields(u: f64, v: f64) -> MockFields {
        let mut f = MockFields::new(GridShape::new_2d(3, 3).unwrap());
        f.add_field("u", u).add_field("v", v);
        f
    }

    #[test]
    fn same_data_same_hash() {
        assert_eq!(state_hash(&fields(1.0, 2.0)), state_hash(&fields(1.0, 2.0)));
    }

    #[test]
    fn one_cell_changes_hash() {
        use myowave_core::FieldAccessMut;
        let a = fields(1.0, 2.0);
        let mut b = fields(1.0, 2.0);
        b.set_value("v", 4, 2.0000000000000004).unwrap();
        assert_ne!(state_hash(&a), state_hash(&b));
    }

    #[test]
    fn field_order_matters() {
        assert_ne!(state_hash(&fields(1.0, 2.0)), state_hash(&fields(2.0, 1.0)));
    }

    #[test]
    fn signed_zero_differs() {
        assert_ne!(state_hash(&fields(0.0, 0.0)), state_hash(&fields(-0.0, 0.0)));
    }

    #[test]
    fn empty_state_hashes_to_offset() {
        let f = MockFields::new(GridShape::new_2d(3, 3).unwrap());
        assert_eq!(state_hash(&f), FNV_OFFSET);
    }
}
