//! Mesh cell classification codes.

/// Classification of a single mesh cell.
///
/// The discriminants are the raw mesh codes: `0` empty, `1` excitable
/// tissue, `2` fibrosis. Only [`CellKind::Tissue`] cells conduct and
/// carry ionic dynamics; the other two are skipped by every kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellKind {
    /// No tissue. Also used for the one-cell halo around the grid.
    #[default]
    Empty = 0,
    /// Excitable, conducting tissue.
    Tissue = 1,
    /// Present but non-excitable, non-conducting tissue.
    Fibrosis = 2,
}

impl CellKind {
    /// Raw mesh code of this cell kind.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the cell takes part in diffusion and reaction.
    #[inline]
    pub fn is_tissue(self) -> bool {
        self == Self::Tissue
    }
}

impl From<u8> for CellKind {
    /// Unknown codes are treated as empty space.
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Tissue,
            2 => Self::Fibrosis,
            _ => Self::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in [CellKind::Empty, CellKind::Tissue, CellKind::Fibrosis] {
            assert_eq!(CellKind::from(kind.code()), kind);
        }
    }

    #[test]
    fn unknown_code_is_empty() {
        assert_eq!(CellKind::from(7), CellKind::Empty);
    }

    #[test]
    fn only_tissue_is_tissue() {
        assert!(CellKind::Tissue.is_tissue());
        assert!(!CellKind::Fibrosis.is_tissue());
        assert!(!CellKind::Empty.is_tissue());
    }
}
