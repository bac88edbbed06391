//! Reusable tissue fixtures.
//!
//! - [`slab_2d`] / [`slab_3d`]: all-tissue box with an empty halo.
//! - [`patchy_tissue`]: slab with seeded fibrosis and empty holes,
//!   for exercising irregular boundaries.

use myowave_core::{CellKind, GridShape};
use myowave_tissue::{CardiacTissue, FibrosisPattern};

/// All-tissue 2D slab.
pub fn slab_2d(rows: usize, cols: usize) -> CardiacTissue {
    CardiacTissue::new(GridShape::new_2d(rows, cols).expect("fixture shape"))
}

/// All-tissue 3D slab.
pub fn slab_3d(nx: usize, ny: usize, nz: usize) -> CardiacTissue {
    CardiacTissue::new(GridShape::new_3d(nx, ny, nz).expect("fixture shape"))
}

/// Slab with diffuse fibrosis at `density` and every seventh interior
/// cell punched out as empty space.
pub fn patchy_tissue(shape: GridShape, density: f64, seed: u64) -> CardiacTissue {
    let mut tissue = CardiacTissue::new(shape);
    FibrosisPattern::Diffuse { density, seed }
        .apply(&mut tissue)
        .expect("fixture fibrosis");
    tissue.map_interior(|cell, kind| {
        if (cell as u64 ^ seed) % 7 == 0 {
            CellKind::Empty
        } else {
            kind
        }
    });
    tissue
}
