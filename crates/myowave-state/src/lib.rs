//! State persistence for myowave models.
//!
//! Saves and restores the declared state variables of a model, one file
//! per field, and hashes full state for determinism checks. Everything
//! works through the named field traits of `myowave-core`, so this crate
//! never depends on a concrete model.
//!
//! # Format
//!
//! ```text
//! [MAGIC "MYOW"] [VERSION u8] [name: u32 len + UTF-8]
//! [rank u8] [dim u64]*rank [count u64] [value f64]*count
//! ```
//!
//! All integers and floats are little-endian. Values are stored in flat
//! row-major cell order, halo included.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod compare;
pub mod error;
pub mod hash;
pub mod store;

pub use codec::FieldRecord;
pub use compare::{first_divergence, FieldDivergence};
pub use error::StateError;
pub use hash::state_hash;
pub use store::StateStore;

/// Magic bytes at the start of every field file.
pub const MAGIC: [u8; 4] = *b"MYOW";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// File extension of field files.
pub const FIELD_EXTENSION: &str = "mwf";
