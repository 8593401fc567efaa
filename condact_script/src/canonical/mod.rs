//! Canonical codec for whole meta documents: the strict line protocol.
//!
//! The format is machine-generated and machine-read; every literal matters.
//! The reader checks the fixed preamble line by line and the writer emits
//! byte-for-byte what the reader accepts.

mod reader;
mod writer;

pub use reader::{read_meta, read_meta_str};
pub use writer::{write_meta, write_meta_string};

/// The fixed 13-line preamble of a canonical meta document.
pub const META_HEADER: [&str; 13] = [
    "1", "CondAct", "5", "CType", "AType", "CData", "AData", "State", "n", "n", "n", "n", "n",
];

/// Sub-header introducing a key → typed-value map payload.
pub(crate) const TABLE_MAP_HEADER: [&str; 6] = ["TABLE", "2", "k", "v", "n", "n"];

/// Sub-header introducing a homogeneous list payload. Identical to the map
/// header but for the two column labels.
pub(crate) const TABLE_LIST_HEADER: [&str; 6] = ["TABLE", "2", "K", "V", "n", "n"];

/// Display name written for an `EmbedNav` action with no name.
pub(crate) const NAV_NAME_NONE: &str = "[None]";
