//! condact_script: readers and writers for CondAct meta documents.
//!
//! Two grammars, one model. The canonical line protocol (`canonical`, with
//! the nav sub-codec in `nav`) is what the agent itself loads and saves; the
//! Metaf DSL (`metaf`) is what people write. Both decode into
//! [`condact_data::Meta`] and the canonical writer re-encodes it losslessly.

pub mod canonical;
pub mod error;
pub mod metaf;
pub mod nav;
pub mod scan;

pub use canonical::{META_HEADER, read_meta, read_meta_str, write_meta, write_meta_string};
pub use error::ParseError;
pub use metaf::{
    DirViewLoader, NoViews, ViewLoader, read_metaf_meta, read_metaf_str, write_metaf_meta, write_metaf_string,
};
pub use nav::{NAV_MAGIC, read_nav, read_nav_text, write_nav, write_nav_text};
