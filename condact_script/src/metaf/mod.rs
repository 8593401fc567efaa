//! Metaf: the human-authored DSL for meta documents.
//!
//! `STATE:` blocks hold `IF:`/`DO:` rule pairs with tab-indented nesting;
//! `NAV:` blocks declare named nav routes that rules reference by name,
//! before or after the declaration. The reader produces the same `Meta`
//! model as the canonical codec; the writer emits Metaf the reader accepts.

mod lines;
mod nav;
mod rules;
mod tables;
mod transform;
mod writer;

use std::io::{self, Read};
use std::path::PathBuf;

use condact_data::Meta;

use crate::error::ParseError;
use crate::metaf::lines::scan_lines;
use crate::metaf::rules::MetafParser;

pub use writer::{write_metaf_meta, write_metaf_string};

/// File access for `CreateView {name} {:file}` indirection.
///
/// The grammar itself never touches the file system; whoever drives the
/// parser decides where (and whether) view definition files exist.
pub trait ViewLoader {
    fn load_view(&self, name: &str) -> io::Result<String>;
}

/// Loads view definition files relative to a base directory. The CLI roots
/// this at the Metaf source file's own directory.
pub struct DirViewLoader {
    base: PathBuf,
}

impl DirViewLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ViewLoader for DirViewLoader {
    fn load_view(&self, name: &str) -> io::Result<String> {
        std::fs::read_to_string(self.base.join(name))
    }
}

/// Refuses every lookup; for sources that must be self-contained.
pub struct NoViews;

impl ViewLoader for NoViews {
    fn load_view(&self, name: &str) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("view file `{name}` is not available here"),
        ))
    }
}

/// Decode a Metaf document from a stream.
pub fn read_metaf_meta(mut input: impl Read, views: &dyn ViewLoader) -> Result<Meta, ParseError> {
    let mut src = String::new();
    input.read_to_string(&mut src)?;
    read_metaf_str(&src, views)
}

/// Decode a Metaf document already in memory.
pub fn read_metaf_str(src: &str, views: &dyn ViewLoader) -> Result<Meta, ParseError> {
    MetafParser::new(scan_lines(src), views).parse()
}
