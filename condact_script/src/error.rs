//! The structured diagnostic shared by every codec.
//!
//! Each grammar violation maps to one variant; nothing in the crate raises a
//! bare string error. Parsing is fail-fast: the first diagnostic aborts the
//! whole decode and no partial `Meta` is returned.

use thiserror::Error;

/// Parse failure with enough context to point at the offending line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A fixed header, magic, or tag line did not match.
    #[error("line {line}: expected `{expected}`, found `{actual}`")]
    Literal {
        line: usize,
        expected: String,
        actual: String,
    },

    /// A value line could not be parsed as the expected type.
    #[error("line {line}: expected {expected}, found `{actual}`")]
    Value {
        line: usize,
        expected: &'static str,
        actual: String,
    },

    /// A symbolic name (keyword, spell, nav reference, table key) is not in
    /// its table.
    #[error("line {line}: unknown {what} `{token}`")]
    UnknownName {
        line: usize,
        what: &'static str,
        token: String,
    },

    /// A wire ordinal is outside its enum table.
    #[error("line {line}: {what} {id} is not a known ordinal")]
    UnknownOrdinal { line: usize, what: &'static str, id: i32 },

    /// A composite held more children than its shape allows.
    #[error("line {line}: {detail}")]
    Cardinality { line: usize, detail: String },

    /// Grammar shape violation that is none of the above.
    #[error("line {line}: {detail}")]
    Syntax { line: usize, detail: String },

    #[error("unexpected end of input after line {line}")]
    Eof { line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
