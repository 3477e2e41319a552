//! Properties-file parsing and the merged property table.

pub mod parser;
pub mod table;

use thiserror::Error;

pub use parser::{decode, parse};
pub use table::{PropertyTable, TableBuilder};

/// Errors from the properties parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed \\uxxxx escape on line {line}")]
    MalformedUnicodeEscape { line: usize },
}
