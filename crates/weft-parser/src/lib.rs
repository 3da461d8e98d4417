//! Line-oriented parser for the weft command language.
//!
//! Parsing runs in two phases:
//!
//! - `line`: line analysis — blank/comment filtering, indentation
//!   measurement, tokenization
//! - `tree`: indentation-driven tree construction over the analyzed lines
//!
//! The parser fails fast: the first offending line aborts the parse with a
//! [`ParseError`] carrying its 1-based line number. There is no error
//! recovery and no partial result.

mod line;
mod tree;

pub mod error;

pub use error::ParseError;

use weft_ast::Program;

/// Parse source text into a [`Program`].
///
/// Lines are separated by `\n` or `\r\n`. Blank lines and lines whose
/// first non-whitespace character is `#` are discarded before tree
/// construction.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let lines = line::analyze(source)?;
    tree::build(lines)
}
