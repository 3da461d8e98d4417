//! Parse error types.

use thiserror::Error;

/// Parser result type.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Fatal parse failure.
///
/// The parser stops at the first offense; every variant carries the
/// 1-based source line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Leading space count is not a multiple of two.
    #[error("Invalid indentation: {count} space(s) on line {line}: {text:?}")]
    InvalidIndentation {
        line: u32,
        count: usize,
        text: String,
    },

    /// A quoted span with no closing quote.
    #[error("Unterminated string on line {line}: {text:?}")]
    UnterminatedString { line: u32, text: String },

    /// Indentation grew by more than one level.
    #[error("Invalid indentation increase: level {from} to {to} on line {line}")]
    InvalidIndentationIncrease { line: u32, from: usize, to: usize },

    /// Indented under a block that holds no command yet.
    #[error("Indentation error: cannot indent on an empty block (line {line})")]
    EmptyBlockIndent { line: u32 },
}
