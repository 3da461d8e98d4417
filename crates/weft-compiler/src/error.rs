//! Compile error types.

use thiserror::Error;

/// Compiler result type.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Fatal compilation failure, naming the offending command.
///
/// The compiler fails fast; there is no diagnostic accumulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A command form is missing required arguments.
    #[error("`{command}` expects {expected}, found {found} argument(s)")]
    MissingArguments {
        command: String,
        expected: &'static str,
        found: usize,
    },

    /// A block-taking command has no indented body.
    #[error("`{command}` expects an indented block")]
    MissingBlock { command: String },

    /// A command that takes no block was given one.
    #[error("`{command}` does not take an indented block")]
    UnexpectedBlock { command: String },

    /// A static options position requires a literal value.
    #[error("`{command}` does not accept a variable substitution in `{lexeme}`")]
    NonLiteralArgument { command: String, lexeme: String },

    /// A numeric position holds a non-numeric token.
    #[error("`{command}` expects a numeric argument, found `{found}`")]
    NonNumericArgument { command: String, found: String },

    /// A `bind` or `http.get` child whose name lacks the leading `.`.
    #[error("`{command}` expects children named `.event`, found `{found}`")]
    InvalidEventChild { command: String, found: String },
}
