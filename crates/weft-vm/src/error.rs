//! VM runtime errors.

use thiserror::Error;

use crate::host::HostError;

/// VM result type.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Fatal execution failure.
///
/// The VM fails fast on the current instruction and unwinds its current
/// `run` invocation; the embedder observes the failure at the top-level
/// `run` boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("stack underflow at instruction {ip}")]
    StackUnderflow { ip: usize },

    #[error("constant index {index} out of range at instruction {ip}")]
    BadConstant { ip: usize, index: usize },

    #[error("call to undefined procedure `{0}`")]
    UndefinedProc(String),

    #[error("{op} expects a {expected} operand, found {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{name}` expects {expected}")]
    BuiltinUsage {
        name: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}
