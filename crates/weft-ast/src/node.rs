//! AST node definitions.

use serde::{Deserialize, Serialize};

/// A parsed source file: the ordered sequence of top-level commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Command>,
}

/// One source line plus its optional indented body.
///
/// `body` is `Some` iff the source line was followed by deeper-indented
/// lines. Bodies produced by the parser are never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The first token of the line.
    pub name: String,
    /// The remaining tokens, classified.
    pub args: Vec<Argument>,
    /// Child commands, in source order.
    pub body: Option<Vec<Command>>,
}

impl Command {
    /// Create a leaf command with no body.
    pub fn leaf(name: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            args,
            body: None,
        }
    }
}

/// A classified argument token.
///
/// Classification is purely lexical; the language is untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    /// A bare word.
    Identifier(String),
    /// A double-quoted source lexeme, quotes stripped.
    StringLiteral(String),
    /// A `{$NAME}` lexeme; holds the interior name.
    VariableSubstitution(String),
    /// A word whose first character is `-`, dash retained.
    Option(String),
}

impl Argument {
    /// The source lexeme this argument was classified from.
    pub fn lexeme(&self) -> String {
        match self {
            Argument::Identifier(value) | Argument::Option(value) => value.clone(),
            Argument::StringLiteral(value) => format!("\"{value}\""),
            Argument::VariableSubstitution(name) => format!("{{${name}}}"),
        }
    }
}
