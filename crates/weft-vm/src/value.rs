//! Runtime values.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use weft_compiler::{Chunk, Constant};

/// A value on the operand stack or in reactive state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<Value>),
    /// Insertion-ordered key to value mapping.
    Obj(IndexMap<String, Value>),
    /// A reference to an executable chunk.
    Chunk(Rc<Chunk>),
}

impl Value {
    /// Materialize a pooled constant as a stack value.
    pub fn from_constant(constant: &Constant) -> Value {
        match constant {
            Constant::Str(s) => Value::Str(s.clone()),
            Constant::Num(n) => Value::Num(*n),
            Constant::Obj(map) => Value::Obj(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_constant(v)))
                    .collect(),
            ),
            Constant::List(items) => {
                Value::List(items.iter().map(Value::from_constant).collect())
            }
            Constant::Chunk(chunk) => Value::Chunk(Rc::new(chunk.clone())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_chunk(&self) -> Option<&Rc<Chunk>> {
        match self {
            Value::Chunk(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Obj(map) => Some(map),
            _ => None,
        }
    }

    /// The value's kind tag, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::List(_) => "list",
            Value::Obj(_) => "object",
            Value::Chunk(_) => "chunk",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Obj(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Chunk(chunk) => write!(f, "<chunk: {} instructions>", chunk.ops.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_constant_preserves_object_order() {
        let mut map = IndexMap::new();
        map.insert("width".to_string(), Constant::Num(300.0));
        map.insert("height".to_string(), Constant::Num(200.0));
        let value = Value::from_constant(&Constant::Obj(map));
        let keys: Vec<&str> = value.as_obj().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["width", "height"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Str("hi".to_string()).to_string(), "hi");
        assert_eq!(
            Value::List(vec![Value::Num(1.0), Value::Num(2.0)]).to_string(),
            "[1, 2]"
        );
    }
}
