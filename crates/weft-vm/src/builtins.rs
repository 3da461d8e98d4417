//! Builtin commands reachable through `CALL_PROC`.
//!
//! Consulted after the user procedure table; a user `proc` of the same
//! name shadows the builtin.

use crate::error::{Result, RuntimeError};
use crate::host::Host;
use crate::value::Value;

/// Dispatch a builtin by name. Returns `None` when the name is unknown.
pub(crate) fn call(name: &str, args: &[Value], host: &mut dyn Host) -> Option<Result<()>> {
    match name {
        "lappend" => Some(lappend(args, host)),
        _ => None,
    }
}

/// `lappend name value…` — append values to the list state entry `name`,
/// creating it when absent. Writes back through `set_state`, so watchers
/// on the entry fire.
fn lappend(args: &[Value], host: &mut dyn Host) -> Result<()> {
    let (target, values) = match args {
        [target, values @ ..] if !values.is_empty() => (target, values),
        _ => {
            return Err(RuntimeError::BuiltinUsage {
                name: "lappend",
                expected: "a state name and at least one value",
            });
        }
    };
    let name = target.as_str().ok_or(RuntimeError::TypeMismatch {
        op: "lappend",
        expected: "string",
        found: target.kind(),
    })?;
    let mut items = match host.get_state(name) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::List(items)) => items,
        Some(other) => {
            return Err(RuntimeError::TypeMismatch {
                op: "lappend",
                expected: "list",
                found: other.kind(),
            });
        }
    };
    items.extend(values.iter().cloned());
    host.set_state(name, Value::List(items))?;
    Ok(())
}
