//! The fetch–decode–execute loop.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use weft_compiler::{Chunk, Constant, Op};

use crate::builtins;
use crate::error::{Result, RuntimeError};
use crate::host::Host;
use crate::value::Value;

/// Bindings visible through `PUSH_VAR` ahead of host state.
///
/// Procedure parameters shadow state entries for the duration of the
/// call; top-level runs, watchers, and handlers execute with no bindings.
type Bindings = IndexMap<String, Value>;

/// Run a chunk against a host.
///
/// Each invocation owns its operand stack; nested runs for watchers,
/// event handlers, procedure bodies, and fetch callbacks never observe
/// the caller's stack.
pub fn run(chunk: &Chunk, host: &mut dyn Host) -> Result<()> {
    run_inner(chunk, host, &Bindings::new()).map(drop)
}

/// Execute the instruction stream, returning the final operand stack.
///
/// A well-formed compiled chunk leaves the stack empty; the remnant is
/// returned rather than asserted so tests can observe it.
fn run_inner(chunk: &Chunk, host: &mut dyn Host, bindings: &Bindings) -> Result<Vec<Value>> {
    let mut stack: Vec<Value> = Vec::new();
    let mut ip = 0usize;
    while ip < chunk.ops.len() {
        let op = chunk.ops[ip];
        ip += 1;
        trace!(ip, ?op, depth = stack.len(), "dispatch");
        match op {
            Op::PushConst(idx) => {
                stack.push(Value::from_constant(constant(chunk, ip, idx)?));
            }

            Op::PushVar(idx) => {
                let name = constant_str(chunk, ip, idx)?;
                let value = bindings
                    .get(name)
                    .cloned()
                    .or_else(|| host.get_state(name))
                    .unwrap_or(Value::Null);
                stack.push(value);
            }

            Op::Pop => {
                pop(&mut stack, ip)?;
            }

            Op::SetState => {
                let name = pop_str(&mut stack, ip, "SET_STATE")?;
                let value = pop(&mut stack, ip)?;
                host.set_state(&name, value)?;
            }

            Op::BuildObj(n) => {
                let mut pairs = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    let key = pop_str(&mut stack, ip, "BUILD_OBJ")?;
                    let value = pop(&mut stack, ip)?;
                    pairs.push((key, value));
                }
                // Pairs pop in reverse source order; the object preserves
                // source order.
                let mut obj = IndexMap::with_capacity(n as usize);
                for (key, value) in pairs.into_iter().rev() {
                    obj.insert(key, value);
                }
                stack.push(Value::Obj(obj));
            }

            Op::CreateWidget => {
                let name = pop_str(&mut stack, ip, "CREATE_WIDGET")?;
                let kind = pop_str(&mut stack, ip, "CREATE_WIDGET")?;
                let options = pop_obj(&mut stack, ip, "CREATE_WIDGET")?;
                host.create_widget(&name, &kind, options)?;
            }

            Op::UpdateWidget => {
                let name = pop_str(&mut stack, ip, "UPDATE_WIDGET")?;
                let options = pop_obj(&mut stack, ip, "UPDATE_WIDGET")?;
                host.update_widget(&name, options)?;
            }

            Op::PackWidget => {
                let name = pop_str(&mut stack, ip, "PACK_WIDGET")?;
                let options = pop_obj(&mut stack, ip, "PACK_WIDGET")?;
                host.pack_widget(&name, options)?;
            }

            Op::DefBlock(idx) => match constant(chunk, ip, idx)? {
                Constant::Chunk(block) => stack.push(Value::Chunk(Rc::new(block.clone()))),
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        op: "DEF_BLOCK",
                        expected: "chunk",
                        found: constant_kind(other),
                    });
                }
            },

            Op::BindWidget(n) => {
                let name = pop_str(&mut stack, ip, "BIND_WIDGET")?;
                let mut pairs = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    let event = pop_str(&mut stack, ip, "BIND_WIDGET")?;
                    let handler = pop_chunk(&mut stack, ip, "BIND_WIDGET")?;
                    pairs.push((event, handler));
                }
                let mut handlers = IndexMap::with_capacity(n as usize);
                for (event, handler) in pairs.into_iter().rev() {
                    let event = event.strip_prefix('.').map(str::to_string).unwrap_or(event);
                    handlers.insert(event, handler);
                }
                host.bind_widget(&name, handlers)?;
            }

            Op::WatchState => {
                let name = pop_str(&mut stack, ip, "WATCH_STATE")?;
                let watcher = pop_chunk(&mut stack, ip, "WATCH_STATE")?;
                host.watch_state(&name, watcher);
            }

            Op::DefProc(n) => {
                let name = pop_str(&mut stack, ip, "DEF_PROC")?;
                let mut params = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    params.push(pop_str(&mut stack, ip, "DEF_PROC")?);
                }
                params.reverse();
                let chunk_value = pop_chunk(&mut stack, ip, "DEF_PROC")?;
                host.define_proc(
                    &name,
                    crate::host::ProcDef {
                        params,
                        chunk: chunk_value,
                    },
                );
            }

            Op::CallProc(n) => {
                let name = pop_str(&mut stack, ip, "CALL_PROC")?;
                let mut args = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    args.push(pop(&mut stack, ip)?);
                }
                args.reverse();
                if let Some(def) = host.proc(&name) {
                    let scope: Bindings = def
                        .params
                        .iter()
                        .cloned()
                        .zip(args)
                        .collect();
                    run_inner(&def.chunk, host, &scope)?;
                } else {
                    match builtins::call(&name, &args, host) {
                        Some(result) => result?,
                        None => return Err(RuntimeError::UndefinedProc(name)),
                    }
                }
            }

            Op::HttpGet(n) => {
                let url = pop_str(&mut stack, ip, "HTTP_GET")?;
                let mut pairs = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    let callback = pop_str(&mut stack, ip, "HTTP_GET")?;
                    let handler = pop_chunk(&mut stack, ip, "HTTP_GET")?;
                    pairs.push((callback, handler));
                }
                let mut callbacks = IndexMap::with_capacity(n as usize);
                for (callback, handler) in pairs.into_iter().rev() {
                    callbacks.insert(callback, handler);
                }
                host.http_get(&url, callbacks);
            }
        }
    }
    Ok(stack)
}

fn constant(chunk: &Chunk, ip: usize, idx: u16) -> Result<&Constant> {
    chunk
        .constants
        .get(idx as usize)
        .ok_or(RuntimeError::BadConstant {
            ip: ip - 1,
            index: idx as usize,
        })
}

fn constant_str(chunk: &Chunk, ip: usize, idx: u16) -> Result<&str> {
    match constant(chunk, ip, idx)? {
        Constant::Str(s) => Ok(s),
        other => Err(RuntimeError::TypeMismatch {
            op: "PUSH_VAR",
            expected: "string",
            found: constant_kind(other),
        }),
    }
}

fn constant_kind(constant: &Constant) -> &'static str {
    match constant {
        Constant::Str(_) => "string",
        Constant::Num(_) => "number",
        Constant::Obj(_) => "object",
        Constant::List(_) => "list",
        Constant::Chunk(_) => "chunk",
    }
}

fn pop(stack: &mut Vec<Value>, ip: usize) -> Result<Value> {
    stack.pop().ok_or(RuntimeError::StackUnderflow { ip: ip - 1 })
}

fn pop_str(stack: &mut Vec<Value>, ip: usize, op: &'static str) -> Result<String> {
    match pop(stack, ip)? {
        Value::Str(s) => Ok(s),
        other => Err(RuntimeError::TypeMismatch {
            op,
            expected: "string",
            found: other.kind(),
        }),
    }
}

fn pop_obj(stack: &mut Vec<Value>, ip: usize, op: &'static str) -> Result<IndexMap<String, Value>> {
    match pop(stack, ip)? {
        Value::Obj(map) => Ok(map),
        other => Err(RuntimeError::TypeMismatch {
            op,
            expected: "object",
            found: other.kind(),
        }),
    }
}

fn pop_chunk(stack: &mut Vec<Value>, ip: usize, op: &'static str) -> Result<Rc<Chunk>> {
    match pop(stack, ip)? {
        Value::Chunk(chunk) => Ok(chunk),
        other => Err(RuntimeError::TypeMismatch {
            op,
            expected: "chunk",
            found: other.kind(),
        }),
    }
}
