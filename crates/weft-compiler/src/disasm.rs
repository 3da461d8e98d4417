//! Chunk disassembler.
//!
//! Renders a chunk as a human-readable listing: one line per instruction
//! with its resolved constant, followed by each nested block chunk.

use std::fmt::Write;

use crate::bytecode::{Chunk, Constant, Op};

/// Disassemble a chunk and every nested block it pools.
pub fn disassemble(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    write_chunk(&mut out, chunk, name, 0);
    out
}

fn write_chunk(out: &mut String, chunk: &Chunk, name: &str, depth: usize) {
    let prefix = "  ".repeat(depth);
    let _ = writeln!(out, "{prefix}== {name} ({} instructions) ==", chunk.ops.len());
    for (ip, op) in chunk.ops.iter().enumerate() {
        let _ = write!(out, "{prefix}{ip:04} {}", mnemonic(op));
        if let Some(idx) = const_operand(op) {
            match chunk.constants.get(idx as usize) {
                Some(constant) => {
                    let _ = write!(out, " {idx} ; {}", render_constant(constant));
                }
                None => {
                    let _ = write!(out, " {idx} ; <out of range>");
                }
            }
        } else if let Some(n) = arity_operand(op) {
            let _ = write!(out, " {n}");
        }
        out.push('\n');
    }
    for (idx, constant) in chunk.constants.iter().enumerate() {
        if let Constant::Chunk(block) = constant {
            out.push('\n');
            write_chunk(out, block, &format!("{name}.block[{idx}]"), depth + 1);
        }
    }
}

fn mnemonic(op: &Op) -> &'static str {
    match op {
        Op::PushConst(_) => "PUSH_CONST",
        Op::PushVar(_) => "PUSH_VAR",
        Op::Pop => "POP",
        Op::SetState => "SET_STATE",
        Op::BuildObj(_) => "BUILD_OBJ",
        Op::CreateWidget => "CREATE_WIDGET",
        Op::UpdateWidget => "UPDATE_WIDGET",
        Op::PackWidget => "PACK_WIDGET",
        Op::DefBlock(_) => "DEF_BLOCK",
        Op::BindWidget(_) => "BIND_WIDGET",
        Op::WatchState => "WATCH_STATE",
        Op::DefProc(_) => "DEF_PROC",
        Op::CallProc(_) => "CALL_PROC",
        Op::HttpGet(_) => "HTTP_GET",
    }
}

fn const_operand(op: &Op) -> Option<u16> {
    match op {
        Op::PushConst(idx) | Op::PushVar(idx) | Op::DefBlock(idx) => Some(*idx),
        _ => None,
    }
}

fn arity_operand(op: &Op) -> Option<u16> {
    match op {
        Op::BuildObj(n) | Op::BindWidget(n) | Op::DefProc(n) | Op::CallProc(n) | Op::HttpGet(n) => {
            Some(*n)
        }
        _ => None,
    }
}

fn render_constant(constant: &Constant) -> String {
    match constant {
        Constant::Str(s) => format!("{s:?}"),
        Constant::Num(n) => n.to_string(),
        Constant::Obj(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}: {}", render_constant(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Constant::List(items) => {
            let entries: Vec<String> = items.iter().map(render_constant).collect();
            format!("[{}]", entries.join(", "))
        }
        Constant::Chunk(block) => format!("<chunk: {} instructions>", block.ops.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;

    #[test]
    fn test_disassembles_set() {
        let program = weft_parser::parse("set my_var \"hello\"\n").unwrap();
        let chunk = compile(&program).unwrap();
        let listing = disassemble(&chunk, "main");
        assert!(listing.contains("== main (3 instructions) =="));
        assert!(listing.contains("PUSH_CONST 0 ; \"hello\""));
        assert!(listing.contains("SET_STATE"));
    }

    #[test]
    fn test_nested_blocks_listed_indented() {
        let program = weft_parser::parse("watch v\n  set x 1\n").unwrap();
        let chunk = compile(&program).unwrap();
        let listing = disassemble(&chunk, "main");
        assert!(listing.contains("DEF_BLOCK"));
        assert!(listing.contains("main.block[0]"));
        assert!(listing.contains("  0000 PUSH_CONST"));
    }
}
