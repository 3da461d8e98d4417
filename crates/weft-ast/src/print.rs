//! Canonical source renderer.
//!
//! Regenerates source text from a `Program`. Re-parsing the output yields
//! a structurally equal tree; comment lines and blank lines are not
//! preserved (the parser discards them).

use crate::node::{Command, Program};

/// Render a program as canonical source text, two spaces per indent level.
pub fn to_source(program: &Program) -> String {
    let mut out = String::new();
    for command in &program.body {
        write_command(&mut out, command, 0);
    }
    out
}

fn write_command(out: &mut String, command: &Command, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&command.name);
    for arg in &command.args {
        out.push(' ');
        out.push_str(&arg.lexeme());
    }
    out.push('\n');
    if let Some(body) = &command.body {
        for child in body {
            write_command(out, child, depth + 1);
        }
    }
}
