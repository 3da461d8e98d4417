//! AST to bytecode compiler.
//!
//! Dispatch is by the first identifier of each command. Block bodies
//! compile in a fresh compiler state with an isolated constant pool; the
//! finished chunk lands in the enclosing pool and is referenced through
//! `DEF_BLOCK`.

use indexmap::IndexMap;

use weft_ast::{Argument, Command, Program};

use crate::bytecode::{Chunk, Constant, Op};
use crate::error::{CompileError, Result};

/// Compile a program to a top-level chunk.
pub fn compile(program: &Program) -> Result<Chunk> {
    compile_body(&program.body)
}

/// Compile a command sequence as its own chunk.
fn compile_body(body: &[Command]) -> Result<Chunk> {
    let mut compiler = Compiler::new();
    for command in body {
        compiler.compile_command(command)?;
    }
    Ok(compiler.finish())
}

/// Compiler state for one chunk.
struct Compiler {
    chunk: Chunk,
}

impl Compiler {
    fn new() -> Self {
        Self {
            chunk: Chunk::new(),
        }
    }

    fn finish(self) -> Chunk {
        self.chunk
    }

    fn compile_command(&mut self, command: &Command) -> Result<()> {
        match command.name.as_str() {
            "set" => self.compile_set(command),
            "l" | "label" => self.compile_widget(command, "LABEL"),
            "b" | "button" => self.compile_widget(command, "BUTTON"),
            "i" | "input" => self.compile_widget(command, "INPUT"),
            "listbox" => self.compile_widget(command, "LISTBOX"),
            "canvas" => self.compile_widget(command, "CANVAS"),
            "c" | "container" => self.compile_widget(command, "CONTAINER"),
            "conf" | "config" => self.compile_options_update(command, Op::UpdateWidget),
            "pack" => self.compile_options_update(command, Op::PackWidget),
            "bind" => self.compile_handler_block(command, |n| Op::BindWidget(n)),
            "watch" => self.compile_watch(command),
            "proc" => self.compile_proc(command),
            "http.get" => self.compile_handler_block(command, |n| Op::HttpGet(n)),
            _ => self.compile_call(command),
        }
    }

    /// Emit the single push an argument compiles to.
    fn compile_argument(&mut self, arg: &Argument) {
        match arg {
            Argument::Identifier(value)
            | Argument::Option(value)
            | Argument::StringLiteral(value) => {
                let idx = self.chunk.add_constant(Constant::Str(value.clone()));
                self.chunk.emit(Op::PushConst(idx));
            }
            Argument::VariableSubstitution(name) => {
                let idx = self.chunk.add_constant(Constant::Str(name.clone()));
                self.chunk.emit(Op::PushVar(idx));
            }
        }
    }

    fn push_str(&mut self, value: &str) {
        let idx = self.chunk.add_constant(Constant::Str(value.to_string()));
        self.chunk.emit(Op::PushConst(idx));
    }

    /// `set name value`
    fn compile_set(&mut self, command: &Command) -> Result<()> {
        require_leaf(command)?;
        if command.args.len() != 2 {
            return Err(CompileError::MissingArguments {
                command: command.name.clone(),
                expected: "a name and a value",
                found: command.args.len(),
            });
        }
        self.compile_argument(&command.args[1]);
        self.compile_argument(&command.args[0]);
        self.chunk.emit(Op::SetState);
        Ok(())
    }

    /// Widget constructors: `l`/`label`, `b`/`button`, `i`/`input`,
    /// `listbox`, `canvas`, `c`/`container`.
    fn compile_widget(&mut self, command: &Command, kind: &str) -> Result<()> {
        require_leaf(command)?;
        if command.args.is_empty() {
            return Err(CompileError::MissingArguments {
                command: command.name.clone(),
                expected: "a widget name",
                found: 0,
            });
        }
        let options = widget_options(command, kind)?;
        let options_idx = self.chunk.add_constant(options);
        self.chunk.emit(Op::PushConst(options_idx));
        self.push_str(kind);
        self.compile_argument(&command.args[0]);
        self.chunk.emit(Op::CreateWidget);
        Ok(())
    }

    /// `conf`/`config` and `pack`: dynamic option pairs assembled at
    /// execution time, so substitution values resolve against live state.
    fn compile_options_update(&mut self, command: &Command, op: Op) -> Result<()> {
        require_leaf(command)?;
        if command.args.is_empty() {
            return Err(CompileError::MissingArguments {
                command: command.name.clone(),
                expected: "a widget name",
                found: 0,
            });
        }
        let pairs = &command.args[1..];
        if pairs.len() % 2 != 0 {
            return Err(CompileError::MissingArguments {
                command: command.name.clone(),
                expected: "option/value pairs after the widget name",
                found: command.args.len(),
            });
        }
        for pair in pairs.chunks(2) {
            self.compile_argument(&pair[1]);
            self.compile_argument(&pair[0]);
        }
        self.chunk.emit(Op::BuildObj((pairs.len() / 2) as u16));
        self.compile_argument(&command.args[0]);
        self.chunk.emit(op);
        Ok(())
    }

    /// `bind widget` and `http.get url`: the block's `.name` children each
    /// compile to a nested chunk; the pairs end with the widget name or
    /// URL and the arity-bearing terminator.
    fn compile_handler_block(
        &mut self,
        command: &Command,
        terminator: impl FnOnce(u16) -> Op,
    ) -> Result<()> {
        if command.args.is_empty() {
            return Err(CompileError::MissingArguments {
                command: command.name.clone(),
                expected: "a target",
                found: 0,
            });
        }
        let body = require_block(command)?;
        let mut count: u16 = 0;
        for child in body {
            if !child.name.starts_with('.') {
                return Err(CompileError::InvalidEventChild {
                    command: command.name.clone(),
                    found: child.name.clone(),
                });
            }
            let handler = compile_body(require_block(child)?)?;
            let chunk_idx = self.chunk.add_constant(Constant::Chunk(handler));
            self.chunk.emit(Op::DefBlock(chunk_idx));
            self.push_str(&child.name);
            count += 1;
        }
        self.compile_argument(&command.args[0]);
        self.chunk.emit(terminator(count));
        Ok(())
    }

    /// `watch var`
    fn compile_watch(&mut self, command: &Command) -> Result<()> {
        if command.args.len() != 1 {
            return Err(CompileError::MissingArguments {
                command: command.name.clone(),
                expected: "a variable name",
                found: command.args.len(),
            });
        }
        let watcher = compile_body(require_block(command)?)?;
        let chunk_idx = self.chunk.add_constant(Constant::Chunk(watcher));
        self.chunk.emit(Op::DefBlock(chunk_idx));
        self.compile_argument(&command.args[0]);
        self.chunk.emit(Op::WatchState);
        Ok(())
    }

    /// `proc name param...`
    fn compile_proc(&mut self, command: &Command) -> Result<()> {
        if command.args.is_empty() {
            return Err(CompileError::MissingArguments {
                command: command.name.clone(),
                expected: "a procedure name",
                found: 0,
            });
        }
        let chunk = compile_body(require_block(command)?)?;
        let chunk_idx = self.chunk.add_constant(Constant::Chunk(chunk));
        self.chunk.emit(Op::DefBlock(chunk_idx));
        let params = &command.args[1..];
        for param in params {
            self.compile_argument(param);
        }
        self.compile_argument(&command.args[0]);
        self.chunk.emit(Op::DefProc(params.len() as u16));
        Ok(())
    }

    /// Default dispatch: unknown names call a procedure or builtin.
    fn compile_call(&mut self, command: &Command) -> Result<()> {
        require_leaf(command)?;
        for arg in &command.args {
            self.compile_argument(arg);
        }
        self.push_str(&command.name);
        self.chunk.emit(Op::CallProc(command.args.len() as u16));
        Ok(())
    }
}

/// Assemble the static options object for a widget constructor.
fn widget_options(command: &Command, kind: &str) -> Result<Constant> {
    let mut options = IndexMap::new();
    match kind {
        "LABEL" | "BUTTON" => {
            if let Some(arg) = command.args.get(1) {
                options.insert(
                    "label".to_string(),
                    Constant::Str(literal_text(command, arg)?),
                );
            }
        }
        "INPUT" => {
            if let Some(arg) = command.args.get(1) {
                options.insert(
                    "initialText".to_string(),
                    Constant::Str(literal_text(command, arg)?),
                );
            }
        }
        "CANVAS" => {
            options.insert("width".to_string(), numeric_arg(command, 1)?);
            options.insert("height".to_string(), numeric_arg(command, 2)?);
        }
        _ => {}
    }
    Ok(Constant::Obj(options))
}

/// The literal text of a constructor argument. Substitutions are dynamic
/// and cannot appear in a static options position.
fn literal_text(command: &Command, arg: &Argument) -> Result<String> {
    match arg {
        Argument::Identifier(value)
        | Argument::Option(value)
        | Argument::StringLiteral(value) => Ok(value.clone()),
        Argument::VariableSubstitution(_) => Err(CompileError::NonLiteralArgument {
            command: command.name.clone(),
            lexeme: arg.lexeme(),
        }),
    }
}

fn numeric_arg(command: &Command, index: usize) -> Result<Constant> {
    let arg = command.args.get(index).ok_or(CompileError::MissingArguments {
        command: command.name.clone(),
        expected: "a width and a height",
        found: command.args.len(),
    })?;
    let text = literal_text(command, arg)?;
    text.parse::<f64>()
        .map(Constant::Num)
        .map_err(|_| CompileError::NonNumericArgument {
            command: command.name.clone(),
            found: text,
        })
}

fn require_block(command: &Command) -> Result<&[Command]> {
    command
        .body
        .as_deref()
        .ok_or_else(|| CompileError::MissingBlock {
            command: command.name.clone(),
        })
}

fn require_leaf(command: &Command) -> Result<()> {
    if command.body.is_some() {
        return Err(CompileError::UnexpectedBlock {
            command: command.name.clone(),
        });
    }
    Ok(())
}
