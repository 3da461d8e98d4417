//! weft-run — compile and execute a weft UI program.
//!
//! Parses a `.weft` source file, compiles it to bytecode, and runs it
//! against an in-memory session. Dumps of the compiled bytecode and the
//! final reactive state are available for inspection.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weft_runtime::Session;
use weft_vm::Value;

#[derive(Parser, Debug)]
#[command(name = "weft-run")]
#[command(about = "Compile and run a weft UI program")]
struct Cli {
    /// Path to a .weft source file
    source: PathBuf,

    /// Print the compiled bytecode instead of running
    #[arg(long)]
    dump_bytecode: bool,

    /// Print the final reactive state as JSON after the run
    #[arg(long)]
    dump_state: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weft_run=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.source) {
        Ok(source) => source,
        Err(err) => {
            error!("failed to read {}: {err}", cli.source.display());
            return ExitCode::FAILURE;
        }
    };

    let program = match weft_parser::parse(&source) {
        Ok(program) => program,
        Err(err) => {
            error!("parse failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let chunk = match weft_compiler::compile(&program) {
        Ok(chunk) => chunk,
        Err(err) => {
            error!("compile failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.dump_bytecode {
        print!("{}", weft_compiler::disasm::disassemble(&chunk, "main"));
        return ExitCode::SUCCESS;
    }

    let mut session = Session::new();
    if let Err(err) = session.run(&chunk) {
        error!("execution failed: {err}");
        return ExitCode::FAILURE;
    }

    if !session.pending_fetches().is_empty() {
        info!(
            count = session.pending_fetches().len(),
            "fetches still pending at exit"
        );
    }

    if cli.dump_state {
        let state: serde_json::Map<String, serde_json::Value> = session
            .state()
            .iter()
            .map(|(name, value)| (name.clone(), value_to_json(value)))
            .collect();
        println!("{}", serde_json::Value::Object(state));
    }

    ExitCode::SUCCESS
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Num(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Obj(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        Value::Chunk(chunk) => {
            serde_json::Value::String(format!("<chunk: {} instructions>", chunk.ops.len()))
        }
    }
}
