// steptrace: extract and replay the step trace of a Python-like program

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;

use steptrace::interpreter::{InterpreterConfig, StepInterpreter};
use steptrace::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file to trace
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Nesting limit for extraction and evaluation
    #[arg(long, default_value_t = steptrace::interpreter::constants::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the extracted steps without executing them
    #[arg(long)]
    trace_only: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Only installs a subscriber when RUST_LOG is set. Logs go to stderr.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("Cannot read '{}'", cli.file.display()))?;

    let config = InterpreterConfig {
        max_depth: cli.max_depth,
        ..InterpreterConfig::default()
    };

    let mut interpreter = match StepInterpreter::from_source_with(&source, config) {
        Ok(interpreter) => interpreter,
        Err(err @ (Error::Syntax(_) | Error::Trace(_))) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    let runtime_error = if cli.trace_only {
        None
    } else {
        interpreter.execute().err()
    };

    match cli.format {
        Format::Text => print_text(&interpreter, cli.trace_only),
        Format::Json => print_json(&interpreter, cli.trace_only)?,
    }

    // Partial state has been printed above
    if let Some(err) = runtime_error {
        eprintln!("Runtime error at step {}: {}", interpreter.position(), err);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_text(interpreter: &StepInterpreter, trace_only: bool) {
    for step in interpreter.steps() {
        println!("{}", step);
    }
    if trace_only {
        return;
    }

    println!();
    println!("Output:");
    for line in interpreter.output() {
        println!("  {}", line);
    }

    println!("Environment:");
    for (name, value) in interpreter.environment().sorted() {
        println!("  {} = {}", name, value);
    }

    if let Some(value) = interpreter.return_value() {
        println!("Returned: {}", value);
    }
    println!("Snapshots: {}", interpreter.value_trace().len());
}

fn print_json(interpreter: &StepInterpreter, trace_only: bool) -> Result<()> {
    let document = if trace_only {
        json!({ "steps": interpreter.steps() })
    } else {
        json!({
            "steps": interpreter.steps(),
            "environment": interpreter.environment(),
            "snapshots": interpreter.value_trace().snapshots(),
            "output": interpreter.output(),
        })
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
