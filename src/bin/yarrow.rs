use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};

use yarrow::{Evaluator, Repl, YarrowError, diagnostics::line_column};

#[derive(Parser)]
#[command(author, version, about = "Yarrow expression evaluator")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a Yarrow script file
    Run { script: PathBuf },
    /// Start an interactive REPL session
    Repl,
    /// Evaluate a snippet of Yarrow source
    Eval { source: String },
}

fn main() -> Result<(), YarrowError> {
    let args = Args::parse();
    match args.command.unwrap_or(Command::Repl) {
        Command::Run { script } => {
            let source = fs::read_to_string(&script)?;
            eval_and_report(&source)
        }
        Command::Repl => {
            let mut repl = Repl::new();
            repl.run()
        }
        Command::Eval { source } => eval_and_report(&source),
    }
}

fn eval_and_report(source: &str) -> Result<(), YarrowError> {
    let mut evaluator = Evaluator::new();
    match evaluator.eval_source(source) {
        Ok(stack) => {
            for value in stack {
                println!("{value}");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", render(source, &err));
            std::process::exit(1);
        }
    }
}

fn render(source: &str, err: &YarrowError) -> String {
    match err {
        YarrowError::Diagnostic(diag) => match diag.span {
            Some(span) => {
                let (line, column) = line_column(source, span.start);
                format!(
                    "{:?}: {} (line {line}, column {column})",
                    diag.kind, diag.message
                )
            }
            None => format!("{:?}: {}", diag.kind, diag.message),
        },
        other => format!("error: {other}"),
    }
}
