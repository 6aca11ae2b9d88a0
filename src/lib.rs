//! Core library for the Yarrow expression evaluator and tooling.
//! Implements UTF-8-aware lexing, shunting-yard postfix reordering,
//! stack-based evaluation, and REPL utilities.

pub mod diagnostics;
pub mod lexer;
pub mod repl;
pub mod runtime;
pub mod shunting;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticKind, SourceSpan, YarrowError};
pub use repl::Repl;
pub use runtime::Evaluator;
pub use shunting::ShuntingYard;
pub use value::Value;
