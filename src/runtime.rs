use std::io::{self, Write};

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Result, YarrowError},
    lexer::Lexer,
    shunting::ShuntingYard,
    value::Value,
};

/// Reduces postfix programs against a value stack. The stack is created,
/// used, and discarded within a single `evaluate` call; the only state the
/// evaluator holds across calls is its print sink.
pub struct Evaluator<W: Write> {
    out: W,
}

impl Evaluator<io::Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for Evaluator<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Evaluator<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs the whole pipeline on a source buffer: lex, reorder to postfix,
    /// map tokens into the value domain, reduce. Returns the values left on
    /// the stack once the program is exhausted.
    pub fn eval_source(&mut self, source: &str) -> Result<Vec<f64>> {
        let mut converter = ShuntingYard::new(Lexer::new(source));
        let mut program = Vec::new();
        while let Some(token) = converter.next_token()? {
            if let Some(value) = Value::from_token(&token, source)? {
                program.push(value);
            }
        }
        self.evaluate(&program)
    }

    /// Reduces an already-ordered postfix program. Malformed input — stack
    /// underflow, division by zero — surfaces as a typed error, never a
    /// panic, so this is safe to expose to postfix streams that did not
    /// come from the converter.
    pub fn evaluate(&mut self, program: &[Value]) -> Result<Vec<f64>> {
        let mut stack: Vec<f64> = Vec::new();
        for value in program {
            match value {
                Value::Number(n) => stack.push(*n),
                Value::Add => {
                    let (lhs, rhs) = pop_pair(&mut stack, "+")?;
                    stack.push(lhs + rhs);
                }
                Value::Sub => {
                    let (lhs, rhs) = pop_pair(&mut stack, "-")?;
                    stack.push(lhs - rhs);
                }
                Value::Mul => {
                    let (lhs, rhs) = pop_pair(&mut stack, "*")?;
                    stack.push(lhs * rhs);
                }
                Value::Div => {
                    let (lhs, rhs) = pop_pair(&mut stack, "/")?;
                    if rhs == 0.0 {
                        return Err(YarrowError::from(Diagnostic::new(
                            DiagnosticKind::Runtime,
                            "division by zero",
                        )));
                    }
                    stack.push(lhs / rhs);
                }
                Value::Pow => {
                    let (lhs, rhs) = pop_pair(&mut stack, "^")?;
                    stack.push(lhs.powf(rhs));
                }
                Value::Dup => {
                    let top = pop_one(&mut stack, "dup")?;
                    stack.push(top);
                    stack.push(top);
                }
                Value::Print => {
                    let top = pop_one(&mut stack, "print")?;
                    writeln!(self.out, "{top}")?;
                }
            }
        }
        Ok(stack)
    }
}

fn pop_pair(stack: &mut Vec<f64>, op: &str) -> Result<(f64, f64)> {
    // The more recently pushed value is the right-hand operand.
    let rhs = pop_one(stack, op)?;
    let lhs = pop_one(stack, op)?;
    Ok((lhs, rhs))
}

fn pop_one(stack: &mut Vec<f64>, op: &str) -> Result<f64> {
    stack.pop().ok_or_else(|| {
        YarrowError::from(Diagnostic::new(
            DiagnosticKind::Runtime,
            format!("stack underflow while applying `{op}`"),
        ))
    })
}
