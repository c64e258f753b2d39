//! Tree-walking evaluator.
//!
//! Expressions evaluate to a [`Value`]; statements execute for their side effects on the
//! variable environment and the output sink.  Operands of a binary operator are evaluated
//! left to right; `&&` and `||` do not evaluate the right operand when the left decides.

use std::convert::TryFrom;
use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;

use crate::ast::{Expr, Stmt};
use crate::value::{Environment, Sequence, Value};

#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    env: Environment,
}

/// A fatal runtime diagnostic.  The `Display` form is the exact message the language
/// mandates; runtime diagnostics carry no line number.
#[derive(Debug)]
pub enum RuntimeError {
    TypeMismatch,
    DivByZero,
    IndexOutOfBounds,
    Io(io::Error),
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::TypeMismatch
            | RuntimeError::DivByZero
            | RuntimeError::IndexOutOfBounds => None,
            RuntimeError::Io(e) => Some(e),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::TypeMismatch => write!(f, "Type mismatch"),
            RuntimeError::DivByZero => write!(f, "Divide by zero"),
            RuntimeError::IndexOutOfBounds => write!(f, "Index out of bounds"),
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> RuntimeError {
        RuntimeError::Io(e)
    }
}

/// Check that a value is an integer and return it.
fn require_int(value: Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(n),
        Value::Seq(_) => Err(RuntimeError::TypeMismatch),
    }
}

/// Check that a value is a sequence and return its handle.
fn require_seq(value: Value) -> Result<Sequence, RuntimeError> {
    match value {
        Value::Seq(seq) => Ok(seq),
        Value::Int(_) => Err(RuntimeError::TypeMismatch),
    }
}

/// Build a fresh sequence holding `seq` repeated `times` times.  A non-positive count yields
/// an empty sequence.
fn repeat_sequence(seq: &Sequence, times: i64) -> Sequence {
    let elems = seq.elems();
    let mut result = Vec::new();
    for _ in 0..times.max(0) {
        result.extend_from_slice(&elems);
    }
    Sequence::from_vec(result)
}

impl<'t, W: Write> Evaluator<'t, W> {
    pub fn new(output: &'t mut W) -> Evaluator<'t, W> {
        Evaluator {
            output,
            env: Environment::new(),
        }
    }

    /// Execute one statement against the evaluator's environment.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Print(expr) => match self.eval_expr(expr)? {
                Value::Int(n) => write!(self.output, "{}", n)?,
                Value::Seq(seq) => {
                    // Each element prints as a single raw byte, with no separator.
                    let bytes: Vec<u8> = seq.elems().iter().map(|&v| v as u8).collect();
                    self.output.write_all(&bytes)?;
                }
            },
            Stmt::Compound(stmts) => {
                for stmt in stmts {
                    self.exec_stmt(stmt)?;
                }
            }
            Stmt::If(cond, body) => {
                if require_int(self.eval_expr(cond)?)? != 0 {
                    self.exec_stmt(body)?;
                }
            }
            Stmt::While(cond, body) => {
                while require_int(self.eval_expr(cond)?)? != 0 {
                    self.exec_stmt(body)?;
                }
            }
            Stmt::Push(sexpr, vexpr) => {
                let seq = self.eval_expr(sexpr)?;
                let value = self.eval_expr(vexpr)?;
                require_seq(seq)?.push(require_int(value)?);
            }
            Stmt::Assign(name, None, rhs) => {
                let value = self.eval_expr(rhs)?;
                self.env.set(name, value);
            }
            Stmt::Assign(name, Some(iexpr), rhs) => {
                let value = require_int(self.eval_expr(rhs)?)?;
                let index = require_int(self.eval_expr(iexpr)?)?;
                let seq = require_seq(self.env.lookup(name))?;
                let stored = usize::try_from(index)
                    .ok()
                    .map_or(false, |i| seq.set(i, value));
                if !stored {
                    return Err(RuntimeError::IndexOutOfBounds);
                }
            }
        };
        Ok(())
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::LitInt(n) => Ok(Value::Int(*n)),
            Expr::Var(name) => Ok(self.env.lookup(name)),
            Expr::Add(lhs, rhs) => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                Ok(match (left, right) {
                    (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
                    (Value::Seq(a), Value::Seq(b)) => {
                        let mut elems = a.to_vec();
                        elems.extend_from_slice(&b.elems());
                        Value::Seq(Sequence::from_vec(elems))
                    }
                    (Value::Seq(a), Value::Int(b)) => {
                        let mut elems = a.to_vec();
                        elems.push(b);
                        Value::Seq(Sequence::from_vec(elems))
                    }
                    (Value::Int(a), Value::Seq(b)) => {
                        let mut elems = vec![a];
                        elems.extend_from_slice(&b.elems());
                        Value::Seq(Sequence::from_vec(elems))
                    }
                })
            }
            Expr::Sub(lhs, rhs) => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                Ok(Value::Int(require_int(left)? - require_int(right)?))
            }
            Expr::Mul(lhs, rhs) => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                match (left, right) {
                    (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
                    (Value::Seq(seq), Value::Int(times)) | (Value::Int(times), Value::Seq(seq)) => {
                        Ok(Value::Seq(repeat_sequence(&seq, times)))
                    }
                    (Value::Seq(_), Value::Seq(_)) => Err(RuntimeError::TypeMismatch),
                }
            }
            Expr::Div(lhs, rhs) => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                let a = require_int(left)?;
                let b = require_int(right)?;
                if b == 0 {
                    return Err(RuntimeError::DivByZero);
                }
                Ok(Value::Int(a / b))
            }
            Expr::Less(lhs, rhs) => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                match (left, right) {
                    (Value::Int(a), Value::Int(b)) => Ok(Value::Int((a < b) as i64)),
                    (Value::Seq(a), Value::Seq(b)) => {
                        // Lexicographic: first differing element decides; a strict prefix is
                        // less than the longer sequence.
                        let less = *a.elems() < *b.elems();
                        Ok(Value::Int(less as i64))
                    }
                    _ => Err(RuntimeError::TypeMismatch),
                }
            }
            Expr::Equals(lhs, rhs) => {
                let left = self.eval_expr(lhs)?;
                let right = self.eval_expr(rhs)?;
                match (left, right) {
                    (Value::Int(a), Value::Int(b)) => Ok(Value::Int((a == b) as i64)),
                    (Value::Seq(a), Value::Seq(b)) => Ok(Value::Int((a == b) as i64)),
                    // An int and a sequence are never equal, but comparing them is not an
                    // error.
                    _ => Ok(Value::Int(0)),
                }
            }
            Expr::And(lhs, rhs) => {
                let left = require_int(self.eval_expr(lhs)?)?;
                if left == 0 {
                    return Ok(Value::Int(left));
                }
                Ok(Value::Int(require_int(self.eval_expr(rhs)?)?))
            }
            Expr::Or(lhs, rhs) => {
                let left = require_int(self.eval_expr(lhs)?)?;
                if left != 0 {
                    return Ok(Value::Int(left));
                }
                Ok(Value::Int(require_int(self.eval_expr(rhs)?)?))
            }
            Expr::Index(aexpr, iexpr) => {
                let seq = self.eval_expr(aexpr)?;
                let index = self.eval_expr(iexpr)?;
                let seq = require_seq(seq)?;
                let index = require_int(index)?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| seq.get(i))
                    .map(Value::Int)
                    .ok_or(RuntimeError::IndexOutOfBounds)
            }
            Expr::Len(expr) => {
                let seq = require_seq(self.eval_expr(expr)?)?;
                Ok(Value::Int(seq.len() as i64))
            }
            Expr::SeqInit(elems) => {
                let seq = Sequence::new();
                for elem in elems {
                    let value = require_int(self.eval_expr(elem)?)?;
                    seq.push(value);
                }
                Ok(Value::Seq(seq))
            }
        }
    }
}
