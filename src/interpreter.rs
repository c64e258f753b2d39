//! API to control the interpreter.

use std::error::Error;
use std::fmt;
use std::io::prelude::*;

use crate::eval::{Evaluator, RuntimeError};
use crate::parser::{Parser, ParserError};

/// Tree-walk interpreter.
///
/// Parsing and execution are interleaved at statement granularity: each top-level statement is
/// parsed, executed against the interpreter's environment, and dropped before the next one is
/// read.  The environment lives as long as the interpreter, so several `run` calls share
/// variables.
///
/// # Example
///
/// Build a sequence in one run, then read it back in a second run:
///
/// ```
/// # use interpret::interpreter::{Interpreter, InterpError};
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.run(r#"greeting = "Hello"; push greeting, '!';"#.as_bytes())?;
/// interp.run("print greeting; print len greeting;".as_bytes())?;
///
/// assert_eq!(output, b"Hello!6");
/// # Ok::<(), InterpError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise.
///
/// The `Display` form is the bare diagnostic line the language mandates, suitable for writing
/// to stderr as-is.
#[derive(Debug)]
pub enum InterpError {
    /// Error occurring during lexical or syntactic analysis.
    Parse(ParserError),

    /// Error occurring during evaluation.
    Runtime(RuntimeError),
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpError::Parse(e) => write!(f, "{}", e),
            InterpError::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl Error for InterpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<ParserError> for InterpError {
    fn from(e: ParserError) -> InterpError {
        InterpError::Parse(e)
    }
}

impl From<RuntimeError> for InterpError {
    fn from(e: RuntimeError) -> InterpError {
        InterpError::Runtime(e)
    }
}

impl<W: Write> Interpreter<'_, W> {
    pub fn new(output: &mut W) -> Interpreter<'_, W> {
        Interpreter {
            evaluator: Evaluator::new(output),
        }
    }

    /// Parse and execute statements from `input` until end of input.
    ///
    /// Statements already executed keep their effects even when a later statement fails.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), InterpError> {
        let mut parser = Parser::new(input);
        while let Some(stmt) = parser.next_stmt()? {
            self.evaluator.exec_stmt(&stmt)?;
        }
        Ok(())
    }
}
