//! End‑to‑end driver: scan → parse → resolve → interpret.
//!
//! A [`Session`] keeps one interpreter alive across calls to [`Session::run`],
//! so a REPL's globals persist from line to line while each line gets its own
//! error state.

use std::io::Write;

use log::{debug, info};

use crate::error::{Diagnostics, LoxError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// Exit status for static (scan/parse/resolve) errors.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for an unrecovered runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Result of running one source buffer.
#[derive(Debug)]
pub enum Outcome {
    /// Every statement ran.
    Completed,

    /// Evaluation never started; every static error found is included.
    StaticErrors(Diagnostics),

    /// Execution stopped at this error.
    RuntimeError(LoxError),
}

impl Outcome {
    /// Process exit code a host should use for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed => 0,
            Outcome::StaticErrors(_) => EXIT_STATIC_ERROR,
            Outcome::RuntimeError(_) => EXIT_RUNTIME_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    /// The errors to show the user, in report order.
    pub fn errors(&self) -> Vec<&LoxError> {
        match self {
            Outcome::Completed => Vec::new(),
            Outcome::StaticErrors(diagnostics) => diagnostics.iter().collect(),
            Outcome::RuntimeError(e) => vec![e],
        }
    }
}

pub struct Session {
    interpreter: Interpreter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session printing program output to stdout.
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// A session printing program output to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn run(&mut self, source: &str) -> Outcome {
        info!("Running {} bytes of source", source.len());

        // Parse even after lexical errors so syntax errors surface too.
        let (tokens, mut diagnostics) = Scanner::new(source).scan_tokens();
        let (statements, parse_diagnostics) = Parser::new(tokens).parse();
        diagnostics.extend(parse_diagnostics);

        if diagnostics.has_errors() {
            debug!("Stopping before resolution: {} error(s)", diagnostics.len());
            return Outcome::StaticErrors(diagnostics);
        }

        let diagnostics = Resolver::new(&mut self.interpreter).resolve(&statements);
        if diagnostics.has_errors() {
            debug!("Stopping before execution: {} error(s)", diagnostics.len());
            return Outcome::StaticErrors(diagnostics);
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Completed,
            Err(e) => Outcome::RuntimeError(e),
        }
    }
}
