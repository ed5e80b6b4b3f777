//! Centralised error hierarchy for the **Fein interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This gives a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow` in the binary, while still preserving rich diagnostic detail.
//!
//! The module **does not** print diagnostics itself; the driver decides where
//! they go and which exit code they map to.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::Token;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeinError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,

        /// `" at 'lexeme'"`, `" at end"`, or empty.
        location: String,
    },

    /// Static‑analysis or resolution failure (e.g. early‑binding errors).
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FeinError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        FeinError::Lex { message, line }
    }

    /// Helper constructor for the **parser**, located at `token`.
    pub fn parse<S: Into<String>>(token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        FeinError::Parse {
            message,
            line: token.line,
            location: token.location(),
        }
    }

    /// Helper constructor for the **resolver**, located at `token`.
    pub fn resolve<S: Into<String>>(token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        FeinError::Resolve {
            message,
            line: token.line,
            location: token.location(),
        }
    }

    /// Source line the diagnostic points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            FeinError::Lex { line, .. }
            | FeinError::Parse { line, .. }
            | FeinError::Resolve { line, .. } => Some(*line),
            FeinError::Runtime(e) => Some(e.line),
            FeinError::Io(_) => None,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, FeinError>;

/// Classification of evaluation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    UndefinedVariable,
    UndefinedProperty,
    /// Operand of the wrong kind (e.g. `true + 1`, `-"a"`, subclassing a non-class).
    TypeError,
    NotCallable,
    ArityMismatch,
    DivisionByZero,
}

/// A failure raised while executing a program, pinned to the offending token.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,

    /// Lexeme of the token the error is reported at.
    pub lexeme: String,

    pub line: usize,
    pub message: String,
}

impl RuntimeError {
    pub fn new<S: Into<String>>(kind: RuntimeErrorKind, token: &Token<'_>, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Runtime error: kind={:?}, line={}, msg={}",
            kind, token.line, message
        );

        RuntimeError {
            kind,
            lexeme: token.lexeme.to_string(),
            line: token.line,
            message,
        }
    }
}

/// Outcome of running a whole program through the pipeline.
///
/// Each class suppresses or interrupts execution differently: syntax and
/// resolution errors mean nothing ran, a runtime error means execution
/// stopped at the first failing statement.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{}", join(.0))]
    Syntax(Vec<FeinError>),

    #[error("{}", join(.0))]
    Resolve(Vec<FeinError>),

    #[error(transparent)]
    Runtime(RuntimeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RunError {
    /// Process exit code the driver maps this failure class to.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Syntax(_) | RunError::Resolve(_) => 65,
            RunError::Runtime(_) => 70,
            RunError::Io(_) => 74,
        }
    }
}

impl From<FeinError> for RunError {
    fn from(error: FeinError) -> Self {
        match error {
            FeinError::Lex { .. } | FeinError::Parse { .. } => RunError::Syntax(vec![error]),
            FeinError::Resolve { .. } => RunError::Resolve(vec![error]),
            FeinError::Runtime(e) => RunError::Runtime(e),
            FeinError::Io(e) => RunError::Io(e),
        }
    }
}

fn join(errors: &[FeinError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn run_error_classes_map_to_exit_codes() {
        let token = Token::new(TokenType::IDENTIFIER, "x", 4);

        let syntax: RunError = FeinError::lex(2, "Unexpected character: @").into();
        assert!(matches!(&syntax, RunError::Syntax(errors) if errors.len() == 1));
        assert_eq!(syntax.exit_code(), 65);
        assert_eq!(syntax.to_string(), "[line 2] Error: Unexpected character: @");

        let resolve: RunError = FeinError::resolve(&token, "Already a variable with this name in this scope.").into();
        assert!(matches!(resolve, RunError::Resolve(_)));
        assert_eq!(resolve.exit_code(), 65);

        let runtime = RuntimeError::new(RuntimeErrorKind::UndefinedVariable, &token, "Undefined variable 'x'.");
        let runtime: RunError = FeinError::from(runtime).into();
        assert_eq!(runtime.exit_code(), 70);
        assert_eq!(runtime.to_string(), "Undefined variable 'x'.\n[line 4]");

        let io: RunError = FeinError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed")).into();
        assert_eq!(io.exit_code(), 74);
    }

    #[test]
    fn line_is_known_except_for_io() {
        let token = Token::new(TokenType::EOF, "", 9);

        assert_eq!(FeinError::parse(&token, "Expect ';' after value.").line(), Some(9));
        assert_eq!(FeinError::from(io::Error::new(io::ErrorKind::Other, "gone")).line(), None);
        assert_eq!(
            FeinError::parse(&token, "Expect ';' after value.").to_string(),
            "[line 9] Error at end: Expect ';' after value."
        );
    }
}
