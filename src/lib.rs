//! Fein: a tree-walking interpreter for a small dynamically typed scripting
//! language with closures and single-inheritance classes.
//!
//! The pipeline is scan → parse → resolve → interpret:
//!
//! ```
//! let mut out = Vec::new();
//! fein::run("var a = 1; print a + 2;", &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "3\n");
//! ```

pub mod ast;
pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod scanner;
pub mod token;
pub mod value;

use std::io::Write;

use log::info;

use crate::ast::Stmt;
use crate::error::{FeinError, RunError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use crate::token::Token;

/// Scans all of `source`, returning the tokens that were recognised and,
/// separately, every lexical error.  The token list always ends in `EOF`.
pub fn scan(source: &str) -> (Vec<Token<'_>>, Vec<FeinError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for item in Scanner::new(source) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }

    (tokens, errors)
}

/// Runs a whole program, writing `print` output to `out`.
///
/// Nothing executes if scanning, parsing or resolution reports an error.  A
/// runtime error stops execution at the failing statement; output written
/// before it is kept.
pub fn run(source: &str, out: &mut dyn Write) -> Result<(), RunError> {
    let (tokens, lex_errors) = scan(source);

    let mut parser = Parser::new(&tokens);
    let statements = check_syntax(parser.parse(), lex_errors)?;

    let mut interpreter = Interpreter::with_output(Box::new(out));

    execute(&mut interpreter, &statements)
}

/// Merges lexical errors with the parser's outcome.  Any error in either
/// list fails the whole program, with diagnostics ordered by line.
pub fn check_syntax<'a>(
    parsed: Result<Vec<Stmt<'a>>, Vec<FeinError>>,
    mut errors: Vec<FeinError>,
) -> Result<Vec<Stmt<'a>>, RunError> {
    match parsed {
        Ok(statements) if errors.is_empty() => {
            info!("Parsed {} statement(s)", statements.len());
            Ok(statements)
        }

        Ok(_) => Err(RunError::Syntax(errors)),

        Err(parse_errors) => {
            errors.extend(parse_errors);
            errors.sort_by_key(|e| e.line().unwrap_or(0));
            Err(RunError::Syntax(errors))
        }
    }
}

/// Resolves then interprets `statements` on an existing interpreter, so
/// globals defined by earlier calls stay visible.
pub(crate) fn execute<'a>(
    interpreter: &mut Interpreter<'a>,
    statements: &[Stmt<'a>],
) -> Result<(), RunError> {
    Resolver::new(interpreter)
        .resolve(statements)
        .map_err(RunError::Resolve)?;

    interpreter.interpret(statements)?;

    Ok(())
}
