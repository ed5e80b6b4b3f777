//! Interactive prompt.
//!
//! Every line read is a complete program run through the full pipeline
//! against one long-lived [`Interpreter`], so variables, functions and
//! classes declared on earlier lines stay defined.  Errors are written to
//! the error sink and the prompt carries on.

use std::io::{self, BufRead, Write};
use std::mem;

use log::{debug, info};

use crate::error::RunError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::token::Token;

pub const PROMPT: &str = "> ";

/// A session: the interpreter plus the next unused expression id.
pub struct Repl<'a> {
    interpreter: Interpreter<'a>,
    next_id: usize,
}

impl<'a> Repl<'a> {
    pub fn new(out: Box<dyn Write + 'a>) -> Self {
        info!("Starting REPL session");

        Repl {
            interpreter: Interpreter::with_output(out),
            next_id: 0,
        }
    }

    /// Runs one line.
    ///
    /// The line's text and tokens are kept for the rest of the session: a
    /// function declared on it can be called from any later line.
    pub fn eval(&mut self, line: String) -> Result<(), RunError> {
        let source: &'static str = Box::leak(line.into_boxed_str());

        let (tokens, lex_errors) = crate::scan(source);
        let tokens: &'static [Token<'static>] = Box::leak(tokens.into_boxed_slice());

        // ids continue from the previous line so resolved distances of
        // earlier closures are never overwritten
        let mut parser = Parser::new(tokens).with_first_id(self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_free_id();

        let statements = crate::check_syntax(parsed, lex_errors)?;

        crate::execute(&mut self.interpreter, &statements)
    }

    /// Where `print` output and the prompt go.
    pub fn output(&mut self) -> &mut (dyn Write + 'a) {
        self.interpreter.output()
    }
}

/// Reads lines from `input` until end of input, printing the prompt and
/// program output to `out` and diagnostics to `err`.
///
/// Only a failure of the streams themselves ends the loop early.
pub fn run_prompt<R: BufRead>(
    mut input: R,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    let mut repl = Repl::new(Box::new(out));
    let mut line = String::new();

    loop {
        let prompt_out = repl.output();
        prompt_out.write_all(PROMPT.as_bytes())?;
        prompt_out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            info!("End of input, leaving REPL");
            break;
        }

        match repl.eval(mem::take(&mut line)) {
            Ok(()) => {}

            Err(RunError::Io(e)) => return Err(e),

            Err(e) => {
                debug!("REPL line failed: {}", e);
                writeln!(err, "{}", e)?;
            }
        }
    }

    Ok(())
}
