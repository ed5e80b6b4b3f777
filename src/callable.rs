//! The callable capability and the function values that implement it.

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::class::Instance;
use crate::environment::{EnvRef, Environment};
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::interpreter::{IResult, InterpretError, Interpreter};
use crate::token::Token;
use crate::value::Value;

/// Anything that can appear in callee position: user functions, native
/// functions and classes.
pub trait Callable<'a> {
    fn arity(&self) -> usize;

    fn name(&self) -> &str;

    /// Invokes the callable; the argument count has already been checked.
    fn call_unchecked(
        &self,
        interpreter: &mut Interpreter<'a>,
        arguments: Vec<Value<'a>>,
    ) -> IResult<'a, Value<'a>>;

    /// Checks the argument count against [`arity`](Callable::arity), then
    /// invokes.  `paren` is the call site's closing parenthesis.
    fn call(
        &self,
        interpreter: &mut Interpreter<'a>,
        paren: &Token<'_>,
        arguments: Vec<Value<'a>>,
    ) -> IResult<'a, Value<'a>> {
        if arguments.len() != self.arity() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ArityMismatch,
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    self.arity(),
                    arguments.len()
                ),
            )
            .into());
        }

        self.call_unchecked(interpreter, arguments)
    }
}

/// A user‑defined function or method together with the scope it closes over.
pub struct Function<'a> {
    declaration: Rc<FunctionDecl<'a>>,
    closure: EnvRef<'a>,
    is_initializer: bool,
}

impl<'a> Function<'a> {
    pub fn new(declaration: Rc<FunctionDecl<'a>>, closure: EnvRef<'a>, is_initializer: bool) -> Self {
        Function {
            declaration,
            closure,
            is_initializer,
        }
    }

    /// Returns a copy of this method whose closure is a fresh scope, parented
    /// on the original closure, that binds `this` to `instance`.
    pub fn bind(&self, instance: Rc<Instance<'a>>) -> Function<'a> {
        let mut environment = Environment::with_enclosing(Rc::clone(&self.closure));
        environment.define("this", Value::Instance(instance));

        Function {
            declaration: Rc::clone(&self.declaration),
            closure: environment.into_ref(),
            is_initializer: self.is_initializer,
        }
    }

    /// The instance bound as `this`, for initializers.
    fn bound_this(&self) -> Value<'a> {
        self.closure.borrow().get_local("this").unwrap_or(Value::Nil)
    }
}

impl<'a> Callable<'a> for Function<'a> {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn name(&self) -> &str {
        self.declaration.name.lexeme
    }

    fn call_unchecked(
        &self,
        interpreter: &mut Interpreter<'a>,
        arguments: Vec<Value<'a>>,
    ) -> IResult<'a, Value<'a>> {
        debug!("Calling user-defined function '{}'", self.name());

        let mut environment = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(param.lexeme, argument);
        }

        match interpreter.execute_block(&self.declaration.body, environment.into_ref()) {
            Ok(()) => {}

            Err(InterpretError::Return(value)) => {
                if !self.is_initializer {
                    return Ok(value);
                }
            }

            Err(e) => return Err(e),
        }

        if self.is_initializer {
            Ok(self.bound_this())
        } else {
            Ok(Value::Nil)
        }
    }
}

impl<'a> fmt::Debug for Function<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

/// A function implemented by the host, such as `clock`.
pub struct NativeFunction<'a> {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value<'a>]) -> Value<'a>,
}

impl<'a> Callable<'a> for NativeFunction<'a> {
    fn arity(&self) -> usize {
        self.arity
    }

    fn name(&self) -> &str {
        self.name
    }

    fn call_unchecked(
        &self,
        _interpreter: &mut Interpreter<'a>,
        arguments: Vec<Value<'a>>,
    ) -> IResult<'a, Value<'a>> {
        debug!("Calling native function '{}'", self.name);

        Ok((self.func)(&arguments))
    }
}

impl<'a> fmt::Debug for NativeFunction<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
