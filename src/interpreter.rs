use std::collections::HashMap;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use log::{debug, info};
use thiserror::Error;

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::callable::{Function, NativeFunction};
use crate::class::Class;
use crate::environment::{EnvRef, Environment};
use crate::error::{FeinError, Result, RuntimeError, RuntimeErrorKind};
use crate::token::{Token, TokenType};
use crate::value::{format_double, format_number, Value};

/// Why evaluation stopped early: a real error, or a `return` unwinding to
/// the nearest call frame.
#[derive(Error, Debug)]
pub enum InterpretError<'a> {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Writing `print` output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Return signal with value: {0}")]
    Return(Value<'a>),
}

/// Convenient alias for interpreter results.
pub type IResult<'a, T> = std::result::Result<T, InterpretError<'a>>;

/// Tree‑walking evaluator.
///
/// Holds the global scope, the scope currently executing, and the side table
/// of resolved scope distances filled in by the
/// [`Resolver`](crate::resolver::Resolver).
pub struct Interpreter<'a> {
    globals: EnvRef<'a>,
    environment: EnvRef<'a>,
    locals: HashMap<ExprId, usize>,
    out: Box<dyn Write + 'a>,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter printing to standard output.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates an interpreter whose `print` statements write to `out`, and
    /// defines native functions such as `clock`.
    pub fn with_output(out: Box<dyn Write + 'a>) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef<'a> = Environment::new().into_ref();

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::NativeFunction(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: |_args| {
                    let millis = chrono::Utc::now().timestamp_millis();
                    Value::Number(millis as f64 / 1000.0)
                },
            })),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// The sink `print` statements write to.
    pub fn output(&mut self) -> &mut (dyn Write + 'a) {
        self.out.as_mut()
    }

    /// Records that the variable expression `id` binds `depth` scopes out.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        debug!("Resolved {:?} at depth {}", id, depth);

        self.locals.insert(id, depth);
    }

    /// The distance recorded for `id`, or `None` for a global.
    pub fn resolved_depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Interprets a list of statements (a "program").
    ///
    /// The first runtime error aborts the remaining statements; output
    /// already written stays written.
    pub fn interpret(&mut self, statements: &[Stmt<'a>]) -> Result<()> {
        info!("Interpreting {} statements", statements.len());

        for stmt in statements {
            match self.execute(stmt) {
                Ok(()) => {}

                Err(InterpretError::Runtime(e)) => {
                    debug!("Runtime error: {}", e);
                    self.out.flush()?;
                    return Err(FeinError::Runtime(e));
                }

                Err(InterpretError::Io(e)) => return Err(FeinError::Io(e)),

                // Rejected by the resolver; nothing left to unwind to.
                Err(InterpretError::Return(_)) => break,
            }
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt<'a>) -> IResult<'a, ()> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(())
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(name.lexeme, value);
                Ok(())
            }

            Stmt::Block(statements) => {
                let environment = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, environment.into_ref())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
                Ok(())
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);
                let function = Function::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                self.environment
                    .borrow_mut()
                    .define(decl.name.lexeme, Value::Function(Rc::new(function)));
                Ok(())
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Err(InterpretError::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let superclass: Option<Rc<Class<'a>>> = match superclass {
                    Some(expr) => match self.evaluate(expr)? {
                        Value::Class(class) => Some(class),
                        _ => {
                            return Err(RuntimeError::new(
                                RuntimeErrorKind::TypeError,
                                expr_token(expr).unwrap_or(*name),
                                "Superclass must be a class.",
                            )
                            .into())
                        }
                    },
                    None => None,
                };

                let methods = methods
                    .iter()
                    .map(|decl| {
                        let is_initializer = decl.name.lexeme == "init";
                        let function = Function::new(
                            Rc::clone(decl),
                            Rc::clone(&self.environment),
                            is_initializer,
                        );
                        (decl.name.lexeme.to_string(), Rc::new(function))
                    })
                    .collect();

                let class = Class::new(name.lexeme, superclass, methods);

                debug!("Defining class '{}'", name.lexeme);
                self.environment
                    .borrow_mut()
                    .define(name.lexeme, Value::Class(Rc::new(class)));
                Ok(())
            }
        }
    }

    /// Runs `statements` inside `environment`, restoring the current scope
    /// afterwards whether or not execution succeeded.
    pub fn execute_block(&mut self, statements: &[Stmt<'a>], environment: EnvRef<'a>) -> IResult<'a, ()> {
        let previous = mem::replace(&mut self.environment, environment);

        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));

        self.environment = previous;

        result
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr<'a>) -> IResult<'a, Value<'a>> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let short_circuit = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => Ok(self.look_up_variable(*id, name)?),

            Expr::This { id, keyword } => Ok(self.look_up_variable(*id, keyword)?),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                let Some(callable) = callee.as_callable() else {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::NotCallable,
                        paren,
                        "Can only call functions and classes.",
                    )
                    .into());
                };

                callable.call(self, paren, values)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => Ok(instance.get(name)?),
                _ => Err(RuntimeError::new(
                    RuntimeErrorKind::TypeError,
                    name,
                    "Only instances have properties.",
                )
                .into()),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::TypeError,
                        name,
                        "Only instances have fields.",
                    )
                    .into());
                };

                let value = self.evaluate(value)?;
                instance.set(name, value.clone());

                Ok(value)
            }
        }
    }

    fn evaluate_unary(&mut self, operator: &Token<'_>, right: &Expr<'a>) -> IResult<'a, Value<'a>> {
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),

            _ => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(type_error(operator, "Operand must be a number.").into()),
            },
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr<'a>,
        operator: &Token<'_>,
        right: &Expr<'a>,
    ) -> IResult<'a, Value<'a>> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        debug!(
            "Binary '{}' on {} and {}",
            operator.lexeme,
            left.type_name(),
            right.type_name()
        );

        let value = match operator.token_type {
            TokenType::EQUAL_EQUAL => Value::Bool(left == right),

            TokenType::BANG_EQUAL => Value::Bool(left != right),

            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                (Value::String(a), Value::String(b)) => Value::String(a + &b),
                (Value::String(a), Value::Number(b)) => Value::String(a + &format_number(b)),
                (Value::Number(a), Value::String(b)) => Value::String(format_number(a) + &b),
                _ => {
                    return Err(
                        type_error(operator, "Operands must be numbers or strings.").into(),
                    )
                }
            },

            _ => {
                let (a, b) = number_operands(operator, &left, &right)?;

                match operator.token_type {
                    TokenType::MINUS => Value::Number(a - b),
                    TokenType::STAR => Value::Number(a * b),
                    TokenType::SLASH => {
                        // Guard on the divisor's canonical text: 0 and
                        // 0.001..1 are rejected; -0 and 1.0E-4 are not.
                        if format_double(b).starts_with('0') {
                            return Err(RuntimeError::new(
                                RuntimeErrorKind::DivisionByZero,
                                operator,
                                "Cannot divide by 0.",
                            )
                            .into());
                        }
                        Value::Number(a / b)
                    }
                    TokenType::GREATER => Value::Bool(a > b),
                    TokenType::GREATER_EQUAL => Value::Bool(a >= b),
                    TokenType::LESS => Value::Bool(a < b),
                    TokenType::LESS_EQUAL => Value::Bool(a <= b),
                    _ => return Err(type_error(operator, "Unknown binary operator.").into()),
                }
            }
        };

        Ok(value)
    }

    fn look_up_variable(&self, id: ExprId, name: &Token<'_>) -> std::result::Result<Value<'a>, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }
}

impl<'a> Default for Interpreter<'a> {
    fn default() -> Self {
        Self::new()
    }
}

fn type_error(operator: &Token<'_>, message: &str) -> RuntimeError {
    RuntimeError::new(RuntimeErrorKind::TypeError, operator, message)
}

fn number_operands(
    operator: &Token<'_>,
    left: &Value<'_>,
    right: &Value<'_>,
) -> std::result::Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(type_error(operator, "Operands must be numbers.")),
    }
}

/// The name token of a superclass reference, for error reporting.
fn expr_token<'e, 'a>(expr: &'e Expr<'a>) -> Option<&'e Token<'a>> {
    match expr {
        Expr::Variable { name, .. } => Some(name),
        _ => None,
    }
}
