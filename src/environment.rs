//! Lexical scope chain.
//!
//! Each [`Environment`] maps names to values and points at its enclosing
//! scope.  Scopes are shared (`Rc<RefCell<_>>`): every closure created in a
//! scope keeps it alive, and a write through any holder is visible to all.
//! Parent links only point outward, so the chain itself never forms a cycle.

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope.
pub type EnvRef<'a> = Rc<RefCell<Environment<'a>>>;

#[derive(Debug, Default)]
pub struct Environment<'a> {
    values: HashMap<String, Value<'a>>,
    enclosing: Option<EnvRef<'a>>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef<'a>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wraps `self` in a shareable handle.
    pub fn into_ref(self) -> EnvRef<'a> {
        Rc::new(RefCell::new(self))
    }

    /// Binds `name` in this scope, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value<'a>) {
        self.values.insert(name.to_string(), value);
    }

    /// Reads a binding from this scope only.
    pub fn get_local(&self, name: &str) -> Option<Value<'a>> {
        self.values.get(name).cloned()
    }

    /// Reads `name`, searching outward through every enclosing scope.
    pub fn get(&self, name: &Token<'_>) -> Result<Value<'a>, RuntimeError> {
        if let Some(value) = self.values.get(name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined_variable(name))
        }
    }

    /// Overwrites the innermost existing binding of `name`.
    pub fn assign(&mut self, name: &Token<'_>, value: Value<'a>) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined_variable(name))
        }
    }

    /// Follows `distance` parent links from `env`.
    ///
    /// Returns `None` if the chain is shorter than `distance`, which only
    /// happens when the resolver and the interpreter disagree.
    pub fn ancestor(env: &EnvRef<'a>, distance: usize) -> Option<EnvRef<'a>> {
        let mut current: EnvRef<'a> = Rc::clone(env);

        for _ in 0..distance {
            let parent: EnvRef<'a> = Rc::clone(current.borrow().enclosing.as_ref()?);
            current = parent;
        }

        Some(current)
    }

    /// Reads `name` from exactly the scope `distance` hops out.
    pub fn get_at(
        env: &EnvRef<'a>,
        distance: usize,
        name: &Token<'_>,
    ) -> Result<Value<'a>, RuntimeError> {
        let scope: EnvRef<'a> =
            Self::ancestor(env, distance).ok_or_else(|| undefined_variable(name))?;

        let value: Option<Value<'a>> = scope.borrow().get_local(name.lexeme);

        value.ok_or_else(|| undefined_variable(name))
    }

    /// Writes `name` in exactly the scope `distance` hops out.
    pub fn assign_at(
        env: &EnvRef<'a>,
        distance: usize,
        name: &Token<'_>,
        value: Value<'a>,
    ) -> Result<(), RuntimeError> {
        let scope: EnvRef<'a> =
            Self::ancestor(env, distance).ok_or_else(|| undefined_variable(name))?;

        scope.borrow_mut().define(name.lexeme, value);

        Ok(())
    }
}

fn undefined_variable(name: &Token<'_>) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorKind::UndefinedVariable,
        name,
        format!("Undefined variable '{}'.", name.lexeme),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(lexeme: &str) -> Token<'_> {
        Token::new(TokenType::IDENTIFIER, lexeme, 1)
    }

    #[test]
    fn get_searches_enclosing_scopes() {
        let globals = Environment::new().into_ref();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(Rc::clone(&globals));

        assert_eq!(inner.get(&ident("a")), Ok(Value::Number(1.0)));
    }

    #[test]
    fn get_undefined_variable_fails() {
        let env = Environment::new();
        let err = env.get(&ident("missing")).unwrap_err();

        assert_eq!(err.kind, RuntimeErrorKind::UndefinedVariable);
        assert_eq!(err.message, "Undefined variable 'missing'.");
    }

    #[test]
    fn assign_overwrites_first_scope_that_has_the_name() {
        let globals = Environment::new().into_ref();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let mut inner = Environment::with_enclosing(Rc::clone(&globals));
        inner.assign(&ident("a"), Value::Number(2.0)).unwrap();

        assert_eq!(inner.get_local("a"), None);
        assert_eq!(globals.borrow().get_local("a"), Some(Value::Number(2.0)));
    }

    #[test]
    fn assign_to_undeclared_name_fails() {
        let mut env = Environment::new();
        let err = env.assign(&ident("a"), Value::Nil).unwrap_err();

        assert_eq!(err.kind, RuntimeErrorKind::UndefinedVariable);
    }

    #[test]
    fn get_at_reads_the_exact_scope() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("a", Value::String("outer".into()));

        let middle = Environment::with_enclosing(Rc::clone(&outer)).into_ref();
        middle.borrow_mut().define("a", Value::String("middle".into()));

        let inner = Environment::with_enclosing(Rc::clone(&middle)).into_ref();

        assert_eq!(
            Environment::get_at(&inner, 2, &ident("a")),
            Ok(Value::String("outer".into()))
        );
        assert_eq!(
            Environment::get_at(&inner, 1, &ident("a")),
            Ok(Value::String("middle".into()))
        );
    }

    #[test]
    fn assign_at_skips_shadowing_bindings() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(Rc::clone(&outer)).into_ref();
        inner.borrow_mut().define("a", Value::Number(10.0));

        Environment::assign_at(&inner, 1, &ident("a"), Value::Number(2.0)).unwrap();

        assert_eq!(outer.borrow().get_local("a"), Some(Value::Number(2.0)));
        assert_eq!(inner.borrow().get_local("a"), Some(Value::Number(10.0)));
    }

    #[test]
    fn ancestor_past_the_root_is_none() {
        let root = Environment::new().into_ref();

        assert!(Environment::ancestor(&root, 0).is_some());
        assert!(Environment::ancestor(&root, 1).is_none());
    }
}
