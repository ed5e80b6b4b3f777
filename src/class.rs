//! Classes and their instances.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::callable::{Callable, Function};
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::interpreter::{IResult, Interpreter};
use crate::token::Token;
use crate::value::Value;

/// A class value: a name, an optional superclass and its own methods.
pub struct Class<'a> {
    pub name: String,
    superclass: Option<Rc<Class<'a>>>,
    methods: HashMap<String, Rc<Function<'a>>>,
}

impl<'a> Class<'a> {
    pub fn new(
        name: &str,
        superclass: Option<Rc<Class<'a>>>,
        methods: HashMap<String, Rc<Function<'a>>>,
    ) -> Self {
        Class {
            name: name.to_string(),
            superclass,
            methods,
        }
    }

    /// Looks `name` up on this class, then up the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function<'a>>> {
        let mut class: &Class<'a> = self;

        loop {
            if let Some(method) = class.methods.get(name) {
                return Some(Rc::clone(method));
            }

            class = class.superclass.as_deref()?;
        }
    }
}

/// Calling a class constructs an instance and runs `init` on it, if any.
impl<'a> Callable<'a> for Rc<Class<'a>> {
    fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn call_unchecked(
        &self,
        interpreter: &mut Interpreter<'a>,
        arguments: Vec<Value<'a>>,
    ) -> IResult<'a, Value<'a>> {
        debug!("Constructing instance of '{}'", self.name);

        let instance = Rc::new(Instance::new(Rc::clone(self)));

        if let Some(initializer) = self.find_method("init") {
            initializer
                .bind(Rc::clone(&instance))
                .call_unchecked(interpreter, arguments)?;
        }

        Ok(Value::Instance(instance))
    }
}

impl<'a> fmt::Debug for Class<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| &s.name))
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An object created by calling a class.  Fields spring into existence on
/// first assignment.
pub struct Instance<'a> {
    class: Rc<Class<'a>>,
    fields: RefCell<HashMap<String, Value<'a>>>,
}

impl<'a> Instance<'a> {
    pub fn new(class: Rc<Class<'a>>) -> Self {
        Instance {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    pub fn class(&self) -> &Rc<Class<'a>> {
        &self.class
    }

    /// Property read: fields shadow methods; methods come back bound to
    /// this instance.
    pub fn get(self: &Rc<Self>, name: &Token<'_>) -> Result<Value<'a>, RuntimeError> {
        if let Some(value) = self.fields.borrow().get(name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = self.class.find_method(name.lexeme) {
            return Ok(Value::Function(Rc::new(method.bind(Rc::clone(self)))));
        }

        Err(RuntimeError::new(
            RuntimeErrorKind::UndefinedProperty,
            name,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    pub fn set(&self, name: &Token<'_>, value: Value<'a>) {
        self.fields.borrow_mut().insert(name.lexeme.to_string(), value);
    }
}

impl<'a> fmt::Debug for Instance<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance>", self.class.name)
    }
}
