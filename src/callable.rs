//! User-defined and native callables.
//!
//! Both kinds share the same capability contract - an expected argument
//! count plus a `call` taking the interpreter and the evaluated arguments -
//! so the evaluator can invoke either without knowing which it has, and the
//! CLI can inject extra natives without touching the evaluator.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::environment::Environment;
use crate::interpreter::{IResult, InterpretError, Interpreter};
use crate::stmt::FunctionDecl;
use crate::value::Value;

/// Name the initializer method must carry for a class to run it on
/// instantiation.
pub const INITIALIZER_NAME: &str = "init";

/// A user-declared function or method: its declaration, the environment
/// captured at declaration time, and whether it is a class initializer.
#[derive(Debug)]
pub struct Function<'src> {
    declaration: Rc<FunctionDecl<'src>>,
    closure: Rc<RefCell<Environment<'src>>>,
    is_initializer: bool,
}

impl<'src> Function<'src> {
    pub fn new(
        declaration: Rc<FunctionDecl<'src>>,
        closure: Rc<RefCell<Environment<'src>>>,
        is_initializer: bool,
    ) -> Self {
        Function {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &'src str {
        self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Invoke the function: a fresh environment whose enclosing scope is the
    /// closure, one binding per parameter in declaration order, then the
    /// body.  A `returneaza` unwinds to here; an initializer yields the
    /// bound instance no matter what was returned.
    pub fn call(
        &self,
        interpreter: &mut Interpreter<'src>,
        arguments: &[Value<'src>],
    ) -> IResult<'src, Value<'src>> {
        debug!("Calling <fn {}>", self.name());

        let environment = Rc::new(RefCell::new(Environment::with_enclosing(
            self.closure.clone(),
        )));

        for (param, value) in self.declaration.params.iter().zip(arguments.iter()) {
            environment.borrow_mut().define(param.lexeme, value.clone());
        }

        let result = interpreter.execute_block(&self.declaration.body, environment);

        match result {
            Ok(()) => {
                if self.is_initializer {
                    self.bound_instance()
                } else {
                    Ok(Value::Nil)
                }
            }

            Err(InterpretError::ReturnSignal { value, .. }) => {
                if self.is_initializer {
                    self.bound_instance()
                } else {
                    Ok(value)
                }
            }

            Err(e) => Err(e),
        }
    }

    /// Produce a copy of this method with `instanta` bound to `instance`,
    /// through a one-slot environment wrapped around the closure.  Each
    /// property lookup creates a fresh bound callable.
    pub fn bind(&self, instance: Value<'src>) -> Function<'src> {
        let environment = Rc::new(RefCell::new(Environment::with_enclosing(
            self.closure.clone(),
        )));

        environment.borrow_mut().define("instanta", instance);

        Function {
            declaration: self.declaration.clone(),
            closure: environment,
            is_initializer: self.is_initializer,
        }
    }

    /// The instance an initializer was bound to (slot 0 of its closure).
    fn bound_instance(&self) -> IResult<'src, Value<'src>> {
        Environment::get_at(&self.closure, 0, "instanta").map_err(|message| {
            InterpretError::runtime(self.declaration.name.line, message)
        })
    }
}

/// A host-provided function injected into the global scope.
#[derive(Debug)]
pub struct NativeFunction<'src> {
    pub name: String,
    pub arity: usize,
    pub func: fn(&[Value<'src>]) -> Result<Value<'src>, String>,
}
