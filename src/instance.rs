use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::class::Class;
use crate::interpreter::{IResult, InterpretError};
use crate::token::Token;
use crate::value::Value;

/// An instance of a class: created empty except for whatever the initializer
/// populates.  Fields are never declared in advance; any name can be set.
#[derive(Debug)]
pub struct Instance<'src> {
    pub class: Rc<Class<'src>>,
    fields: RefCell<HashMap<String, Value<'src>>>,
}

impl<'src> Instance<'src> {
    pub fn new(class: Rc<Class<'src>>) -> Self {
        Instance {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// Property read: the field map first, then the class's method table.
    /// A method hit binds `instanta` to this instance lazily, producing a
    /// fresh bound callable per lookup.
    pub fn get(this: &Rc<Instance<'src>>, name: &Token<'src>) -> IResult<'src, Value<'src>> {
        if let Some(value) = this.fields.borrow().get(name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = this.class.find_method(name.lexeme) {
            let bound = method.bind(Value::Instance(this.clone()));

            return Ok(Value::Function(Rc::new(bound)));
        }

        Err(InterpretError::runtime(
            name.line,
            format!("Undefined property '{}'", name.lexeme),
        ))
    }

    /// Property write: always straight into the field map.
    pub fn set(&self, name: &str, value: Value<'src>) {
        self.fields.borrow_mut().insert(name.to_string(), value);
    }
}
