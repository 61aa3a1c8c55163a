use std::collections::HashMap;
use std::rc::Rc;

use crate::callable::{Function, INITIALIZER_NAME};

/// A class object: name, optional superclass, and the method table built
/// from its declaration.
///
/// The superclass chain is acyclic by construction - a class cannot be
/// declared as its own ancestor - so `find_method` can walk it freely.
#[derive(Debug)]
pub struct Class<'src> {
    pub name: &'src str,
    pub superclass: Option<Rc<Class<'src>>>,
    methods: HashMap<String, Rc<Function<'src>>>,
}

impl<'src> Class<'src> {
    pub fn new(
        name: &'src str,
        superclass: Option<Rc<Class<'src>>>,
        methods: HashMap<String, Rc<Function<'src>>>,
    ) -> Self {
        Class {
            name,
            superclass,
            methods,
        }
    }

    /// Look up a method: the class's own table first, then the superclass
    /// chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function<'src>>> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        match &self.superclass {
            Some(superclass) => superclass.find_method(name),
            None => None,
        }
    }

    /// Calling a class expects as many arguments as its initializer takes,
    /// or none when there is no initializer.
    pub fn arity(&self) -> usize {
        self.find_method(INITIALIZER_NAME)
            .map_or(0, |init| init.arity())
    }
}
