use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One scope's name→value bindings plus the link to its enclosing scope.
///
/// Scopes form a shared linked chain: multiple closures may hold the same
/// node, so nodes live behind `Rc<RefCell<…>>` and a child never owns its
/// parent outright.  A lookup walks outward until a binding is found or the
/// chain ends at the global environment (`enclosing == None`).
#[derive(Debug)]
pub struct Environment<'src> {
    values: HashMap<String, Value<'src>>,
    pub enclosing: Option<Rc<RefCell<Environment<'src>>>>,
}

impl<'src> Environment<'src> {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment<'src>>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn define(&mut self, name: &str, value: Value<'src>) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Result<Value<'src>, String> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(format!("Undefined variable '{}'", name))
        }
    }

    pub fn assign(&mut self, name: &str, value: Value<'src>) -> Result<(), String> {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(format!("Undefined variable '{}'", name))
        }
    }

    /// Walk exactly `distance` enclosing links.
    ///
    /// The resolver only hands out distances it derived from the same lexical
    /// structure the chain was built from, so the chain is always long enough.
    fn ancestor(
        env: &Rc<RefCell<Environment<'src>>>,
        distance: usize,
    ) -> Rc<RefCell<Environment<'src>>> {
        let mut env: Rc<RefCell<Environment<'src>>> = env.clone();

        for _ in 0..distance {
            let next = env
                .borrow()
                .enclosing
                .as_ref()
                .expect("environment chain shorter than resolved depth")
                .clone();

            env = next;
        }

        env
    }

    /// Read a binding at a resolved distance.
    pub fn get_at(
        env: &Rc<RefCell<Environment<'src>>>,
        distance: usize,
        name: &str,
    ) -> Result<Value<'src>, String> {
        let scope = Self::ancestor(env, distance);

        let value = scope
            .borrow()
            .values
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Undefined variable '{}'", name));

        value
    }

    /// Write a binding at a resolved distance.
    pub fn assign_at(
        env: &Rc<RefCell<Environment<'src>>>,
        distance: usize,
        name: &str,
        value: Value<'src>,
    ) -> Result<(), String> {
        let scope = Self::ancestor(env, distance);
        let mut scope = scope.borrow_mut();

        if scope.values.contains_key(name) {
            scope.values.insert(name.to_string(), value);
            Ok(())
        } else {
            Err(format!("Undefined variable '{}'", name))
        }
    }
}

impl Default for Environment<'_> {
    fn default() -> Self {
        Self::new()
    }
}
