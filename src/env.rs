use failure::Error;
use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::RunError;
use crate::values::Value;

/// The “memory” of the interpreter: an ordered list of bindings plus an
/// optional parent frame, passed around in an Rc<RefCell<>> so that frames
/// and the closures created inside them can share ownership.
///
/// A symbol appears at most once per frame; the parent chain is acyclic and
/// ends at the root frame.
#[derive(Debug, Clone)]
pub struct Env {
    pub bindings: Vec<(String, Value)>,
    pub parent: Option<EnvRef>,
}

/// an interior-mutable, reference-counted smart pointer wrapper around an `Env`
pub type EnvRef = Rc<RefCell<Env>>;

impl Env {
    /// create a new frame under the given parent (None for the root frame)
    pub fn new(parent: Option<EnvRef>) -> Env {
        Env {
            bindings: Vec::new(),
            parent,
        }
    }

    /// wrap a fresh child frame of `parent` into an EnvRef
    pub fn child(parent: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Env::new(Some(parent))))
    }

    /// add a binding to this frame; rebinding a symbol already present here
    /// is an error
    pub fn add(&mut self, name: &str, value: Value) -> Result<(), Error> {
        if self.bindings.iter().any(|(bound, _)| bound == name) {
            Err(RunError::DuplicateBinding(name.to_owned()))?
        }

        self.bindings.push((name.to_owned(), value));
        Ok(())
    }

    /// resolve a symbol to its bound value, searching this frame and then
    /// the parent chain
    pub fn get(&self, name: &str) -> Result<Value, Error> {
        for (bound, value) in &self.bindings {
            if bound == name {
                return Ok(value.clone());
            }
        }

        match &self.parent {
            Some(parent) => parent.borrow().get(name),
            None => Err(RunError::UnboundVariable(name.to_owned()).into()),
        }
    }

    /// overwrite the nearest enclosing binding for a symbol, searching this
    /// frame and then the parent chain
    pub fn update(&mut self, name: &str, value: Value) -> Result<(), Error> {
        for (bound, slot) in &mut self.bindings {
            if bound.as_str() == name {
                *slot = value;
                return Ok(());
            }
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().update(name, value),
            None => Err(RunError::UnboundVariable(name.to_owned()).into()),
        }
    }
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Value::*;

    #[test]
    fn add_then_get() {
        let mut env = Env::new(None);
        env.add("x", Integer(1)).unwrap();
        assert_eq!(env.get("x").unwrap(), Integer(1));
    }

    #[test]
    fn duplicate_add_is_an_error() {
        let mut env = Env::new(None);
        env.add("x", Integer(1)).unwrap();
        let err = env.add("x", Integer(2)).unwrap_err();
        assert_eq!(
            err.downcast::<RunError>().unwrap(),
            RunError::DuplicateBinding("x".to_owned())
        );
    }

    #[test]
    fn get_walks_the_parent_chain() {
        let root = Rc::new(RefCell::new(Env::new(None)));
        root.borrow_mut().add("x", Integer(1)).unwrap();
        let child = Env::child(root);
        assert_eq!(child.borrow().get("x").unwrap(), Integer(1));
    }

    #[test]
    fn get_prefers_the_innermost_binding() {
        let root = Rc::new(RefCell::new(Env::new(None)));
        root.borrow_mut().add("x", Integer(1)).unwrap();
        let child = Env::child(root);
        child.borrow_mut().add("x", Integer(2)).unwrap();
        assert_eq!(child.borrow().get("x").unwrap(), Integer(2));
    }

    #[test]
    fn get_miss_at_root_is_unbound() {
        let env = Env::new(None);
        let err = env.get("nope").unwrap_err();
        assert_eq!(
            err.downcast::<RunError>().unwrap(),
            RunError::UnboundVariable("nope".to_owned())
        );
    }

    #[test]
    fn update_overwrites_in_the_owning_frame() {
        let root = Rc::new(RefCell::new(Env::new(None)));
        root.borrow_mut().add("x", Integer(1)).unwrap();
        let child = Env::child(root.clone());
        child.borrow_mut().update("x", Integer(9)).unwrap();
        assert_eq!(root.borrow().get("x").unwrap(), Integer(9));
        assert!(child.borrow().bindings.is_empty());
    }

    #[test]
    fn update_miss_at_root_is_unbound() {
        let mut env = Env::new(None);
        let err = env.update("nope", Integer(1)).unwrap_err();
        assert_eq!(
            err.downcast::<RunError>().unwrap(),
            RunError::UnboundVariable("nope".to_owned())
        );
    }
}
// }}}
