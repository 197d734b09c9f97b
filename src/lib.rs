#[macro_use]
extern crate failure_derive;

mod arithmetic;
mod builtins;
pub mod env;
pub mod errors;
mod eval;
mod file;
mod log;
mod parser;
pub mod values;

use failure::Error;
use std::cell::RefCell;
use std::rc::Rc;

use crate::env::{Env, EnvRef};
use crate::values::Value;

/// an execution context: one shared global frame with no parent, seeded
/// with the primitive procedures before any user form is evaluated
#[derive(Clone)]
pub struct Interpreter {
    pub env: EnvRef,
}

impl Interpreter {
    /// create a new Interpreter with a fresh root frame
    pub fn new() -> Interpreter {
        let env = Rc::new(RefCell::new(Env::new(None)));
        builtins::install(&env);
        Interpreter { env }
    }

    /// parse and evaluate a string of code
    ///
    /// Every top-level form runs against the shared global frame, in order.
    /// The first error aborts the rest of the batch; on success the result
    /// of every form is returned, Void results included.
    pub fn run<S: Into<String>>(&self, code: S) -> Result<Vec<Value>, Error> {
        let tokens = parser::tokenize(code.into());
        let trees = parser::parse(tokens)?;

        let mut results = Vec::with_capacity(trees.len());
        for tree in trees {
            results.push(eval::eval(tree, self.env.clone())?);
        }

        Ok(results)
    }
}

// }}}
