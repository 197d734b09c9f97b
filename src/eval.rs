use failure::Error;

use crate::check_num_args;
use crate::env::{Env, EnvRef};
use crate::errors::RunError;
use crate::values::Lambda;
use crate::values::Value::{self, *};

/// evaluate a parse tree in the context of the given frame
pub fn eval(expr: Value, env: EnvRef) -> Result<Value, Error> {
    match expr {
        Integer(_) | Float(_) | Str(_) | Bool(_) => Ok(expr),

        Symbol(name) => lookup(&name, &env),

        Pair(head, tail) => {
            let first = *head;
            let args = *tail;

            match first {
                Symbol(name) => match name.as_str() {
                    "if"     => eval_if(args, env),
                    "quote"  => eval_quote(args),
                    "define" => eval_define(args, env),
                    "lambda" => eval_lambda(args, env),
                    "let"    => eval_let(args, env),
                    "letrec" => eval_letrec(args, env),
                    "set!"   => eval_set_bang(args, env),
                    "begin"  => eval_begin(args, env),

                    _ => {
                        let operator = lookup(&name, &env)?;
                        // car and cdr historically skip the order-restoring
                        // reversal of their evaluated arguments; preserved
                        // as observed
                        let needs_reversal = name != "car" && name != "cdr";
                        let evaled_args = eval_each(args, env, needs_reversal)?;
                        apply(operator, evaled_args)
                    }
                },

                first @ Pair(_, _) => {
                    let operator = eval(first, env.clone())?;
                    let evaled_args = eval_each(args, env, true)?;
                    apply(operator, evaled_args)
                }

                other => Err(RunError::Uncallable {
                    name: other.to_string(),
                    typename: other.type_name().to_owned(),
                }
                .into()),
            }
        }

        other => Err(RunError::Uncallable {
            name: other.to_string(),
            typename: other.type_name().to_owned(),
        }
        .into()),
    }
}

/// resolve a symbol through the frame chain; a variable still holding the
/// letrec placeholder has been read before its initializer completed
fn lookup(name: &str, env: &EnvRef) -> Result<Value, Error> {
    match env.borrow().get(name)? {
        Unspecified => Err(RunError::ForwardReference(name.to_owned()).into()),
        value => Ok(value),
    }
}

/// evaluate every operand left-to-right
///
/// Results accumulate by consing onto the front of the list, which reverses
/// them; `needs_reversal` restores the original order afterwards.
fn eval_each(args: Value, env: EnvRef, needs_reversal: bool) -> Result<Value, Error> {
    let mut evaled = EmptyList;
    let mut rest = args;

    while let Pair(head, tail) = rest {
        evaled = Value::cons(eval(*head, env.clone())?, evaled);
        rest = *tail;
    }

    if needs_reversal {
        evaled = evaled.reverse();
    }

    Ok(evaled)
}

/// apply a procedure to an already-evaluated argument list
pub fn apply(operator: Value, args: Value) -> Result<Value, Error> {
    match operator {
        Primitive(func) => func(args),

        Closure(closure) => {
            let Lambda { params, body, env } = *closure;

            let args = args.into_vec();
            if args.len() != params.len() {
                Err(RunError::WrongNumArgs {
                    name: "#<procedure>".to_owned(),
                    expected: params.len(),
                    got: args.len(),
                })?
            }

            let frame = Env::child(env);
            for (param, value) in params.iter().zip(args) {
                frame.borrow_mut().add(param, value)?;
            }

            eval_body(body, frame)
        }

        other => Err(RunError::Uncallable {
            name: other.to_string(),
            typename: other.type_name().to_owned(),
        }
        .into()),
    }
}

/// evaluate an expression sequence, returning the last value
fn eval_body(body: Vec<Value>, env: EnvRef) -> Result<Value, Error> {
    let mut result = Void;
    for expr in body {
        result = eval(expr, env.clone())?;
    }
    Ok(result)
}

// {{{ special forms
/// evaluate the predicate, then only the chosen branch
/// usage: (if <bool-expr> <conseq-expr> <alternate-expr>)
fn eval_if(args: Value, env: EnvRef) -> Result<Value, Error> {
    let mut args = args.into_vec();
    check_num_args!(args, 3, "if")?;

    let alt = args.pop().unwrap();
    let conseq = args.pop().unwrap();
    let predicate = eval(args.pop().unwrap(), env.clone())?;

    match predicate {
        Bool(true) => eval(conseq, env),
        Bool(false) => eval(alt, env),
        other => Err(RunError::TypeError {
            name: "if".to_owned(),
            expected: "Bool".to_owned(),
            got: other.type_name().to_owned(),
        }
        .into()),
    }
}

/// return the single argument unevaluated
/// usage: (quote <expr>)
fn eval_quote(args: Value) -> Result<Value, Error> {
    let mut args = args.into_vec();
    check_num_args!(args, 1, "quote")?;
    Ok(args.pop().unwrap())
}

/// evaluate an expression and bind the result in the current frame
/// usage: (define <symbol> <expr>)
fn eval_define(args: Value, env: EnvRef) -> Result<Value, Error> {
    let mut args = args.into_vec();
    check_num_args!(args, 2, "define")?;

    let expr = args.pop().unwrap();
    let name = symbol_name(args.pop().unwrap(), "define")?;

    let result = eval(expr, env.clone())?;
    env.borrow_mut().add(&name, result)?;
    Ok(Void)
}

/// build a closure capturing the current frame
/// usage: (lambda (<param> ...) <body-expr> ...)
fn eval_lambda(args: Value, env: EnvRef) -> Result<Value, Error> {
    let mut args = args.into_vec();
    if args.len() < 2 {
        Err(RunError::TooFewArgs {
            name: "lambda".to_owned(),
            expected: 2,
            got: args.len(),
        })?
    }

    let body = args.split_off(1);
    let params = param_names(args.pop().unwrap())?;

    Ok(Closure(Box::new(Lambda { params, body, env })))
}

/// check a lambda's parameter list: a proper list of distinct symbols,
/// where a bare empty-list element means “no parameters”
fn param_names(params: Value) -> Result<Vec<String>, Error> {
    let mut names: Vec<String> = Vec::new();
    let mut param = params;

    loop {
        match param {
            EmptyList => break,

            Pair(head, tail) => {
                match *head {
                    // how a source-level `()` parameter list arrives
                    EmptyList => {}

                    Symbol(name) => {
                        if names.contains(&name) {
                            return Err(RunError::DuplicateBinding(name).into());
                        }
                        names.push(name);
                    }

                    other => {
                        return Err(RunError::TypeError {
                            name: "lambda".to_owned(),
                            expected: "Symbol".to_owned(),
                            got: other.type_name().to_owned(),
                        }
                        .into())
                    }
                }
                param = *tail;
            }

            other => {
                return Err(RunError::TypeError {
                    name: "lambda".to_owned(),
                    expected: "Pair".to_owned(),
                    got: other.type_name().to_owned(),
                }
                .into())
            }
        }
    }

    Ok(names)
}

/// bind locals evaluated in the outer frame, then run the body in a new frame
/// usage: (let ((<symbol> <expr>) ...) <body-expr> ...)
fn eval_let(args: Value, env: EnvRef) -> Result<Value, Error> {
    let mut args = args.into_vec();
    if args.len() < 2 {
        Err(RunError::TooFewArgs {
            name: "let".to_owned(),
            expected: 2,
            got: args.len(),
        })?
    }

    let body = args.split_off(1);
    let bindings = binding_pairs(args.pop().unwrap(), "let")?;

    let frame = Env::child(env.clone());
    for (name, expr) in bindings {
        let value = eval(expr, env.clone())?;
        frame.borrow_mut().add(&name, value)?;
    }

    eval_body(body, frame)
}

/// bind locals that may refer to one another, then run the body
///
/// Every name is first bound to a placeholder, then every initializer is
/// evaluated in the new frame (a sibling may be captured inside a lambda
/// body, but reading one that still holds the placeholder is an error),
/// and only then are the placeholders overwritten with the results.
/// usage: (letrec ((<symbol> <expr>) ...) <body-expr> ...)
fn eval_letrec(args: Value, env: EnvRef) -> Result<Value, Error> {
    let mut args = args.into_vec();
    if args.len() < 2 {
        Err(RunError::TooFewArgs {
            name: "letrec".to_owned(),
            expected: 2,
            got: args.len(),
        })?
    }

    let body = args.split_off(1);
    let bindings = binding_pairs(args.pop().unwrap(), "letrec")?;

    let frame = Env::child(env);
    for (name, _) in &bindings {
        frame.borrow_mut().add(name, Unspecified)?;
    }

    let mut evaluated = Vec::with_capacity(bindings.len());
    for (name, expr) in bindings {
        let value = eval(expr, frame.clone())?;
        evaluated.push((name, value));
    }

    for (name, value) in evaluated {
        frame.borrow_mut().update(&name, value)?;
    }

    eval_body(body, frame)
}

/// overwrite the nearest enclosing binding for a symbol
/// usage: (set! <symbol> <expr>)
fn eval_set_bang(args: Value, env: EnvRef) -> Result<Value, Error> {
    let mut args = args.into_vec();
    check_num_args!(args, 2, "set!")?;

    let expr = args.pop().unwrap();
    let name = symbol_name(args.pop().unwrap(), "set!")?;

    let value = eval(expr, env.clone())?;
    env.borrow_mut().update(&name, value)?;
    Ok(Void)
}

/// evaluate a sequence in the current frame; an empty sequence yields Void
/// usage: (begin <expr> ...)
fn eval_begin(args: Value, env: EnvRef) -> Result<Value, Error> {
    eval_body(args.into_vec(), env)
}

/// extract a symbol's name where a form requires one
fn symbol_name(value: Value, form: &str) -> Result<String, Error> {
    match value {
        Symbol(name) => Ok(name),
        other => Err(RunError::TypeError {
            name: form.to_owned(),
            expected: "Symbol".to_owned(),
            got: other.type_name().to_owned(),
        }
        .into()),
    }
}

/// pull apart a let-style binding list into (name, expression) pairs
///
/// An empty-list element is how a source-level `()` binding list arrives
/// and contributes no bindings.
fn binding_pairs(bindings: Value, form: &str) -> Result<Vec<(String, Value)>, Error> {
    match &bindings {
        Pair(_, _) | EmptyList => {}
        other => {
            return Err(RunError::TypeError {
                name: form.to_owned(),
                expected: "Pair".to_owned(),
                got: other.type_name().to_owned(),
            }
            .into())
        }
    }

    let mut pairs = Vec::new();
    for binding in bindings.into_vec() {
        match binding {
            EmptyList => {}

            binding @ Pair(_, _) => {
                let mut parts = binding.into_vec();
                check_num_args!(parts, 2, format!("{} (in binding)", form))?;
                let expr = parts.pop().unwrap();
                let name = symbol_name(parts.pop().unwrap(), form)?;
                pairs.push((name, expr));
            }

            other => Err(RunError::TypeError {
                name: format!("{} (in binding)", form),
                expected: "Pair".to_owned(),
                got: other.type_name().to_owned(),
            })?,
        }
    }

    Ok(pairs)
}
// }}}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn root() -> EnvRef {
        Rc::new(RefCell::new(Env::new(None)))
    }

    fn run_err(expr: Value, env: EnvRef) -> RunError {
        eval(expr, env).unwrap_err().downcast::<RunError>().unwrap()
    }

    #[test]
    fn literals_self_evaluate() {
        let env = root();
        assert_eq!(eval(Integer(3), env.clone()).unwrap(), Integer(3));
        assert_eq!(
            eval(Str("hello".to_owned()), env.clone()).unwrap(),
            Str("hello".to_owned())
        );
        assert_eq!(eval(Bool(true), env).unwrap(), Bool(true));
    }

    #[test]
    fn empty_list_is_not_callable() {
        assert_eq!(
            run_err(EmptyList, root()),
            RunError::Uncallable {
                name: "()".to_owned(),
                typename: "EmptyList".to_owned(),
            }
        );
    }

    #[test]
    fn non_procedure_head_is_not_callable() {
        let expr = Value::list(vec![Integer(5), Integer(1)]);
        assert_eq!(
            run_err(expr, root()),
            RunError::Uncallable {
                name: "5".to_owned(),
                typename: "Integer".to_owned(),
            }
        );
    }

    #[test]
    fn unbound_symbol() {
        assert_eq!(
            run_err(Symbol("ghost".to_owned()), root()),
            RunError::UnboundVariable("ghost".to_owned())
        );
    }

    #[test]
    fn apply_rejects_non_procedures() {
        let err = apply(Integer(7), EmptyList)
            .unwrap_err()
            .downcast::<RunError>()
            .unwrap();
        assert_eq!(
            err,
            RunError::Uncallable {
                name: "7".to_owned(),
                typename: "Integer".to_owned(),
            }
        );
    }
}
// }}}
