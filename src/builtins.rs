use failure::Error;

use crate::env::EnvRef;
use crate::errors::RunError;
use crate::values::PrimitiveFn;
use crate::values::Value::{self, *};

/// the primitive procedures seeded into the root frame
pub const PRIMITIVES: &[(&str, PrimitiveFn)] = &[
    ("+",     add),
    ("-",     sub),
    ("=",     num_eq),
    ("<",     less_than),
    (">",     greater_than),
    ("null?", null),
    ("car",   car),
    ("cdr",   cdr),
    ("cons",  cons),
];

/// seed the registry into the root frame, before any user form runs
pub fn install(env: &EnvRef) {
    let mut env = env.borrow_mut();
    // registry names are distinct, so the duplicate check is not needed
    for (name, func) in PRIMITIVES {
        env.bindings.push((name.to_string(), Primitive(*func)));
    }
}

// {{{ helpful macros
/// return from a function if the argument list $args doesn't contain $num elements
#[macro_export]
macro_rules! check_num_args {
    ($args: ident, $num: expr, $name: expr) => {{
        if $args.len() != $num {
            Err($crate::errors::RunError::WrongNumArgs {
                name: $name.to_string(),
                expected: $num,
                got: $args.len(),
            })
        } else {
            Ok(())
        }
    }};
}
// }}}

// {{{ arithmetic
/// fold an argument list with an arithmetic op
///
/// Integer accumulation switches to double precision at the first Float
/// operand and stays there for the rest of the call. No operands at all
/// folds to Integer 0.
fn arith(op: &str, args: Value) -> Result<Value, Error> {
    let mut args = args.into_vec();

    // every operand must be a number
    for arg in &args {
        match arg {
            Integer(_) | Float(_) => continue,
            other => Err(RunError::TypeError {
                name: op.to_string(),
                expected: "number".to_string(),
                got: other.type_name().to_string(),
            })?,
        }
    }

    if args.is_empty() {
        return Ok(Integer(0));
    }

    let init = args.remove(0);
    let result = match op {
        "+" => args.into_iter().fold(init, |acc, n| acc + n),
        "-" => args.into_iter().fold(init, |acc, n| acc - n),
        _ => unreachable!("'{}' is not an arithmetic operator", op),
    };

    Ok(result)
}

/// sum zero or more numbers
/// usage: (+ <num> ...)
pub fn add(args: Value) -> Result<Value, Error> {
    arith("+", args)
}

/// subtract the rest from the first number; a lone argument comes back
/// unchanged rather than negated
/// usage: (- <num> <num> ...)
pub fn sub(args: Value) -> Result<Value, Error> {
    arith("-", args)
}
// }}}

// {{{ comparison
/// compare exactly two numbers by value
/// usage: (= <num> <num>)
///        (< <num> <num>)
///        (> <num> <num>)
fn compare(op: &str, args: Value) -> Result<Value, Error> {
    let args = args.into_vec();
    check_num_args!(args, 2, op)?;

    for arg in &args {
        match arg {
            Integer(_) | Float(_) => continue,
            other => Err(RunError::TypeError {
                name: op.to_string(),
                expected: "number".to_string(),
                got: other.type_name().to_string(),
            })?,
        }
    }

    let result = match op {
        "=" => args[0] == args[1],
        "<" => args[0] < args[1],
        ">" => args[0] > args[1],
        _ => unreachable!("'{}' is not a comparison operator", op),
    };

    Ok(Bool(result))
}

pub fn num_eq(args: Value) -> Result<Value, Error> {
    compare("=", args)
}

pub fn less_than(args: Value) -> Result<Value, Error> {
    compare("<", args)
}

pub fn greater_than(args: Value) -> Result<Value, Error> {
    compare(">", args)
}
// }}}

// {{{ pairs and lists
/// test for the empty list
/// usage: (null? <expr>)
pub fn null(args: Value) -> Result<Value, Error> {
    let args = args.into_vec();
    check_num_args!(args, 1, "null?")?;

    Ok(Bool(args[0] == EmptyList))
}

/// return the head of a pair
/// usage: (car <pair>)
pub fn car(args: Value) -> Result<Value, Error> {
    let mut args = args.into_vec();
    check_num_args!(args, 1, "car")?;

    match args.pop().unwrap() {
        Pair(head, _) => Ok(*head),
        other => Err(RunError::TypeError {
            name: "car".to_string(),
            expected: "Pair".to_string(),
            got: other.type_name().to_string(),
        }
        .into()),
    }
}

/// return the tail of a pair
/// usage: (cdr <pair>)
pub fn cdr(args: Value) -> Result<Value, Error> {
    let mut args = args.into_vec();
    check_num_args!(args, 1, "cdr")?;

    match args.pop().unwrap() {
        Pair(_, tail) => Ok(*tail),
        other => Err(RunError::TypeError {
            name: "cdr".to_string(),
            expected: "Pair".to_string(),
            got: other.type_name().to_string(),
        }
        .into()),
    }
}

/// build a fresh pair
/// usage: (cons <expr> <expr>)
pub fn cons(args: Value) -> Result<Value, Error> {
    let mut args = args.into_vec();
    check_num_args!(args, 2, "cons")?;

    let tail = args.pop().unwrap();
    let head = args.pop().unwrap();
    Ok(Value::cons(head, tail))
}
// }}}

// }}}
