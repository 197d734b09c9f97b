use failure::Error;

use crate::errors::ParseError;
use crate::values::Value::{self, *};

/// scan a string of code into a flat token sequence
///
/// Parentheses become the `Open`/`Close` marker values; everything else
/// becomes a literal or symbol atom. No nesting information is carried;
/// that is reconstructed by `parse`.
pub fn tokenize(source: String) -> Vec<Value> {
    let mut tokens: Vec<Value> = Vec::new();
    let mut item = String::new();

    let mut escaped_state = false;
    let mut string_state = false;
    let mut comment_state = false;

    for c in source.chars() {
        if comment_state {
            if c == '\n' {
                comment_state = false;
            }
        } else if !string_state {
            match c {
                '(' => {
                    push_item(&mut item, &mut tokens);
                    tokens.push(Open);
                }

                ')' => {
                    push_item(&mut item, &mut tokens);
                    tokens.push(Close);
                }

                c if c.is_whitespace() => push_item(&mut item, &mut tokens),

                '"' => {
                    string_state = true;
                    item.push('"');
                }

                ';' => {
                    push_item(&mut item, &mut tokens);
                    comment_state = true;
                }

                _ => item.push(c),
            }
        } else if !escaped_state {
            match c {
                '\\' => escaped_state = true,

                '"' => {
                    string_state = false;
                    item.push('"');
                    push_item(&mut item, &mut tokens);
                }

                _ => item.push(c),
            }
        } else {
            escaped_state = false;
            item.push('\\');
            item.push(c);
        }
    }

    push_item(&mut item, &mut tokens);
    tokens
}

fn push_item(item: &mut String, tokens: &mut Vec<Value>) {
    if item.len() != 0 {
        tokens.push(atomize(item.clone()));
        item.clear();
    }
}

/// classify an item into an atom
fn atomize(mut item: String) -> Value {
    if let Ok(n) = item.parse::<i64>() {
        Integer(n)
    } else if let Ok(n) = item.parse::<f64>() {
        Float(n)
    } else if &item == "#t" {
        Bool(true)
    } else if &item == "#f" {
        Bool(false)
    } else if item.starts_with('"') && item.ends_with('"') && item.len() > 1 {
        item.pop();
        item.remove(0);
        Str(item)
    } else {
        Symbol(item)
    }
}

/// assemble a flat token sequence into the top-level list of parse trees
///
/// Works a single accumulator stack: atoms and `Open` markers are pushed as
/// they come; a `Close` marker pops everything back to the nearest `Open`
/// into one nested list, which replaces it on the stack. A `Close` with no
/// matching `Open` on the stack, or an `Open` still on the stack once all
/// tokens are consumed, is a syntax error.
pub fn parse(tokens: Vec<Value>) -> Result<Vec<Value>, Error> {
    let mut stack: Vec<Value> = Vec::new();

    for token in tokens {
        match token {
            Close => {
                let mut tree = EmptyList;
                loop {
                    match stack.pop() {
                        Some(Open) => break,
                        Some(value) => tree = Value::cons(value, tree),
                        None => Err(ParseError::TooManyCloseParens)?,
                    }
                }

                // a bare marker pair yields a single-element list holding
                // the empty list, not the empty list itself
                if let EmptyList = tree {
                    tree = Value::cons(EmptyList, EmptyList);
                }

                stack.push(tree);
            }

            token => stack.push(token),
        }
    }

    for tree in &stack {
        if let Open = tree {
            Err(ParseError::NotEnoughCloseParens)?
        }
    }

    Ok(stack)
}

// }}}
