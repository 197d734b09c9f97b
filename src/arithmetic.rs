use crate::values::Value::{self, *};
use std::ops;

// Pairwise ops behind the variadic `+` and `-` primitives. A Float on
// either side forces the Float result that makes promotion sticky across
// a whole fold. Operands are type-checked before any fold starts.

impl ops::Add for Value {
    type Output = Value;

    fn add(self, other: Value) -> Value {
        match (self, other) {
            (Integer(a), Integer(b)) => Integer(a + b),
            (Float(a), Float(b))     => Float(a + b),
            (Integer(a), Float(b))   => Float(a as f64 + b),
            (Float(a), Integer(b))   => Float(a + (b as f64)),
            _ => unreachable!("adding non-numbers"),
        }
    }
}

impl ops::Sub for Value {
    type Output = Value;

    fn sub(self, other: Value) -> Value {
        match (self, other) {
            (Integer(a), Integer(b)) => Integer(a - b),
            (Float(a), Float(b))     => Float(a - b),
            (Integer(a), Float(b))   => Float(a as f64 - b),
            (Float(a), Integer(b))   => Float(a - (b as f64)),
            _ => unreachable!("subtracting non-numbers"),
        }
    }
}

// }}}
