use spacetimedb::SpacetimeType;

use crate::error::ArithmeticError;
use crate::rational::Rational;

/// Binary operation a participant can apply to two cards
#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Apply this operation as `left op right`, reducing the result.
    /// Division rejects a zero-valued divisor.
    pub fn apply(&self, left: Rational, right: Rational) -> Result<Rational, ArithmeticError> {
        match self {
            Operation::Add => left.checked_add(right),
            Operation::Subtract => left.checked_sub(right),
            Operation::Multiply => left.checked_mul(right),
            Operation::Divide => left.checked_div(right),
        }
    }

    /// Floating-point evaluation used by the solver's tolerance check
    pub fn apply_f64(&self, left: f64, right: f64) -> f64 {
        match self {
            Operation::Add => left + right,
            Operation::Subtract => left - right,
            Operation::Multiply => left * right,
            Operation::Divide => left / right,
        }
    }

    /// Get the display symbol for this operation
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }
}
