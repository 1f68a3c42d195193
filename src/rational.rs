use std::fmt;

use spacetimedb::SpacetimeType;

use crate::error::ArithmeticError;

/// Exact fraction, always stored in lowest terms with a positive denominator.
#[derive(SpacetimeType, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a as i64
}

impl Rational {
    pub const ZERO: Rational = Rational { numerator: 0, denominator: 1 };

    /// Build a reduced fraction. A zero denominator is a division by zero.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, ArithmeticError> {
        if denominator == 0 {
            return Err(ArithmeticError::DivideByZero);
        }
        if numerator == 0 {
            return Ok(Self::ZERO);
        }
        let divisor = gcd(numerator, denominator);
        let (mut n, mut d) = (numerator / divisor, denominator / divisor);
        if d < 0 {
            n = n.checked_neg().ok_or(ArithmeticError::Overflow)?;
            d = d.checked_neg().ok_or(ArithmeticError::Overflow)?;
        }
        Ok(Self { numerator: n, denominator: d })
    }

    pub fn integer(value: i64) -> Self {
        Self { numerator: value, denominator: 1 }
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// True when the value is exactly `target` (numerator == target × denominator).
    pub fn equals_integer(&self, target: i64) -> bool {
        self.denominator
            .checked_mul(target)
            .is_some_and(|scaled| scaled == self.numerator)
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        let left = self.numerator.checked_mul(rhs.denominator);
        let right = rhs.numerator.checked_mul(self.denominator);
        let numerator = left
            .zip(right)
            .and_then(|(l, r)| l.checked_add(r))
            .ok_or(ArithmeticError::Overflow)?;
        let denominator = self
            .denominator
            .checked_mul(rhs.denominator)
            .ok_or(ArithmeticError::Overflow)?;
        Self::new(numerator, denominator)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, ArithmeticError> {
        let negated = rhs.numerator.checked_neg().ok_or(ArithmeticError::Overflow)?;
        self.checked_add(Self { numerator: negated, denominator: rhs.denominator })
    }

    pub fn checked_mul(self, rhs: Self) -> Result<Self, ArithmeticError> {
        let numerator = self
            .numerator
            .checked_mul(rhs.numerator)
            .ok_or(ArithmeticError::Overflow)?;
        let denominator = self
            .denominator
            .checked_mul(rhs.denominator)
            .ok_or(ArithmeticError::Overflow)?;
        Self::new(numerator, denominator)
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self, ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivideByZero);
        }
        let numerator = self
            .numerator
            .checked_mul(rhs.denominator)
            .ok_or(ArithmeticError::Overflow)?;
        let denominator = self
            .denominator
            .checked_mul(rhs.numerator)
            .ok_or(ArithmeticError::Overflow)?;
        Self::new(numerator, denominator)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}
