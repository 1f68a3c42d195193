//! Brute-force search for a reverse-Polish sequence that reaches the target.
//!
//! The solver works on the original integer hand, independently of the
//! cards on the board, and is used to reveal an answer after a lost round.

use crate::arithmetic::Operation;
use crate::error::ArithmeticError;
use crate::rational::Rational;

/// Acceptable distance from the target when evaluating in floating point.
const TOLERANCE: f64 = 1e-6;

/// One token of a postfix expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Operand(i64),
    Operator(Operation),
}

/// Find a postfix sequence using every operand exactly once that evaluates to
/// `target`. Returns the first sequence found; `None` if the hand cannot reach it.
pub fn solve(hand: &[i64], target: i64) -> Option<Vec<Token>> {
    if hand.is_empty() {
        return None;
    }
    let length = 2 * hand.len() - 1;
    let mut remaining = hand.to_vec();
    let mut sequence = Vec::with_capacity(length);
    if search(&mut remaining, &mut sequence, target, length) {
        Some(sequence)
    } else {
        None
    }
}

fn search(remaining: &mut Vec<i64>, sequence: &mut Vec<Token>, target: i64, length: usize) -> bool {
    if sequence.len() == length {
        return evaluate(sequence).is_some_and(|value| (value - target as f64).abs() < TOLERANCE);
    }

    // An operator needs two values on the stack; this holds exactly when the
    // operands still to place plus the current length leave room for it.
    if sequence.len() + 2 * remaining.len() < length {
        for op in Operation::ALL {
            sequence.push(Token::Operator(op));
            if search(remaining, sequence, target, length) {
                return true;
            }
            sequence.pop();
        }
    }

    for i in 0..remaining.len() {
        let operand = remaining.remove(i);
        sequence.push(Token::Operand(operand));
        if search(remaining, sequence, target, length) {
            return true;
        }
        sequence.pop();
        remaining.insert(i, operand);
    }
    false
}

/// Evaluate a postfix sequence in floating point. The second value popped is
/// the left operand. `None` for malformed sequences.
pub fn evaluate(tokens: &[Token]) -> Option<f64> {
    let mut stack: Vec<f64> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Operand(value) => stack.push(*value as f64),
            Token::Operator(op) => {
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(op.apply_f64(left, right));
            }
        }
    }
    match stack.as_slice() {
        [value] => Some(*value),
        _ => None,
    }
}

/// Exact evaluation with the same stack discipline as [`evaluate`].
pub fn evaluate_exact(tokens: &[Token]) -> Result<Option<Rational>, ArithmeticError> {
    let mut stack: Vec<Rational> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Operand(value) => stack.push(Rational::integer(*value)),
            Token::Operator(op) => {
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                    return Ok(None);
                };
                stack.push(op.apply(left, right)?);
            }
        }
    }
    Ok(match stack.as_slice() {
        [value] => Some(*value),
        _ => None,
    })
}

/// Render a postfix sequence as a fully parenthesized infix expression.
pub fn render(tokens: &[Token]) -> Option<String> {
    let mut stack: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Operand(value) => stack.push(value.to_string()),
            Token::Operator(op) => {
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(format!("({} {} {})", left, op.symbol(), right));
            }
        }
    }
    if stack.len() == 1 {
        stack.pop()
    } else {
        None
    }
}

/// Human readable answer for a hand: `"(8 / (3 - (8 / 3))) = 24"` or `"No solution"`.
pub fn describe(hand: &[i64], target: i64) -> String {
    solve(hand, target)
        .and_then(|tokens| render(&tokens))
        .map(|expression| format!("{} = {}", expression, target))
        .unwrap_or_else(|| "No solution".to_string())
}
