use thiserror::Error;

/// Failure of a single exact-arithmetic step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivideByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

/// Why an action was refused. Refused actions never change the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no session exists")]
    NoSession,
    #[error("round is not active")]
    RoundOver,
    #[error("round is still in progress")]
    RoundInProgress,
    #[error("turn is held by {0}")]
    TurnHeld(String),
    #[error("caller does not hold the turn")]
    NotTurnHolder,
    #[error("card {0} does not exist")]
    UnknownCard(u32),
    #[error("card {0} is selected by another participant")]
    ForeignCard(u32),
    #[error("no card is selected")]
    NoSelection,
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
