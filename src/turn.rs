//! Thinking lock: at most one participant at a time may select cards and
//! apply operations, for a bounded interval.

use spacetimedb::{SpacetimeType, Timestamp};

use crate::config::Rules;
use crate::error::Rejection;
use crate::session::SessionState;
use crate::timer::{micros_until, shift};

/// Exclusive claim on the board
#[derive(SpacetimeType, Clone, Debug, PartialEq)]
pub struct ThinkingLock {
    /// Participant holding the turn
    pub holder: String,
    /// When the attempt runs out
    pub deadline: Timestamp,
    /// Round countdown left when the lock was taken, restored verbatim on failure
    pub saved_reset_remaining_micros: i64,
}

#[derive(SpacetimeType, Clone, Debug, PartialEq)]
pub enum TurnState {
    Idle,
    Thinking(ThinkingLock),
}

impl TurnState {
    pub fn is_idle(&self) -> bool {
        matches!(self, TurnState::Idle)
    }
}

impl SessionState {
    pub fn turn_holder(&self) -> Option<&str> {
        match &self.turn {
            TurnState::Thinking(lock) => Some(lock.holder.as_str()),
            TurnState::Idle => None,
        }
    }

    /// Fails unless the round is live and `participant` holds the thinking lock
    pub fn ensure_holder(&self, participant: &str) -> Result<(), Rejection> {
        if !self.active {
            return Err(Rejection::RoundOver);
        }
        match self.turn_holder() {
            Some(holder) if holder == participant => Ok(()),
            _ => Err(Rejection::NotTurnHolder),
        }
    }

    /// Take the thinking lock. Pauses the round countdown, remembering what was left.
    pub fn request_turn(
        &mut self,
        participant: &str,
        now: Timestamp,
        rules: &Rules,
    ) -> Result<(), Rejection> {
        if !self.active {
            return Err(Rejection::RoundOver);
        }
        if let Some(holder) = self.turn_holder() {
            return Err(Rejection::TurnHeld(holder.to_string()));
        }

        let saved = self
            .reset_deadline
            .map(|deadline| micros_until(deadline, now))
            .unwrap_or(0);
        self.turn = TurnState::Thinking(ThinkingLock {
            holder: participant.to_string(),
            deadline: shift(now, rules.thinking_window_micros()),
            saved_reset_remaining_micros: saved,
        });
        self.reset_deadline = None;
        self.rearm();
        Ok(())
    }

    /// Drop the lock after a failed attempt and resume the round countdown
    pub(crate) fn release_turn(&mut self, now: Timestamp) {
        if let TurnState::Thinking(lock) = &self.turn {
            self.reset_deadline = Some(shift(now, lock.saved_reset_remaining_micros));
            self.turn = TurnState::Idle;
            self.rearm();
        }
    }
}
