//! Deadline bookkeeping. Deadlines are absolute timestamps in the session row;
//! every arming bumps `timer_epoch`, and a deadline fires only while
//! `resolved_epoch` lags behind it, so each expiry resolves exactly once.

use spacetimedb::rand::Rng;
use spacetimedb::Timestamp;

use crate::config::Rules;
use crate::session::{deal_hand, SessionState, ThinkingResolution};
use crate::turn::TurnState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineKind {
    /// The thinking lock runs out
    Thinking,
    /// An idle round runs out and is lost
    Reset,
    /// Intermission after a finished round
    NextRound,
}

/// Transition produced by an expired deadline
#[derive(Debug, Clone, PartialEq)]
pub enum Fired {
    Thinking(ThinkingResolution),
    RoundLost,
    NextRound,
}

/// What the scheduled reducer does with a schedule row that came due
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleAction {
    /// Row was armed for an older epoch; the session has moved on
    Stale,
    /// Woke before the deadline; arm the same deadline again
    Rearm,
    /// Nothing left to resolve
    Settled,
    /// Deadlines resolved, in order
    Fired(Vec<Fired>),
}

pub fn shift(ts: Timestamp, micros: i64) -> Timestamp {
    Timestamp::from_micros_since_unix_epoch(ts.to_micros_since_unix_epoch().saturating_add(micros))
}

/// Time left until `deadline`, clamped at zero
pub fn micros_until(deadline: Timestamp, now: Timestamp) -> i64 {
    deadline
        .to_micros_since_unix_epoch()
        .saturating_sub(now.to_micros_since_unix_epoch())
        .max(0)
}

impl SessionState {
    /// The one deadline that currently drives the session
    pub fn live_deadline(&self) -> Option<(DeadlineKind, Timestamp)> {
        match &self.turn {
            TurnState::Thinking(lock) if self.active => {
                Some((DeadlineKind::Thinking, lock.deadline))
            }
            _ if self.active => self.reset_deadline.map(|at| (DeadlineKind::Reset, at)),
            _ => self.next_round_at.map(|at| (DeadlineKind::NextRound, at)),
        }
    }

    /// Countdown for display
    pub fn remaining_micros(&self, now: Timestamp) -> Option<(DeadlineKind, i64)> {
        self.live_deadline()
            .map(|(kind, at)| (kind, micros_until(at, now)))
    }

    pub(crate) fn rearm(&mut self) {
        self.timer_epoch += 1;
    }

    /// Report the live deadline as expired at most once per arming
    pub fn take_expired(&mut self, now: Timestamp) -> Option<DeadlineKind> {
        if self.resolved_epoch >= self.timer_epoch {
            return None;
        }
        let (kind, at) = self.live_deadline()?;
        if now < at {
            return None;
        }
        self.resolved_epoch = self.timer_epoch;
        Some(kind)
    }

    /// Handle a schedule row armed at `epoch` waking up at `now`.
    /// Leaves the state untouched unless something fired.
    pub fn on_schedule<R: Rng>(
        &mut self,
        epoch: u64,
        now: Timestamp,
        rules: &Rules,
        rng: &mut R,
        report: impl FnMut(&SessionState, &Fired),
    ) -> ScheduleAction {
        if epoch != self.timer_epoch {
            return ScheduleAction::Stale;
        }
        let fired = settle_due(self, now, rules, rng, report);
        if !fired.is_empty() {
            ScheduleAction::Fired(fired)
        } else if self.resolved_epoch < self.timer_epoch {
            ScheduleAction::Rearm
        } else {
            ScheduleAction::Settled
        }
    }
}

/// Resolve the live deadline if it has passed
pub fn fire_due<R: Rng>(
    state: &mut SessionState,
    now: Timestamp,
    rules: &Rules,
    rng: &mut R,
) -> Option<Fired> {
    match state.take_expired(now)? {
        DeadlineKind::Thinking => state.resolve_thinking_timeout(now, rules).map(Fired::Thinking),
        DeadlineKind::Reset => state.resolve_reset_timeout(now, rules).then_some(Fired::RoundLost),
        DeadlineKind::NextRound => {
            let hand = deal_hand(rng, rules);
            state.start_new_round(hand, now, rules).ok().map(|()| Fired::NextRound)
        }
    }
}

/// Resolve every deadline that has already passed, in order.
/// `report` sees the state right after each transition.
pub fn settle_due<R: Rng>(
    state: &mut SessionState,
    now: Timestamp,
    rules: &Rules,
    rng: &mut R,
    mut report: impl FnMut(&SessionState, &Fired),
) -> Vec<Fired> {
    let mut fired = Vec::new();
    while let Some(transition) = fire_due(state, now, rules, rng) {
        report(state, &transition);
        fired.push(transition);
    }
    fired
}
