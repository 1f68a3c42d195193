//! Cooperative "make 24" game module.
//!
//! Every participant action is a reducer; the module is the single writer of
//! the shared `session_state` row, so transitions are serialized by the
//! database instead of racing across clients. Clients subscribe to
//! `participant` and `session_state` and derive countdowns from the absolute
//! deadlines stored there.

use spacetimedb::{reducer, table, Identity, ReducerContext, ScheduleAt, Table, Timestamp};

pub mod admin;
pub mod arithmetic;
pub mod config;
pub mod error;
pub mod presence;
pub mod rational;
pub mod session;
pub mod solver;
pub mod timer;
pub mod turn;

use arithmetic::Operation;
use config::{game_config, GameConfig, Rules, CONFIG_ID};
use presence::RosterChange;
use session::{
    deal_hand, session_state, ApplyOutcome, SelectOutcome, SessionState, ThinkingResolution,
    SESSION_ID,
};
use timer::{Fired, ScheduleAction};

// ==================== TABLES ====================

/// Connected participant
/// Removed on disconnect, which also drops their score
#[table(name = participant, public)]
#[derive(Clone)]
pub struct Participant {
    /// Caller identity as hex
    #[primary_key]
    pub id: String,

    pub display_name: String,

    /// `#rrggbb`
    pub color: String,

    /// Rounds won while connected
    pub score: u32,

    pub joined_at: Timestamp,
}

/// Identities allowed to call admin reducers
#[table(name = authorized_worker)]
pub struct AuthorizedWorker {
    #[primary_key]
    pub identity: Identity,
}

/// The one pending deadline of the session.
/// Re-armed (delete + insert) whenever `timer_epoch` moves.
#[table(name = deadline_schedule, scheduled(deadline_elapsed))]
pub struct DeadlineSchedule {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    /// `timer_epoch` of the session when this row was armed
    pub epoch: u64,

    pub scheduled_at: ScheduleAt,
}

// ==================== HELPERS ====================

fn participant_id(ctx: &ReducerContext) -> String {
    ctx.sender.to_string()
}

/// Id prefix for log lines
fn short(id: &str) -> &str {
    &id[..8.min(id.len())]
}

pub(crate) fn load_rules(ctx: &ReducerContext) -> Rules {
    ctx.db.game_config()
        .id()
        .find(&CONFIG_ID)
        .map(|config| Rules::from(&config))
        .unwrap_or_default()
}

/// Cancel the pending deadline (idempotent)
fn cancel_deadlines(ctx: &ReducerContext) {
    let ids: Vec<u64> = ctx.db.deadline_schedule().iter().map(|s| s.id).collect();
    for id in ids {
        ctx.db.deadline_schedule().id().delete(&id);
    }
}

/// Replace the pending schedule row with one for the session's live deadline
fn arm_deadline(ctx: &ReducerContext, state: &SessionState) {
    cancel_deadlines(ctx);
    if let Some((kind, at)) = state.live_deadline() {
        ctx.db.deadline_schedule().insert(DeadlineSchedule {
            id: 0,
            epoch: state.timer_epoch,
            scheduled_at: ScheduleAt::Time(at.into()),
        });
        log::debug!("[TIMER] armed {:?} round:{} epoch:{}", kind, state.round, state.timer_epoch);
    }
}

/// Persist `state` if it moved, re-arming the timer when a deadline changed
pub(crate) fn commit_session(ctx: &ReducerContext, before: &SessionState, state: SessionState) {
    if state == *before {
        return;
    }
    if state.timer_epoch != before.timer_epoch {
        arm_deadline(ctx, &state);
    }
    ctx.db.session_state().id().update(state);
}

fn award_win(ctx: &ReducerContext, winner: &String, round: u32) {
    match ctx.db.participant().id().find(winner) {
        Some(mut participant) => {
            participant.score = participant.score.saturating_add(1);
            log::info!(
                "[ROUND] won round:{} player:{} score:{}",
                round, participant.display_name, participant.score
            );
            ctx.db.participant().id().update(participant);
        }
        None => {
            log::info!("[ROUND] won round:{} by departed player:{}", round, short(winner));
        }
    }
}

/// Log (and score) one timer transition against the state it left behind
fn report_fired(ctx: &ReducerContext, state: &SessionState, fired: &Fired) {
    match fired {
        Fired::Thinking(ThinkingResolution::Solved { winner }) => {
            award_win(ctx, winner, state.round);
        }
        Fired::Thinking(ThinkingResolution::Restored) => {
            log::info!("[TIMER] thinking expired round:{} board restored", state.round);
        }
        Fired::RoundLost => {
            log::info!(
                "[ROUND] lost round:{} hand:{:?} answer:{}",
                state.round,
                state.original_hand(),
                state.reveal.as_deref().unwrap_or("-")
            );
        }
        Fired::NextRound => {
            log::info!("[ROUND] dealt round:{} hand:{:?}", state.round, state.original_hand());
        }
    }
}

/// Resolve every deadline that has already passed
fn settle_deadlines(ctx: &ReducerContext, state: &mut SessionState, rules: &Rules) {
    let mut rng = ctx.rng();
    timer::settle_due(state, ctx.timestamp, rules, &mut rng, |state, fired| {
        report_fired(ctx, state, fired)
    });
}

/// Run a participant action against the session.
/// Expired deadlines are settled first so a late timer never lets a stale turn act.
/// Rejections are logged and leave the row untouched.
fn with_session<T>(
    ctx: &ReducerContext,
    action: &str,
    apply: impl FnOnce(&mut SessionState, &Rules, &str) -> Result<T, error::Rejection>,
) -> Option<T> {
    let caller = participant_id(ctx);
    if ctx.db.participant().id().find(&caller).is_none() {
        log::warn!("[{}] caller {} has not joined", action, short(&caller));
        return None;
    }
    let Some(mut state) = ctx.db.session_state().id().find(&SESSION_ID) else {
        log::warn!("[{}] {}", action, error::Rejection::NoSession);
        return None;
    };

    let rules = load_rules(ctx);
    let before = state.clone();
    settle_deadlines(ctx, &mut state, &rules);

    let result = apply(&mut state, &rules, &caller);
    if let Err(rejection) = &result {
        log::warn!("[{}] rejected player:{} reason:{}", action, short(&caller), rejection);
    }
    commit_session(ctx, &before, state);
    result.ok()
}

// ==================== REDUCERS ====================

/// Initialize module - authorize the owner and seed the rules row
#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    // In init, ctx.sender is the module owner identity
    if ctx.db.authorized_worker().identity().find(&ctx.sender).is_none() {
        ctx.db.authorized_worker().insert(AuthorizedWorker {
            identity: ctx.sender,
        });
    }
    if ctx.db.game_config().id().find(&CONFIG_ID).is_none() {
        ctx.db.game_config().insert(GameConfig::default());
    }
    log::info!("Twenty-four module initialized");
}

/// Join (or refresh name/color), creating the session if nobody has yet
#[reducer]
pub fn join_session(ctx: &ReducerContext, name: String, color: String) -> Result<(), String> {
    let display_name = presence::normalize_display_name(&name)?;
    let color = presence::normalize_color(&color)?;
    let id = participant_id(ctx);

    match ctx.db.participant().id().find(&id) {
        Some(mut existing) => {
            existing.display_name = display_name;
            existing.color = color;
            log::info!("[JOIN] refreshed player:{} name:{}", short(&id), existing.display_name);
            ctx.db.participant().id().update(existing);
        }
        None => {
            log::info!("[JOIN] player:{} name:{}", short(&id), display_name);
            ctx.db.participant().insert(Participant {
                id: id.clone(),
                display_name,
                color,
                score: 0,
                joined_at: ctx.timestamp,
            });
        }
    }

    // Never overwrite a session that already exists
    if ctx.db.session_state().id().find(&SESSION_ID).is_none() {
        let rules = load_rules(ctx);
        let hand = deal_hand(&mut ctx.rng(), &rules);
        let state = SessionState::deal(1, hand, ctx.timestamp, &rules);
        arm_deadline(ctx, &state);
        ctx.db.session_state().insert(state);
        log::info!("[ROUND] session created by player:{} hand:{:?}", short(&id), hand);
    }
    Ok(())
}

/// Claim the thinking lock
#[reducer]
pub fn request_turn(ctx: &ReducerContext) {
    let now = ctx.timestamp;
    let taken = with_session(ctx, "TURN", |state, rules, caller| {
        state.request_turn(caller, now, rules)
    });
    if taken.is_some() {
        log::info!("[TURN] player:{} is thinking", short(&participant_id(ctx)));
    }
}

/// Click a card
#[reducer]
pub fn select_card(ctx: &ReducerContext, card_id: u32) {
    let now = ctx.timestamp;
    let mut round = 0;
    let outcome = with_session(ctx, "SELECT", |state, rules, caller| {
        round = state.round;
        state.select_card(caller, card_id, now, rules)
    });

    match outcome {
        Some(SelectOutcome::Applied(ApplyOutcome::Won { winner })) => {
            award_win(ctx, &winner, round);
        }
        Some(SelectOutcome::Healed) => {
            log::warn!("[SELECT] click on card {} dropped after clearing stale selection", card_id);
        }
        Some(outcome) => log::debug!("[SELECT] card:{} outcome:{:?}", card_id, outcome),
        None => {}
    }
}

/// Set the operation to apply with the next card click
#[reducer]
pub fn choose_operation(ctx: &ReducerContext, operation: Operation) {
    let chosen = with_session(ctx, "OPERATION", |state, _rules, caller| {
        state.choose_operation(caller, operation)
    });
    if chosen.is_some() {
        log::debug!("[OPERATION] {} chosen", operation.symbol());
    }
}

/// Deal the next round early, once the current one has ended
#[reducer]
pub fn start_new_round(ctx: &ReducerContext) {
    let now = ctx.timestamp;
    let dealt = with_session(ctx, "ROUND", |state, rules, _caller| {
        let hand = deal_hand(&mut ctx.rng(), rules);
        state.start_new_round(hand, now, rules).map(|()| (state.round, hand))
    });
    if let Some((round, hand)) = dealt {
        log::info!("[ROUND] dealt round:{} hand:{:?}", round, hand);
    }
}

/// Leave the game explicitly
#[reducer]
pub fn leave_session(ctx: &ReducerContext) {
    depart(ctx, "leave");
}

/// Clean up the participant when their connection drops
#[reducer(client_disconnected)]
pub fn on_disconnect(ctx: &ReducerContext) {
    depart(ctx, "disconnect");
}

fn depart(ctx: &ReducerContext, reason: &str) {
    let id = participant_id(ctx);
    let Some(participant) = ctx.db.participant().id().find(&id) else {
        return;
    };
    let session_secs = ctx.timestamp.duration_since(participant.joined_at)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ctx.db.participant().id().delete(&id);
    log::info!(
        "[PRESENCE] {} player:{} reason:{} score:{} session_sec:{}",
        participant.display_name, short(&id), reason, participant.score, session_secs
    );

    let session = ctx.db.session_state().id().find(&SESSION_ID);
    let remaining = ctx.db.participant().count();
    if let RosterChange::Teardown { closing_round } =
        presence::after_departure(remaining, session.as_ref())
    {
        cancel_deadlines(ctx);
        if let Some(round) = closing_round {
            log::info!("[PRESENCE] roster empty, closing session round:{}", round);
            ctx.db.session_state().id().delete(&SESSION_ID);
        }
    }
}

/// Scheduled reducer: the armed deadline has been reached
#[reducer]
pub fn deadline_elapsed(ctx: &ReducerContext, schedule: DeadlineSchedule) {
    // Only allow scheduler to call this, not clients
    if ctx.sender != ctx.identity() {
        log::warn!("Client {} attempted to call deadline_elapsed", ctx.sender);
        return;
    }
    ctx.db.deadline_schedule().id().delete(&schedule.id);

    let Some(mut state) = ctx.db.session_state().id().find(&SESSION_ID) else {
        return;
    };

    let rules = load_rules(ctx);
    let before = state.clone();
    let mut rng = ctx.rng();
    let action = state.on_schedule(schedule.epoch, ctx.timestamp, &rules, &mut rng, |state, fired| {
        report_fired(ctx, state, fired)
    });
    match action {
        ScheduleAction::Stale => {
            log::debug!(
                "[TIMER] stale schedule epoch:{} current:{}",
                schedule.epoch, state.timer_epoch
            );
        }
        // Fired a little early; wait for the same deadline again
        ScheduleAction::Rearm => arm_deadline(ctx, &state),
        ScheduleAction::Settled => {}
        ScheduleAction::Fired(_) => commit_session(ctx, &before, state),
    }
}
