// Operator reducers: deal a chosen hand and tune the round windows.
// Protected by the authorized_worker table (module owner is added in init).

use serde_json::Value;
use spacetimedb::{reducer, ReducerContext, Table};

use crate::config::{game_config, GameConfig, Rules, CONFIG_ID, HAND_SIZE};
use crate::session::{session_state, SESSION_ID};
use crate::{authorized_worker, commit_session, load_rules};

fn is_authorized(ctx: &ReducerContext) -> bool {
    ctx.db.authorized_worker().identity().find(&ctx.sender).is_some()
}

/// Parse a hand from a JSON array such as `[3, 3, 8, 8]`
pub fn parse_hand_json(json: &str, rules: &Rules) -> Result<[i64; HAND_SIZE], String> {
    let data: Value = serde_json::from_str(json)
        .map_err(|e| format!("Invalid JSON: {}", e))?;
    let values = data.as_array()
        .ok_or("Expected JSON array of card values")?;
    if values.len() != HAND_SIZE {
        return Err(format!("Expected {} cards, got {}", HAND_SIZE, values.len()));
    }

    let mut hand = [0i64; HAND_SIZE];
    for (i, value) in values.iter().enumerate() {
        let card = value.as_i64()
            .ok_or(format!("Card {}: not an integer", i))?;
        if !(rules.card_min..=rules.card_max).contains(&card) {
            return Err(format!(
                "Card {}: {} outside {}..={}",
                i, card, rules.card_min, rules.card_max
            ));
        }
        hand[i] = card;
    }
    Ok(hand)
}

/// Replace the board with a specific hand, ending whatever round is in play
#[reducer]
pub fn admin_deal(ctx: &ReducerContext, hand_json: String) -> Result<(), String> {
    if !is_authorized(ctx) {
        log::warn!("Unauthorized admin_deal attempt by {}", ctx.sender);
        return Err("Unauthorized".to_string());
    }

    let rules = load_rules(ctx);
    let hand = parse_hand_json(&hand_json, &rules)?;
    let mut state = ctx.db.session_state().id().find(&SESSION_ID)
        .ok_or("No session to deal into")?;
    let before = state.clone();
    state.redeal(hand, ctx.timestamp, &rules);
    let round = state.round;
    commit_session(ctx, &before, state);

    log::info!("[ADMIN] dealt round:{} hand:{:?}", round, hand);
    Ok(())
}

/// Update the round, thinking and intermission windows (seconds)
#[reducer]
pub fn configure_rules(
    ctx: &ReducerContext,
    reset_window_secs: u32,
    thinking_window_secs: u32,
    intermission_secs: u32,
) -> Result<(), String> {
    if !is_authorized(ctx) {
        log::warn!("Unauthorized configure_rules attempt by {}", ctx.sender);
        return Err("Unauthorized".to_string());
    }

    let config = GameConfig {
        id: CONFIG_ID,
        reset_window_secs,
        thinking_window_secs,
        intermission_secs,
    };
    config.validate()?;

    if ctx.db.game_config().id().find(&config.id).is_some() {
        ctx.db.game_config().id().update(config);
    } else {
        ctx.db.game_config().insert(config);
    }

    // Deadlines already armed keep their timestamps; new windows apply from the next arming
    log::info!(
        "[ADMIN] rules reset:{}s thinking:{}s intermission:{}s",
        reset_window_secs, thinking_window_secs, intermission_secs
    );
    Ok(())
}
