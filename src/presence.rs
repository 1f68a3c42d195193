//! Roster rules: who may join under what name, and when the shared session
//! has to go because nobody is left to play it.

use crate::session::SessionState;

/// Longest display name accepted, in characters
pub const MAX_NAME_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    /// Someone is still connected
    Keep,
    /// Roster is empty: cancel the pending deadline and drop the session row,
    /// if there still is one (`closing_round`)
    Teardown { closing_round: Option<u32> },
}

/// What to do with the session once a participant has left
pub fn after_departure(remaining: u64, session: Option<&SessionState>) -> RosterChange {
    if remaining > 0 {
        return RosterChange::Keep;
    }
    RosterChange::Teardown {
        closing_round: session.map(|state| state.round),
    }
}

/// Trim and bound a display name
pub fn normalize_display_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("Display name is empty".to_string());
    }
    let chars = name.chars().count();
    if chars > MAX_NAME_CHARS {
        return Err(format!("Display name is {} characters, max is {}", chars, MAX_NAME_CHARS));
    }
    if name.chars().any(char::is_control) {
        return Err("Display name contains control characters".to_string());
    }
    Ok(name.to_string())
}

/// Accept `#rrggbb`, stored lowercase
pub fn normalize_color(raw: &str) -> Result<String, String> {
    let color = raw.trim();
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(format!("Invalid color '{}', expected #rrggbb", color));
    }
    Ok(color.to_ascii_lowercase())
}
