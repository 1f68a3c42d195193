use chrono::TimeDelta;
use spacetimedb::table;

// ==================== CONSTANTS ====================

/// Value every round is trying to reach
pub const TARGET: i64 = 24;

/// Cards dealt per round
pub const HAND_SIZE: usize = 4;

/// Smallest and largest value a dealt card can have
pub const CARD_MIN: i64 = 1;
pub const CARD_MAX: i64 = 10;

/// Round-level countdown before an idle round is lost (seconds)
pub const RESET_WINDOW_SECS: u32 = 30;

/// How long a participant may hold the thinking lock (seconds)
pub const THINKING_WINDOW_SECS: u32 = 10;

/// Pause between a finished round and the next automatic deal (seconds)
pub const INTERMISSION_SECS: u32 = 5;

/// Primary key of the rules row
pub const CONFIG_ID: u32 = 0;

/// Bounds accepted by `configure_rules`
pub const MIN_WINDOW_SECS: u32 = 1;
pub const MAX_WINDOW_SECS: u32 = 600;

/// Singleton row holding the tunable windows (id = 0)
/// PRIVATE: only admin reducers write it
#[table(name = game_config)]
#[derive(Clone, Debug)]
pub struct GameConfig {
    #[primary_key]
    pub id: u32,
    pub reset_window_secs: u32,
    pub thinking_window_secs: u32,
    pub intermission_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            id: CONFIG_ID,
            reset_window_secs: RESET_WINDOW_SECS,
            thinking_window_secs: THINKING_WINDOW_SECS,
            intermission_secs: INTERMISSION_SECS,
        }
    }
}

impl GameConfig {
    /// Check every window is inside the accepted bounds
    pub fn validate(&self) -> Result<(), String> {
        for (name, secs) in [
            ("reset_window_secs", self.reset_window_secs),
            ("thinking_window_secs", self.thinking_window_secs),
            ("intermission_secs", self.intermission_secs),
        ] {
            if !(MIN_WINDOW_SECS..=MAX_WINDOW_SECS).contains(&secs) {
                return Err(format!(
                    "{} must be within {}..={} (got {})",
                    name, MIN_WINDOW_SECS, MAX_WINDOW_SECS, secs
                ));
            }
        }
        Ok(())
    }
}

/// Rules a round is played under
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub target: i64,
    pub card_min: i64,
    pub card_max: i64,
    pub reset_window: TimeDelta,
    pub thinking_window: TimeDelta,
    pub intermission: TimeDelta,
}

impl Default for Rules {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for Rules {
    fn from(config: &GameConfig) -> Self {
        Self {
            target: TARGET,
            card_min: CARD_MIN,
            card_max: CARD_MAX,
            reset_window: TimeDelta::seconds(config.reset_window_secs.into()),
            thinking_window: TimeDelta::seconds(config.thinking_window_secs.into()),
            intermission: TimeDelta::seconds(config.intermission_secs.into()),
        }
    }
}

fn to_micros(delta: TimeDelta) -> i64 {
    delta.num_microseconds().unwrap_or(i64::MAX)
}

impl Rules {
    pub fn reset_window_micros(&self) -> i64 {
        to_micros(self.reset_window)
    }

    pub fn thinking_window_micros(&self) -> i64 {
        to_micros(self.thinking_window)
    }

    pub fn intermission_micros(&self) -> i64 {
        to_micros(self.intermission)
    }
}
