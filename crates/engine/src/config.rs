//! Engine configuration
//!
//! Settings come from defaults, an optional serialized form, or the process
//! environment. Environment keys:
//!
//! | Key                               | Field                |
//! |-----------------------------------|----------------------|
//! | `WOLFCURSES_TICK_INTERVAL_MS`     | `tick_interval_ms`   |
//! | `WOLFCURSES_SHOW_COMMAND_NAMES`   | `show_command_names` |
//! | `WOLFCURSES_EVENT_ROLL_SIDES`     | `event_roll_sides`   |
//! | `WOLFCURSES_SHOW_STATUS_LINE`     | `show_status_line`   |
//! | `WOLFCURSES_SEED`                 | `seed`               |
//!
//! Malformed values fall back to the default for that field.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ENV_TICK_INTERVAL_MS: &str = "WOLFCURSES_TICK_INTERVAL_MS";
pub const ENV_SHOW_COMMAND_NAMES: &str = "WOLFCURSES_SHOW_COMMAND_NAMES";
pub const ENV_EVENT_ROLL_SIDES: &str = "WOLFCURSES_EVENT_ROLL_SIDES";
pub const ENV_SHOW_STATUS_LINE: &str = "WOLFCURSES_SHOW_STATUS_LINE";
pub const ENV_SEED: &str = "WOLFCURSES_SEED";

/// Default logical tick length: one second.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Default die size for the director. A roll hits only on zero, so 100 sides
/// gives the 1% rate.
pub const DEFAULT_EVENT_ROLL_SIDES: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Milliseconds of host time per logical tick
    pub tick_interval_ms: u64,
    /// Render `[CommandName]` between the menu index and description
    pub show_command_names: bool,
    /// Director hits when a draw in `[0, sides)` is zero
    pub event_roll_sides: u32,
    /// Prefix the screen with the tick glyph and counter
    pub show_status_line: bool,
    /// Fixed seed for reproducible randomness
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            show_command_names: false,
            event_roll_sides: DEFAULT_EVENT_ROLL_SIDES,
            show_status_line: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let tick_interval_ms = parse_or(&lookup, ENV_TICK_INTERVAL_MS, defaults.tick_interval_ms);
        let event_roll_sides = parse_or(&lookup, ENV_EVENT_ROLL_SIDES, defaults.event_roll_sides);

        Self {
            tick_interval_ms: if tick_interval_ms == 0 {
                tracing::warn!(key = ENV_TICK_INTERVAL_MS, "Tick interval of zero, using default");
                defaults.tick_interval_ms
            } else {
                tick_interval_ms
            },
            show_command_names: flag_or(&lookup, ENV_SHOW_COMMAND_NAMES, defaults.show_command_names),
            event_roll_sides: if event_roll_sides == 0 {
                tracing::warn!(key = ENV_EVENT_ROLL_SIDES, "Event roll with zero sides, using default");
                defaults.event_roll_sides
            } else {
                event_roll_sides
            },
            show_status_line: flag_or(&lookup, ENV_SHOW_STATUS_LINE, defaults.show_status_line),
            seed: lookup(ENV_SEED).and_then(|raw| match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    tracing::warn!(key = ENV_SEED, value = %raw, "Ignoring malformed seed");
                    None
                }
            }),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick_interval_ms(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    pub fn with_command_names(mut self, show: bool) -> Self {
        self.show_command_names = show;
        self
    }

    pub fn with_status_line(mut self, show: bool) -> Self {
        self.show_status_line = show;
        self
    }

    pub fn with_event_roll_sides(mut self, sides: u32) -> Self {
        self.event_roll_sides = sides;
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed setting");
            default
        }),
        None => default,
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                tracing::warn!(key, value = %raw, "Ignoring malformed flag");
                default
            }
        },
        None => default,
    }
}
