//! Engine configuration
//!
//! Every value has a default; `from_env` never fails. Malformed variables are
//! reported with `warn!` and replaced by the default.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::{warn, LevelFilter};

use crate::types::{DROP_INTERVAL_MIN_MS, INITIAL_DROP_MS, TICK_MS};

pub const SEED_VAR: &str = "TOKEN_TETRIS_SEED";
pub const DROP_MS_VAR: &str = "TOKEN_TETRIS_DROP_MS";
pub const TICK_MS_VAR: &str = "TOKEN_TETRIS_TICK_MS";
pub const LOG_VAR: &str = "TOKEN_TETRIS_LOG";
pub const LOG_PATH_VAR: &str = "TOKEN_TETRIS_LOG_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for the piece generator.
    pub seed: u32,
    /// Level-1 drop interval in milliseconds (at least 100).
    pub initial_drop_ms: u32,
    /// How often the drop loop checks its clock.
    pub tick_ms: u64,
    pub log_level: LevelFilter,
    /// Log file for the terminal runner; `None` disables logging.
    pub log_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            initial_drop_ms: INITIAL_DROP_MS,
            tick_ms: TICK_MS as u64,
            log_level: LevelFilter::Info,
            log_path: None,
        }
    }
}

impl EngineConfig {
    /// Create from `TOKEN_TETRIS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = parse_var(&lookup, SEED_VAR, defaults.seed);
        let initial_drop_ms =
            parse_var(&lookup, DROP_MS_VAR, defaults.initial_drop_ms).max(DROP_INTERVAL_MIN_MS);
        let tick_ms = parse_var(&lookup, TICK_MS_VAR, defaults.tick_ms).max(1);
        let log_level = parse_var(&lookup, LOG_VAR, defaults.log_level);

        let log_path = lookup(LOG_PATH_VAR)
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            seed,
            initial_drop_ms,
            tick_ms,
            log_level,
            log_path,
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default;
    }
    match trimmed.parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("ignoring {}={:?}: not a valid value", key, raw);
            default
        }
    }
}
