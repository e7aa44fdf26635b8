use std::{env, str::FromStr, time::Duration};

use crate::constants::{
    CALL_OUT_PENALTY_DRAWS, CALL_OUT_WINDOW, COLOR_PROMPT_TIMEOUT, MAX_WAIT,
};
use crate::error::{Result, TurnError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a player has to call UNO.
    pub call_out_window: Duration,
    /// How long the wild color prompt may stay open.
    pub prompt_timeout: Duration,
    /// Cards drawn by a player who missed their call-out.
    pub penalty_draws: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            call_out_window: CALL_OUT_WINDOW,
            prompt_timeout: COLOR_PROMPT_TIMEOUT,
            penalty_draws: CALL_OUT_PENALTY_DRAWS,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `UNO_CALL_OUT_SECS`, `UNO_PROMPT_SECS` and
    /// `UNO_PENALTY_DRAWS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let call_out_window = parse_var::<u64>(&lookup, "UNO_CALL_OUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.call_out_window);
        let prompt_timeout = parse_var::<u64>(&lookup, "UNO_PROMPT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.prompt_timeout);
        let penalty_draws =
            parse_var::<u8>(&lookup, "UNO_PENALTY_DRAWS")?.unwrap_or(defaults.penalty_draws);

        if call_out_window.is_zero() {
            return Err(TurnError::Config("UNO_CALL_OUT_SECS must be positive".to_string()));
        }
        for (key, wait) in [
            ("UNO_CALL_OUT_SECS", call_out_window),
            ("UNO_PROMPT_SECS", prompt_timeout),
        ] {
            if wait > MAX_WAIT {
                return Err(TurnError::Config(format!(
                    "{key} must not exceed {} seconds",
                    MAX_WAIT.as_secs()
                )));
            }
        }

        Ok(Self {
            call_out_window,
            prompt_timeout,
            penalty_draws,
        })
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| TurnError::Config(format!("{key} has invalid value '{raw}'"))),
    }
}
