use std::fmt::Debug;

use thiserror::Error;

use crate::remote::RemoteError;

#[derive(Error, Debug)]
pub enum TurnError {
    #[error("No game is running")]
    NoActiveGame,
    #[error("Waiting for {0} to call UNO")]
    BlockedState(String),
    #[error("It is not {0}'s turn")]
    NotYourTurn(String),
    #[error("{0} does not hold that card")]
    CardNotInHand(String),
    #[error("That card cannot be played on the table")]
    IllegalMove,
    #[error("No color was chosen in time")]
    PromptTimeout,
    #[error("No call-out is pending")]
    NotBlocked,
    #[error("Invalid players: {0}")]
    InvalidPlayers(String),
    #[error("Server rejected the request: {0}")]
    ServerRejected(#[from] RemoteError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TurnError {
    /// Errors the player should not be notified about.
    pub fn is_silent(&self) -> bool {
        matches!(self, TurnError::PromptTimeout)
    }
}

pub type Result<T, E = TurnError> = std::result::Result<T, E>;
