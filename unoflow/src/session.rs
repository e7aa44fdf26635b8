use crate::callout::CallOutSlot;
use crate::error::{Result, TurnError};
use crate::player::PlayerRegistry;
use crate::remote::GameId;
use crate::table::TableState;
use crate::turn::TurnState;

/// All state of one game, from the server's initial deal until a new game
/// replaces it.
#[derive(Debug)]
pub struct GameSession {
    pub(crate) id: GameId,
    pub(crate) players: PlayerRegistry,
    pub(crate) table: TableState,
    pub(crate) turn: TurnState,
    pub(crate) call_out: CallOutSlot,
}

impl GameSession {
    pub fn new(id: GameId, players: PlayerRegistry, table: TableState, first: String) -> Self {
        Self {
            id,
            players,
            table,
            turn: TurnState::new(first),
            call_out: CallOutSlot::default(),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn call_out(&self) -> &CallOutSlot {
        &self.call_out
    }

    pub fn winner(&self) -> Option<&str> {
        self.turn.result().map(|result| result.winner.as_str())
    }

    /// Fails unless moves are currently accepted.
    pub(crate) fn ensure_accepting(&self) -> Result<&str> {
        match &self.turn {
            TurnState::Finished { .. } => Err(TurnError::NoActiveGame),
            TurnState::Blocked { current, .. } => Err(TurnError::BlockedState(current.clone())),
            TurnState::Active { current, .. } => Ok(current),
        }
    }

    /// Blocked turn and pending call-out always come together.
    pub(crate) fn is_consistent(&self) -> bool {
        self.turn.is_blocked() == self.call_out.is_active()
            && match (self.turn.pending_next(), self.call_out.active()) {
                (Some(pending), Some(call_out)) => pending == call_out.resolved_next(),
                (None, None) => true,
                _ => false,
            }
    }

    /// Ends the game; a pending call-out is dropped without penalty.
    pub(crate) fn finish(&mut self, winner: String) -> Result<()> {
        self.call_out.cancel();
        self.turn.finish(winner)
    }
}
