use tracing::debug;

use crate::error::{Result, TurnError};
use crate::reconcile::NextPlayerSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// `+1` clockwise, `-1` counter-clockwise.
    pub fn sign(&self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub winner: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnState {
    Active {
        current: String,
        direction: Direction,
    },
    /// The acting player stays current until their call-out resolves.
    Blocked {
        current: String,
        direction: Direction,
        pending_next: String,
    },
    Finished {
        result: GameResult,
        direction: Direction,
    },
}

impl TurnState {
    pub fn new(first: String) -> Self {
        TurnState::Active {
            current: first,
            direction: Direction::Clockwise,
        }
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            TurnState::Active { current, .. } | TurnState::Blocked { current, .. } => {
                Some(current)
            }
            TurnState::Finished { .. } => None,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            TurnState::Active { direction, .. }
            | TurnState::Blocked { direction, .. }
            | TurnState::Finished { direction, .. } => *direction,
        }
    }

    pub fn pending_next(&self) -> Option<&str> {
        match self {
            TurnState::Blocked { pending_next, .. } => Some(pending_next),
            _ => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, TurnState::Blocked { .. })
    }

    pub fn result(&self) -> Option<&GameResult> {
        match self {
            TurnState::Finished { result, .. } => Some(result),
            _ => None,
        }
    }

    /// `Active -> Active`: hand the turn to `next`, flipping direction first
    /// when a reverse was played.
    pub fn advance(&mut self, next: String, reverse: bool) -> Result<()> {
        match self {
            TurnState::Active { current, direction } => {
                if reverse {
                    *direction = direction.reversed();
                }
                debug!(from = %current, to = %next, direction = direction.sign(), "Turn advanced");
                *current = next;
                Ok(())
            }
            TurnState::Blocked { current, .. } => Err(TurnError::BlockedState(current.clone())),
            TurnState::Finished { .. } => Err(TurnError::NoActiveGame),
        }
    }

    /// `Active -> Blocked`: keep the acting player current and park `next`
    /// until the call-out resolves.
    pub fn block(&mut self, pending_next: String, reverse: bool) -> Result<()> {
        match self {
            TurnState::Active { current, direction } => {
                let direction = if reverse {
                    direction.reversed()
                } else {
                    *direction
                };
                *self = TurnState::Blocked {
                    current: std::mem::take(current),
                    direction,
                    pending_next,
                };
                Ok(())
            }
            TurnState::Blocked { current, .. } => Err(TurnError::BlockedState(current.clone())),
            TurnState::Finished { .. } => Err(TurnError::NoActiveGame),
        }
    }

    /// `Blocked -> Active`: the parked player becomes current. Returns their
    /// name.
    pub fn unblock(&mut self) -> Result<String> {
        match self {
            TurnState::Blocked {
                direction,
                pending_next,
                ..
            } => {
                let next = std::mem::take(pending_next);
                *self = TurnState::Active {
                    current: next.clone(),
                    direction: *direction,
                };
                Ok(next)
            }
            TurnState::Active { .. } => Err(TurnError::NotBlocked),
            TurnState::Finished { .. } => Err(TurnError::NoActiveGame),
        }
    }

    /// Terminal transition, allowed from both `Active` and `Blocked`.
    pub fn finish(&mut self, winner: String) -> Result<()> {
        match self {
            TurnState::Finished { .. } => Err(TurnError::NoActiveGame),
            _ => {
                *self = TurnState::Finished {
                    result: GameResult { winner },
                    direction: self.direction(),
                };
                Ok(())
            }
        }
    }
}

/// What a confirmed play did to the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub next_player: String,
    pub source: NextPlayerSource,
    pub direction: Direction,
    /// Seat that has to take cards from a draw-two or draw-four, and how many.
    pub forced_draw: Option<(String, u8)>,
    /// Set when the acting player has to call UNO before the turn passes.
    pub call_out_target: Option<String>,
    pub winner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub drawn_by: Option<String>,
    pub next_player: String,
    pub source: NextPlayerSource,
}
