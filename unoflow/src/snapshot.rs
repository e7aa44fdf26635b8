use std::time::Duration;

use tokio::time::Instant;

use crate::card::{Card, CardColor};
use crate::session::GameSession;

/// Everything a front end needs to redraw the table after a settled
/// transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    pub current_player: Option<String>,
    pub direction: i8,
    pub seats: Vec<SeatView>,
    pub top_card: Card,
    pub effective_color: Option<CardColor>,
    pub call_out: Option<CallOutView>,
    pub winner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatView {
    pub name: String,
    pub avatar: String,
    pub score: i32,
    pub hand: HandView,
}

/// Only the player whose turn it is sees their cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandView {
    FaceUp(Vec<Card>),
    FaceDown(usize),
}

impl HandView {
    pub fn len(&self) -> usize {
        match self {
            HandView::FaceUp(cards) => cards.len(),
            HandView::FaceDown(count) => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutView {
    pub target: String,
    pub remaining: Duration,
}

impl TableSnapshot {
    pub fn capture(session: &GameSession, now: Instant) -> Self {
        let turn = session.turn();
        let current_player = turn.current().map(str::to_string);

        let seats = session
            .players()
            .iter()
            .map(|player| {
                let face_up = current_player.as_deref() == Some(player.name());
                SeatView {
                    name: player.name().to_string(),
                    avatar: player.avatar().to_string(),
                    score: player.score,
                    hand: if face_up {
                        HandView::FaceUp(player.hand.clone())
                    } else {
                        HandView::FaceDown(player.cards_count())
                    },
                }
            })
            .collect();

        let call_out = session.call_out().active().map(|call_out| CallOutView {
            target: call_out.target().to_string(),
            remaining: call_out.remaining(now),
        });

        Self {
            current_player,
            direction: turn.direction().sign(),
            seats,
            top_card: *session.table().top(),
            effective_color: session.table().effective_color(),
            call_out,
            winner: turn.result().map(|result| result.winner.clone()),
        }
    }
}
