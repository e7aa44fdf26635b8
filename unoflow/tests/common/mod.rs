#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use unoflow::{
    card::{Card, CardColor, ColoredCard},
    config::EngineConfig,
    controller::TurnController,
    prompt::ColorPrompt,
    remote::{
        DrawResponse, GameId, GameServer, HandResponse, PlayResponse, RemoteError, StartResponse,
        WireCard,
    },
};

pub const NAMES: [&str; 4] = ["A", "B", "C", "D"];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn player_names() -> Vec<String> {
    NAMES.iter().map(|name| name.to_string()).collect()
}

pub fn red(number: u8) -> Card {
    Card::Colored(CardColor::Red, ColoredCard::Number(number))
}

pub fn blue(number: u8) -> Card {
    Card::Colored(CardColor::Blue, ColoredCard::Number(number))
}

pub fn green(number: u8) -> Card {
    Card::Colored(CardColor::Green, ColoredCard::Number(number))
}

pub fn red_skip() -> Card {
    Card::Colored(CardColor::Red, ColoredCard::Skip)
}

pub fn red_reverse() -> Card {
    Card::Colored(CardColor::Red, ColoredCard::Reverse)
}

pub fn red_draw_two() -> Card {
    Card::Colored(CardColor::Red, ColoredCard::Draw)
}

/// How the fake names the next player after a play.
#[derive(Clone, Debug)]
pub enum Reply {
    NextPlayer,
    PlayerOnly,
    Silent,
    Named(String),
}

#[derive(Debug)]
pub struct FakeState {
    pub seats: Vec<(String, Vec<Card>)>,
    pub top: Card,
    /// Seat the server considers to be on turn. Draws go to this seat.
    pub turn: usize,
    pub direction: isize,
    pub reply: Reply,
    pub reject_plays: bool,
    /// Keep the turn on a player left with one card until they call UNO.
    pub hold_turn_for_uno: bool,
    pub plays: Vec<(Card, Option<CardColor>)>,
    pub draws: usize,
    pub draw_card: Card,
}

/// An in-memory server with just enough rules to drive the engine.
///
/// By default a player left with a single card keeps the server-side turn,
/// so penalty draws land on them. Clearing `hold_turn_for_uno` passes the
/// turn on right away.
pub struct FakeServer {
    state: Mutex<FakeState>,
}

impl FakeServer {
    pub fn new(hands: [Vec<Card>; 4], top: Card) -> Self {
        let seats = NAMES
            .iter()
            .zip(hands)
            .map(|(name, hand)| (name.to_string(), hand))
            .collect();

        Self {
            state: Mutex::new(FakeState {
                seats,
                top,
                turn: 0,
                direction: 1,
                reply: Reply::NextPlayer,
                reject_plays: false,
                hold_turn_for_uno: true,
                plays: Vec::new(),
                draws: 0,
                draw_card: green(7),
            }),
        }
    }

    pub fn replying(self, reply: Reply) -> Self {
        self.state().reply = reply;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake server state poisoned")
    }

    pub fn hand_len(&self, name: &str) -> usize {
        self.state()
            .seats
            .iter()
            .find(|(seat, _)| seat == name)
            .map(|(_, hand)| hand.len())
            .unwrap_or(0)
    }

    fn hand_response(name: &str, hand: &[Card]) -> HandResponse {
        HandResponse {
            player: name.to_string(),
            cards: hand.iter().map(WireCard::from).collect(),
            score: Some(hand.len() as i32 * 10),
        }
    }
}

impl FakeState {
    fn seat_after(&self, seat: usize, steps: usize) -> usize {
        let len = self.seats.len() as isize;
        (seat as isize + self.direction * steps as isize).rem_euclid(len) as usize
    }
}

#[async_trait]
impl GameServer for FakeServer {
    async fn start(&self, names: &[String]) -> Result<StartResponse, RemoteError> {
        let mut state = self.state();
        for ((seat, _), name) in state.seats.iter_mut().zip(names) {
            *seat = name.clone();
        }

        Ok(StartResponse {
            id: GameId("fake-game".to_string()),
            players: state
                .seats
                .iter()
                .map(|(name, hand)| Self::hand_response(name, hand))
                .collect(),
            next_player: None,
            top_card: WireCard::from(&state.top),
        })
    }

    async fn top_card(&self, _game: &GameId) -> Result<WireCard, RemoteError> {
        Ok(WireCard::from(&self.state().top))
    }

    async fn hand(&self, _game: &GameId, player: &str) -> Result<HandResponse, RemoteError> {
        let state = self.state();
        state
            .seats
            .iter()
            .find(|(name, _)| name == player)
            .map(|(name, hand)| Self::hand_response(name, hand))
            .ok_or_else(|| RemoteError::Status {
                status: 404,
                message: format!("no player {player}"),
            })
    }

    async fn draw(&self, _game: &GameId) -> Result<DrawResponse, RemoteError> {
        let mut state = self.state();
        state.draws += 1;

        let seat = state.turn;
        let card = state.draw_card;
        state.seats[seat].1.push(card);
        let next = state.seat_after(seat, 1);

        Ok(DrawResponse {
            next_player: Some(state.seats[next].0.clone()),
            player: Some(state.seats[seat].0.clone()),
            card: Some(WireCard::from(&card)),
        })
    }

    async fn play(
        &self,
        _game: &GameId,
        card: &Card,
        wild_color: Option<CardColor>,
    ) -> Result<PlayResponse, RemoteError> {
        let mut state = self.state();
        if state.reject_plays {
            return Err(RemoteError::Status {
                status: 400,
                message: "card refused".to_string(),
            });
        }

        let seat = state.turn;
        let hand = &mut state.seats[seat].1;
        let Some(index) = hand.iter().position(|held| held == card) else {
            return Err(RemoteError::Status {
                status: 400,
                message: "card not in hand".to_string(),
            });
        };
        hand.remove(index);
        let left = hand.len();

        state.top = *card;
        state.plays.push((*card, wild_color));
        if card.reverses() {
            state.direction = -state.direction;
        }
        let steps = if card.skips_next() { 2 } else { 1 };
        let next = state.seat_after(seat, steps);
        if left != 1 || !state.hold_turn_for_uno {
            state.turn = next;
        }

        let next_name = state.seats[next].0.clone();
        Ok(match &state.reply {
            Reply::NextPlayer => PlayResponse {
                next_player: Some(next_name),
                ..PlayResponse::default()
            },
            Reply::PlayerOnly => PlayResponse {
                player: Some(next_name),
                ..PlayResponse::default()
            },
            Reply::Silent => PlayResponse::default(),
            Reply::Named(name) => PlayResponse {
                next_player: Some(name.clone()),
                ..PlayResponse::default()
            },
        })
    }
}

pub enum ScriptedPrompt {
    Answer(CardColor),
    Silent,
}

#[async_trait]
impl ColorPrompt for ScriptedPrompt {
    async fn choose_color(&self) -> Option<CardColor> {
        match self {
            ScriptedPrompt::Answer(color) => Some(*color),
            ScriptedPrompt::Silent => std::future::pending().await,
        }
    }
}

pub type Controller = TurnController<FakeServer, ScriptedPrompt>;

/// A started game with the given hands; `A` is on turn.
pub async fn started(server: FakeServer, prompt: ScriptedPrompt) -> Controller {
    init_tracing();
    let mut controller = TurnController::new(server, prompt, EngineConfig::default());
    controller
        .start_game(player_names())
        .await
        .expect("game should start");
    controller
}

pub fn current(controller: &Controller) -> Option<String> {
    controller
        .session()
        .and_then(|session| session.turn().current().map(str::to_string))
}
