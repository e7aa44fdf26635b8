//! The authoritative game server as the engine sees it, and the shapes of the
//! data it answers with.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::card::{Card, CardColor};
use crate::constants::WILD_COLOR_NAME;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unreadable server data: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card the way the server spells it: `{"Color": "Red", "Value": 7}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCard {
    pub color: String,
    pub value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
}

impl From<&Card> for WireCard {
    fn from(card: &Card) -> Self {
        let color = match card.color() {
            Some(color) => color.to_string(),
            None => WILD_COLOR_NAME.to_string(),
        };
        Self {
            color,
            value: card.value(),
            text: None,
            score: None,
        }
    }
}

impl TryFrom<&WireCard> for Card {
    type Error = RemoteError;

    fn try_from(wire: &WireCard) -> Result<Self, Self::Error> {
        let color = wire.color.parse::<CardColor>().ok();
        Card::from_parts(color, wire.value).ok_or_else(|| {
            RemoteError::Decode(format!("unknown card {} {}", wire.color, wire.value))
        })
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn decode_cards(cards: &[WireCard]) -> Result<Vec<Card>, RemoteError> {
    cards.iter().map(Card::try_from).collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HandResponse {
    pub player: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cards: Vec<WireCard>,
    #[serde(default)]
    pub score: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartResponse {
    pub id: GameId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub players: Vec<HandResponse>,
    #[serde(default)]
    pub next_player: Option<String>,
    pub top_card: WireCard,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DrawResponse {
    #[serde(default)]
    pub next_player: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub card: Option<WireCard>,
}

/// The server is not consistent about how it names the next player after a
/// play, so every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayResponse {
    #[serde(default)]
    pub next_player: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub cards: Option<Vec<WireCard>>,
    #[serde(default)]
    pub score: Option<i32>,
}

impl PlayResponse {
    /// Reads a play response leniently: an empty or non-JSON body is a
    /// response that names nobody.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

#[async_trait]
pub trait GameServer: Send + Sync {
    async fn start(&self, names: &[String]) -> Result<StartResponse, RemoteError>;

    async fn top_card(&self, game: &GameId) -> Result<WireCard, RemoteError>;

    async fn hand(&self, game: &GameId, player: &str) -> Result<HandResponse, RemoteError>;

    async fn draw(&self, game: &GameId) -> Result<DrawResponse, RemoteError>;

    async fn play(
        &self,
        game: &GameId,
        card: &Card,
        wild_color: Option<CardColor>,
    ) -> Result<PlayResponse, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::ColoredCard;

    #[test]
    fn wild_cards_are_sent_as_black() {
        let wire = WireCard::from(&Card::WildDraw);
        assert_eq!(wire.color, "Black");
        assert_eq!(wire.value, 13);
    }

    #[test]
    fn wire_card_decodes_from_server_json() {
        let wire: WireCard =
            serde_json::from_str(r#"{"Color":"Green","Text":"Skip","Value":11,"Score":20}"#)
                .unwrap();
        assert_eq!(
            Card::try_from(&wire).unwrap(),
            Card::Colored(CardColor::Green, ColoredCard::Skip)
        );
    }

    #[test]
    fn unknown_card_fails_to_decode() {
        let wire = WireCard {
            color: "Purple".into(),
            value: 3,
            text: None,
            score: None,
        };
        assert!(matches!(Card::try_from(&wire), Err(RemoteError::Decode(_))));
    }

    #[test]
    fn play_response_tolerates_odd_bodies() {
        assert_eq!(PlayResponse::from_body(""), PlayResponse::default());
        assert_eq!(PlayResponse::from_body("null"), PlayResponse::default());
        assert_eq!(PlayResponse::from_body("not json"), PlayResponse::default());

        let response = PlayResponse::from_body(r#"{"Player":"Bob","Cards":[],"Score":0}"#);
        assert_eq!(response.player.as_deref(), Some("Bob"));
        assert_eq!(response.next_player, None);
    }

    #[test]
    fn null_cards_read_as_empty_hand() {
        let hand: HandResponse =
            serde_json::from_str(r#"{"Player":"Ann","Cards":null,"Score":null}"#).unwrap();
        assert!(hand.cards.is_empty());
        assert_eq!(hand.score, None);
    }

    #[test]
    fn start_response_reads_players() {
        let body = r#"{
            "Id": "6c1f",
            "NextPlayer": "Ann",
            "TopCard": {"Color":"Red","Value":3},
            "Players": [{"Player":"Ann","Cards":[{"Color":"Black","Value":14}],"Score":0}]
        }"#;
        let response: StartResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.id, GameId("6c1f".into()));
        assert_eq!(response.players[0].player, "Ann");
        assert_eq!(decode_cards(&response.players[0].cards).unwrap(), vec![Card::Wild]);
    }
}
