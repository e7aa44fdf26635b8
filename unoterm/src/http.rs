use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use unoflow::{
    card::{Card, CardColor},
    remote::{
        DrawResponse, GameId, GameServer, HandResponse, PlayResponse, RemoteError, StartResponse,
        WireCard,
    },
};

pub const DEFAULT_SERVER_URL: &str = "https://nowaunoweb.azurewebsites.net";

/// Talks to the game server's REST API.
#[derive(Debug, Clone)]
pub struct HttpGameServer {
    base_url: String,
    client: Client,
}

impl HttpGameServer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str, game: Option<&GameId>) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|error| RemoteError::Transport(format!("{}: {error}", self.base_url)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                RemoteError::Transport(format!("{} cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty().extend(["api", "Game", path]);
            if let Some(game) = game {
                segments.push(&game.0);
            }
        }
        Ok(url)
    }

    async fn send(request: RequestBuilder) -> Result<String, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|error| RemoteError::Transport(error.to_string()))?;
        read_body(response).await
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
        let body = Self::send(request).await?;
        serde_json::from_str(&body).map_err(|error| RemoteError::Decode(error.to_string()))
    }
}

async fn read_body(response: Response) -> Result<String, RemoteError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|error| RemoteError::Transport(error.to_string()))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(RemoteError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Prefers the `error` or `message` field of a JSON error body, otherwise the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Query pairs for a play. The wild color is sent empty for colored cards.
fn play_query(card: &Card, wild_color: Option<CardColor>) -> [(&'static str, String); 3] {
    let wire = WireCard::from(card);
    [
        ("value", wire.value.to_string()),
        ("color", wire.color),
        (
            "wildColor",
            wild_color.map(|color| color.to_string()).unwrap_or_default(),
        ),
    ]
}

#[async_trait]
impl GameServer for HttpGameServer {
    #[instrument(skip(self))]
    async fn start(&self, names: &[String]) -> Result<StartResponse, RemoteError> {
        let request = self.client.post(self.url("Start", None)?).json(names);
        Self::send_json(request).await
    }

    async fn top_card(&self, game: &GameId) -> Result<WireCard, RemoteError> {
        Self::send_json(self.client.get(self.url("TopCard", Some(game))?)).await
    }

    async fn hand(&self, game: &GameId, player: &str) -> Result<HandResponse, RemoteError> {
        let request = self
            .client
            .get(self.url("GetCards", Some(game))?)
            .query(&[("playerName", player)]);
        Self::send_json(request).await
    }

    #[instrument(skip(self))]
    async fn draw(&self, game: &GameId) -> Result<DrawResponse, RemoteError> {
        Self::send_json(self.client.put(self.url("DrawCard", Some(game))?)).await
    }

    #[instrument(skip(self, card), fields(card = %card))]
    async fn play(
        &self,
        game: &GameId,
        card: &Card,
        wild_color: Option<CardColor>,
    ) -> Result<PlayResponse, RemoteError> {
        let request = self
            .client
            .put(self.url("PlayCard", Some(game))?)
            .query(&play_query(card, wild_color));
        let body = Self::send(request).await?;
        debug!(%body, "Play answered");
        Ok(PlayResponse::from_body(&body))
    }
}
