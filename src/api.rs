//! Remote action boundary: the game server's REST surface, as seen by the battle screen.

use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::model::{Card, GameSnapshot, GameSummary};
use crate::state::placement::PlaceCard;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No active game on the server yet. Expected right after mount.
    #[error("no active game")]
    NotStarted,
    #[error("session expired")]
    Unauthorized,
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Failures worth retrying on the next poll. `Decode` means the server and client disagree.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ApiError::Decode(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameAction {
    OpenToken,
    PlaceCard(PlaceCard),
}

#[derive(Serialize)]
struct PlayCardData {
    card_id: u64,
    x: i64,
}

#[derive(Serialize)]
struct ActionRequest {
    action_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<PlayCardData>,
}

impl From<GameAction> for ActionRequest {
    fn from(action: GameAction) -> Self {
        match action {
            GameAction::OpenToken => Self {
                action_type: "open_pokeball",
                data: None,
            },
            GameAction::PlaceCard(cmd) => Self {
                action_type: "play_card",
                data: Some(PlayCardData {
                    card_id: cmd.card_id,
                    x: cmd.x.round() as i64,
                }),
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActionReply {
    pub success: bool,
    pub pokemon: Option<Card>,
    pub error: Option<String>,
}

#[cfg(test)]
impl ActionReply {
    pub fn accepted(pokemon: Option<Card>) -> Self {
        Self {
            success: true,
            pokemon,
            error: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            pokemon: None,
            error: Some(reason.into()),
        }
    }
}

impl ActionReply {
    /// Server-side refusal reason, if this reply is a rejection.
    pub fn rejection(&self) -> Option<&str> {
        match (&self.error, self.success) {
            (Some(reason), _) => Some(reason.as_str()),
            (None, false) => Some(""),
            (None, true) => None,
        }
    }
}

#[derive(Deserialize)]
struct CoinBalance {
    poke_coins: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[async_trait(?Send)]
pub trait GameApi {
    async fn fetch_state(&self) -> Result<GameSnapshot, ApiError>;
    async fn send_action(&self, action: GameAction) -> Result<ActionReply, ApiError>;
    async fn start_game(&self) -> Result<(), ApiError>;
    async fn end_game(&self) -> Result<GameSummary, ApiError>;
    async fn fetch_coins(&self) -> Result<u64, ApiError>;
}

/// `GameApi` over `fetch`, bearer token from local storage.
pub struct HttpApi {
    base: String,
    login_path: String,
}

impl HttpApi {
    pub fn new(base: impl Into<String>, login_path: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            login_path: login_path.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base, endpoint)
    }

    fn authorize(builder: RequestBuilder) -> RequestBuilder {
        match auth::stored_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send(&self, request: Request) -> Result<Response, ApiError> {
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        match resp.status() {
            401 => {
                auth::clear_token();
                auth::redirect(&self.login_path);
                Err(ApiError::Unauthorized)
            }
            404 => Err(ApiError::NotStarted),
            status if !resp.ok() => {
                let detail = resp
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .and_then(|b| b.detail)
                    .unwrap_or_else(|| format!("HTTP error! status: {status}"));
                Err(ApiError::Http { status, detail })
            }
            _ => Ok(resp),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let request = Self::authorize(Request::get(&self.url(endpoint)))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = self.send(request).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = Self::authorize(Request::post(&self.url(endpoint)))
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = self.send(request).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl GameApi for HttpApi {
    async fn fetch_state(&self) -> Result<GameSnapshot, ApiError> {
        self.get("/game/state").await
    }

    async fn send_action(&self, action: GameAction) -> Result<ActionReply, ApiError> {
        self.post("/game/action", &ActionRequest::from(action)).await
    }

    async fn start_game(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/game/start", &serde_json::json!({})).await?;
        Ok(())
    }

    async fn end_game(&self) -> Result<GameSummary, ApiError> {
        self.post("/game/end", &serde_json::json!({})).await
    }

    async fn fetch_coins(&self) -> Result<u64, ApiError> {
        let balance: CoinBalance = self.get("/users/coins").await?;
        Ok(balance.poke_coins)
    }
}
