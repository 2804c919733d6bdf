//! The remote evaluation service.
//!
//! [`Backend`] is the seam between the board logic and the service that
//! evaluates positions and picks bot moves. [`HttpBackend`] talks to the
//! chessbot HTTP API; tests substitute scripted implementations.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::trace;

use crate::{
    config::BackendConfig,
    error::ClientError,
    types::{Centipawns, Depth, EvaluationResult, PlayResult},
};

/// Evaluates positions and produces bot moves for FEN positions.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn evaluate(&self, fen: &str, depth: Depth) -> Result<EvaluationResult, ClientError>;

    async fn play(&self, fen: &str, depth: Depth) -> Result<PlayResult, ClientError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PositionRequest<'a> {
    fen: &'a str,
    depth: Depth,
    #[serde(skip_serializing_if = "Option::is_none")]
    movetime_ms: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResponse {
    score: Option<f64>,
    score_cp: Option<f64>,
    best_move: Option<String>,
    pv: Option<Vec<String>>,
    depth: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayResponse {
    bot_move: Option<String>,
    // the service itself names the move `bestMove`
    best_move: Option<String>,
    score: Option<f64>,
    score_cp: Option<f64>,
    pv: Option<Vec<String>>,
    depth: Option<u32>,
}

/// The first populated of `score` and `scoreCp`.
fn resolve_score(score: Option<f64>, score_cp: Option<f64>) -> Option<Centipawns> {
    score.or(score_cp).map(|s| s.round() as Centipawns)
}

impl From<EvaluateResponse> for EvaluationResult {
    fn from(r: EvaluateResponse) -> Self {
        EvaluationResult {
            score_cp: resolve_score(r.score, r.score_cp).unwrap_or(0),
            best_move: r.best_move,
            pv: r.pv.unwrap_or_default(),
            depth: r.depth,
        }
    }
}

impl From<PlayResponse> for PlayResult {
    fn from(r: PlayResponse) -> Self {
        PlayResult {
            bot_move: r.bot_move.or(r.best_move).filter(|m| !m.is_empty()),
            score_cp: resolve_score(r.score, r.score_cp),
            pv: r.pv.unwrap_or_default(),
            depth: r.depth,
        }
    }
}

/// [`Backend`] over the chessbot JSON API (`POST /evaluate`, `POST /play`).
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        fen: &str,
        depth: Depth,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        let body = PositionRequest {
            fen,
            depth,
            movetime_ms: self.config.movetime_ms,
        };
        trace!(url = %url, fen, %depth, "Sending request");

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }
}

impl Backend for HttpBackend {
    async fn evaluate(&self, fen: &str, depth: Depth) -> Result<EvaluationResult, ClientError> {
        let response: EvaluateResponse = self.post("evaluate", fen, depth).await?;
        Ok(response.into())
    }

    async fn play(&self, fen: &str, depth: Depth) -> Result<PlayResult, ClientError> {
        let response: PlayResponse = self.post("play", fen, depth).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_service_field_names() {
        let body = PositionRequest {
            fen: "8/8/8/8/8/8/8/8 w - - 0 1",
            depth: Depth::new(3),
            movetime_ms: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "fen": "8/8/8/8/8/8/8/8 w - - 0 1", "depth": 3 })
        );

        let body = PositionRequest {
            movetime_ms: Some(500),
            ..body
        };
        assert_eq!(serde_json::to_value(&body).unwrap()["movetimeMs"], 500);
    }

    #[test]
    fn evaluate_prefers_score_over_score_cp() {
        let r: EvaluateResponse =
            serde_json::from_str(r#"{"score": 12, "scoreCp": 99, "bestMove": "e2e4"}"#).unwrap();
        let result = EvaluationResult::from(r);
        assert_eq!(result.score_cp, 12);
        assert_eq!(result.best_move.as_deref(), Some("e2e4"));
    }

    #[test]
    fn evaluate_falls_back_to_score_cp_then_zero() {
        let r: EvaluateResponse =
            serde_json::from_str(r#"{"scoreCp": 35, "pv": ["e2e4", "e7e5"], "depth": 2}"#)
                .unwrap();
        let result = EvaluationResult::from(r);
        assert_eq!(result.score_cp, 35);
        assert_eq!(result.pv, vec!["e2e4", "e7e5"]);
        assert_eq!(result.depth, Some(2));

        let r: EvaluateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(EvaluationResult::from(r).score_cp, 0);
    }

    #[test]
    fn play_reads_bot_move_or_best_move() {
        let r: PlayResponse =
            serde_json::from_str(r#"{"botMove": "e7e5", "score": -20}"#).unwrap();
        let result = PlayResult::from(r);
        assert_eq!(result.bot_move.as_deref(), Some("e7e5"));
        assert_eq!(result.score_cp, Some(-20));

        let r: PlayResponse =
            serde_json::from_str(r#"{"bestMove": "g8f6", "scoreCp": 15.4, "pv": null}"#).unwrap();
        let result = PlayResult::from(r);
        assert_eq!(result.bot_move.as_deref(), Some("g8f6"));
        assert_eq!(result.score_cp, Some(15));
        assert!(result.pv.is_empty());
    }

    #[test]
    fn play_without_move_or_score() {
        let r: PlayResponse = serde_json::from_str(r#"{"botMove": ""}"#).unwrap();
        let result = PlayResult::from(r);
        assert_eq!(result.bot_move, None);
        assert_eq!(result.score_cp, None);
    }

    #[test]
    fn endpoints_join_base_url() {
        let backend = HttpBackend::new(BackendConfig {
            base_url: "http://example.test/api/chess/".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            backend.endpoint("evaluate"),
            "http://example.test/api/chess/evaluate"
        );
        assert_eq!(backend.config().movetime_ms, None);
    }
}
