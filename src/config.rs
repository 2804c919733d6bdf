use std::time::Duration;

use crate::types::{Depth, Mode};

/// Base URL of the chessbot service when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/chess";

/// Where and how to reach the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// URL the `/evaluate` and `/play` endpoints are relative to
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Optional search time limit forwarded to the service
    pub movetime_ms: Option<u32>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
            movetime_ms: None,
        }
    }
}

/// Settings of one board session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Depth the bot searches at when asked for a move
    pub bot_depth: Depth,
    /// Depth used for evaluating positions
    pub eval_depth: Depth,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Analysis,
            bot_depth: Depth::default(),
            eval_depth: Depth::new(2),
        }
    }
}
