//! Client for playing and analysing chess positions against a remote
//! evaluation service.
//!
//!
//! The crate keeps one authoritative position in sync with two kinds of
//! asynchronous backend requests: evaluations of the current position
//! and bot moves in play mode. Replies may arrive after the user has
//! already moved on; every reply is checked against the position it was
//! requested for and dropped when that position is no longer shown.
//!
//! The principal type is [`Session`], which drives a [`Backend`] for one
//! board. The pieces it is built from ([`PositionStore`],
//! [`EvaluationCoordinator`], [`BotMoveController`]) are public so a UI
//! can issue and resolve requests in whatever order its event loop
//! produces them.
//!
//! The library re‑exports `shakmaty`, which supplies the chess rules.

mod backend;
mod bot;
mod codec;
mod config;
mod error;
mod evaluation;
mod position;
mod score;
mod session;
mod types;

/// Main driver for one board.
pub use session::Session;

/// Remote evaluation service.
pub use backend::{Backend, HttpBackend};

/// Synchronization components.
pub use bot::{BotMoveController, BotOutcome, PendingBotMove};
pub use evaluation::{EvaluationCoordinator, PendingEvaluation, Resolution};
pub use position::{PositionStore, fen_of};

/// Move decoding and score display.
pub use codec::decode;
pub use score::{SCORE_CAP, pawns, project, render_bar};

/// Configuration.
pub use config::{BackendConfig, DEFAULT_BASE_URL, SessionConfig};

/// Error type produced by library operations.
pub use error::ClientError;

/// Data structures exchanged with the backend and the UI.
pub use types::{Centipawns, Depth, EvaluationResult, Mode, MoveRequest, PlayResult};

/// Re-export of `shakmaty` for convenience when building positions.
pub use shakmaty;
