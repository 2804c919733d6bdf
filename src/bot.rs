use tracing::{debug, info, warn};

use crate::{
    codec,
    error::ClientError,
    evaluation::{EvaluationCoordinator, PendingEvaluation},
    position::PositionStore,
    types::{Depth, Mode, MoveRequest, PlayResult},
};

/// A bot move request that has been issued and not yet resolved.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending bot move keeps `thinking` set until it is completed or failed"]
pub struct PendingBotMove {
    id: u64,
    fen: String,
    depth: Depth,
}

impl PendingBotMove {
    /// The position the bot was asked to move in.
    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }
}

/// How a bot reply ended up affecting the board.
#[derive(Debug, PartialEq, Eq)]
pub enum BotOutcome {
    /// The bot move was applied and the backend's score adopted.
    Moved { fen: String, request: MoveRequest },
    /// The bot move was applied but came without a score; the caller
    /// has to send this evaluation request for the new position.
    MovedUnscored {
        fen: String,
        request: MoveRequest,
        evaluation: PendingEvaluation,
    },
    /// No usable move came back. The position is unchanged.
    Skipped,
    /// The position moved on before the reply arrived.
    Stale,
}

/// Asks the backend for replies to human moves in play mode.
#[derive(Debug)]
pub struct BotMoveController {
    eval_depth: Depth,
    pending: Option<(u64, String)>,
}

impl BotMoveController {
    /// `eval_depth` is used when a bot reply arrives without a score and
    /// the resulting position has to be evaluated separately.
    pub fn new(eval_depth: Depth) -> Self {
        Self {
            eval_depth,
            pending: None,
        }
    }

    /// Issue a bot move request for `fen`.
    ///
    /// Returns `None` outside play mode, or when a request for the same
    /// position is already on its way.
    pub fn request_bot_move(
        &mut self,
        mode: Mode,
        fen: &str,
        depth: Depth,
        coordinator: &mut EvaluationCoordinator,
    ) -> Option<PendingBotMove> {
        if mode != Mode::Play {
            return None;
        }
        if matches!(&self.pending, Some((_, pending_fen)) if pending_fen == fen) {
            debug!(fen, "Bot move already requested");
            return None;
        }

        let id = coordinator.track(fen);
        self.pending = Some((id, fen.to_owned()));
        debug!(id, fen, %depth, "Requesting bot move");
        Some(PendingBotMove {
            id,
            fen: fen.to_owned(),
            depth,
        })
    }

    /// Apply the bot's reply to the store.
    ///
    /// A reply for a position the store has left is discarded. A missing,
    /// malformed or illegal move makes the bot skip its turn. This never
    /// requests another bot move.
    pub fn complete(
        &mut self,
        pending: PendingBotMove,
        reply: PlayResult,
        store: &mut PositionStore,
        coordinator: &mut EvaluationCoordinator,
    ) -> BotOutcome {
        self.finish(&pending, coordinator);

        if pending.fen != store.fen() {
            debug!(fen = %pending.fen, current = store.fen(), "Discarding stale bot move");
            return BotOutcome::Stale;
        }

        let Some(encoded) = reply.bot_move.as_deref() else {
            warn!(fen = %pending.fen, "Backend produced no bot move");
            return BotOutcome::Skipped;
        };
        let request = match codec::decode(encoded).and_then(|m| {
            store.apply_move(&m)?;
            Ok(m)
        }) {
            Ok(request) => request,
            Err(err) => {
                warn!(fen = %pending.fen, "Bot turn skipped: {err}");
                return BotOutcome::Skipped;
            }
        };

        let fen = store.fen().to_owned();
        info!(bot_move = %request, fen = %fen, "Bot played");

        match reply.score_cp {
            Some(score) => {
                coordinator.adopt(&fen, score, store);
                BotOutcome::Moved { fen, request }
            }
            None => {
                let evaluation = coordinator.request_evaluation(&fen, self.eval_depth);
                BotOutcome::MovedUnscored {
                    fen,
                    request,
                    evaluation,
                }
            }
        }
    }

    /// Record a failed request. The position is left as it is.
    pub fn fail(
        &mut self,
        pending: PendingBotMove,
        err: &ClientError,
        coordinator: &mut EvaluationCoordinator,
    ) {
        self.finish(&pending, coordinator);
        warn!(id = pending.id, fen = %pending.fen, "Bot move failed: {err}");
    }

    /// Forget any outstanding request.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    fn finish(&mut self, pending: &PendingBotMove, coordinator: &mut EvaluationCoordinator) {
        coordinator.release(pending.id);
        if matches!(&self.pending, Some((id, _)) if *id == pending.id) {
            self.pending = None;
        }
    }
}
