//! Reconciliation of evaluation replies with the position they describe.
//!
//! Requests are represented by tickets that capture the FEN they were
//! issued for. A reply is only allowed to touch the displayed score when
//! that FEN is still the store's current position; anything else is a
//! stale reply from a position the user has already left, and is dropped.

use tracing::{debug, warn};

use crate::{
    error::ClientError,
    position::PositionStore,
    types::{Centipawns, Depth, EvaluationResult},
};

/// An evaluation request that has been issued and not yet resolved.
///
/// Hand it back to [`EvaluationCoordinator::complete`] or
/// [`EvaluationCoordinator::fail`] once the backend answers.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending evaluation keeps `thinking` set until it is completed or failed"]
pub struct PendingEvaluation {
    pub(crate) id: u64,
    fen: String,
    depth: Depth,
}

impl PendingEvaluation {
    /// The position the evaluation was requested for.
    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }
}

/// What happened to a reply once it reached the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The score now shown.
    Accepted(Centipawns),
    /// The position moved on before the reply arrived.
    Stale,
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    fen: String,
}

/// Owns the displayed score and the set of outstanding backend requests.
#[derive(Debug, Default)]
pub struct EvaluationCoordinator {
    display_score: Centipawns,
    in_flight: Vec<InFlight>,
    next_id: u64,
}

impl EvaluationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score of the last accepted evaluation, in centipawns.
    pub fn display_score(&self) -> Centipawns {
        self.display_score
    }

    /// True while an evaluation or bot move for `current_fen` is outstanding.
    pub fn thinking(&self, current_fen: &str) -> bool {
        self.in_flight.iter().any(|r| r.fen == current_fen)
    }

    /// Number of outstanding requests, for any position.
    pub fn outstanding(&self) -> usize {
        self.in_flight.len()
    }

    pub fn request_evaluation(&mut self, fen: &str, depth: Depth) -> PendingEvaluation {
        let id = self.track(fen);
        debug!(id, fen, %depth, "Requesting evaluation");
        PendingEvaluation {
            id,
            fen: fen.to_owned(),
            depth,
        }
    }

    /// Apply a reply, unless the store has moved away from the position
    /// the request was issued for.
    pub fn complete(
        &mut self,
        pending: PendingEvaluation,
        result: &EvaluationResult,
        store: &PositionStore,
    ) -> Resolution {
        self.release(pending.id);
        self.adopt(&pending.fen, result.score_cp, store)
    }

    /// Record a failed request. The displayed score is left alone and
    /// nothing is retried.
    pub fn fail(&mut self, pending: PendingEvaluation, err: &ClientError) {
        self.release(pending.id);
        warn!(id = pending.id, fen = %pending.fen, "Evaluation failed: {err}");
    }

    /// Forget the displayed score and every outstanding request.
    /// Replies still on the wire are reconciled by FEN as usual.
    pub fn reset(&mut self) {
        self.display_score = 0;
        self.in_flight.clear();
    }

    pub(crate) fn track(&mut self, fen: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.in_flight.push(InFlight {
            id,
            fen: fen.to_owned(),
        });
        id
    }

    pub(crate) fn release(&mut self, id: u64) {
        self.in_flight.retain(|r| r.id != id);
    }

    /// Staleness check shared by evaluation and bot replies.
    pub(crate) fn adopt(
        &mut self,
        fen: &str,
        score: Centipawns,
        store: &PositionStore,
    ) -> Resolution {
        if fen != store.fen() {
            debug!(fen, current = store.fen(), "Discarding stale score");
            return Resolution::Stale;
        }
        self.display_score = score;
        Resolution::Accepted(score)
    }
}
