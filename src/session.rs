use tracing::{debug, info};

use crate::{
    backend::Backend,
    bot::{BotMoveController, BotOutcome},
    config::SessionConfig,
    error::ClientError,
    evaluation::{EvaluationCoordinator, PendingEvaluation},
    position::PositionStore,
    score,
    types::{Centipawns, Depth, Mode, MoveRequest},
};

/// One open board: the position, its displayed score and the backend
/// requests that keep them in sync.
///
/// Each user action mutates the position first and then awaits the
/// backend calls it triggers, one at a time. Replies are reconciled
/// against the position they were requested for, so a reply that comes
/// back after the board has changed never reaches the display.
pub struct Session<B> {
    backend: B,
    config: SessionConfig,
    store: PositionStore,
    coordinator: EvaluationCoordinator,
    bot: BotMoveController,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, config: SessionConfig) -> Self {
        Self::with_store(backend, config, PositionStore::new())
    }

    /// Open a session on an existing store, e.g. one built from a FEN.
    pub fn with_store(backend: B, config: SessionConfig, store: PositionStore) -> Self {
        Self {
            backend,
            config,
            store,
            coordinator: EvaluationCoordinator::new(),
            bot: BotMoveController::new(config.eval_depth),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    pub fn fen(&self) -> &str {
        self.store.fen()
    }

    pub fn display_score(&self) -> Centipawns {
        self.coordinator.display_score()
    }

    /// White's share of the evaluation bar.
    pub fn ratio(&self) -> f64 {
        score::project(self.display_score())
    }

    /// True while a request for the shown position is outstanding.
    pub fn thinking(&self) -> bool {
        self.coordinator.thinking(self.store.fen())
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.config.mode {
            info!(%mode, "Switching mode");
            self.config.mode = mode;
        }
    }

    /// Depth the bot searches at.
    pub fn depth(&self) -> Depth {
        self.config.bot_depth
    }

    pub fn set_depth(&mut self, depth: Depth) {
        self.config.bot_depth = depth;
    }

    /// Evaluate the position the session was opened on.
    pub async fn start(&mut self) {
        let fen = self.store.fen().to_owned();
        self.evaluate(&fen).await;
    }

    /// A piece was dropped by the user.
    ///
    /// Illegal moves are reported as [`ClientError::IllegalMove`] and
    /// change nothing. In play mode a legal move is answered by the bot.
    /// Returns the FEN shown afterwards.
    pub async fn drop_piece(&mut self, request: MoveRequest) -> Result<String, ClientError> {
        let fen = self.store.apply_move(&request)?;
        debug!(%request, fen = %fen, "Move applied");
        self.evaluate(&fen).await;

        if self.config.mode == Mode::Play && !self.store.is_game_over() {
            self.bot_turn().await;
        }
        Ok(self.store.fen().to_owned())
    }

    /// Take back the last move and re-evaluate.
    pub async fn undo(&mut self) -> Result<String, ClientError> {
        let fen = self.store.undo()?;
        self.evaluate(&fen).await;
        Ok(fen)
    }

    /// Return to the starting position with a neutral score, then
    /// re-evaluate it.
    pub async fn reset(&mut self) -> String {
        self.coordinator.reset();
        self.bot.reset();
        let fen = self.store.reset();
        self.evaluate(&fen).await;
        fen
    }

    async fn evaluate(&mut self, fen: &str) {
        let pending = self
            .coordinator
            .request_evaluation(fen, self.config.eval_depth);
        self.run_evaluation(pending).await;
    }

    async fn run_evaluation(&mut self, pending: PendingEvaluation) {
        let result = self.backend.evaluate(pending.fen(), pending.depth()).await;
        match result {
            Ok(result) => {
                self.coordinator.complete(pending, &result, &self.store);
            }
            Err(err) => self.coordinator.fail(pending, &err),
        }
    }

    async fn bot_turn(&mut self) {
        let Some(pending) = self.bot.request_bot_move(
            self.config.mode,
            self.store.fen(),
            self.config.bot_depth,
            &mut self.coordinator,
        ) else {
            return;
        };

        let reply = self.backend.play(pending.fen(), pending.depth()).await;
        match reply {
            Ok(reply) => {
                let outcome =
                    self.bot
                        .complete(pending, reply, &mut self.store, &mut self.coordinator);
                if let BotOutcome::MovedUnscored { evaluation, .. } = outcome {
                    self.run_evaluation(evaluation).await;
                }
            }
            Err(err) => self.bot.fail(pending, &err, &mut self.coordinator),
        }
    }
}
