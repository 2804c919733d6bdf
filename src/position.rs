use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, Position, Rank, Role, Setup, fen::Fen, uci::UciMove,
};

use crate::{error::ClientError, types::MoveRequest};

/// Serialize a position to FEN.
pub fn fen_of(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

/// The single authoritative game position and its history.
///
/// Every successful mutation returns a freshly built FEN string. Callers
/// treat that string as the signal to refresh whatever they display, and
/// as the identity of the position when reconciling backend replies.
#[derive(Debug, Clone)]
pub struct PositionStore {
    initial: Chess,
    position: Chess,
    history: Vec<Chess>,
    fen: String,
}

impl PositionStore {
    /// Start from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    /// Start from an arbitrary position. `reset` returns to this position.
    pub fn from_fen(fen: &str) -> Result<Self, ClientError> {
        let fen: Fen = fen.parse()?;
        let setup: Setup = fen.into();
        let position: Chess = setup.position(CastlingMode::Standard)?;

        Ok(Self::from_position(position))
    }

    fn from_position(position: Chess) -> Self {
        let fen = fen_of(&position);
        Self {
            initial: position.clone(),
            position,
            history: Vec::new(),
            fen,
        }
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Number of moves that can be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn is_game_over(&self) -> bool {
        self.position.is_game_over()
    }

    /// Validate and apply a move. An illegal move leaves the position
    /// untouched and reports [`ClientError::IllegalMove`].
    pub fn apply_move(&mut self, request: &MoveRequest) -> Result<String, ClientError> {
        let promotion = request
            .promotion
            .or_else(|| self.default_promotion(request));
        let uci = UciMove::Normal {
            from: request.from,
            to: request.to,
            promotion,
        };

        let m = uci
            .to_move(&self.position)
            .map_err(|_| ClientError::IllegalMove(request.to_string()))?;
        let next = self
            .position
            .clone()
            .play(m)
            .map_err(|_| ClientError::IllegalMove(request.to_string()))?;

        let previous = std::mem::replace(&mut self.position, next);
        self.history.push(previous);
        Ok(self.refresh())
    }

    /// Take back the last move.
    pub fn undo(&mut self) -> Result<String, ClientError> {
        let previous = self.history.pop().ok_or(ClientError::NoHistory)?;
        self.position = previous;
        Ok(self.refresh())
    }

    /// Return to the starting position and drop the history.
    pub fn reset(&mut self) -> String {
        self.history.clear();
        self.position = self.initial.clone();
        self.refresh()
    }

    fn refresh(&mut self) -> String {
        self.fen = fen_of(&self.position);
        self.fen.clone()
    }

    // A pawn dropped on the last rank without a choice becomes a queen.
    fn default_promotion(&self, request: &MoveRequest) -> Option<Role> {
        let is_pawn = self.position.board().role_at(request.from) == Some(Role::Pawn);
        let last_rank = matches!(request.to.rank(), Rank::First | Rank::Eighth);
        (is_pawn && last_rank).then_some(Role::Queen)
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::Square;

    use super::*;
    use crate::codec::decode;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn starts_at_standard_position() {
        let store = PositionStore::new();
        assert_eq!(store.fen(), START_FEN);
        assert_eq!(store.turn(), Color::White);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn replay_matches_rules_engine() {
        let line = [
            "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1", "f8c5", "d2d4", "e5d4",
        ];

        let mut store = PositionStore::new();
        let mut direct = Chess::default();
        for encoded in line {
            let fen = store.apply_move(&decode(encoded).unwrap()).unwrap();

            let uci: UciMove = encoded.parse().unwrap();
            let m = uci.to_move(&direct).unwrap();
            direct = direct.play(m).unwrap();

            assert_eq!(fen, fen_of(&direct));
            assert_eq!(store.fen(), fen);
        }
        assert_eq!(store.history_len(), line.len());
    }

    #[test]
    fn pawn_advance_is_reflected() {
        let mut store = PositionStore::new();
        let fen = store
            .apply_move(&MoveRequest::new(Square::E2, Square::E4))
            .unwrap();
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(store.turn(), Color::Black);
    }

    #[test]
    fn en_passant_square_only_when_capturable() {
        let mut store = PositionStore::new();
        for m in ["e2e4", "a7a6", "e4e5"] {
            store.apply_move(&decode(m).unwrap()).unwrap();
        }
        let fen = store.apply_move(&decode("d7d5").unwrap()).unwrap();
        assert_eq!(
            fen,
            "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
        );
    }

    #[test]
    fn illegal_move_leaves_position_unchanged() {
        let mut store = PositionStore::new();
        let result = store.apply_move(&MoveRequest::new(Square::B1, Square::D1));
        assert!(matches!(result, Err(ClientError::IllegalMove(_))));
        assert_eq!(store.fen(), START_FEN);
        assert_eq!(store.history_len(), 0);

        // black piece while white is to move
        assert!(
            store
                .apply_move(&MoveRequest::new(Square::E7, Square::E5))
                .is_err()
        );
        assert_eq!(store.fen(), START_FEN);
    }

    #[test]
    fn undo_without_history_fails() {
        let mut store = PositionStore::new();
        store.reset();
        assert!(matches!(store.undo(), Err(ClientError::NoHistory)));
        assert_eq!(store.fen(), START_FEN);
    }

    #[test]
    fn undo_restores_previous_position() {
        let mut store = PositionStore::new();
        store.apply_move(&decode("d2d4").unwrap()).unwrap();
        let after_first = store.fen().to_owned();
        store.apply_move(&decode("d7d5").unwrap()).unwrap();

        assert_eq!(store.undo().unwrap(), after_first);
        assert_eq!(store.undo().unwrap(), START_FEN);
        assert!(store.undo().is_err());
    }

    #[test]
    fn reset_returns_to_start() {
        let mut store = PositionStore::new();
        store.apply_move(&decode("g1f3").unwrap()).unwrap();
        assert_eq!(store.reset(), START_FEN);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn promotes_to_queen_by_default() {
        let mut store = PositionStore::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let fen = store
            .apply_move(&MoveRequest::new(Square::E7, Square::E8))
            .unwrap();
        assert_eq!(fen, "4Q3/8/8/8/8/8/k7/4K3 b - - 0 1");
    }

    #[test]
    fn honours_explicit_underpromotion() {
        let mut store = PositionStore::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let fen = store
            .apply_move(&MoveRequest::new(Square::E7, Square::E8).with_promotion(Role::Knight))
            .unwrap();
        assert_eq!(fen, "4N3/8/8/8/8/8/k7/4K3 b - - 0 1");
    }

    #[test]
    fn reset_returns_to_custom_start() {
        let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
        let mut store = PositionStore::from_fen(fen).unwrap();
        store.apply_move(&decode("e7e8").unwrap()).unwrap();
        assert_eq!(store.reset(), fen);
    }

    #[test]
    fn rejects_invalid_fen() {
        assert!(matches!(
            PositionStore::from_fen("not a fen"),
            Err(ClientError::InvalidFen(_))
        ));
        // two white kings
        assert!(matches!(
            PositionStore::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(ClientError::InvalidPosition(_))
        ));
    }

    #[test]
    fn detects_game_over() {
        // fool's mate
        let mut store = PositionStore::new();
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            store.apply_move(&decode(m).unwrap()).unwrap();
        }
        assert!(store.is_game_over());
    }
}
