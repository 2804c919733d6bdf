//! Error types for the chessbot client.
//!
//! Every failure in this crate is recoverable: illegal moves and empty
//! undo stacks are ordinary user input, malformed bot replies make the
//! bot skip its turn, and transport failures leave the board and the
//! displayed score as they were. `ClientError` gathers all of them so
//! callers have a single type to match on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The rules engine rejected the move. The position is unchanged.
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Undo was requested with no move on the history stack.
    #[error("No move to undo")]
    NoHistory,

    /// A move string from the backend could not be decoded.
    #[error("Malformed move encoding: {0:?}")]
    MalformedEncoding(String),

    /// Wraps a network or decoding error from `reqwest`.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The provided FEN string could not be parsed.
    #[error("Invalid FEN: {0}")]
    InvalidFen(#[from] shakmaty::fen::ParseFenError),

    /// A parsed position is invalid from the perspective of `shakmaty`.
    #[error("Invalid Chess Position: {0}")]
    InvalidPosition(#[from] shakmaty::PositionError<shakmaty::Chess>),
}
