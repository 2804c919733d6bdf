use std::fmt;

use serde::Serialize;
use shakmaty::{Role, Square};

use crate::error::ClientError;

/// Evaluation score in centipawns. Positive favors white.
pub type Centipawns = i32;

/// A move as the user (or a decoded bot reply) asks for it.
///
/// `promotion` may be left empty for pawn moves to the last rank; the
/// position store then promotes to a queen. With the `serde` feature it
/// is (de)serialized in its compact string form, e.g. `"e7e8q"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, role: Role) -> Self {
        self.promotion = Some(role);
        self
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

impl From<MoveRequest> for String {
    fn from(request: MoveRequest) -> Self {
        request.to_string()
    }
}

impl TryFrom<String> for MoveRequest {
    type Error = ClientError;

    fn try_from(encoded: String) -> Result<Self, Self::Error> {
        crate::codec::decode(&encoded)
    }
}

/// Whether human moves are answered by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Analysis,
    Play,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Analysis => Mode::Play,
            Mode::Play => Mode::Analysis,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Analysis => f.write_str("analysis"),
            Mode::Play => f.write_str("play"),
        }
    }
}

/// Search depth sent to the backend, always within `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Depth(u8);

impl Depth {
    pub const MIN: Depth = Depth(1);
    pub const MAX: Depth = Depth(8);

    /// Values outside `1..=8` are clamped to the nearest bound.
    pub fn new(value: u32) -> Self {
        Depth(value.clamp(Self::MIN.0 as u32, Self::MAX.0 as u32) as u8)
    }

    pub fn get(self) -> u32 {
        self.0 as u32
    }

    pub fn increment(self) -> Self {
        Depth::new(self.get() + 1)
    }

    pub fn decrement(self) -> Self {
        Depth::new(self.get().saturating_sub(1))
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth(4)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reply to an evaluate request, with the score already resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationResult {
    pub score_cp: Centipawns,
    pub best_move: Option<String>,
    /// Principal variation as encoded moves
    pub pv: Vec<String>,
    pub depth: Option<u32>,
}

/// Reply to a play request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayResult {
    /// Encoded bot move, `None` when the backend produced none
    pub bot_move: Option<String>,
    /// Score of the position after the bot move, when the backend sent one
    pub score_cp: Option<Centipawns>,
    pub pv: Vec<String>,
    pub depth: Option<u32>,
}
