use crate::chess::Color;
use derive_more::Display;
use serde::Serialize;

/// One of the possible outcomes of a chess game.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(tag = "kind", content = "side", rename_all = "camelCase")]
pub enum Outcome {
    #[display(fmt = "checkmate by the {} player", _0)]
    Checkmate(Color),

    #[display(fmt = "{} player resigned", _0)]
    Resignation(Color),

    #[display(fmt = "stalemate")]
    Stalemate,

    #[display(fmt = "draw by agreement")]
    DrawByAgreement,

    #[display(fmt = "draw by threefold repetition")]
    DrawByThreefoldRepetition,

    #[display(fmt = "draw by the fifty-move rule")]
    DrawByFiftyMoveRule,

    #[display(fmt = "draw by insufficient material")]
    DrawByInsufficientMaterial,
}

impl Outcome {
    /// Whether the outcome is a [draw] and neither side has won.
    ///
    /// [draw]: https://www.chessprogramming.org/Draw
    pub fn is_draw(&self) -> bool {
        !self.is_decisive()
    }

    /// Whether the outcome is a decisive and one of the sides has won.
    pub fn is_decisive(&self) -> bool {
        matches!(self, Outcome::Checkmate(_) | Outcome::Resignation(_))
    }

    /// The winning side, if the outcome is [decisive](`Self::is_decisive`).
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Checkmate(c) => Some(c),
            Outcome::Resignation(c) => Some(!c),
            _ => None,
        }
    }
}
