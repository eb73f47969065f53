use crate::chess::{Promotion, Role, Square};
use derive_more::{DebugCustom, Deref, Display, Error};
use serde::{Serialize, Serializer};
use std::str::FromStr;

/// A chess move in [pure coordinate notation].
///
/// [pure coordinate notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Pure_coordinate_notation
#[derive(DebugCustom, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[cfg_attr(test, filter(#self.0 != #self.1))]
#[debug(fmt = "Move({})", self)]
#[display(fmt = "{}{}{}", _0, _1, _2)]
pub struct Move(pub Square, pub Square, pub Promotion);

impl Move {
    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        self.0
    }

    /// The destination [`Square`].
    #[inline(always)]
    pub fn whither(&self) -> Square {
        self.1
    }

    /// The [`Promotion`] specifier.
    #[inline(always)]
    pub fn promotion(&self) -> Promotion {
        self.2
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The reason why the string is not a valid move.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse move")]
pub struct ParseMoveError;

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (Some(whence), Some(whither), Some(promotion)) = (s.get(..2), s.get(2..4), s.get(4..))
        else {
            return Err(ParseMoveError);
        };

        Ok(Move(
            whence.parse().map_err(|_| ParseMoveError)?,
            whither.parse().map_err(|_| ParseMoveError)?,
            promotion.parse().map_err(|_| ParseMoveError)?,
        ))
    }
}

/// A [`Move`] in the context of the position it was generated for.
///
/// Holds the [`Role`] of the piece moved and the piece captured, if any, along with the
/// [`Square`] it is captured on, which differs from the destination for en passant.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deref)]
#[display(fmt = "{}", _0)]
pub struct MoveContext(#[deref] pub Move, pub Role, pub Option<(Role, Square)>);

impl MoveContext {
    /// The [`Role`] of the piece moved.
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.1
    }

    /// The [`Role`] of the piece captured and where it stood.
    #[inline(always)]
    pub fn capture(&self) -> Option<(Role, Square)> {
        self.2
    }

    /// Whether this is a promotion move.
    #[inline(always)]
    pub fn is_promotion(&self) -> bool {
        self.promotion() != Promotion::None
    }

    /// Whether this is a castling move.
    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        self.role() == Role::King && (self.whence().file() - self.whither().file()).abs() > 1
    }

    /// Whether this is a pawn advancing two squares from its starting rank.
    #[inline(always)]
    pub fn is_double_push(&self) -> bool {
        self.role() == Role::Pawn && (self.whence().rank() - self.whither().rank()).abs() == 2
    }

    /// Whether this is a capture move.
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.capture().is_some()
    }

    /// Whether this is an en passant capture move.
    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.capture().is_some_and(|(_, s)| self.whither() != s)
    }

    /// Whether this move is neither a capture nor a promotion.
    #[inline(always)]
    pub fn is_quiet(&self) -> bool {
        !(self.is_capture() || self.is_promotion())
    }

    /// Whether this move resets the fifty-move counter.
    #[inline(always)]
    pub fn is_irreversible(&self) -> bool {
        self.role() == Role::Pawn || self.is_capture()
    }
}
