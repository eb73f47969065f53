use crate::chess::{Color, File, Piece, Role, Square};
use crate::util::Integer;
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, DebugCustom, Display, Error, Not};
use std::{fmt, str::FromStr};

/// The castling rights in a chess [`Position`][`crate::chess::Position`].
///
/// Rights are only ever revoked, whenever a move leaves or lands on the
/// home square of a king or rook, so they summarize the move history.
#[derive(
    DebugCustom,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    Not,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[debug(fmt = "Castles({})", self)]
pub struct Castles(#[cfg_attr(test, strategy(0u8..16))] u8);

impl Castles {
    /// No castling rights.
    #[inline(always)]
    pub fn none() -> Self {
        Castles(0b0000)
    }

    /// All castling rights.
    #[inline(always)]
    pub fn all() -> Self {
        Castles(0b1111)
    }

    /// Whether the given side has kingside castling rights.
    #[inline(always)]
    pub fn has_short(&self, side: Color) -> bool {
        *self & Castles::from(side.home(File::H)) != Castles::none()
    }

    /// Whether the given side has queenside castling rights.
    #[inline(always)]
    pub fn has_long(&self, side: Color) -> bool {
        *self & Castles::from(side.home(File::A)) != Castles::none()
    }

    /// The kingside castling square, if side has the rights.
    #[inline(always)]
    pub fn short(&self, side: Color) -> Option<Square> {
        if self.has_short(side) {
            Some(side.home(File::G))
        } else {
            None
        }
    }

    /// The queenside castling square, if side has the rights.
    #[inline(always)]
    pub fn long(&self, side: Color) -> Option<Square> {
        if self.has_long(side) {
            Some(side.home(File::C))
        } else {
            None
        }
    }

    /// Revokes the rights that depend on the piece standing on the given square.
    #[inline(always)]
    pub fn revoke(&mut self, sq: Square) {
        *self &= !Castles::from(sq);
    }
}

impl Default for Castles {
    #[inline(always)]
    fn default() -> Self {
        Castles::all()
    }
}

/// The rights that depend on the piece standing on this square not having moved.
impl From<Square> for Castles {
    #[inline(always)]
    fn from(sq: Square) -> Self {
        match sq {
            Square::H1 => Castles(0b0001),
            Square::A1 => Castles(0b0010),
            Square::E1 => Castles(0b0011),
            Square::H8 => Castles(0b0100),
            Square::A8 => Castles(0b1000),
            Square::E8 => Castles(0b1100),
            _ => Castles::none(),
        }
    }
}

impl fmt::Display for Castles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for side in Color::iter() {
            if self.has_short(side) {
                fmt::Display::fmt(&Piece::new(Role::King, side), f)?;
            }

            if self.has_long(side) {
                fmt::Display::fmt(&Piece::new(Role::Queen, side), f)?;
            }
        }

        Ok(())
    }
}

/// The reason why parsing [`Castles`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse castling rights")]
pub struct ParseCastlesError;

impl FromStr for Castles {
    type Err = ParseCastlesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut castles = Castles::none();

        use Piece::*;
        for c in s.chars() {
            let mut buffer = [0; 4];

            match Piece::from_str(c.encode_utf8(&mut buffer)) {
                Ok(p @ WhiteKing | p @ BlackKing) if !castles.has_short(p.color()) => {
                    castles |= Castles::from(p.color().home(File::H));
                }

                Ok(p @ WhiteQueen | p @ BlackQueen) if !castles.has_long(p.color()) => {
                    castles |= Castles::from(p.color().home(File::A));
                }

                _ => return Err(ParseCastlesError),
            }
        }

        Ok(castles)
    }
}
