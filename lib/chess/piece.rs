use crate::chess::{Color, ParseRoleError, Role};
use crate::util::Integer;
use derive_more::{Display, Error, From};
use std::fmt::{self, Formatter};
use std::str::FromStr;

/// A chess [piece][`Role`] of a certain [`Color`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Piece {
    WhitePawn,
    BlackPawn,
    WhiteKnight,
    BlackKnight,
    WhiteBishop,
    BlackBishop,
    WhiteRook,
    BlackRook,
    WhiteQueen,
    BlackQueen,
    WhiteKing,
    BlackKing,
}

impl Piece {
    /// Constructs [`Piece`] from a pair of [`Role`] and [`Color`].
    #[inline(always)]
    pub fn new(r: Role, c: Color) -> Self {
        <Self as Integer>::new(r.get() * 2 + c.get())
    }

    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        Role::new(self.get() / 2)
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        Color::new(self.get() % 2)
    }

    /// The unicode figurine that depicts this piece.
    pub fn figurine(&self) -> char {
        match self {
            Piece::WhitePawn => '♙',
            Piece::WhiteKnight => '♘',
            Piece::WhiteBishop => '♗',
            Piece::WhiteRook => '♖',
            Piece::WhiteQueen => '♕',
            Piece::WhiteKing => '♔',
            Piece::BlackPawn => '♟',
            Piece::BlackKnight => '♞',
            Piece::BlackBishop => '♝',
            Piece::BlackRook => '♜',
            Piece::BlackQueen => '♛',
            Piece::BlackKing => '♚',
        }
    }
}

unsafe impl Integer for Piece {
    type Repr = u8;
    const MIN: Self::Repr = Piece::WhitePawn as _;
    const MAX: Self::Repr = Piece::BlackKing as _;
}

/// Prints the letter used in FEN, upper case for white.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let letter = self.role().to_string();
        match self.color() {
            Color::White => f.write_str(&letter.to_ascii_uppercase()),
            Color::Black => f.write_str(&letter),
        }
    }
}

/// The reason why parsing [`Piece`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse piece")]
pub struct ParsePieceError(ParseRoleError);

/// Parses the letter used in FEN, upper case for white.
impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = s.to_ascii_lowercase().parse()?;
        let color = match s.chars().next() {
            Some(c) if c.is_ascii_uppercase() => Color::White,
            _ => Color::Black,
        };

        Ok(Piece::new(role, color))
    }
}
