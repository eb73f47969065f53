use crate::chess::{File, Rank, Square};
use crate::util::Integer;
use derive_more::Display;
use serde::Serialize;
use std::ops::Not;

/// The color of a chess [`Piece`][`crate::chess::Piece`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    #[display(fmt = "white")]
    White,
    #[display(fmt = "black")]
    Black,
}

unsafe impl Integer for Color {
    type Repr = u8;
    const MIN: Self::Repr = Color::White as _;
    const MAX: Self::Repr = Color::Black as _;
}

impl Color {
    /// The rank where the pieces of this side start.
    #[inline(always)]
    pub fn back_rank(&self) -> Rank {
        match self {
            Color::White => Rank::First,
            Color::Black => Rank::Eighth,
        }
    }

    /// The rank where the pawns of this side start.
    #[inline(always)]
    pub fn pawn_rank(&self) -> Rank {
        match self {
            Color::White => Rank::Second,
            Color::Black => Rank::Seventh,
        }
    }

    /// The rank a double push by a pawn of this side skips over.
    #[inline(always)]
    pub fn en_passant_rank(&self) -> Rank {
        match self {
            Color::White => Rank::Third,
            Color::Black => Rank::Sixth,
        }
    }

    /// The rank where the pawns of this side promote.
    #[inline(always)]
    pub fn promotion_rank(&self) -> Rank {
        (!*self).back_rank()
    }

    /// The square on the back rank of this side in the given [`File`].
    #[inline(always)]
    pub fn home(&self, f: File) -> Square {
        Square::new(f, self.back_rank())
    }
}

impl Not for Color {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}
