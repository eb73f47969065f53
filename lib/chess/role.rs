use crate::util::Integer;
use derive_more::{Display, Error};
use std::str::FromStr;

/// The type of a chess [`Piece`][`crate::chess::Piece`].
///
/// Prints as its lower case letter in FEN.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Role {
    #[display(fmt = "p")]
    Pawn,
    #[display(fmt = "n")]
    Knight,
    #[display(fmt = "b")]
    Bishop,
    #[display(fmt = "r")]
    Rook,
    #[display(fmt = "q")]
    Queen,
    #[display(fmt = "k")]
    King,
}

unsafe impl Integer for Role {
    type Repr = u8;
    const MIN: Self::Repr = Role::Pawn as _;
    const MAX: Self::Repr = Role::King as _;
}

impl Role {
    /// The role denoted by a FEN letter of either case.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Role::Pawn),
            'n' => Some(Role::Knight),
            'b' => Some(Role::Bishop),
            'r' => Some(Role::Rook),
            'q' => Some(Role::Queen),
            'k' => Some(Role::King),
            _ => None,
        }
    }

    /// Whether pieces of this role slide along rays.
    #[inline(always)]
    pub fn is_slider(&self) -> bool {
        matches!(self, Role::Bishop | Role::Rook | Role::Queen)
    }

    /// Whether a lone piece of this role, besides the king, cannot force checkmate.
    #[inline(always)]
    pub fn is_minor(&self) -> bool {
        matches!(self, Role::Knight | Role::Bishop)
    }
}

/// The reason why parsing [`Role`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected one of `p`, `n`, `b`, `r`, `q` or `k`")]
pub struct ParseRoleError;

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => Role::from_letter(c).ok_or(ParseRoleError),
            _ => Err(ParseRoleError),
        }
    }
}
