use crate::chess::{File, ParseFileError, ParseRankError, Rank};
use crate::util::Integer;
use derive_more::{Display, Error, From};
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A square on the chess board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(i8)]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline(always)]
    pub fn new(f: File, r: Rank) -> Self {
        <Self as Integer>::new(f.get() | r.get() << 3)
    }

    /// This square's [`File`].
    #[inline(always)]
    pub fn file(&self) -> File {
        File::new(self.get() & 0b111)
    }

    /// This square's [`Rank`].
    #[inline(always)]
    pub fn rank(&self) -> Rank {
        Rank::new(self.get() >> 3)
    }

    /// The square `df` files and `dr` ranks away, unless that falls off the board.
    #[inline(always)]
    pub fn offset(&self, df: i8, dr: i8) -> Option<Self> {
        Some(Square::new(self.file().offset(df)?, self.rank().offset(dr)?))
    }

    /// Whether this is a light square.
    #[inline(always)]
    pub fn is_light(&self) -> bool {
        (self.file().get() + self.rank().get()) % 2 == 1
    }
}

unsafe impl Integer for Square {
    type Repr = i8;
    const MIN: Self::Repr = Square::A1 as _;
    const MAX: Self::Repr = Square::H8 as _;
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file(), f)?;
        fmt::Display::fmt(&self.rank(), f)?;
        Ok(())
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display(fmt = "failed to parse square")]
    InvalidFile(ParseFileError),
    #[display(fmt = "failed to parse square")]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}
