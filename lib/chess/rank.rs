use crate::util::Integer;
use derive_more::{Display, Error};
use std::{ops::Sub, str::FromStr};

/// A row on the chess board, numbered `1` through `8` from white's side.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(i8)]
pub enum Rank {
    #[display(fmt = "1")]
    First,
    #[display(fmt = "2")]
    Second,
    #[display(fmt = "3")]
    Third,
    #[display(fmt = "4")]
    Fourth,
    #[display(fmt = "5")]
    Fifth,
    #[display(fmt = "6")]
    Sixth,
    #[display(fmt = "7")]
    Seventh,
    #[display(fmt = "8")]
    Eighth,
}

unsafe impl Integer for Rank {
    type Repr = i8;
    const MIN: Self::Repr = Rank::First as _;
    const MAX: Self::Repr = Rank::Eighth as _;
}

impl Rank {
    /// The rank `dr` rows away, unless that falls off the board.
    #[inline(always)]
    pub fn offset(self, dr: i8) -> Option<Self> {
        Rank::try_new(self.get().checked_add(dr)?)
    }
}

/// The number of rows between two ranks.
impl Sub for Rank {
    type Output = i8;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.get() - rhs.get()
    }
}

/// The reason why parsing [`Rank`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected a rank between `1` and `8`")]
pub struct ParseRankError;

impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[c @ b'1'..=b'8'] => Ok(Rank::new((c - b'1') as i8)),
            _ => Err(ParseRankError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;
    use test_strategy::proptest;

    #[test]
    fn rank_guarantees_zero_value_optimization() {
        assert_eq!(size_of::<Option<Rank>>(), size_of::<Rank>());
    }

    #[test]
    fn offset_stops_at_the_edges() {
        assert_eq!(Rank::First.offset(-1), None);
        assert_eq!(Rank::Eighth.offset(1), None);
        assert_eq!(Rank::Second.offset(2), Some(Rank::Fourth));
        assert_eq!(Rank::Fifth.offset(i8::MIN), None);
    }

    #[proptest]
    fn offset_moves_by_the_given_number_of_ranks(r: Rank, #[strategy(-7i8..=7)] dr: i8) {
        match r.offset(dr) {
            Some(s) => assert_eq!(s - r, dr),
            None => assert!(!Rank::in_range(r.get() + dr)),
        }
    }

    #[proptest]
    fn parsing_printed_rank_is_an_identity(r: Rank) {
        assert_eq!(r.to_string().parse(), Ok(r));
    }

    #[proptest]
    fn parsing_rank_fails_if_not_digit_between_1_and_8(
        #[filter(!('1'..='8').contains(&#c))] c: char,
    ) {
        assert_eq!(c.to_string().parse::<Rank>(), Err(ParseRankError));
    }

    #[proptest]
    fn parsing_rank_fails_if_length_not_one(#[filter(#s.len() != 1)] s: String) {
        assert_eq!(s.parse::<Rank>(), Err(ParseRankError));
    }
}
