use crate::chess::Role;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A promotion specifier.
#[derive(
    Debug, Display, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Promotion {
    #[default]
    #[display(fmt = "")]
    None,
    #[display(fmt = "n")]
    Knight,
    #[display(fmt = "b")]
    Bishop,
    #[display(fmt = "r")]
    Rook,
    #[display(fmt = "q")]
    Queen,
}

impl Promotion {
    /// Every actual promotion, in the order they are generated.
    pub const ALL: [Promotion; 4] = [
        Promotion::Queen,
        Promotion::Rook,
        Promotion::Bishop,
        Promotion::Knight,
    ];
}

impl From<Promotion> for Option<Role> {
    fn from(p: Promotion) -> Self {
        match p {
            Promotion::None => None,
            Promotion::Knight => Some(Role::Knight),
            Promotion::Bishop => Some(Role::Bishop),
            Promotion::Rook => Some(Role::Rook),
            Promotion::Queen => Some(Role::Queen),
        }
    }
}

/// The reason why parsing [`Promotion`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse promotion, expected one of `n`, `b`, `r` or `q`")]
pub struct ParsePromotionError;

/// Accepts either the letter or the name of the piece, in any case.
impl FromStr for Promotion {
    type Err = ParsePromotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.to_ascii_lowercase() {
            "" => Ok(Promotion::None),
            "n" | "knight" => Ok(Promotion::Knight),
            "b" | "bishop" => Ok(Promotion::Bishop),
            "r" | "rook" => Ok(Promotion::Rook),
            "q" | "queen" => Ok(Promotion::Queen),
            _ => Err(ParsePromotionError),
        }
    }
}
