use crate::chess::Promotion;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Configuration for the rules a [`Game`][`crate::game::Game`] is played under.
///
/// Parsed from and printed as [RON], missing fields take their defaults.
///
/// [RON]: https://github.com/ron-rs/ron
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, default)]
pub struct Rules {
    /// The piece a pawn promotes to when the request does not name one.
    ///
    /// If [`Promotion::None`], the promotion piece is mandatory.
    pub promotion: Promotion,

    /// Whether the game is drawn after a hundred halfmoves without a capture or pawn advance.
    ///
    /// The draw is applied automatically as soon as the count is reached,
    /// neither player has to claim it.
    pub fifty_move_rule: bool,

    /// Whether the game is drawn once the same position occurs for the third time.
    pub threefold_repetition: bool,

    /// Whether the game is drawn once neither side can possibly checkmate.
    pub insufficient_material: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            promotion: Promotion::Queen,
            fifty_move_rule: true,
            threefold_repetition: true,
            insufficient_material: true,
        }
    }
}

impl fmt::Display for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ron = ron::ser::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&ron)
    }
}

/// The reason why parsing [`Rules`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse rules")]
pub struct ParseRulesError(ron::de::SpannedError);

impl FromStr for Rules {
    type Err = ParseRulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn parsing_printed_rules_is_an_identity(r: Rules) {
        assert_eq!(r.to_string().parse(), Ok(r));
    }

    #[test]
    fn missing_fields_take_default_values() {
        assert_eq!("()".parse(), Ok(Rules::default()));

        assert_eq!(
            "(promotion: None)".parse(),
            Ok(Rules {
                promotion: Promotion::None,
                ..Rules::default()
            })
        );
    }

    #[test]
    fn parsing_rules_fails_for_unknown_fields() {
        assert!("(clock: true)".parse::<Rules>().is_err());
    }
}
