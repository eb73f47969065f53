use crate::chess::Outcome;
use derive_more::Display;
use serde::Serialize;

/// The state of a [`Game`][`crate::game::Game`].
///
/// Once over, a game never resumes.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(tag = "state", content = "outcome", rename_all = "camelCase")]
pub enum Status {
    #[default]
    #[display(fmt = "in progress")]
    InProgress,
    #[display(fmt = "{}", _0)]
    Over(Outcome),
}

impl Status {
    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        matches!(self, Status::Over(_))
    }

    /// The [`Outcome`], if the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            Status::Over(o) => Some(o),
            Status::InProgress => None,
        }
    }
}

impl From<Option<Outcome>> for Status {
    fn from(outcome: Option<Outcome>) -> Self {
        outcome.map_or(Status::InProgress, Status::Over)
    }
}
