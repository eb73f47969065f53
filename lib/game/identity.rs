use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a participant, such as a Discord user id.
#[derive(
    Debug, Display, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From, Serialize, Deserialize,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(transparent)]
pub struct ParticipantId(#[cfg_attr(test, strategy("[0-9]{17,19}"))] String);

impl ParticipantId {
    /// Wraps an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId::new(id)
    }
}

/// Identifier of a game, allocated by the [`Registry`][`crate::registry::Registry`].
#[derive(
    Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, From, Serialize, Deserialize,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "#{}", _0)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    /// The numeric value of this identifier.
    pub fn get(&self) -> u64 {
        self.0
    }
}
