/// Chess domain types and rules.
pub mod chess;
/// Game sessions between two participants.
pub mod game;
/// Bookkeeping of active games.
pub mod registry;
/// Assorted utilities.
pub mod util;
