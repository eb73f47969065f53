use crate::chess::{Move, Outcome};
use crate::game::{Game, GameId, IllegalMove, MoveApplied, ParticipantId, Rules, Snapshot, Status};
use derive_more::{Display, Error, From};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

/// The reason why a [`Registry`] operation failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum RegistryError {
    #[display(fmt = "`{}` is already playing a game", _0)]
    #[from(ignore)]
    AlreadyInGame(#[error(not(source))] ParticipantId),

    #[display(fmt = "a participant cannot play against themselves")]
    #[from(ignore)]
    SameParticipant,

    #[display(fmt = "there is no game {}", _0)]
    #[from(ignore)]
    NoSuchGame(#[error(not(source))] GameId),

    #[display(fmt = "`{}` is not playing any game", _0)]
    #[from(ignore)]
    NotInGame(#[error(not(source))] ParticipantId),

    #[display(fmt = "{}", _0)]
    IllegalMove(IllegalMove),
}

#[derive(Debug, Default)]
struct State {
    next: u64,
    games: HashMap<GameId, Game>,
    participants: HashMap<ParticipantId, GameId>,
}

impl State {
    fn remove(&mut self, id: GameId) -> Option<Game> {
        let game = self.games.remove(&id)?;
        self.participants.retain(|_, g| *g != id);
        Some(game)
    }

    /// Removes the game if it is over.
    fn sweep(&mut self, id: GameId) {
        if self.games.get(&id).is_some_and(|g| g.status().is_over()) {
            self.remove(id);
            debug!(game = %id, "finished game removed");
        }
    }
}

/// The active games, indexed by id and by participant.
///
/// Every participant takes part in at most one active game at a time.
/// Games are removed as soon as they end.
#[derive(Debug, Default)]
pub struct Registry {
    rules: Rules,
    state: Mutex<State>,
}

impl Registry {
    /// Constructs an empty registry whose games follow the given [`Rules`].
    pub fn new(rules: Rules) -> Self {
        Registry {
            rules,
            state: Mutex::default(),
        }
    }

    /// The number of active games.
    pub fn len(&self) -> usize {
        self.lock().games.len()
    }

    /// Whether there are no active games.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a game where `white` plays against `black`.
    #[instrument(level = "debug", skip(self), err)]
    pub fn create_game(
        &self,
        white: ParticipantId,
        black: ParticipantId,
    ) -> Result<GameId, RegistryError> {
        if white == black {
            return Err(RegistryError::SameParticipant);
        }

        let mut state = self.lock();

        for p in [&white, &black] {
            if state.participants.contains_key(p) {
                return Err(RegistryError::AlreadyInGame(p.clone()));
            }
        }

        state.next += 1;
        let id = GameId::from(state.next);

        info!(game = %id, %white, %black, "game created");

        state.participants.insert(white.clone(), id);
        state.participants.insert(black.clone(), id);
        state.games.insert(id, Game::new(id, white, black, self.rules));

        Ok(id)
    }

    /// The active game of a participant, if any.
    pub fn game_for(&self, p: &ParticipantId) -> Option<GameId> {
        self.lock().participants.get(p).copied()
    }

    /// Removes a game along with the mappings of both its participants.
    #[instrument(level = "debug", skip(self), err)]
    pub fn end_game(&self, id: GameId) -> Result<Game, RegistryError> {
        let game = self.lock().remove(id).ok_or(RegistryError::NoSuchGame(id))?;
        debug!(game = %id, status = %game.status(), "game removed");
        Ok(game)
    }

    /// Runs a function against a game while holding the lock.
    ///
    /// The game is removed if it is over once the function returns.
    pub fn with_game<R>(&self, id: GameId, f: impl FnOnce(&mut Game) -> R) -> Result<R, RegistryError> {
        let mut state = self.lock();
        let game = state.games.get_mut(&id).ok_or(RegistryError::NoSuchGame(id))?;
        let result = f(game);
        state.sweep(id);
        Ok(result)
    }

    /// Plays a move in the active game of a participant.
    #[instrument(level = "debug", skip(self), err)]
    pub fn play(&self, p: &ParticipantId, m: Move) -> Result<MoveApplied, RegistryError> {
        self.session(p, |g| g.attempt_move(p, m))
    }

    /// Resigns the active game of a participant.
    #[instrument(level = "debug", skip(self), err)]
    pub fn resign(&self, p: &ParticipantId) -> Result<Outcome, RegistryError> {
        self.session(p, |g| g.resign(p))
    }

    /// Offers a draw in the active game of a participant.
    #[instrument(level = "debug", skip(self), err)]
    pub fn offer_draw(&self, p: &ParticipantId) -> Result<Status, RegistryError> {
        self.session(p, |g| g.offer_draw(p))
    }

    /// Accepts the draw offered to a participant.
    #[instrument(level = "debug", skip(self), err)]
    pub fn accept_draw(&self, p: &ParticipantId) -> Result<Outcome, RegistryError> {
        self.session(p, |g| g.accept_draw(p))
    }

    /// Declines the draw offered to a participant.
    #[instrument(level = "debug", skip(self), err)]
    pub fn decline_draw(&self, p: &ParticipantId) -> Result<(), RegistryError> {
        self.session(p, |g| g.decline_draw(p))
    }

    /// A render-ready view of the active game of a participant.
    pub fn snapshot(&self, p: &ParticipantId) -> Result<Snapshot, RegistryError> {
        self.session(p, |g| Ok(g.snapshot()))
    }

    /// Runs an action against the game of a participant, removing it once over.
    fn session<R>(
        &self,
        p: &ParticipantId,
        f: impl FnOnce(&mut Game) -> Result<R, IllegalMove>,
    ) -> Result<R, RegistryError> {
        let mut state = self.lock();

        let id = *state
            .participants
            .get(p)
            .ok_or_else(|| RegistryError::NotInGame(p.clone()))?;

        let game = state.games.get_mut(&id).ok_or(RegistryError::NoSuchGame(id))?;
        let result = f(game);
        state.sweep(id);
        Ok(result?)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
