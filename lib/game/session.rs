use crate::chess::{self, Color, Move, MoveContext, Outcome, Position, Promotion};
use crate::game::{GameId, ParticipantId, Rules, Snapshot, Status};
use derive_more::{Display, Error, From};
use tracing::{info, instrument};

/// The reason why an action on a [`Game`] was rejected.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum IllegalMove {
    #[display(fmt = "the game has already ended in {}", _0)]
    #[from(ignore)]
    GameHasEnded(#[error(not(source))] Outcome),

    #[display(fmt = "`{}` is not playing this game", _0)]
    #[from(ignore)]
    NotAParticipant(#[error(not(source))] ParticipantId),

    #[display(fmt = "it is not the turn of `{}`", _0)]
    #[from(ignore)]
    TurnOfTheOpponent(#[error(not(source))] ParticipantId),

    #[display(fmt = "move `{}` requires choosing a promotion", _0)]
    #[from(ignore)]
    PromotionRequired(#[error(not(source))] Move),

    #[display(fmt = "{}", _0)]
    Forbidden(chess::IllegalMove),

    #[display(fmt = "there is no draw offer pending for `{}`", _0)]
    #[from(ignore)]
    NoDrawOffer(#[error(not(source))] ParticipantId),
}

/// The effect of a move accepted by a [`Game`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MoveApplied {
    pub context: MoveContext,
    pub status: Status,
    pub snapshot: Snapshot,
}

/// A game of chess between two participants.
///
/// Every action is validated before anything changes, so a rejected action
/// always leaves the game as it was.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    white: ParticipantId,
    black: ParticipantId,
    rules: Rules,
    position: Position,
    history: Vec<MoveContext>,
    repetitions: Vec<Position>,
    draw_offer: Option<Color>,
    status: Status,
}

impl Game {
    /// Starts a game from the initial position.
    pub fn new(id: GameId, white: ParticipantId, black: ParticipantId, rules: Rules) -> Self {
        Self::with_position(id, white, black, rules, Position::default())
    }

    /// Starts a game from an arbitrary position.
    ///
    /// The game is over right away if the position is final.
    pub fn with_position(
        id: GameId,
        white: ParticipantId,
        black: ParticipantId,
        rules: Rules,
        position: Position,
    ) -> Self {
        let mut game = Game {
            id,
            white,
            black,
            rules,
            position,
            history: Vec::new(),
            repetitions: vec![position],
            draw_offer: None,
            status: Status::InProgress,
        };

        game.status = game.evaluate();
        game
    }

    /// This game's identifier.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// The rules this game is played under.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The moves played so far, in order.
    pub fn history(&self) -> &[MoveContext] {
        &self.history
    }

    /// The current state of the game.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// The side with a pending draw offer, if any.
    pub fn draw_offer(&self) -> Option<Color> {
        self.draw_offer
    }

    /// The participant playing the given side.
    pub fn player(&self, side: Color) -> &ParticipantId {
        match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// The side the given participant plays, if any.
    pub fn color_of(&self, p: &ParticipantId) -> Option<Color> {
        if *p == self.white {
            Some(Color::White)
        } else if *p == self.black {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// A render-ready view of the game.
    pub fn snapshot(&self) -> Snapshot {
        let turn = self.turn();

        Snapshot {
            game: self.id,
            white: self.white.clone(),
            black: self.black.clone(),
            board: *self.position.board(),
            turn,
            status: self.status,
            last_move: self.history.last().map(|mc| **mc),
            check: self
                .position
                .board()
                .king(turn)
                .filter(|_| self.position.is_check()),
            draw_offer: self.draw_offer,
        }
    }

    /// Plays a [`Move`] on behalf of a participant.
    ///
    /// A missing promotion is filled in from [`Rules::promotion`], unless that is
    /// [`Promotion::None`], in which case the move is rejected.
    #[instrument(level = "debug", skip(self), fields(game = %self.id), err)]
    pub fn attempt_move(
        &mut self,
        mover: &ParticipantId,
        m: Move,
    ) -> Result<MoveApplied, IllegalMove> {
        let side = self.participant(mover)?;

        if side != self.turn() {
            return Err(IllegalMove::TurnOfTheOpponent(mover.clone()));
        }

        let m = self.complete(m)?;
        let context = self.position.make(m)?;

        self.history.push(context);
        if context.is_irreversible() {
            self.repetitions.clear();
        }

        self.repetitions.push(self.position);
        self.draw_offer = None;
        self.status = self.evaluate();

        info!(game = %self.id, %side, %context, status = %self.status, "move played");

        Ok(MoveApplied {
            context,
            status: self.status,
            snapshot: self.snapshot(),
        })
    }

    /// Resigns the game on behalf of a participant.
    #[instrument(level = "debug", skip(self), fields(game = %self.id), err)]
    pub fn resign(&mut self, p: &ParticipantId) -> Result<Outcome, IllegalMove> {
        let side = self.participant(p)?;
        Ok(self.conclude(Outcome::Resignation(side)))
    }

    /// Offers a draw on behalf of a participant.
    ///
    /// If the opponent already offered a draw, the game ends by agreement.
    #[instrument(level = "debug", skip(self), fields(game = %self.id), err)]
    pub fn offer_draw(&mut self, p: &ParticipantId) -> Result<Status, IllegalMove> {
        let side = self.participant(p)?;

        if self.draw_offer == Some(!side) {
            self.conclude(Outcome::DrawByAgreement);
        } else {
            self.draw_offer = Some(side);
        }

        Ok(self.status)
    }

    /// Accepts the draw offered by the opponent.
    #[instrument(level = "debug", skip(self), fields(game = %self.id), err)]
    pub fn accept_draw(&mut self, p: &ParticipantId) -> Result<Outcome, IllegalMove> {
        let side = self.participant(p)?;

        if self.draw_offer != Some(!side) {
            return Err(IllegalMove::NoDrawOffer(p.clone()));
        }

        Ok(self.conclude(Outcome::DrawByAgreement))
    }

    /// Declines the draw offered by the opponent.
    #[instrument(level = "debug", skip(self), fields(game = %self.id), err)]
    pub fn decline_draw(&mut self, p: &ParticipantId) -> Result<(), IllegalMove> {
        let side = self.participant(p)?;

        if self.draw_offer != Some(!side) {
            return Err(IllegalMove::NoDrawOffer(p.clone()));
        }

        self.draw_offer = None;
        Ok(())
    }

    /// The side of a participant in a game that is still in progress.
    fn participant(&self, p: &ParticipantId) -> Result<Color, IllegalMove> {
        if let Status::Over(outcome) = self.status {
            return Err(IllegalMove::GameHasEnded(outcome));
        }

        self.color_of(p)
            .ok_or_else(|| IllegalMove::NotAParticipant(p.clone()))
    }

    /// Fills in the promotion of a pawn move to the last rank.
    fn complete(&self, m: Move) -> Result<Move, IllegalMove> {
        if m.promotion() != Promotion::None {
            return Ok(m);
        }

        let promotes = self.position.moves().into_iter().any(|mc| {
            mc.is_promotion() && mc.whence() == m.whence() && mc.whither() == m.whither()
        });

        match self.rules.promotion {
            _ if !promotes => Ok(m),
            Promotion::None => Err(IllegalMove::PromotionRequired(m)),
            p => Ok(Move(m.whence(), m.whither(), p)),
        }
    }

    fn conclude(&mut self, outcome: Outcome) -> Outcome {
        self.draw_offer = None;
        self.status = Status::Over(outcome);
        info!(game = %self.id, %outcome, "game over");
        outcome
    }

    fn evaluate(&self) -> Status {
        let pos = &self.position;

        let outcome = if pos.moves().is_empty() {
            if pos.is_check() {
                Some(Outcome::Checkmate(!pos.turn()))
            } else {
                Some(Outcome::Stalemate)
            }
        } else if self.rules.fifty_move_rule && pos.is_draw_by_fifty_move_rule() {
            Some(Outcome::DrawByFiftyMoveRule)
        } else if self.rules.threefold_repetition && self.repeated() >= 3 {
            Some(Outcome::DrawByThreefoldRepetition)
        } else if self.rules.insufficient_material && pos.is_material_insufficient() {
            Some(Outcome::DrawByInsufficientMaterial)
        } else {
            None
        };

        Status::from(outcome)
    }

    /// How many times the current position has occurred.
    fn repeated(&self) -> usize {
        self.repetitions
            .iter()
            .filter(|p| p.is_repetition_of(&self.position))
            .count()
    }
}
