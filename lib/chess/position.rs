use crate::chess::*;
use crate::util::Integer;
use derive_more::{DebugCustom, Display, Error, From};
use std::{fmt, num::NonZeroU32, ops::Index, str::FromStr};

/// Represents an illegal [`Move`] in a given [`Position`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "move `{}` is illegal in position `{}`", _0, _1)]
pub struct IllegalMove(pub Move, pub Position);

/// The current position on the chess board.
///
/// This type guarantees that it only holds valid positions, that is exactly
/// one king per side, consistent castling rights and en passant square,
/// and the side that just moved not in check.
#[derive(DebugCustom, Copy, Clone, Eq, PartialEq, Hash)]
#[debug(fmt = "Position({})", self)]
pub struct Position {
    board: Board,
    turn: Color,
    castles: Castles,
    en_passant: Option<Square>,
    halfmoves: u32,
    fullmoves: NonZeroU32,
}

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Position {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::{prelude::*, sample::Selector};

        (0..128usize, any::<Selector>())
            .prop_map(|(moves, selector)| {
                let mut pos = Position::default();

                for _ in 0..moves {
                    match selector.try_select(pos.moves()) {
                        Some(mc) if pos.play(mc).is_ok() => continue,
                        _ => break,
                    }
                }

                pos
            })
            .no_shrink()
            .boxed()
    }
}

impl Default for Position {
    /// The initial position.
    fn default() -> Self {
        Position {
            board: Board::default(),
            turn: Color::White,
            castles: Castles::all(),
            en_passant: None,
            halfmoves: 0,
            fullmoves: NonZeroU32::MIN,
        }
    }
}

impl Position {
    /// Assembles a [`Position`] from its parts, if they describe a valid position.
    ///
    /// An en passant square that no pawn can capture on is dropped.
    pub fn new(
        board: Board,
        turn: Color,
        castles: Castles,
        en_passant: Option<Square>,
        halfmoves: u32,
        fullmoves: NonZeroU32,
    ) -> Result<Self, IllegalPosition> {
        for side in Color::iter() {
            let king = Piece::new(Role::King, side);
            match board.iter().filter(|&(p, _)| p == king).count() {
                0 => return Err(IllegalPosition::MissingKing(side)),
                1 => {}
                _ => return Err(IllegalPosition::TooManyKings(side)),
            }

            let home = Some(king);
            let rook = Some(Piece::new(Role::Rook, side));
            let e1 = board[side.home(File::E)];

            if castles.has_short(side) && (e1 != home || board[side.home(File::H)] != rook)
                || castles.has_long(side) && (e1 != home || board[side.home(File::A)] != rook)
            {
                return Err(IllegalPosition::InvalidCastlingRights);
            }
        }

        let en_passant = match en_passant {
            None => None,
            Some(ep) => {
                let dr = movegen::forward(turn);
                let pushed = ep.offset(0, -dr).and_then(|s| board[s]);
                let origin = ep.offset(0, dr).and_then(|s| board[s]);

                if ep.rank() != (!turn).en_passant_rank()
                    || board[ep].is_some()
                    || origin.is_some()
                    || pushed != Some(Piece::new(Role::Pawn, !turn))
                {
                    return Err(IllegalPosition::InvalidEnPassantSquare);
                }

                Some(ep).filter(|&ep| capturable(&board, ep, turn))
            }
        };

        let mut pos = Position {
            board,
            turn,
            castles,
            en_passant,
            halfmoves,
            fullmoves,
        };

        if pos.is_in_check(!turn) {
            return Err(IllegalPosition::OppositeCheck);
        }

        pos.settle_en_passant();
        Ok(pos)
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The piece placement.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The castling rights still available.
    #[inline(always)]
    pub fn castles(&self) -> Castles {
        self.castles
    }

    /// The en passant square.
    ///
    /// Only set right after a double push, and only if a pawn may legally capture on it.
    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// The number of halfmoves since the last capture or pawn advance.
    ///
    /// It resets to 0 whenever a piece is captured or a pawn is moved.
    #[inline(always)]
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// The current move number since the start of the game.
    ///
    /// It starts at 1, and is incremented after every move by black.
    #[inline(always)]
    pub fn fullmoves(&self) -> NonZeroU32 {
        self.fullmoves
    }

    /// Whether any piece of color `by` attacks the given [`Square`].
    #[inline(always)]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        movegen::is_attacked(&self.board, sq, by)
    }

    /// Whether the king of the given side is attacked.
    pub fn is_in_check(&self, side: Color) -> bool {
        self.board
            .king(side)
            .is_some_and(|k| self.is_attacked(k, !side))
    }

    /// Whether this position is a [check].
    ///
    /// [check]: https://www.chessprogramming.org/Check
    pub fn is_check(&self) -> bool {
        self.is_in_check(self.turn)
    }

    /// Whether this position is a [checkmate].
    ///
    /// [checkmate]: https://www.chessprogramming.org/Checkmate
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.moves().is_empty()
    }

    /// Whether this position is a [stalemate].
    ///
    /// [stalemate]: https://www.chessprogramming.org/Stalemate
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.moves().is_empty()
    }

    /// Whether the game is a draw by the [fifty-move rule].
    ///
    /// [fifty-move rule]: https://en.wikipedia.org/wiki/Fifty-move_rule
    pub fn is_draw_by_fifty_move_rule(&self) -> bool {
        self.halfmoves >= 100
    }

    /// Whether this position has [insufficient material].
    ///
    /// That is only kings left, a single minor piece besides them,
    /// or any number of bishops all on squares of the same color.
    ///
    /// [insufficient material]: https://www.chessprogramming.org/Material#InsufficientMaterial
    pub fn is_material_insufficient(&self) -> bool {
        let mut knights = 0;
        let mut bishops = [0; 2];

        for (p, sq) in self.board.iter() {
            match p.role() {
                Role::King => {}
                Role::Bishop => bishops[sq.is_light() as usize] += 1,
                r if r.is_minor() => knights += 1,
                _ => return false,
            }
        }

        match (knights, bishops) {
            (0, [0, _] | [_, 0]) => true,
            (1, [0, 0]) => true,
            _ => false,
        }
    }

    /// Whether this position repeats another one.
    ///
    /// Positions repeat when pieces, side to move, castling rights and
    /// en passant square are the same, the clocks are not considered.
    /// An en passant square is only ever recorded if the capture is legal,
    /// so a pinned pawn does not set positions apart.
    pub fn is_repetition_of(&self, other: &Position) -> bool {
        self.board == other.board
            && self.turn == other.turn
            && self.castles == other.castles
            && self.en_passant == other.en_passant
    }

    /// The [`Outcome`] of the game in case this position is final.
    ///
    /// Repetitions are not detected, as that requires the history of the game.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_checkmate() {
            Some(Outcome::Checkmate(!self.turn))
        } else if self.is_stalemate() {
            Some(Outcome::Stalemate)
        } else if self.is_draw_by_fifty_move_rule() {
            Some(Outcome::DrawByFiftyMoveRule)
        } else if self.is_material_insufficient() {
            Some(Outcome::DrawByInsufficientMaterial)
        } else {
            None
        }
    }

    /// The pseudo-legal moves of the piece on the given [`Square`].
    ///
    /// See [`movegen::pseudo_legal_moves`].
    #[inline(always)]
    pub fn pseudo_legal_moves(&self, sq: Square) -> Vec<MoveContext> {
        movegen::pseudo_legal_moves(self, sq)
    }

    /// The legal moves that can be played in this position.
    pub fn moves(&self) -> Vec<MoveContext> {
        let side = self.turn;
        let king = self.board.king(side);

        self.board
            .by_color(side)
            .flat_map(|(_, sq)| self.pseudo_legal_moves(sq))
            .filter(|mc| {
                let mut board = self.board;
                let king = if mc.role() == Role::King {
                    Some(mc.whither())
                } else {
                    king
                };

                board.apply(mc).is_ok()
                    && king.is_some_and(|k| !movegen::is_attacked(&board, k, !side))
            })
            .collect()
    }

    /// Plays a [`Move`] if legal in this position.
    ///
    /// The position is left untouched if the move is illegal.
    pub fn make(&mut self, m: Move) -> Result<MoveContext, IllegalMove> {
        let mc = self
            .moves()
            .into_iter()
            .find(|mc| **mc == m)
            .ok_or(IllegalMove(m, *self))?;

        self.play(mc).map_err(|_| IllegalMove(m, *self))?;
        Ok(mc)
    }

    /// Plays a [`MoveContext`] without checking whether it is legal.
    ///
    /// Updates the side to move, castling rights, en passant square and clocks.
    pub fn play(&mut self, mc: MoveContext) -> Result<(), InvalidMove> {
        let side = self.turn;
        self.board.apply(&mc)?;

        self.castles.revoke(mc.whence());
        self.castles.revoke(mc.whither());

        self.en_passant = if mc.is_double_push() {
            mc.whence()
                .offset(0, movegen::forward(side))
                .filter(|&ep| capturable(&self.board, ep, !side))
        } else {
            None
        };

        if mc.is_irreversible() {
            self.halfmoves = 0;
        } else {
            self.halfmoves = self.halfmoves.saturating_add(1);
        }

        if side == Color::Black {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }

        self.turn = !side;
        self.settle_en_passant();

        Ok(())
    }

    /// Clears the en passant square unless some legal move captures on it.
    fn settle_en_passant(&mut self) {
        if let Some(ep) = self.en_passant {
            let mut moves = self.moves().into_iter();
            if !moves.any(|mc| mc.role() == Role::Pawn && mc.whither() == ep) {
                self.en_passant = None;
            }
        }
    }
}

/// Whether a pawn of side `by` stands next to the pawn that skipped over `ep`.
fn capturable(board: &Board, ep: Square, by: Color) -> bool {
    let pawn = Some(Piece::new(Role::Pawn, by));
    let pushed = ep.offset(0, -movegen::forward(by));

    [-1, 1].into_iter().any(|df| {
        pushed
            .and_then(|sq| sq.offset(df, 0))
            .is_some_and(|sq| board[sq] == pawn)
    })
}

/// Retrieves the [`Piece`] at a given [`Square`], if any.
impl Index<Square> for Position {
    type Output = Option<Piece>;

    #[inline(always)]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.board[sq]
    }
}

/// Prints the position in [FEN].
///
/// [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let turn = match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        };

        write!(f, "{} {} ", self.board, turn)?;

        if self.castles == Castles::none() {
            f.write_str("- ")?;
        } else {
            write!(f, "{} ", self.castles)?;
        }

        match self.en_passant {
            Some(ep) => write!(f, "{} ", ep)?,
            None => f.write_str("- ")?,
        }

        write!(f, "{} {}", self.halfmoves, self.fullmoves)
    }
}

/// The reason why parsing the FEN string failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParsePositionError {
    #[display(fmt = "invalid FEN string")]
    InvalidFen(ParseFenError),
    #[display(fmt = "illegal position")]
    IllegalPosition(IllegalPosition),
}

/// The reason why the string is not valid FEN.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseFenError {
    #[display(fmt = "syntax error at the piece placement field")]
    InvalidPlacement,
    #[display(fmt = "syntax error at the side to move field")]
    InvalidTurn,
    #[display(fmt = "syntax error at the castling rights field")]
    InvalidCastlingRights,
    #[display(fmt = "syntax error at the en passant square field")]
    InvalidEnPassantSquare,
    #[display(fmt = "syntax error at the halfmove clock field")]
    InvalidHalfmoveClock,
    #[display(fmt = "syntax error at the fullmove counter field")]
    InvalidFullmoves,
    #[display(fmt = "expected between 4 and 6 fields")]
    InvalidSyntax,
}

/// The reason why the position represented by the FEN string is illegal.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[error(ignore)]
pub enum IllegalPosition {
    #[display(fmt = "the {} side has no king", _0)]
    MissingKing(Color),
    #[display(fmt = "the {} side has multiple kings", _0)]
    TooManyKings(Color),
    #[display(fmt = "the player in check is not to move")]
    OppositeCheck,
    #[display(fmt = "invalid en passant square; wrong rank, occupied, or missing pushed pawn")]
    InvalidEnPassantSquare,
    #[display(fmt = "invalid castling rights")]
    InvalidCastlingRights,
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseFenError::*;

        let fields = Vec::from_iter(s.split_whitespace());
        let (board, turn, castles, ep, halfmoves, fullmoves) = match fields[..] {
            [b, t, c, e] => (b, t, c, e, "0", "1"),
            [b, t, c, e, h] => (b, t, c, e, h, "1"),
            [b, t, c, e, h, f] => (b, t, c, e, h, f),
            _ => return Err(InvalidSyntax.into()),
        };

        let board: Board = board.parse().map_err(|_| InvalidPlacement)?;

        let turn = match turn {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(InvalidTurn.into()),
        };

        let castles = match castles {
            "-" => Castles::none(),
            c => c.parse().map_err(|_| InvalidCastlingRights)?,
        };

        let en_passant = match ep {
            "-" => None,
            e => Some(e.parse().map_err(|_| InvalidEnPassantSquare)?),
        };

        let halfmoves = halfmoves.parse().map_err(|_| InvalidHalfmoveClock)?;
        let fullmoves = fullmoves.parse().map_err(|_| InvalidFullmoves)?;

        Ok(Position::new(
            board, turn, castles, en_passant, halfmoves, fullmoves,
        )?)
    }
}
