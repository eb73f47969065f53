use crate::chess::*;
use crate::util::Integer;
use derive_more::{DebugCustom, Display, Error};
use serde::{Serialize, Serializer};
use std::fmt::{self, Write};
use std::{ops::Index, str::FromStr};

/// The piece placement on the chess board.
///
/// This type does not validate whether the placement it holds is reachable
/// according to the rules of chess, see [`Position`] for that.
#[derive(DebugCustom, Copy, Clone, Eq, PartialEq, Hash)]
#[debug(fmt = "Board({})", self)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

// We provide a custom implementation of Arbitrary rather than deriving,
// otherwise proptest overflows the stack generating large arrays.
#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Board {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Board>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        proptest::collection::vec(any::<Option<Piece>>(), 64)
            .prop_map(|v| {
                let mut board = Board::empty();
                board.squares.iter_mut().zip(v).for_each(|(s, p)| *s = p);
                board
            })
            .boxed()
    }
}

impl Default for Board {
    /// The initial piece placement.
    fn default() -> Self {
        use Role::*;

        let mut board = Board::empty();
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (f, role) in File::iter().zip(back) {
            for c in Color::iter() {
                board.place(c.home(f), Piece::new(role, c));
                board.place(Square::new(f, c.pawn_rank()), Piece::new(Pawn, c));
            }
        }

        board
    }
}

impl Board {
    /// A board without any pieces on it.
    #[inline(always)]
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// The [`Piece`] on the given [`Square`], if any.
    #[inline(always)]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq as usize]
    }

    /// The [`Square`] occupied by the king of a [`Color`].
    #[inline(always)]
    pub fn king(&self, side: Color) -> Option<Square> {
        let king = Piece::new(Role::King, side);
        Square::iter().find(|&sq| self[sq] == Some(king))
    }

    /// An iterator over all pieces on the board.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        Square::iter().filter_map(|sq| Some((self[sq]?, sq)))
    }

    /// An iterator over the pieces of a [`Color`].
    #[inline(always)]
    pub fn by_color(&self, c: Color) -> impl Iterator<Item = (Piece, Square)> + '_ {
        self.iter().filter(move |(p, _)| p.color() == c)
    }

    /// Places a piece on a square, returning the piece it replaces.
    #[inline(always)]
    pub(crate) fn place(&mut self, sq: Square, p: Piece) -> Option<Piece> {
        self.squares[sq as usize].replace(p)
    }

    /// Removes the piece on a square, if any.
    #[inline(always)]
    pub(crate) fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq as usize].take()
    }

    /// Applies a [`MoveContext`] to this board.
    ///
    /// The move is trusted to be legal, this only fails if there is no piece to move.
    /// Any occupant of the destination is captured, en passant removes the pawn
    /// that advanced past the destination, castling relocates the rook and promotion
    /// replaces the pawn.
    pub fn apply(&mut self, mc: &MoveContext) -> Result<(), InvalidMove> {
        let piece = self.remove(mc.whence()).ok_or(InvalidMove(**mc))?;

        if let Some((_, sq)) = mc.capture() {
            self.remove(sq);
        }

        if mc.is_castling() {
            let rank = mc.whither().rank();
            let (from, to) = if mc.whither().file() > mc.whence().file() {
                (Square::new(File::H, rank), Square::new(File::F, rank))
            } else {
                (Square::new(File::A, rank), Square::new(File::D, rank))
            };

            if let Some(rook) = self.remove(from) {
                self.place(to, rook);
            }
        }

        let piece = match Option::<Role>::from(mc.promotion()) {
            Some(role) => Piece::new(role, piece.color()),
            None => piece,
        };

        self.place(mc.whither(), piece);

        Ok(())
    }
}

/// The reason why a [`MoveContext`] could not be applied to a [`Board`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "there is no piece to move in `{}`", _0)]
pub struct InvalidMove(#[error(not(source))] pub Move);

/// Retrieves the [`Piece`] at a given [`Square`], if any.
impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline(always)]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[sq as usize]
    }
}

/// Prints the piece placement field of the FEN notation.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut skip = 0;

            for file in File::iter() {
                match self[Square::new(file, rank)] {
                    None => skip += 1,
                    Some(p) => {
                        if skip > 0 {
                            write!(f, "{}", skip)?;
                            skip = 0;
                        }

                        write!(f, "{}", p)?;
                    }
                }
            }

            if skip > 0 {
                write!(f, "{}", skip)?;
            }

            if rank != Rank::First {
                f.write_char('/')?;
            }
        }

        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The reason why parsing the piece placement failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse piece placement")]
pub struct ParseBoardError;

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ranks: Vec<_> = s.split('/').rev().collect();
        if ranks.len() != 8 {
            return Err(ParseBoardError);
        }

        let mut board = Board::empty();
        for (rank, segment) in Rank::iter().zip(ranks) {
            let mut file = 0;
            for c in segment.chars() {
                let mut buffer = [0; 4];

                if file >= 8 {
                    return Err(ParseBoardError);
                } else if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip;
                } else if let Ok(p) = Piece::from_str(c.encode_utf8(&mut buffer)) {
                    board.place(Square::new(File::new(file as _), rank), p);
                    file += 1;
                } else {
                    return Err(ParseBoardError);
                }
            }

            if file != 8 {
                return Err(ParseBoardError);
            }
        }

        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_strategy::proptest;

    #[test]
    fn default_board_is_the_initial_placement() {
        assert_eq!(
            Board::default().to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }

    #[proptest]
    fn iter_returns_pieces_and_squares(b: Board) {
        for (p, sq) in b.iter() {
            assert_eq!(b[sq], Some(p));
        }
    }

    #[proptest]
    fn iter_visits_every_occupied_square_once(b: Board) {
        let squares: HashSet<_> = b.iter().map(|(_, sq)| sq).collect();
        assert_eq!(squares.len(), Square::iter().filter(|&sq| b[sq].is_some()).count());
    }

    #[proptest]
    fn by_color_returns_pieces_of_a_color(b: Board, c: Color) {
        for (p, sq) in b.by_color(c) {
            assert_eq!(p.color(), c);
            assert_eq!(b[sq], Some(p));
        }
    }

    #[proptest]
    fn king_returns_square_occupied_by_a_king(b: Board, c: Color) {
        if let Some(sq) = b.king(c) {
            assert_eq!(b[sq], Some(Piece::new(Role::King, c)));
        }
    }

    #[proptest]
    fn place_replaces_occupant(mut b: Board, sq: Square, p: Piece) {
        let occupant = b[sq];
        assert_eq!(b.place(sq, p), occupant);
        assert_eq!(b[sq], Some(p));
    }

    #[proptest]
    fn remove_empties_square(mut b: Board, sq: Square) {
        let occupant = b[sq];
        assert_eq!(b.remove(sq), occupant);
        assert_eq!(b[sq], None);
    }

    #[proptest]
    fn board_can_be_indexed_by_square(b: Board, sq: Square) {
        assert_eq!(b[sq], b.piece_on(sq));
    }

    #[proptest]
    fn apply_fails_if_origin_is_empty(
        b: Board,
        #[filter(#b[#m.whence()].is_none())] m: Move,
        r: Role,
    ) {
        let mut next = b;
        assert_eq!(next.apply(&MoveContext(m, r, None)), Err(InvalidMove(m)));
        assert_eq!(next, b);
    }

    #[proptest]
    fn apply_moves_piece_and_captures_occupant(
        mut b: Board,
        #[filter(#b[#m.whence()].is_some() && #m.promotion() == Promotion::None)] m: Move,
    ) {
        let p = b[m.whence()].unwrap();
        let capture = b[m.whither()].map(|q| (q.role(), m.whither()));
        let mc = MoveContext(m, Role::Knight, capture);

        assert_eq!(b.apply(&mc), Ok(()));
        assert_eq!(b[m.whence()], None);
        assert_eq!(b[m.whither()], Some(p));
    }

    #[test]
    fn apply_relocates_rook_when_castling() {
        use Square::*;
        let mut b: Board = "r3k2r/8/8/8/8/8/8/R3K2R".parse().unwrap();

        b.apply(&MoveContext(Move(E1, G1, Promotion::None), Role::King, None))
            .unwrap();
        b.apply(&MoveContext(Move(E8, C8, Promotion::None), Role::King, None))
            .unwrap();

        assert_eq!(b.to_string(), "2kr3r/8/8/8/8/8/8/R4RK1");
    }

    #[test]
    fn apply_removes_pawn_captured_en_passant() {
        use Square::*;
        let mut b: Board = "4k3/8/8/3pP3/8/8/8/4K3".parse().unwrap();
        let mc = MoveContext(Move(E5, D6, Promotion::None), Role::Pawn, Some((Role::Pawn, D5)));

        b.apply(&mc).unwrap();

        assert_eq!(b[D5], None);
        assert_eq!(b[D6], Some(Piece::WhitePawn));
    }

    #[test]
    fn apply_replaces_promoted_pawn() {
        use Square::*;
        let mut b: Board = "4k3/P7/8/8/8/8/8/4K3".parse().unwrap();
        let mc = MoveContext(Move(A7, A8, Promotion::Knight), Role::Pawn, None);

        b.apply(&mc).unwrap();

        assert_eq!(b[A7], None);
        assert_eq!(b[A8], Some(Piece::WhiteKnight));
    }

    #[proptest]
    fn parsing_printed_board_is_an_identity(b: Board) {
        assert_eq!(b.to_string().parse(), Ok(b));
    }

    #[proptest]
    fn parsing_board_fails_for_invalid_placement(
        b: Board,
        #[strategy(..=#b.to_string().len())] n: usize,
        #[strategy("[^[:ascii:]]+")] r: String,
    ) {
        let s = b.to_string();
        assert_eq!([&s[..n], &r, &s[n..]].concat().parse().ok(), None::<Board>);
    }

    #[test]
    fn parsing_board_fails_if_rank_is_incomplete() {
        assert_eq!("8/8/8/8/8/8/8/7".parse::<Board>(), Err(ParseBoardError));
        assert_eq!("8/8/8/8/8/8/8/9".parse::<Board>(), Err(ParseBoardError));
        assert_eq!("8/8/8/8/8/8/8".parse::<Board>(), Err(ParseBoardError));
    }
}
