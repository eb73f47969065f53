use crate::chess::*;
use std::iter::successors;

/// A unit step `(Δfile, Δrank)` on the board.
pub type Direction = (i8, i8);

/// The eight direction offsets, in the order rays are cast.
///
/// Starts north and turns clockwise, so generated moves come out in a
/// deterministic order, though only the set of moves is meaningful.
pub const DIRECTIONS: [Direction; 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// The eight jumps of a knight, clockwise from north-north-east.
pub const KNIGHT_JUMPS: [Direction; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// The rank offset of a pawn push for the given side.
#[inline(always)]
pub fn forward(side: Color) -> i8 {
    match side {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// The [`DIRECTIONS`] a piece of this [`Role`] slides along.
///
/// Bishops use the diagonals, rooks the orthogonals and queens all eight;
/// pieces that do not slide have none.
#[inline(always)]
pub fn directions(role: Role) -> impl Iterator<Item = Direction> {
    let (orthogonal, diagonal) = match role {
        Role::Bishop => (false, true),
        Role::Rook => (true, false),
        Role::Queen => (true, true),
        _ => (false, false),
    };

    DIRECTIONS.into_iter().filter(move |&(df, dr)| {
        if df == 0 || dr == 0 {
            orthogonal
        } else {
            diagonal
        }
    })
}

/// The squares from `whence` along a [`Direction`].
///
/// The ray stops at the edge of the board or at the first occupied square,
/// which is included whatever its color.
#[inline(always)]
pub fn ray(board: &Board, whence: Square, (df, dr): Direction) -> impl Iterator<Item = Square> + '_ {
    successors(whence.offset(df, dr), move |sq| match board[*sq] {
        Some(_) => None,
        None => sq.offset(df, dr),
    })
}

/// Whether any piece of color `by` attacks the given [`Square`].
///
/// Only capture patterns are considered, castling never attacks anything.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let on = |df: i8, dr: i8| sq.offset(df, dr).and_then(|s| board[s]);

    let pawn = Piece::new(Role::Pawn, by);
    let knight = Piece::new(Role::Knight, by);
    let king = Piece::new(Role::King, by);

    [-1, 1].into_iter().any(|df| on(df, -forward(by)) == Some(pawn))
        || KNIGHT_JUMPS.into_iter().any(|(df, dr)| on(df, dr) == Some(knight))
        || DIRECTIONS.into_iter().any(|(df, dr)| on(df, dr) == Some(king))
        || DIRECTIONS.into_iter().any(|d| {
            match ray(board, sq, d).last().and_then(|s| board[s]) {
                Some(p) if p.color() == by => directions(p.role()).any(|x| x == d),
                _ => false,
            }
        })
}

/// The pseudo-legal moves of the piece on `whence`.
///
/// These obey the movement pattern of the piece and the occupancy of the
/// board, but may leave the mover's own king in check.
/// Returns nothing if the square is empty.
pub fn pseudo_legal_moves(pos: &Position, whence: Square) -> Vec<MoveContext> {
    let mut moves = Vec::new();

    let Some(piece) = pos.board()[whence] else {
        return moves;
    };

    match piece.role() {
        Role::Pawn => pawn(pos, piece, whence, &mut moves),
        Role::Knight => {
            for (df, dr) in KNIGHT_JUMPS {
                if let Some(whither) = whence.offset(df, dr) {
                    land(pos.board(), piece, whence, whither, &mut moves);
                }
            }
        }

        Role::King => {
            for (df, dr) in DIRECTIONS {
                if let Some(whither) = whence.offset(df, dr) {
                    land(pos.board(), piece, whence, whither, &mut moves);
                }
            }

            castle(pos, piece, whence, &mut moves);
        }

        role => {
            for d in directions(role) {
                for whither in ray(pos.board(), whence, d) {
                    land(pos.board(), piece, whence, whither, &mut moves);
                }
            }
        }
    }

    moves
}

/// Lands on an empty square or captures an enemy piece, never a friendly one.
fn land(board: &Board, piece: Piece, whence: Square, whither: Square, moves: &mut Vec<MoveContext>) {
    let m = Move(whence, whither, Promotion::None);
    match board[whither] {
        None => moves.push(MoveContext(m, piece.role(), None)),
        Some(p) if p.color() != piece.color() => {
            moves.push(MoveContext(m, piece.role(), Some((p.role(), whither))))
        }
        Some(_) => {}
    }
}

fn pawn(pos: &Position, piece: Piece, whence: Square, moves: &mut Vec<MoveContext>) {
    let board = pos.board();
    let side = piece.color();
    let dr = forward(side);

    let mut advance = |whither: Square, capture: Option<(Role, Square)>| {
        if whither.rank() == side.promotion_rank() {
            for p in Promotion::ALL {
                moves.push(MoveContext(Move(whence, whither, p), Role::Pawn, capture));
            }
        } else {
            let m = Move(whence, whither, Promotion::None);
            moves.push(MoveContext(m, Role::Pawn, capture));
        }
    };

    if let Some(one) = whence.offset(0, dr).filter(|&s| board[s].is_none()) {
        advance(one, None);

        if whence.rank() == side.pawn_rank() {
            if let Some(two) = one.offset(0, dr).filter(|&s| board[s].is_none()) {
                advance(two, None);
            }
        }
    }

    for df in [-1, 1] {
        let Some(whither) = whence.offset(df, dr) else {
            continue;
        };

        match board[whither] {
            Some(p) if p.color() != side => advance(whither, Some((p.role(), whither))),
            None if pos.turn() == side && pos.en_passant() == Some(whither) => {
                let passed = Square::new(whither.file(), whence.rank());
                if board[passed] == Some(Piece::new(Role::Pawn, !side)) {
                    advance(whither, Some((Role::Pawn, passed)));
                }
            }
            _ => {}
        }
    }
}

fn castle(pos: &Position, piece: Piece, whence: Square, moves: &mut Vec<MoveContext>) {
    use File::*;

    let board = pos.board();
    let side = piece.color();

    if whence != side.home(E) || is_attacked(board, whence, !side) {
        return;
    }

    let sides = [
        (pos.castles().short(side), H, &[F, G][..], &[F, G][..]),
        (pos.castles().long(side), A, &[B, C, D][..], &[D, C][..]),
    ];

    for (whither, rook, between, path) in sides {
        let Some(whither) = whither else {
            continue;
        };

        let mut between = between.iter().map(|&f| side.home(f));
        let mut path = path.iter().map(|&f| side.home(f));

        if board[side.home(rook)] == Some(Piece::new(Role::Rook, side))
            && between.all(|sq| board[sq].is_none())
            && !path.any(|sq| is_attacked(board, sq, !side))
        {
            let m = Move(whence, whither, Promotion::None);
            moves.push(MoveContext(m, Role::King, None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_strategy::proptest;

    fn destinations(pos: &Position, whence: Square) -> HashSet<Square> {
        pseudo_legal_moves(pos, whence)
            .into_iter()
            .map(|mc| mc.whither())
            .collect()
    }

    #[test]
    fn directions_depend_on_role() {
        assert_eq!(directions(Role::Bishop).count(), 4);
        assert_eq!(directions(Role::Rook).count(), 4);
        assert_eq!(directions(Role::Queen).count(), 8);
        assert_eq!(directions(Role::Knight).count(), 0);
        assert!(directions(Role::Bishop).all(|(df, dr)| df != 0 && dr != 0));
        assert!(directions(Role::Rook).all(|(df, dr)| df == 0 || dr == 0));
    }

    #[proptest]
    fn pseudo_legal_moves_never_land_on_friendly_pieces(pos: Position, sq: Square) {
        for mc in pseudo_legal_moves(&pos, sq) {
            let mover = pos.board()[mc.whence()].map(|p| p.color());
            let target = pos.board()[mc.whither()].map(|p| p.color());
            assert_ne!(target, mover);
        }
    }

    #[proptest]
    fn pseudo_legal_moves_start_on_the_given_square(pos: Position, sq: Square) {
        for mc in pseudo_legal_moves(&pos, sq) {
            assert_eq!(mc.whence(), sq);
            assert_eq!(pos.board()[sq].map(|p| p.role()), Some(mc.role()));
        }
    }

    #[proptest]
    fn pseudo_legal_moves_of_empty_square_is_empty(
        pos: Position,
        #[filter(#pos.board()[#sq].is_none())] sq: Square,
    ) {
        assert!(pseudo_legal_moves(&pos, sq).is_empty());
    }

    #[proptest]
    fn sliding_pieces_never_jump_over_occupied_squares(pos: Position, sq: Square) {
        let slides = pos.board()[sq].is_some_and(|p| p.role().is_slider());

        for mc in pseudo_legal_moves(&pos, sq).into_iter().filter(|_| slides) {
            let df = (mc.whither().file() - sq.file()).signum();
            let dr = (mc.whither().rank() - sq.rank()).signum();

            let mut between = sq.offset(df, dr).unwrap();
            while between != mc.whither() {
                assert_eq!(pos.board()[between], None);
                between = between.offset(df, dr).unwrap();
            }
        }
    }

    #[proptest]
    fn ray_stops_at_first_occupied_square(pos: Position, sq: Square, #[strategy(0usize..8)] d: usize) {
        let squares = Vec::from_iter(ray(pos.board(), sq, DIRECTIONS[d]));
        if let Some((last, rest)) = squares.split_last() {
            assert!(rest.iter().all(|&s| pos.board()[s].is_none()));
            if pos.board()[*last].is_none() {
                let (df, dr) = DIRECTIONS[d];
                assert_eq!(last.offset(df, dr), None);
            }
        }
    }

    #[proptest]
    fn is_attacked_agrees_with_pseudo_legal_captures(pos: Position) {
        let captures = HashSet::<Square>::from_iter(
            pos.board()
                .by_color(pos.turn())
                .flat_map(|(_, whence)| pseudo_legal_moves(&pos, whence))
                .filter(|mc| mc.is_capture() && !mc.is_en_passant())
                .map(|mc| mc.whither()),
        );

        for (_, sq) in pos.board().by_color(!pos.turn()) {
            assert_eq!(is_attacked(pos.board(), sq, pos.turn()), captures.contains(&sq));
        }
    }

    #[test]
    fn rook_captures_at_the_end_of_its_ray() {
        let pos: Position = "p7/8/7k/8/8/7K/8/R7 w - - 0 1".parse().unwrap();
        let squares = destinations(&pos, Square::A1);

        assert!(squares.contains(&Square::A8));
        assert!(squares.contains(&Square::H1));
        assert_eq!(squares.len(), 14);
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let pos = Position::default();
        assert_eq!(
            destinations(&pos, Square::G1),
            HashSet::from([Square::F3, Square::H3])
        );
    }

    #[test]
    fn pawn_can_push_twice_from_its_starting_rank_only() {
        let pos: Position = "4k3/8/8/8/8/3P4/4P3/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(
            destinations(&pos, Square::E2),
            HashSet::from([Square::E3, Square::E4])
        );
        assert_eq!(destinations(&pos, Square::D3), HashSet::from([Square::D4]));
    }

    #[test]
    fn pawn_cannot_push_into_occupied_square() {
        let pos: Position = "4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1".parse().unwrap();
        assert!(destinations(&pos, Square::E2).is_empty());
    }

    #[test]
    fn pawn_captures_diagonally() {
        let pos: Position = "4k3/8/8/8/8/3n1N2/4P3/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(
            destinations(&pos, Square::E2),
            HashSet::from([Square::D3, Square::E3, Square::E4])
        );
    }

    #[test]
    fn pawn_captures_en_passant_right_after_double_push() {
        let mut pos: Position = "4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1".parse().unwrap();
        pos.make("d7d5".parse().unwrap()).unwrap();

        let ep = pseudo_legal_moves(&pos, Square::E5)
            .into_iter()
            .find(|mc| mc.is_en_passant())
            .unwrap();

        assert_eq!(ep.whither(), Square::D6);
        assert_eq!(ep.capture(), Some((Role::Pawn, Square::D5)));
    }

    #[test]
    fn pawn_generates_every_promotion() {
        let pos: Position = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let promotions: HashSet<_> = pseudo_legal_moves(&pos, Square::A7)
            .into_iter()
            .map(|mc| mc.promotion())
            .collect();

        assert_eq!(promotions, HashSet::from(Promotion::ALL));
    }

    #[test]
    fn king_castles_when_path_is_clear_and_safe() {
        let pos: Position = "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        let squares = destinations(&pos, Square::E1);
        assert!(squares.contains(&Square::G1));
        assert!(squares.contains(&Square::C1));
    }

    #[test]
    fn king_cannot_castle_through_attacked_square() {
        let pos: Position = "4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        let squares = destinations(&pos, Square::E1);
        assert!(!squares.contains(&Square::G1));
        assert!(squares.contains(&Square::C1));
    }

    #[test]
    fn king_cannot_castle_out_of_check() {
        let pos: Position = "4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        let squares = destinations(&pos, Square::E1);
        assert!(!squares.contains(&Square::G1));
        assert!(!squares.contains(&Square::C1));
    }

    #[test]
    fn king_cannot_castle_without_rights() {
        let pos: Position = "4k3/8/8/8/8/8/8/R3K2R w - - 0 1".parse().unwrap();
        let squares = destinations(&pos, Square::E1);
        assert!(!squares.contains(&Square::G1));
        assert!(!squares.contains(&Square::C1));
    }

    #[test]
    fn king_cannot_castle_through_pieces() {
        let pos: Position = "4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1".parse().unwrap();
        let squares = destinations(&pos, Square::E1);
        assert!(!squares.contains(&Square::G1));
        assert!(!squares.contains(&Square::C1));
    }

    #[test]
    fn queenside_castling_ignores_attacks_on_the_rook_path() {
        let pos: Position = "1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1".parse().unwrap();
        assert!(destinations(&pos, Square::E1).contains(&Square::C1));
    }
}
