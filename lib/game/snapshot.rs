use crate::chess::{Board, Color, File, Move, Rank, Square};
use crate::game::{GameId, ParticipantId, Status};
use crate::util::Integer;
use serde::Serialize;
use std::fmt;

/// A render-ready view of a [`Game`][`crate::game::Game`].
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub game: GameId,
    pub white: ParticipantId,
    pub black: ParticipantId,
    pub board: Board,
    pub turn: Color,
    pub status: Status,
    pub last_move: Option<Move>,
    /// The square of the king in check, if any.
    pub check: Option<Square>,
    /// The side with a pending draw offer, if any.
    pub draw_offer: Option<Color>,
}

impl Snapshot {
    /// The participant playing the given side.
    pub fn player(&self, side: Color) -> &ParticipantId {
        match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

/// Draws the board from white's perspective followed by the state of the game.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{}", rank)?;

            for file in File::iter() {
                match self.board[Square::new(file, rank)] {
                    Some(p) => write!(f, " {}", p.figurine())?,
                    None => f.write_str(" ·")?,
                }
            }

            writeln!(f)?;
        }

        write!(f, " ")?;
        for file in File::iter() {
            write!(f, " {}", file)?;
        }

        writeln!(f)?;

        match self.status {
            Status::Over(outcome) => write!(f, "game {} is over: {}", self.game, outcome),
            Status::InProgress => {
                write!(f, "{} to move ({})", self.turn, self.player(self.turn))?;

                if self.check.is_some() {
                    f.write_str(", in check")?;
                }

                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{Outcome, Promotion};

    fn snapshot() -> Snapshot {
        Snapshot {
            game: GameId::from(7),
            white: ParticipantId::new("alice"),
            black: ParticipantId::new("bob"),
            board: Board::default(),
            turn: Color::White,
            status: Status::InProgress,
            last_move: None,
            check: None,
            draw_offer: None,
        }
    }

    #[test]
    fn snapshot_is_drawn_as_text_diagram() {
        let text = snapshot().to_string();
        let lines = Vec::from_iter(text.lines());

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜");
        assert_eq!(lines[4], "4 · · · · · · · ·");
        assert_eq!(lines[7], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖");
        assert_eq!(lines[8], "  a b c d e f g h");
        assert_eq!(lines[9], "white to move (alice)");
    }

    #[test]
    fn finished_snapshot_shows_the_outcome() {
        let s = Snapshot {
            status: Status::Over(Outcome::Checkmate(Color::Black)),
            ..snapshot()
        };

        assert!(s
            .to_string()
            .ends_with("game #7 is over: checkmate by the black player"));
    }

    #[test]
    fn snapshot_serializes_board_as_placement() {
        let s = Snapshot {
            last_move: Some(Move(Square::E2, Square::E4, Promotion::None)),
            ..snapshot()
        };

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["game"], 7);
        assert_eq!(json["board"], "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
        assert_eq!(json["turn"], "white");
        assert_eq!(json["lastMove"], "e2e4");
        assert_eq!(json["check"], serde_json::Value::Null);
    }
}
