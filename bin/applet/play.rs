use crate::io::Io;
use anyhow::Error as Anyhow;
use clap::Parser;
use derive_more::{Display, Error, From};
use lib::chess::{Move, ParseMoveError};
use lib::game::{ParticipantId, Rules, Status};
use lib::registry::Registry;
use std::io::{stdin, stdout, Read, Write};
use std::str::FromStr;
use tracing::{info, instrument, warn};

/// Hosts a game between two participants, who take turns through the standard input.
///
/// Each line names the participant followed by a command, for example
/// `alice move e2e4`, `bob draw offer` or `alice resign`.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// The rules the game is played under, in RON.
    #[clap(short, long, default_value_t)]
    rules: Rules,

    /// The participant playing the white pieces.
    white: ParticipantId,

    /// The participant playing the black pieces.
    black: ParticipantId,
}

/// An action requested by a participant.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Command {
    Move(Move),
    Resign,
    OfferDraw,
    AcceptDraw,
    DeclineDraw,
    Show,
}

/// The reason why parsing a [`Command`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
enum ParseCommandError {
    #[display(fmt = "expected `<participant> <command>`")]
    #[from(ignore)]
    MissingCommand,
    #[display(fmt = "unknown command `{}`", _0)]
    #[from(ignore)]
    UnknownCommand(#[error(not(source))] String),
    #[display(fmt = "invalid move")]
    InvalidMove(ParseMoveError),
}

/// A [`Command`] along with the participant who issued it.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Request(ParticipantId, Command);

impl FromStr for Request {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = Vec::from_iter(s.split_whitespace());

        let command = match tokens[..] {
            [_, "move", m] => Command::Move(m.parse()?),
            [_, "resign"] => Command::Resign,
            [_, "draw", "offer"] => Command::OfferDraw,
            [_, "draw", "accept"] => Command::AcceptDraw,
            [_, "draw", "decline"] => Command::DeclineDraw,
            [_, "show"] => Command::Show,
            [] | [_] => return Err(ParseCommandError::MissingCommand),
            [_, ..] => return Err(ParseCommandError::UnknownCommand(tokens[1..].join(" "))),
        };

        Ok(Request(tokens[0].into(), command))
    }
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let mut io = Io::new(stdout(), stdin());
        self.run(&mut io)
    }

    fn run<W: Write, R: Read>(self, io: &mut Io<W, R>) -> Result<(), Anyhow> {
        let registry = Registry::new(self.rules);
        let game = registry.create_game(self.white.clone(), self.black)?;

        io.send(registry.snapshot(&self.white)?)?;
        io.flush()?;

        while let Some(line) = io.recv()? {
            if line.trim().is_empty() {
                continue;
            }

            let Request(p, command) = match line.parse::<Request>() {
                Ok(r) => r,
                Err(e) => {
                    warn!(%line, "{}", e);
                    io.send(format_args!("error: {}", e))?;
                    continue;
                }
            };

            let result = match command {
                Command::Move(m) => registry.play(&p, m).map(|a| (a.status, Some(a.snapshot))),
                Command::Resign => registry.resign(&p).map(|o| (Status::Over(o), None)),
                Command::OfferDraw => registry.offer_draw(&p).map(|s| (s, None)),
                Command::AcceptDraw => registry.accept_draw(&p).map(|o| (Status::Over(o), None)),
                Command::DeclineDraw => registry.decline_draw(&p).map(|()| (Status::InProgress, None)),
                Command::Show => registry.snapshot(&p).map(|s| (s.status, Some(s))),
            };

            match result {
                Ok((status, snapshot)) => {
                    if let Some(s) = snapshot {
                        io.send(s)?;
                    }

                    if let Status::Over(outcome) = status {
                        info!(%game, %outcome);
                        io.send(outcome)?;
                        io.flush()?;
                        return Ok(());
                    }
                }

                Err(e) => {
                    warn!(%game, %p, "{}", e);
                    io.send(format_args!("error: {}", e))?;
                }
            }

            io.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib::chess::{Promotion, Square};

    fn play(input: &str) -> String {
        let cmd = Play {
            rules: Rules::default(),
            white: "alice".into(),
            black: "bob".into(),
        };

        let mut output = Vec::new();
        let mut io = Io::new(&mut output, input.as_bytes());
        cmd.run(&mut io).unwrap();
        drop(io);

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn requests_name_the_participant_and_the_command() {
        assert_eq!(
            "alice move e7e8q".parse(),
            Ok(Request(
                "alice".into(),
                Command::Move(Move(Square::E7, Square::E8, Promotion::Queen))
            ))
        );

        assert_eq!(
            "bob draw accept".parse(),
            Ok(Request("bob".into(), Command::AcceptDraw))
        );

        assert_eq!(
            "bob  resign ".parse(),
            Ok(Request("bob".into(), Command::Resign))
        );
    }

    #[test]
    fn parsing_request_fails_for_unknown_commands() {
        assert_eq!(
            "bob".parse::<Request>(),
            Err(ParseCommandError::MissingCommand)
        );

        assert_eq!(
            "bob castle long".parse::<Request>(),
            Err(ParseCommandError::UnknownCommand("castle long".into()))
        );

        assert!(matches!(
            "bob move e9e4".parse::<Request>(),
            Err(ParseCommandError::InvalidMove(_))
        ));
    }

    #[test]
    fn game_ends_on_checkmate() {
        let output = play("alice move f2f3\nbob move e7e5\nalice move g2g4\nbob move d8h4\n");
        assert!(output.ends_with("checkmate by the black player\n"));
    }

    #[test]
    fn game_ends_on_resignation() {
        let output = play("alice resign\nbob move e7e5\n");
        assert!(output.ends_with("white player resigned\n"));
    }

    #[test]
    fn game_ends_on_draw_by_agreement() {
        let output = play("alice draw offer\nbob draw accept\n");
        assert!(output.ends_with("draw by agreement\n"));
    }

    #[test]
    fn errors_are_reported_without_ending_the_game() {
        let output = play("bob move e7e5\ncarol show\nalice dance\nalice move e2e4\n");
        let errors = output.lines().filter(|l| l.starts_with("error: ")).count();
        assert_eq!(errors, 3);
        assert!(output.ends_with("black to move (bob)\n"));
    }
}
