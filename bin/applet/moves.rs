use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::Position;
use tracing::{info, instrument};

/// Lists the legal moves in a position.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Moves {
    /// The position in FEN notation.
    pos: Position,
}

impl Moves {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let mut moves = Vec::from_iter(self.pos.moves().into_iter().map(|mc| mc.to_string()));
        moves.sort();

        for m in &moves {
            println!("{}", m);
        }

        match self.pos.outcome() {
            None => info!(moves = moves.len(), check = self.pos.is_check()),
            Some(o) => info!(moves = moves.len(), outcome = %o),
        }

        Ok(())
    }
}
