use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::Position;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, instrument};

/// Counts the leaf nodes of the legal move tree, move by move.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Perft {
    /// How many plies deep to expand.
    depth: u8,

    /// The position in FEN notation.
    #[clap(default_value_t)]
    pos: Position,
}

fn perft(pos: &Position, depth: u8) -> usize {
    match depth {
        0 => 1,
        1 => pos.moves().len(),
        d => pos
            .moves()
            .into_par_iter()
            .map(|mc| {
                let mut next = *pos;
                match next.play(mc) {
                    Ok(()) => perft(&next, d - 1),
                    Err(_) => 0,
                }
            })
            .sum(),
    }
}

impl Perft {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let timer = Instant::now();
        let mut nodes = 0;

        if self.depth > 0 {
            for mc in self.pos.moves() {
                let mut next = self.pos;
                next.play(mc)?;
                let n = perft(&next, self.depth - 1);
                println!("{}: {}", mc, n);
                nodes += n;
            }
        } else {
            nodes = 1;
        }

        println!("\n{}", nodes);
        info!(depth = self.depth, nodes, elapsed = ?timer.elapsed());

        Ok(())
    }
}
