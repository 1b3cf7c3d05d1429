//! Walks an invocation's moves through the accumulator stack.

use std::io::Write;
use std::sync::Arc;

use menace_board::{Board, Color};
use menace_nnue::{Accumulator, AccumulatorStack, Network, material_bucket};
use tracing::{debug, info, warn};

use crate::command::Invocation;
use crate::error::CliError;

/// Score of one ply of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyScore {
    pub ply: usize,
    /// UCI text of the move that reached this ply, `None` at the root.
    pub uci_move: Option<String>,
    pub bucket: usize,
    /// Score from the side to move's point of view.
    pub score: i32,
}

/// Outcome of a walk.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub plies: Vec<PlyScore>,
    /// Plies where an incremental accumulator differed from scratch.
    pub mismatches: usize,
}

/// Owns the accumulator stack for a series of walks over one network.
pub struct Session {
    stack: AccumulatorStack,
}

impl Session {
    pub fn new(net: Arc<Network>) -> Self {
        Self {
            stack: AccumulatorStack::new(net),
        }
    }

    /// Score the root and every move of `inv`, writing one line per ply to `out`.
    pub fn run(&mut self, inv: &Invocation, out: &mut impl Write) -> Result<Report, CliError> {
        let mut report = Report::default();
        let mut board = inv.root;
        self.stack.initialize(&board);
        report.plies.push(self.score(&board, None, inv.bucket));

        for &mv in &inv.moves {
            let (after, delta) = board.play(mv);
            self.stack.advance(&after, &delta);
            board = after;

            if inv.verify && !self.matches_scratch(&board) {
                report.mismatches += 1;
            }
            report.plies.push(self.score(&board, Some(mv.to_uci()), inv.bucket));
        }

        for ply in &report.plies {
            let mv = ply.uci_move.as_deref().unwrap_or("root");
            writeln!(out, "ply {:>3} {:<6} bucket {} score {:>6}", ply.ply, mv, ply.bucket, ply.score)?;
        }
        writeln!(out, "fen {board}")?;

        if report.mismatches > 0 {
            return Err(CliError::VerificationFailed {
                mismatches: report.mismatches,
            });
        }
        if inv.verify {
            info!(plies = inv.moves.len(), "incremental updates verified");
        }
        Ok(report)
    }

    fn score(&self, board: &Board, uci_move: Option<String>, bucket: Option<usize>) -> PlyScore {
        let bucket = bucket.unwrap_or_else(|| material_bucket(board));
        let score = self.stack.evaluate(board.side_to_move(), bucket);
        debug!(ply = self.stack.depth(), bucket, score, "scored ply");
        PlyScore {
            ply: self.stack.depth(),
            uci_move,
            bucket,
            score,
        }
    }

    fn matches_scratch(&self, board: &Board) -> bool {
        let mut ok = true;
        for perspective in Color::ALL {
            let scratch = Accumulator::refresh(board, perspective, self.stack.indexer(), self.stack.network());
            let current = self.stack.current(perspective);
            if current.values() != scratch.values() || current.threats() != scratch.threats() {
                warn!(ply = self.stack.depth(), %perspective, fen = %board, "incremental accumulator diverged");
                ok = false;
            }
        }
        ok
    }
}
