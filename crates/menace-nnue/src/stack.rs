//! Per-ply accumulator stack with incremental updates.

use std::sync::Arc;

use menace_board::{Board, Color, MoveDelta};
use tracing::{debug, trace};

use crate::accumulator::{Accumulator, AccumulatorState};
use crate::features::{FeatureIndexer, ThreatList, orientation};
use crate::index_list::sorted_difference;
use crate::network::Network;

/// Deepest ply the stack can reach.
pub const MAX_PLY: usize = 128;

/// Accumulators for both perspectives at every ply from the root to the
/// current depth.
///
/// Frames are allocated once. [`AccumulatorStack::advance`] derives the child
/// ply from its parent, falling back to a full refresh for a perspective
/// whose king crossed between the d and e files.
pub struct AccumulatorStack {
    net: Arc<Network>,
    indexer: FeatureIndexer,
    frames: Box<[[Accumulator; Color::COUNT]]>,
    depth: usize,
}

impl AccumulatorStack {
    pub fn new(net: Arc<Network>) -> AccumulatorStack {
        AccumulatorStack {
            net,
            indexer: FeatureIndexer::new(),
            frames: vec![[Accumulator::new(); Color::COUNT]; MAX_PLY + 1].into_boxed_slice(),
            depth: 0,
        }
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.net
    }

    pub fn indexer(&self) -> &FeatureIndexer {
        &self.indexer
    }

    /// Current ply, 0 at the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.frames[0][0].state() != AccumulatorState::Uninitialized
    }

    /// Reset to depth 0 and compute both root accumulators from scratch.
    pub fn initialize(&mut self, board: &Board) {
        self.depth = 0;
        for perspective in Color::ALL {
            self.frames[0][perspective.index()] = Accumulator::refresh(board, perspective, &self.indexer, &self.net);
        }
        debug!(
            white_threats = self.frames[0][0].threats().len(),
            black_threats = self.frames[0][1].threats().len(),
            "accumulator stack initialized"
        );
    }

    /// Push the ply reached by the move described by `delta`; `board` is the
    /// position after that move.
    ///
    /// # Panics
    ///
    /// Panics if the stack is uninitialized or already at [`MAX_PLY`].
    pub fn advance(&mut self, board: &Board, delta: &MoveDelta) {
        assert!(self.is_initialized(), "advance on uninitialized accumulator stack");
        assert!(self.depth < MAX_PLY, "accumulator stack overflow past ply {MAX_PLY}");

        let (parents, children) = self.frames.split_at_mut(self.depth + 1);
        let parent = &parents[self.depth];
        let child = &mut children[0];
        for perspective in Color::ALL {
            let p = perspective.index();
            update(&self.indexer, &self.net, &parent[p], &mut child[p], board, delta, perspective);
        }
        self.depth += 1;
    }

    /// [`AccumulatorStack::advance`] without an emitted delta: the delta is
    /// derived by comparing the two positions.
    pub fn advance_between(&mut self, before: &Board, after: &Board) {
        let delta = MoveDelta::between(before, after);
        self.advance(after, &delta);
    }

    /// Pop one ply.
    ///
    /// # Panics
    ///
    /// Panics at the root or when the stack is uninitialized.
    pub fn retreat(&mut self) {
        assert!(
            self.is_initialized() && self.depth > 0,
            "retreat on empty accumulator stack"
        );
        self.depth -= 1;
    }

    /// Score of the current ply from `stm`'s point of view.
    pub fn evaluate(&self, stm: Color, bucket: usize) -> i32 {
        self.evaluate_at(self.depth, stm, bucket)
    }

    /// Score of ply `depth` from `stm`'s point of view.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is beyond the current ply, the stack is
    /// uninitialized, or `bucket` is out of range.
    pub fn evaluate_at(&self, depth: usize, stm: Color, bucket: usize) -> i32 {
        assert!(
            self.is_initialized() && depth <= self.depth,
            "no accumulator at ply {depth} (current ply {})",
            self.depth
        );
        let frame = &self.frames[depth];
        self.net.evaluate(&frame[stm.index()], &frame[(!stm).index()], bucket)
    }

    /// Accumulator of `perspective` at the current ply.
    pub fn current(&self, perspective: Color) -> &Accumulator {
        &self.frames[self.depth][perspective.index()]
    }
}

impl std::fmt::Debug for AccumulatorStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccumulatorStack")
            .field("depth", &self.depth)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// Derive `child` from `parent` for one perspective.
fn update(
    indexer: &FeatureIndexer,
    net: &Network,
    parent: &Accumulator,
    child: &mut Accumulator,
    board: &Board,
    delta: &MoveDelta,
    perspective: Color,
) {
    let king_sq = board.king_square(perspective);
    if orientation(perspective, king_sq) != orientation(perspective, parent.king_square()) {
        trace!(%perspective, from = %parent.king_square(), to = %king_sq, "king crossed files, refreshing");
        *child = Accumulator::refresh(board, perspective, indexer, net);
        return;
    }

    let mut threats = ThreatList::new();
    indexer.active_threats(board, perspective, &mut threats);
    let (mut added, mut removed) = (ThreatList::new(), ThreatList::new());
    sorted_difference(&threats, parent.threats(), &mut added, &mut removed);

    child.vals = parent.vals;
    for change in delta.iter() {
        if let Some(from) = change.from {
            child.remove_feature(indexer.psq_index(change.piece, from, king_sq, perspective), net);
        }
    }
    for &idx in removed.iter() {
        child.remove_feature(idx as usize, net);
    }
    for change in delta.iter() {
        if let Some(to) = change.to {
            child.add_feature(indexer.psq_index(change.piece, to, king_sq, perspective), net);
        }
    }
    for &idx in added.iter() {
        child.add_feature(idx as usize, net);
    }

    trace!(
        %perspective,
        added = added.len(),
        removed = removed.len(),
        pieces = delta.len(),
        "accumulator advanced"
    );
    child.threats = threats;
    child.king = king_sq;
    child.state = AccumulatorState::Incremental;
}
