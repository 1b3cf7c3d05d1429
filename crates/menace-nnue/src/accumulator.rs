//! Hidden-layer partial sums for one perspective.

use menace_board::{Board, Color, Square};

use crate::features::{FeatureIndexer, PsqList, ThreatList};
use crate::network::{HIDDEN, Network};

/// How an accumulator's values were last produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    Uninitialized,
    /// Recomputed from the full feature set.
    Scratch,
    /// Derived from the parent ply by a feature diff.
    Incremental,
}

/// Accumulated hidden-layer activations for one perspective, together with
/// the sorted threat list and king square they were computed for.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct Accumulator {
    pub(crate) vals: [i16; HIDDEN],
    pub(crate) threats: ThreatList,
    pub(crate) king: Square,
    pub(crate) state: AccumulatorState,
}

impl Accumulator {
    /// Zeroed, uninitialized accumulator.
    pub const fn new() -> Self {
        Accumulator {
            vals: [0; HIDDEN],
            threats: ThreatList::new(),
            king: Square::A1,
            state: AccumulatorState::Uninitialized,
        }
    }

    /// Full recompute: start from bias, then add all features on the board.
    pub fn refresh(board: &Board, perspective: Color, indexer: &FeatureIndexer, net: &Network) -> Self {
        let (mut psq, mut threats) = (PsqList::new(), ThreatList::new());
        indexer.active_features(board, perspective, &mut psq, &mut threats);

        let mut acc = Accumulator {
            vals: *net.feature_bias(),
            threats,
            king: board.king_square(perspective),
            state: AccumulatorState::Scratch,
        };
        for &idx in psq.iter().chain(threats.iter()) {
            acc.add_feature(idx as usize, net);
        }

        acc
    }

    /// Incrementally add a feature.
    #[inline]
    pub fn add_feature(&mut self, idx: usize, net: &Network) {
        for (acc, &w) in self.vals.iter_mut().zip(net.feature_weights(idx)) {
            *acc = acc.wrapping_add(w);
        }
    }

    /// Incrementally remove a feature.
    #[inline]
    pub fn remove_feature(&mut self, idx: usize, net: &Network) {
        for (acc, &w) in self.vals.iter_mut().zip(net.feature_weights(idx)) {
            *acc = acc.wrapping_sub(w);
        }
    }

    #[inline]
    pub fn values(&self) -> &[i16; HIDDEN] {
        &self.vals
    }

    /// Sorted threat indices active when this accumulator was computed.
    #[inline]
    pub fn threats(&self) -> &ThreatList {
        &self.threats
    }

    /// King square of the accumulator's perspective.
    #[inline]
    pub fn king_square(&self) -> Square {
        self.king
    }

    #[inline]
    pub fn state(&self) -> AccumulatorState {
        self.state
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accumulator")
            .field("state", &self.state)
            .field("king", &self.king)
            .field("threats", &self.threats.len())
            .finish_non_exhaustive()
    }
}
