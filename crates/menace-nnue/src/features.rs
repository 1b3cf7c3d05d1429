//! Threat-input feature indexing.
//!
//! The input space has two regions. Indices `[0, PSQ_OFFSET)` encode
//! attacker/defender pairs ("threats"); indices `[PSQ_OFFSET, INPUT_SIZE)`
//! encode piece-square features. Every square is first oriented so that the
//! perspective's king sits on the a-d files and the perspective plays upward.

use menace_board::attacks::{attacks, pawn_attacks};
use menace_board::{Bitboard, Board, Color, Piece, PieceKind, Square};

use crate::index_list::IndexList;

/// Size of the threat region, and the first piece-square index.
pub const PSQ_OFFSET: usize = 79_856;

/// Total number of input features.
pub const INPUT_SIZE: usize = PSQ_OFFSET + 2 * PieceKind::COUNT * Square::COUNT;

/// Piece-square features of one perspective: one per piece on the board.
pub type PsqList = IndexList<32>;

/// Threat features of one perspective.
pub type ThreatList = IndexList<96>;

/// Defender kinds an attacker kind is paired with, over both defender colours.
pub const VALID_TARGETS: [usize; PieceKind::COUNT] = [6, 12, 10, 10, 12, 8];

/// Slot of a defender kind within an attacker kind's target set, `-1` if the
/// pair is never encoded.
pub const TARGET_SLOT: [[i8; PieceKind::COUNT]; PieceKind::COUNT] = [
    [0, 1, -1, 2, -1, -1],
    [0, 1, 2, 3, 4, 5],
    [0, 1, 2, 3, -1, 4],
    [0, 1, 2, 3, -1, 4],
    [0, 1, 2, 3, 4, 5],
    [0, 1, 2, 3, -1, -1],
];

/// Square XOR mask for `perspective` with its king on `king_sq`.
///
/// White uses a1 (identity) or h1 (file mirror); Black uses a8 (rank flip)
/// or h8 (rank and file flip). Only the king's file half matters.
#[inline]
pub const fn orientation(perspective: Color, king_sq: Square) -> u8 {
    let mirror = if king_sq.file() < 4 { 0 } else { 7 };
    match perspective {
        Color::White => mirror,
        Color::Black => 56 | mirror,
    }
}

/// Per-piece layout of the threat region.
///
/// Built once from empty-board attack counts: attacker pieces follow dense
/// order (white pawn .. white king, black pawn .. black king), each taking
/// `VALID_TARGETS[kind] * squares_total` consecutive indices.
#[derive(Clone, PartialEq, Eq)]
pub struct ThreatOffsets {
    piece_base: [usize; Piece::COUNT],
    squares_total: [usize; Piece::COUNT],
    square_offset: [[usize; Square::COUNT]; Piece::COUNT],
}

impl ThreatOffsets {
    pub fn new() -> ThreatOffsets {
        let mut offsets = ThreatOffsets {
            piece_base: [0; Piece::COUNT],
            squares_total: [0; Piece::COUNT],
            square_offset: [[0; Square::COUNT]; Piece::COUNT],
        };

        let mut base = 0;
        for piece in Piece::all() {
            let p = piece.index();
            let mut running = 0;
            for from in Square::all() {
                offsets.square_offset[p][from.index()] = running;
                let reachable = match piece.kind() {
                    PieceKind::Pawn if from.rank() == 0 || from.rank() == 7 => Bitboard::EMPTY,
                    PieceKind::Pawn => pawn_attacks(piece.color(), from),
                    kind => attacks(kind, piece.color(), from, Bitboard::EMPTY),
                };
                running += reachable.count() as usize;
            }
            offsets.squares_total[p] = running;
            offsets.piece_base[p] = base;
            base += VALID_TARGETS[piece.kind().index()] * running;
        }

        debug_assert_eq!(base, PSQ_OFFSET);
        offsets
    }

    /// First index of `piece`'s block.
    #[inline]
    pub fn piece_base(&self, piece: Piece) -> usize {
        self.piece_base[piece.index()]
    }

    /// Empty-board attack count of `piece` summed over all origin squares.
    #[inline]
    pub fn squares_total(&self, piece: Piece) -> usize {
        self.squares_total[piece.index()]
    }

    /// Empty-board attacks of `piece` from every square below `from`.
    #[inline]
    pub fn square_offset(&self, piece: Piece, from: Square) -> usize {
        self.square_offset[piece.index()][from.index()]
    }

    /// One past the last threat index.
    pub fn total(&self) -> usize {
        let last = Piece::BLACK_KING;
        self.piece_base(last) + VALID_TARGETS[last.kind().index()] * self.squares_total(last)
    }
}

impl Default for ThreatOffsets {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThreatOffsets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreatOffsets")
            .field("piece_base", &self.piece_base)
            .field("squares_total", &self.squares_total)
            .finish_non_exhaustive()
    }
}

/// Maps board contents to feature indices for either perspective.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndexer {
    offsets: ThreatOffsets,
}

impl FeatureIndexer {
    pub fn new() -> FeatureIndexer {
        FeatureIndexer { offsets: ThreatOffsets::new() }
    }

    pub fn offsets(&self) -> &ThreatOffsets {
        &self.offsets
    }

    /// Piece-square feature of `piece` on `sq`.
    #[inline]
    pub fn psq_index(&self, piece: Piece, sq: Square, king_sq: Square, perspective: Color) -> usize {
        let theirs = usize::from(piece.color() != perspective);
        let oriented = sq.xor(orientation(perspective, king_sq));
        PSQ_OFFSET + theirs * PieceKind::COUNT * Square::COUNT + piece.kind().index() * Square::COUNT + oriented.index()
    }

    /// Threat feature of `attacker` on `from` attacking `defender` on `to`.
    ///
    /// Returns `None` for pairs outside the encoded target sets, and for the
    /// lower-origin direction of a symmetric pair: two same-kind pieces that
    /// attack each other, except friendly pawns, are encoded only once.
    pub fn threat_index(
        &self,
        attacker: Piece,
        from: Square,
        to: Square,
        defender: Piece,
        king_sq: Square,
        perspective: Color,
    ) -> Option<usize> {
        let enemy = attacker.color() != defender.color();
        let mask = orientation(perspective, king_sq);
        let (from, to) = (from.xor(mask), to.xor(mask));
        let (attacker, defender) = match perspective {
            Color::White => (attacker, defender),
            Color::Black => (attacker.flip_color(), defender.flip_color()),
        };

        let (a, d) = (attacker.kind(), defender.kind());
        let slot = usize::try_from(TARGET_SLOT[a.index()][d.index()]).ok()?;
        if a == d && (enemy || a != PieceKind::Pawn) && from < to {
            return None;
        }

        let reachable = match a {
            PieceKind::Pawn => pawn_attacks(attacker.color(), from),
            kind => attacks(kind, attacker.color(), from, Bitboard::EMPTY),
        };
        debug_assert!(reachable.contains(to), "{attacker} on {from} does not reach {to}");

        let target = defender.color().index() * (VALID_TARGETS[a.index()] / 2) + slot;
        Some(
            self.offsets.piece_base(attacker)
                + target * self.offsets.squares_total(attacker)
                + self.offsets.square_offset(attacker, from)
                + (reachable & Bitboard::below(to)).count() as usize,
        )
    }

    /// Push every active feature of `board` seen from `perspective`.
    ///
    /// Piece-square indices come out in enumeration order; threat indices
    /// come out strictly ascending.
    pub fn active_features(&self, board: &Board, perspective: Color, psq: &mut PsqList, threats: &mut ThreatList) {
        self.collect(board, perspective, Some(psq), threats);
    }

    /// Threat half of [`FeatureIndexer::active_features`].
    pub fn active_threats(&self, board: &Board, perspective: Color, threats: &mut ThreatList) {
        self.collect(board, perspective, None, threats);
    }

    /// Number of threat features `board` has from `perspective`, without
    /// filling a list. Positions above [`ThreatList::CAPACITY`] cannot be
    /// accumulated.
    pub fn count_threats(&self, board: &Board, perspective: Color) -> usize {
        let king_sq = board.king_square(perspective);
        let occupied = board.occupied();
        let mut count = 0;
        for from in occupied {
            let Some(attacker) = board.piece_on(from) else {
                continue;
            };
            for to in attacks(attacker.kind(), attacker.color(), from, occupied) & occupied {
                if let Some(defender) = board.piece_on(to)
                    && self.threat_index(attacker, from, to, defender, king_sq, perspective).is_some()
                {
                    count += 1;
                }
            }
        }
        count
    }

    fn collect(&self, board: &Board, perspective: Color, mut psq: Option<&mut PsqList>, threats: &mut ThreatList) {
        let king_sq = board.king_square(perspective);
        let occupied = board.occupied();

        for side in [perspective, !perspective] {
            for kind in PieceKind::ALL {
                let attacker = Piece::new(kind, side);
                let block_start = threats.len();
                for from in board.pieces_of(side, kind) {
                    if let Some(psq) = psq.as_deref_mut() {
                        psq.push(self.psq_index(attacker, from, king_sq, perspective));
                    }
                    for to in attacks(kind, side, from, occupied) & occupied {
                        let Some(defender) = board.piece_on(to) else {
                            continue;
                        };
                        if let Some(index) = self.threat_index(attacker, from, to, defender, king_sq, perspective) {
                            threats.push(index);
                        }
                    }
                }
                // Blocks cover disjoint ascending ranges, so sorting each block
                // sorts the whole list.
                threats.sort_tail(block_start);
            }
        }

        debug_assert!(threats.is_strictly_sorted(), "threat list not globally sorted");
    }
}
