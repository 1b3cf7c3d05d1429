//! Piece appearances and disappearances caused by one move.

use crate::board::Board;
use crate::piece::Piece;
use crate::square::Square;

/// One piece's change of location. `from: None` means the piece appeared
/// (promotion); `to: None` means it left the board (capture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceChange {
    pub piece: Piece,
    pub from: Option<Square>,
    pub to: Option<Square>,
}

/// Fixed-capacity list of [`PieceChange`]s.
///
/// Three entries cover every chess move: a capturing promotion removes the
/// pawn, adds the promoted piece and removes the victim.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MoveDelta {
    changes: [PieceChange; MoveDelta::CAPACITY],
    len: u8,
}

impl MoveDelta {
    pub const CAPACITY: usize = 3;

    const UNUSED: PieceChange = PieceChange {
        piece: Piece::WHITE_PAWN,
        from: None,
        to: None,
    };

    pub const fn new() -> MoveDelta {
        MoveDelta {
            changes: [Self::UNUSED; Self::CAPACITY],
            len: 0,
        }
    }

    /// # Panics
    ///
    /// Panics if the list already holds [`MoveDelta::CAPACITY`] entries.
    #[inline]
    pub fn push(&mut self, change: PieceChange) {
        assert!((self.len as usize) < Self::CAPACITY, "move delta overflow");
        self.changes[self.len as usize] = change;
        self.len += 1;
    }

    #[inline]
    pub fn moved(&mut self, piece: Piece, from: Square, to: Square) {
        self.push(PieceChange { piece, from: Some(from), to: Some(to) });
    }

    #[inline]
    pub fn removed(&mut self, piece: Piece, from: Square) {
        self.push(PieceChange { piece, from: Some(from), to: None });
    }

    #[inline]
    pub fn added(&mut self, piece: Piece, to: Square) {
        self.push(PieceChange { piece, from: None, to: Some(to) });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[PieceChange] {
        &self.changes[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceChange> {
        self.as_slice().iter()
    }

    /// Derive the delta between two positions one move apart.
    ///
    /// Works per piece on bitboard differences: a piece that vanished from one
    /// square and appeared on exactly one other becomes a single move entry,
    /// anything else is recorded as separate removals and additions. Entries
    /// come out in dense piece order, so they may be ordered differently from
    /// the delta [`Board::play`] emits for the same move.
    ///
    /// # Panics
    ///
    /// Panics if the positions differ by more than [`MoveDelta::CAPACITY`]
    /// changes, which no single move produces.
    pub fn between(before: &Board, after: &Board) -> MoveDelta {
        let mut delta = MoveDelta::new();
        for piece in Piece::all() {
            let old = before.pieces_of(piece.color(), piece.kind());
            let new = after.pieces_of(piece.color(), piece.kind());
            let gone = old & !new;
            let came = new & !old;

            if gone.count() == 1
                && came.count() == 1
                && let (Some(from), Some(to)) = (gone.lsb(), came.lsb())
            {
                delta.moved(piece, from, to);
                continue;
            }
            for from in gone {
                delta.removed(piece, from);
            }
            for to in came {
                delta.added(piece, to);
            }
        }
        delta
    }
}

impl Default for MoveDelta {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
