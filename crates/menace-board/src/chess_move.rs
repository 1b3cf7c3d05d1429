//! Move representation and UCI notation.

use std::fmt;

use crate::board::Board;
use crate::error::MoveParseError;
use crate::movegen::generate_legal_moves;
use crate::piece::PieceKind;
use crate::square::Square;

/// How a move changes the board beyond lifting `from` and landing on `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    /// Pawn reaches the last rank and becomes the given kind.
    Promotion(PieceKind),
    EnPassant,
    /// King move of two files; the rook is relocated as well.
    Castling,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move { from, to, kind: MoveKind::Normal }
    }

    #[inline]
    pub const fn with_kind(from: Square, to: Square, kind: MoveKind) -> Move {
        Move { from, to, kind }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.kind, MoveKind::Castling)
    }

    /// Parse a UCI move (`"e2e4"`, `"e7e8q"`) against the legal moves of `board`.
    pub fn from_uci(s: &str, board: &Board) -> Result<Move, MoveParseError> {
        generate_legal_moves(board)
            .as_slice()
            .iter()
            .copied()
            .find(|mv| mv.to_uci() == s)
            .ok_or_else(|| MoveParseError { uci: s.to_string() })
    }

    pub fn to_uci(self) -> String {
        match self.kind {
            MoveKind::Promotion(kind) => format!("{}{}{}", self.from, self.to, kind.fen_char()),
            _ => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?})", self.to_uci(), self.kind)
    }
}
