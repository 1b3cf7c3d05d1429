//! Errors from FEN parsing, board validation and move parsing.

/// Errors that occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },

    /// `rank_index` counts from the top of the FEN (0 = rank 8).
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength { rank_index: usize, length: usize },

    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },

    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },

    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },

    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },

    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },

    #[error("invalid board: {source}")]
    InvalidBoard {
        #[from]
        source: BoardError,
    },
}

/// Structural problems found by [`Board::validate`](crate::Board::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: &'static str, count: u32 },

    #[error("{color} has {count} pieces, at most 16 allowed")]
    TooManyPieces { color: &'static str, count: u32 },

    #[error("{color} has {count} pawns, at most 8 allowed")]
    TooManyPawns { color: &'static str, count: u32 },

    #[error("pawns found on back rank")]
    PawnsOnBackRank,

    #[error("overlapping piece bitboards")]
    OverlappingPieces,

    #[error("white and black side bitboards overlap")]
    InconsistentSides,

    #[error("mailbox disagrees with bitboards on {square}")]
    MailboxMismatch { square: crate::Square },
}

/// A move string that does not name a legal move in the given position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal or malformed move: {uci}")]
pub struct MoveParseError {
    pub uci: String,
}

#[cfg(test)]
mod tests {
    use super::{BoardError, FenError};

    #[test]
    fn display() {
        let err = FenError::WrongFieldCount { found: 4 };
        assert_eq!(err.to_string(), "expected 6 FEN fields, found 4");
        assert_eq!(BoardError::PawnsOnBackRank.to_string(), "pawns found on back rank");
    }

    #[test]
    fn board_error_converts() {
        let err: FenError = BoardError::OverlappingPieces.into();
        assert!(matches!(err, FenError::InvalidBoard { .. }));
    }
}
