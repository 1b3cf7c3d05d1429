//! Board snapshot: piece bitboards, side bitboards and a square-to-piece mailbox.

use crate::bitboard::Bitboard;
use crate::castle::CastleRights;
use crate::error::BoardError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// A complete chess position.
///
/// The bitboards and the mailbox describe the same placement; every mutation
/// goes through [`Board::put_piece`] / [`Board::remove_piece`] to keep them in step.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Indexed by [`PieceKind::index`], both colors.
    pieces: [Bitboard; PieceKind::COUNT],
    /// Indexed by [`Color::index`].
    sides: [Bitboard; Color::COUNT],
    occupied: Bitboard,
    mailbox: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// An empty board with White to move and no rights.
    pub(crate) fn empty() -> Board {
        Board {
            pieces: [Bitboard::EMPTY; PieceKind::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            occupied: Bitboard::EMPTY,
            mailbox: [None; Square::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard starting array.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for (file, kind) in (0u8..).zip(BACK_RANK) {
            let place = |board: &mut Board, rank: u8, piece: Piece| {
                if let Some(sq) = Square::from_coords(rank, file) {
                    board.put_piece(sq, piece);
                }
            };
            place(&mut board, 0, Piece::new(kind, Color::White));
            place(&mut board, 1, Piece::WHITE_PAWN);
            place(&mut board, 6, Piece::BLACK_PAWN);
            place(&mut board, 7, Piece::new(kind, Color::Black));
        }
        board.castling = CastleRights::ALL;
        board
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index()]
    }

    /// Both colors' pieces of one kind.
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// One side's pieces of one kind.
    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()] & self.sides[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Square of `color`'s king.
    ///
    /// # Panics
    ///
    /// Panics if `color` has no king, which [`Board::validate`] rules out.
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(color, PieceKind::King)
            .lsb()
            .expect("board must have a king for each side")
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Place `piece` on an empty square.
    #[inline]
    pub(crate) fn put_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.mailbox[sq.index()].is_none(), "{sq} is occupied");
        let mask = sq.bitboard();
        self.pieces[piece.kind().index()] |= mask;
        self.sides[piece.color().index()] |= mask;
        self.occupied |= mask;
        self.mailbox[sq.index()] = Some(piece);
    }

    /// Lift the piece off `sq`, returning it.
    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.mailbox[sq.index()].take()?;
        let mask = !sq.bitboard();
        self.pieces[piece.kind().index()] &= mask;
        self.sides[piece.color().index()] &= mask;
        self.occupied &= mask;
        Some(piece)
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    pub(crate) fn set_counters(&mut self, halfmove_clock: u16, fullmove_number: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    /// The color-flipped position: ranks mirrored, colors swapped, the other side to move.
    pub fn mirrored(&self) -> Board {
        let mut out = Board::empty();
        for sq in self.occupied {
            if let Some(piece) = self.piece_on(sq) {
                out.put_piece(sq.flip_rank(), piece.flip_color());
            }
        }
        out.side_to_move = !self.side_to_move;
        out.castling = self.castling.flip_colors();
        out.en_passant = self.en_passant.map(Square::flip_rank);
        out.halfmove_clock = self.halfmove_clock;
        out.fullmove_number = self.fullmove_number;
        out
    }

    /// Check the structural integrity of the position.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let name = match color {
                Color::White => "white",
                Color::Black => "black",
            };
            let count = self.pieces_of(color, PieceKind::King).count();
            if count != 1 {
                return Err(BoardError::InvalidKingCount { color: name, count });
            }
            let count = self.side(color).count();
            if count > 16 {
                return Err(BoardError::TooManyPieces { color: name, count });
            }
            let count = self.pieces_of(color, PieceKind::Pawn).count();
            if count > 8 {
                return Err(BoardError::TooManyPawns { color: name, count });
            }
        }

        if (self.pieces(PieceKind::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }

        let total: u32 = self.pieces.iter().map(|bb| bb.count()).sum();
        if total != self.occupied.count() {
            return Err(BoardError::OverlappingPieces);
        }

        if (self.side(Color::White) & self.side(Color::Black)).is_nonempty() {
            return Err(BoardError::InconsistentSides);
        }

        for sq in Square::all() {
            let from_bitboards = PieceKind::ALL.into_iter().find_map(|kind| {
                let color = Color::ALL.into_iter().find(|&c| self.pieces_of(c, kind).contains(sq))?;
                Some(Piece::new(kind, color))
            });
            if from_bitboards != self.piece_on(sq) {
                return Err(BoardError::MailboxMismatch { square: sq });
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board(\"{self}\")")
    }
}
