//! Legal move generation: pseudo-legal moves filtered by a copy-make king-safety check.

use crate::attacks::{attacks, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::castle::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::piece::{Color, PieceKind};
use crate::square::Square;

const MAX_MOVES: usize = 256;

/// Stack-allocated move buffer. 256 entries cover the known maximum of 218.
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::new(Square::A1, Square::A1); MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// `true` if any piece of `by` attacks `sq`.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occupied = self.occupied();
        let queens = self.pieces_of(by, PieceKind::Queen);
        (knight_attacks(sq) & self.pieces_of(by, PieceKind::Knight)).is_nonempty()
            || (king_attacks(sq) & self.pieces_of(by, PieceKind::King)).is_nonempty()
            || (pawn_attacks(!by, sq) & self.pieces_of(by, PieceKind::Pawn)).is_nonempty()
            || (rook_attacks(sq, occupied) & (self.pieces_of(by, PieceKind::Rook) | queens)).is_nonempty()
            || (bishop_attacks(sq, occupied) & (self.pieces_of(by, PieceKind::Bishop) | queens)).is_nonempty()
    }
}

fn push_pawn_move(list: &mut MoveList, from: Square, to: Square) {
    if to.rank() == 0 || to.rank() == 7 {
        for kind in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight] {
            list.push(Move::with_kind(from, to, MoveKind::Promotion(kind)));
        }
    } else {
        list.push(Move::new(from, to));
    }
}

fn gen_pawns(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = board.side(!us);
    let empty = !board.occupied();
    let (step, start_rank): (i8, u8) = match us {
        Color::White => (8, 1),
        Color::Black => (-8, 6),
    };

    for from in board.pieces_of(us, PieceKind::Pawn) {
        let forward = |sq: Square| Square::from_index((sq.index() as i8 + step) as u8);
        if let Some(one) = forward(from).filter(|&sq| empty.contains(sq)) {
            push_pawn_move(list, from, one);
            if from.rank() == start_rank
                && let Some(two) = forward(one).filter(|&sq| empty.contains(sq))
            {
                list.push(Move::new(from, two));
            }
        }

        let targets = pawn_attacks(us, from);
        for to in targets & them {
            push_pawn_move(list, from, to);
        }
        if let Some(ep) = board.en_passant().filter(|&ep| targets.contains(ep)) {
            list.push(Move::with_kind(from, ep, MoveKind::EnPassant));
        }
    }
}

fn gen_pieces(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let own = board.side(us);
    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen, PieceKind::King] {
        for from in board.pieces_of(us, kind) {
            for to in attacks(kind, us, from, board.occupied()) & !own {
                list.push(Move::new(from, to));
            }
        }
    }
}

fn gen_castling(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let (king_side, queen_side, home) = match us {
        Color::White => (CastleRights::WHITE_KING, CastleRights::WHITE_QUEEN, Square::E1),
        Color::Black => (CastleRights::BLACK_KING, CastleRights::BLACK_QUEEN, Square::E8),
    };
    if board.king_square(us) != home || board.is_square_attacked(home, !us) {
        return;
    }

    let rank_bits = |files: &[u8]| {
        files
            .iter()
            .filter_map(|&f| Square::from_coords(home.rank(), f))
            .fold(Bitboard::EMPTY, |bb, sq| bb.with(sq))
    };
    let candidates = [
        (king_side, rank_bits(&[5, 6]), [5u8, 6u8], 6u8),
        (queen_side, rank_bits(&[1, 2, 3]), [3u8, 2u8], 2u8),
    ];
    for (right, path, transit, dest_file) in candidates {
        if !board.castling().contains(right) || (path & board.occupied()).is_nonempty() {
            continue;
        }
        let safe = transit
            .iter()
            .filter_map(|&f| Square::from_coords(home.rank(), f))
            .all(|sq| !board.is_square_attacked(sq, !us));
        if safe && let Some(dest) = Square::from_coords(home.rank(), dest_file) {
            list.push(Move::with_kind(home, dest, MoveKind::Castling));
        }
    }
}

/// All legal moves in `board`.
pub fn generate_legal_moves(board: &Board) -> MoveList {
    let mut pseudo = MoveList::new();
    gen_pawns(board, &mut pseudo);
    gen_pieces(board, &mut pseudo);
    gen_castling(board, &mut pseudo);

    let us = board.side_to_move();
    let mut legal = MoveList::new();
    for &mv in pseudo.as_slice() {
        let after = board.make_move(mv);
        if !after.is_square_attacked(after.king_square(us), !us) {
            legal.push(mv);
        }
    }
    legal
}

/// Count leaf nodes of the legal move tree to `depth`.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .as_slice()
        .iter()
        .map(|&mv| perft(&board.make_move(mv), depth - 1))
        .sum()
}
