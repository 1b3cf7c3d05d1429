//! Copy-make move execution.

use crate::board::Board;
use crate::castle::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::delta::MoveDelta;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Rook relocation for a castling king landing on `king_to`.
fn castling_rook(king_to: Square) -> Option<(Square, Square)> {
    match king_to.index() {
        6 => Some((Square::H1, Square::F1)),
        2 => Some((Square::A1, Square::D1)),
        62 => Some((Square::H8, Square::F8)),
        58 => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

impl Board {
    /// Apply `mv` and return the new position. `self` is untouched.
    pub fn make_move(&self, mv: Move) -> Board {
        self.play(mv).0
    }

    /// Apply `mv`, returning the new position and the pieces it moved, removed or added.
    ///
    /// A move from an empty square returns an unchanged board and an empty delta.
    pub fn play(&self, mv: Move) -> (Board, MoveDelta) {
        let mut b = *self;
        let mut delta = MoveDelta::new();
        let us = self.side_to_move();
        let (from, to) = (mv.from(), mv.to());

        let Some(mover) = b.remove_piece(from) else {
            return (b, delta);
        };

        let captured = match mv.kind() {
            MoveKind::EnPassant => {
                let victim_sq = match us {
                    Color::White => Square::from_index(to.index() as u8 - 8),
                    Color::Black => Square::from_index(to.index() as u8 + 8),
                };
                victim_sq.and_then(|sq| Some((sq, b.remove_piece(sq)?)))
            }
            MoveKind::Castling => None,
            _ => b.remove_piece(to).map(|victim| (to, victim)),
        };

        match mv.kind() {
            MoveKind::Promotion(kind) => {
                let promoted = Piece::new(kind, us);
                b.put_piece(to, promoted);
                delta.removed(mover, from);
                delta.added(promoted, to);
            }
            _ => {
                b.put_piece(to, mover);
                delta.moved(mover, from, to);
            }
        }

        if let Some((victim_sq, victim)) = captured {
            delta.removed(victim, victim_sq);
        }

        if mv.is_castle()
            && let Some((rook_from, rook_to)) = castling_rook(to)
            && let Some(rook) = b.remove_piece(rook_from)
        {
            b.put_piece(rook_to, rook);
            delta.moved(rook, rook_from, rook_to);
        }

        let double_push = mover.kind() == PieceKind::Pawn && from.index().abs_diff(to.index()) == 16;
        b.set_en_passant(if double_push {
            Square::from_index(((from.index() + to.index()) / 2) as u8)
        } else {
            None
        });

        b.set_castling(
            b.castling()
                .remove(CastleRights::revoked_by(from))
                .remove(CastleRights::revoked_by(to)),
        );

        let halfmove = if mover.kind() == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock() + 1
        };
        let fullmove = self.fullmove_number() + u16::from(us == Color::Black);
        b.set_counters(halfmove, fullmove);
        b.set_side_to_move(!us);

        (b, delta)
    }
}
