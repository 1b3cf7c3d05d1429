//! Attack sets for every piece kind.
//!
//! Leapers use precomputed tables. Sliders use per-direction ray tables: the
//! ray is cut at the first blocker by XOR-ing away the ray that continues past it.

use crate::bitboard::Bitboard;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut bits = 0u64;
        let mut d = 0;
        while d < deltas.len() {
            let r = rank + deltas[d].0;
            let f = file + deltas[d].1;
            if r >= 0 && r < 8 && f >= 0 && f < 8 {
                bits |= 1u64 << (r as usize * 8 + f as usize);
            }
            d += 1;
        }
        table[sq] = Bitboard::new(bits);
        sq += 1;
    }
    table
}

/// Ray directions as (rank, file) steps. The first four grow the square index.
const DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, 0),
    (0, -1),
    (-1, -1),
    (-1, 1),
];

const fn ray_table() -> [[Bitboard; 64]; 8] {
    let mut table = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0usize;
    while dir < 8 {
        let (dr, df) = DIRECTIONS[dir];
        let mut sq = 0usize;
        while sq < 64 {
            let mut r = (sq / 8) as i8 + dr;
            let mut f = (sq % 8) as i8 + df;
            let mut bits = 0u64;
            while r >= 0 && r < 8 && f >= 0 && f < 8 {
                bits |= 1u64 << (r as usize * 8 + f as usize);
                r += dr;
                f += df;
            }
            table[dir][sq] = Bitboard::new(bits);
            sq += 1;
        }
        dir += 1;
    }
    table
}

static KNIGHT_ATTACKS: [Bitboard; 64] =
    leaper_table(&[(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)]);
static KING_ATTACKS: [Bitboard; 64] =
    leaper_table(&[(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)]);
static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(1, -1), (1, 1)]),
    leaper_table(&[(-1, -1), (-1, 1)]),
];
static RAYS: [[Bitboard; 64]; 8] = ray_table();

#[inline]
fn ray_attacks(dir: usize, sq: Square, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq.index()];
    let blockers = (ray & occupied).inner();
    if blockers == 0 {
        return ray;
    }
    let first = if dir < 4 {
        blockers.trailing_zeros()
    } else {
        63 - blockers.leading_zeros()
    };
    ray ^ RAYS[dir][first as usize]
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Squares a pawn of `color` on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

/// Rook attacks from `sq`; the first blocker on each ray is included.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(0, sq, occupied)
        | ray_attacks(1, sq, occupied)
        | ray_attacks(4, sq, occupied)
        | ray_attacks(5, sq, occupied)
}

/// Bishop attacks from `sq`; the first blocker on each ray is included.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(2, sq, occupied)
        | ray_attacks(3, sq, occupied)
        | ray_attacks(6, sq, occupied)
        | ray_attacks(7, sq, occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Attack set of a piece of any kind. `color` only matters for pawns.
#[inline]
pub fn attacks(kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(color, sq),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk each ray square by square, stopping after the first occupied one.
    fn walk(sq: Square, occupied: Bitboard, dirs: &[(i8, i8)]) -> Bitboard {
        let mut out = Bitboard::EMPTY;
        for &(dr, df) in dirs {
            let mut r = sq.rank() as i8 + dr;
            let mut f = sq.file() as i8 + df;
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let to = Square::from_coords(r as u8, f as u8).unwrap();
                out = out.with(to);
                if occupied.contains(to) {
                    break;
                }
                r += dr;
                f += df;
            }
        }
        out
    }

    #[test]
    fn leaper_counts() {
        assert_eq!(knight_attacks(Square::E4).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(king_attacks(Square::E1).count(), 5);
        assert_eq!(king_attacks(Square::H8).count(), 3);
    }

    #[test]
    fn pawn_attacks_do_not_wrap() {
        let white = pawn_attacks(Color::White, Square::A4);
        assert_eq!(white, Square::B5.bitboard());
        let black = pawn_attacks(Color::Black, Square::E5);
        assert_eq!(black, Square::D4.bitboard() | Square::F4.bitboard());
        assert!(pawn_attacks(Color::White, Square::H8).is_empty());
    }

    #[test]
    fn empty_board_slider_counts() {
        for sq in Square::all() {
            assert_eq!(rook_attacks(sq, Bitboard::EMPTY).count(), 14);
        }
        assert_eq!(bishop_attacks(Square::D4, Bitboard::EMPTY).count(), 13);
        assert_eq!(queen_attacks(Square::A1, Bitboard::EMPTY).count(), 21);
    }

    #[test]
    fn blocker_is_included() {
        let occupied = Square::E6.bitboard() | Square::C2.bitboard();
        let rook = rook_attacks(Square::E4, occupied);
        assert!(rook.contains(Square::E6));
        assert!(!rook.contains(Square::E7));
        let bishop = bishop_attacks(Square::E4, occupied);
        assert!(bishop.contains(Square::C2));
        assert!(!bishop.contains(Square::B1));
    }

    #[test]
    fn sliders_match_ray_walk() {
        let rook_dirs = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        let bishop_dirs = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
        let mut rng: u64 = 0x9E37_79B9_7F4A_7C15;
        for sq in Square::all() {
            for _ in 0..64 {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let occupied = Bitboard::new(rng & rng.rotate_left(17));
                assert_eq!(rook_attacks(sq, occupied), walk(sq, occupied, &rook_dirs), "rook on {sq}");
                assert_eq!(bishop_attacks(sq, occupied), walk(sq, occupied, &bishop_dirs), "bishop on {sq}");
            }
        }
    }
}
