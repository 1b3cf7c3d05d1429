//! Castling rights as a 4-bit set.

use std::fmt;

use crate::error::FenError;
use crate::square::Square;

/// Bit 0 = white king side, 1 = white queen side, 2 = black king side, 3 = black queen side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);
    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);

    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    #[inline]
    pub const fn remove(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    /// Swap the white and black halves.
    #[inline]
    pub const fn flip_colors(self) -> CastleRights {
        CastleRights((self.0 >> 2) | ((self.0 & 0b11) << 2))
    }

    /// Rights lost when any piece leaves or lands on `sq`.
    pub const fn revoked_by(sq: Square) -> CastleRights {
        match sq.index() {
            0 => Self::WHITE_QUEEN,
            4 => CastleRights(0b0011),
            7 => Self::WHITE_KING,
            56 => Self::BLACK_QUEEN,
            60 => CastleRights(0b1100),
            63 => Self::BLACK_KING,
            _ => Self::NONE,
        }
    }

    /// Parse the FEN castling field (`"KQkq"`, `"-"`, ...).
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        s.chars().try_fold(CastleRights::NONE, |rights, c| {
            let flag = match c {
                'K' => Self::WHITE_KING,
                'Q' => Self::WHITE_QUEEN,
                'k' => Self::BLACK_KING,
                'q' => Self::BLACK_QUEEN,
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            Ok(rights.insert(flag))
        })
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        for (flag, c) in [
            (Self::WHITE_KING, 'K'),
            (Self::WHITE_QUEEN, 'Q'),
            (Self::BLACK_KING, 'k'),
            (Self::BLACK_QUEEN, 'q'),
        ] {
            if self.contains(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::CastleRights;
    use crate::square::Square;

    #[test]
    fn fen_roundtrip() {
        for s in ["KQkq", "Kq", "k", "-"] {
            assert_eq!(CastleRights::from_fen(s).unwrap().to_string(), s);
        }
        assert!(CastleRights::from_fen("X").is_err());
    }

    #[test]
    fn revocation() {
        let rights = CastleRights::ALL.remove(CastleRights::revoked_by(Square::E1));
        assert_eq!(rights.to_string(), "kq");
        let rights = rights.remove(CastleRights::revoked_by(Square::H8));
        assert_eq!(rights.to_string(), "q");
    }

    #[test]
    fn flip_colors() {
        let rights = CastleRights::from_fen("Kq").unwrap();
        assert_eq!(rights.flip_colors().to_string(), "Qk");
    }
}
