//! Board representation consumed by the evaluation core: bitboards, mailbox,
//! FEN, copy-make with piece deltas, and legal move generation.

pub mod attacks;
mod bitboard;
mod board;
mod castle;
mod chess_move;
mod delta;
mod error;
mod fen;
mod make_move;
mod movegen;
mod piece;
mod square;

pub use bitboard::Bitboard;
pub use board::Board;
pub use castle::CastleRights;
pub use chess_move::{Move, MoveKind};
pub use delta::{MoveDelta, PieceChange};
pub use error::{BoardError, FenError, MoveParseError};
pub use fen::STARTING_FEN;
pub use movegen::{MoveList, generate_legal_moves, perft};
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;
