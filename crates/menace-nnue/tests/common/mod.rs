//! Shared fixtures: a deterministic pseudo-random network and random legal games.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use menace_board::{Board, MoveDelta, generate_legal_moves};
use menace_nnue::{HIDDEN, INPUT_SIZE, NUM_BUCKETS, Network};

pub const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Start positions rich in castling, promotions, en passant and king walks.
pub const WALK_STARTS: [&str; 5] = [
    menace_board::STARTING_FEN,
    KIWIPETE,
    "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
    "4k3/1PP5/8/3pP3/8/8/1pp5/4K3 w - d6 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

/// 64-bit LCG (Knuth MMIX constants).
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Lcg {
        Lcg(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 16
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }

    /// Uniform value in `[-span, span)`.
    pub fn signed(&mut self, span: i16) -> i16 {
        (self.next() % (2 * span as u64)) as i16 - span
    }
}

/// Blob for a network with small pseudo-random weights. Magnitudes keep
/// every accumulator well inside `i16` for any legal position.
pub fn random_blob(seed: u64) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    let mut out = Vec::with_capacity(Network::BYTES);
    let sections = [
        (INPUT_SIZE * HIDDEN, 32),
        (HIDDEN, 64),
        (NUM_BUCKETS * 2 * HIDDEN, 128),
        (NUM_BUCKETS, 512),
    ];
    for (len, span) in sections {
        for _ in 0..len {
            out.extend_from_slice(&rng.signed(span).to_le_bytes());
        }
    }
    out
}

/// Shared network for every test in a binary.
pub fn network() -> Arc<Network> {
    static NET: OnceLock<Arc<Network>> = OnceLock::new();
    NET.get_or_init(|| Arc::new(Network::load(&random_blob(0xC0FF_EE00_D15E_A5E5)).unwrap()))
        .clone()
}

/// One ply of a random game: the position after the move and the move's delta.
pub struct Ply {
    pub before: Board,
    pub after: Board,
    pub delta: MoveDelta,
}

/// Play up to `plies` uniformly random legal moves from `start`.
pub fn random_game(start: &Board, plies: usize, rng: &mut Lcg) -> Vec<Ply> {
    let mut board = *start;
    let mut game = Vec::with_capacity(plies);
    for _ in 0..plies {
        let moves = generate_legal_moves(&board);
        if moves.is_empty() {
            break;
        }
        let mv = moves.as_slice()[rng.below(moves.len())];
        let (after, delta) = board.play(mv);
        game.push(Ply { before: board, after, delta });
        board = after;
    }
    game
}
