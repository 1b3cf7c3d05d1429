//! Incremental updates must reproduce scratch recomputation bit for bit.

mod common;

use std::collections::{BTreeMap, BTreeSet};

use menace_board::attacks::attacks;
use menace_board::{Board, Color, Move, MoveDelta, MoveKind, Piece, Square};
use menace_nnue::{
    Accumulator, AccumulatorStack, AccumulatorState, FeatureIndexer, NUM_BUCKETS, PsqList, ThreatList,
    material_bucket, sorted_difference,
};

use common::{Lcg, WALK_STARTS, network, random_game};

/// Compare both perspectives of the stack's current ply with a fresh refresh.
fn assert_matches_scratch(stack: &AccumulatorStack, board: &Board, context: &str) {
    for perspective in Color::ALL {
        let scratch = Accumulator::refresh(board, perspective, stack.indexer(), stack.network());
        let current = stack.current(perspective);
        assert_eq!(
            current.values(),
            scratch.values(),
            "{perspective} values diverge at ply {} ({context}): {board}",
            stack.depth()
        );
        assert_eq!(current.threats(), scratch.threats(), "{perspective} threats diverge ({context}): {board}");
        assert_eq!(current.king_square(), scratch.king_square());
    }
}

#[test]
fn start_position_then_knight_move() {
    let mut stack = AccumulatorStack::new(network());
    let root = Board::starting_position();
    stack.initialize(&root);
    for perspective in Color::ALL {
        assert_eq!(stack.current(perspective).threats().len(), 38);
    }

    let (after, delta) = root.play(Move::new(Square::G1, Square::F3));
    stack.advance(&after, &delta);
    assert_eq!(stack.current(Color::White).state(), AccumulatorState::Incremental);
    assert_eq!(stack.current(Color::Black).state(), AccumulatorState::Incremental);
    assert_matches_scratch(&stack, &after, "Ng1-f3");
}

/// Every active threat of `board` keyed by index, with its attacker and squares.
fn threat_origins(indexer: &FeatureIndexer, board: &Board, perspective: Color) -> BTreeMap<u32, (Piece, Square, Square)> {
    let king_sq = board.king_square(perspective);
    let occupied = board.occupied();
    let mut out = BTreeMap::new();
    for from in occupied {
        let Some(attacker) = board.piece_on(from) else {
            continue;
        };
        for to in attacks(attacker.kind(), attacker.color(), from, occupied) & occupied {
            let Some(defender) = board.piece_on(to) else {
                continue;
            };
            if let Some(index) = indexer.threat_index(attacker, from, to, defender, king_sq, perspective) {
                out.insert(index as u32, (attacker, from, to));
            }
        }
    }
    out
}

#[test]
fn knight_move_diff_stays_local() {
    let indexer = FeatureIndexer::new();
    let root = Board::starting_position();
    let (child, _) = root.play(Move::new(Square::G1, Square::F3));
    let touched = Square::G1.bitboard() | Square::F3.bitboard();

    for perspective in Color::ALL {
        let (mut root_psq, mut root_threats) = (PsqList::new(), ThreatList::new());
        indexer.active_features(&root, perspective, &mut root_psq, &mut root_threats);
        let (mut child_psq, mut child_threats) = (PsqList::new(), ThreatList::new());
        indexer.active_features(&child, perspective, &mut child_psq, &mut child_threats);

        let king = root.king_square(perspective);
        let knight = |sq| indexer.psq_index(Piece::WHITE_KNIGHT, sq, king, perspective) as u32;
        let before: BTreeSet<u32> = root_psq.iter().copied().collect();
        let after: BTreeSet<u32> = child_psq.iter().copied().collect();
        assert_eq!(before.difference(&after).copied().collect::<Vec<_>>(), [knight(Square::G1)]);
        assert_eq!(after.difference(&before).copied().collect::<Vec<_>>(), [knight(Square::F3)]);

        let (mut added, mut removed) = (ThreatList::new(), ThreatList::new());
        sorted_difference(&child_threats, &root_threats, &mut added, &mut removed);
        assert!(!added.is_empty() && !removed.is_empty(), "{perspective}");

        let sides = [
            (&added, threat_origins(&indexer, &child, perspective)),
            (&removed, threat_origins(&indexer, &root, perspective)),
        ];
        for (changed, origins) in sides {
            for index in changed.iter() {
                let (attacker, from, to) = origins[index];
                let (kind, color) = (attacker.kind(), attacker.color());
                let local = touched.contains(from)
                    || touched.contains(to)
                    || attacks(kind, color, from, root.occupied()) != attacks(kind, color, from, child.occupied());
                assert!(local, "{perspective}: {attacker}{from}->{to} changed without touching g1/f3");
            }
        }
    }
}

#[test]
fn random_games_match_scratch() {
    let net = network();
    let mut rng = Lcg::new(0x5EED_0001);
    for fen in WALK_STARTS {
        let start: Board = fen.parse().unwrap();
        for _ in 0..4 {
            let mut stack = AccumulatorStack::new(net.clone());
            stack.initialize(&start);
            for ply in random_game(&start, 80, &mut rng) {
                stack.advance(&ply.after, &ply.delta);
                assert_matches_scratch(&stack, &ply.after, fen);
            }
        }
    }
}

#[test]
fn scores_match_scratch_at_every_ply() {
    let net = network();
    let mut rng = Lcg::new(0x5EED_0002);
    let start = Board::starting_position();
    let game = random_game(&start, 60, &mut rng);

    let mut stack = AccumulatorStack::new(net.clone());
    stack.initialize(&start);
    for ply in &game {
        stack.advance(&ply.after, &ply.delta);
    }

    for (depth, ply) in game.iter().enumerate() {
        let board = &ply.after;
        let white = Accumulator::refresh(board, Color::White, stack.indexer(), &net);
        let black = Accumulator::refresh(board, Color::Black, stack.indexer(), &net);
        let bucket = material_bucket(board);
        assert_eq!(stack.evaluate_at(depth + 1, Color::White, bucket), net.evaluate(&white, &black, bucket));
        assert_eq!(stack.evaluate_at(depth + 1, Color::Black, bucket), net.evaluate(&black, &white, bucket));
    }
}

#[test]
fn retreat_then_branch() {
    let net = network();
    let mut rng = Lcg::new(0x5EED_0003);
    let root: Board = common::KIWIPETE.parse().unwrap();
    let mut stack = AccumulatorStack::new(net);
    stack.initialize(&root);
    let root_score = stack.evaluate(Color::White, 3);

    let trunk = random_game(&root, 10, &mut rng);
    for ply in &trunk {
        stack.advance(&ply.after, &ply.delta);
    }
    for _ in 0..5 {
        stack.retreat();
    }
    assert_eq!(stack.depth(), 5);
    assert_matches_scratch(&stack, &trunk[4].after, "after retreat");

    let branch = random_game(&trunk[4].after, 10, &mut rng);
    for ply in &branch {
        stack.advance(&ply.after, &ply.delta);
        assert_matches_scratch(&stack, &ply.after, "branch");
    }

    while stack.depth() > 0 {
        stack.retreat();
    }
    assert_eq!(stack.evaluate(Color::White, 3), root_score);
}

#[test]
fn derived_delta_path_matches_emitted_delta() {
    let net = network();
    let mut rng = Lcg::new(0x5EED_0004);
    for fen in WALK_STARTS {
        let start: Board = fen.parse().unwrap();
        let mut emitted = AccumulatorStack::new(net.clone());
        let mut derived = AccumulatorStack::new(net.clone());
        emitted.initialize(&start);
        derived.initialize(&start);
        for ply in random_game(&start, 60, &mut rng) {
            emitted.advance(&ply.after, &ply.delta);
            derived.advance_between(&ply.before, &ply.after);
            for perspective in Color::ALL {
                assert_eq!(emitted.current(perspective).values(), derived.current(perspective).values());
            }
            for bucket in 0..NUM_BUCKETS {
                assert_eq!(emitted.evaluate(Color::White, bucket), derived.evaluate(Color::White, bucket));
            }
        }
    }
}

#[test]
fn special_moves_match_scratch() {
    let cases = [
        // Short castle: king stays on the e-h half.
        ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Move::with_kind(Square::E1, Square::G1, MoveKind::Castling)),
        // Long castle: king crosses to the a-d half.
        ("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", Move::with_kind(Square::E8, Square::C8, MoveKind::Castling)),
        ("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", Move::with_kind(Square::E5, Square::D6, MoveKind::EnPassant)),
        ("3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1", Move::with_kind(Square::E7, Square::D8, MoveKind::Promotion(menace_board::PieceKind::Queen))),
        ("4k3/8/8/8/8/8/1p6/R3K3 b - - 0 1", Move::with_kind(Square::B2, Square::A1, MoveKind::Promotion(menace_board::PieceKind::Knight))),
    ];
    for (fen, mv) in cases {
        let before: Board = fen.parse().unwrap();
        let (after, delta) = before.play(mv);
        let mut stack = AccumulatorStack::new(network());
        stack.initialize(&before);
        stack.advance(&after, &delta);
        assert_matches_scratch(&stack, &after, fen);
    }
}

#[test]
fn empty_delta_keeps_psq_half() {
    // A null transition: same board, no piece changes.
    let board: Board = common::KIWIPETE.parse().unwrap();
    let mut stack = AccumulatorStack::new(network());
    stack.initialize(&board);
    stack.advance(&board, &MoveDelta::new());
    assert_matches_scratch(&stack, &board, "null transition");
}
