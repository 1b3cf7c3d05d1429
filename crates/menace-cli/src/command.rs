//! Command-line argument parsing.

use std::path::PathBuf;

use menace_board::{Board, Color, Move};
use menace_nnue::{FeatureIndexer, MAX_PLY, NUM_BUCKETS, ThreatList};

use crate::error::CliError;

/// A parsed invocation:
/// `<weights> [startpos | fen <6 fields>] [moves <uci>...] [bucket <n>] [verify]`.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Path of the weight blob.
    pub weights: PathBuf,
    /// Position the walk starts from.
    pub root: Board,
    /// Moves played from `root`, already resolved against the legal moves.
    pub moves: Vec<Move>,
    /// Output bucket for every ply. `None` picks the material bucket per ply.
    pub bucket: Option<usize>,
    /// Check every incremental ply against a scratch refresh.
    pub verify: bool,
}

/// Parse the arguments following the program name.
pub fn parse_invocation<S: AsRef<str>>(args: &[S]) -> Result<Invocation, CliError> {
    let tokens: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let Some((&weights, rest)) = tokens.split_first() else {
        return Err(CliError::MissingWeights);
    };

    let (root, mut rest) = parse_root(rest)?;
    let indexer = FeatureIndexer::new();
    check_threat_capacity(&root, &indexer)?;
    let mut moves = Vec::new();
    if rest.first() == Some(&"moves") {
        let mut board = root;
        let count = rest[1..]
            .iter()
            .take_while(|t| !matches!(**t, "bucket" | "verify"))
            .count();
        for uci_str in &rest[1..=count] {
            let mv = Move::from_uci(uci_str, &board).map_err(|_| CliError::InvalidMove {
                uci_move: uci_str.to_string(),
            })?;
            board = board.make_move(mv);
            check_threat_capacity(&board, &indexer)?;
            moves.push(mv);
        }
        rest = &rest[count + 1..];
    }
    if moves.len() > MAX_PLY {
        return Err(CliError::TooManyMoves {
            count: moves.len(),
            max: MAX_PLY,
        });
    }

    let mut bucket = None;
    let mut verify = false;
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "bucket" => {
                bucket = Some(parse_bucket(rest.get(i + 1))?);
                i += 2;
            }
            "verify" => {
                verify = true;
                i += 1;
            }
            other => {
                return Err(CliError::UnexpectedToken {
                    token: other.to_string(),
                });
            }
        }
    }

    Ok(Invocation {
        weights: PathBuf::from(weights),
        root,
        moves,
        bucket,
        verify,
    })
}

/// Parse the optional position prefix. Defaults to the starting position.
fn parse_root<'a>(tokens: &'a [&'a str]) -> Result<(Board, &'a [&'a str]), CliError> {
    match tokens.first() {
        Some(&"startpos") => Ok((Board::starting_position(), &tokens[1..])),
        Some(&"fen") => {
            // FEN is 6 space-separated fields
            if tokens.len() < 7 {
                return Err(CliError::InvalidFen {
                    fen: tokens[1..].join(" "),
                });
            }
            let fen = tokens[1..7].join(" ");
            let board: Board = fen.parse().map_err(|_| CliError::InvalidFen { fen: fen.clone() })?;
            Ok((board, &tokens[7..]))
        }
        _ => Ok((Board::starting_position(), tokens)),
    }
}

/// Reject positions whose threat features overflow an accumulator's list.
fn check_threat_capacity(board: &Board, indexer: &FeatureIndexer) -> Result<(), CliError> {
    for perspective in Color::ALL {
        if indexer.count_threats(board, perspective) > ThreatList::CAPACITY {
            return Err(CliError::InvalidFen { fen: board.to_string() });
        }
    }
    Ok(())
}

fn parse_bucket(token: Option<&&str>) -> Result<usize, CliError> {
    let value = token.ok_or_else(|| CliError::MissingValue {
        param: "bucket".to_string(),
    })?;
    let invalid = || CliError::InvalidValue {
        param: "bucket".to_string(),
        value: value.to_string(),
    };
    let bucket: usize = value.parse().map_err(|_| invalid())?;
    if bucket >= NUM_BUCKETS {
        return Err(invalid());
    }
    Ok(bucket)
}

#[cfg(test)]
mod tests {
    use menace_board::{Board, Color, Square};

    use super::*;

    fn parse(line: &str) -> Result<Invocation, CliError> {
        let args: Vec<&str> = line.split_whitespace().collect();
        parse_invocation(&args)
    }

    #[test]
    fn weights_only_defaults() {
        let inv = parse("net.bin").unwrap();
        assert_eq!(inv.weights, PathBuf::from("net.bin"));
        assert_eq!(inv.root, Board::starting_position());
        assert!(inv.moves.is_empty());
        assert_eq!(inv.bucket, None);
        assert!(!inv.verify);
    }

    #[test]
    fn missing_weights() {
        assert!(matches!(parse(""), Err(CliError::MissingWeights)));
    }

    #[test]
    fn startpos_with_moves_and_options() {
        let inv = parse("net.bin startpos moves e2e4 e7e5 g1f3 bucket 3 verify").unwrap();
        assert_eq!(inv.moves.len(), 3);
        assert_eq!(inv.moves[2].to(), Square::F3);
        assert_eq!(inv.bucket, Some(3));
        assert!(inv.verify);
    }

    #[test]
    fn moves_without_position_keyword() {
        let inv = parse("net.bin moves d2d4 verify").unwrap();
        assert_eq!(inv.moves.len(), 1);
        assert!(inv.verify);
    }

    #[test]
    fn fen_position() {
        let inv = parse("net.bin fen 4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1 moves e5d6").unwrap();
        assert_eq!(inv.root.side_to_move(), Color::White);
        assert_eq!(inv.moves.len(), 1);
    }

    #[test]
    fn short_fen_is_rejected() {
        assert!(matches!(parse("net.bin fen 4k3/8/8/8/8/8/8/4K3 w -"), Err(CliError::InvalidFen { .. })));
    }

    #[test]
    fn excess_material_is_rejected() {
        let err = parse("net.bin fen rnbqkbnr/pppppppp/8/8/8/N7/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap_err();
        assert!(matches!(err, CliError::InvalidFen { .. }));
    }

    #[test]
    fn threat_overflow_is_rejected() {
        let fen = "8/2qQrrB1/1qQqQKq1/1B2qQn1/R1NkNQ2/2bqqQQ1/1QQRbq2/2q3n1 w - - 0 1";
        let err = parse(&format!("net.bin fen {fen} verify")).unwrap_err();
        assert!(matches!(err, CliError::InvalidFen { fen: ref got } if got == fen));
    }

    #[test]
    fn illegal_move_is_rejected() {
        let err = parse("net.bin startpos moves e2e5").unwrap_err();
        assert!(matches!(err, CliError::InvalidMove { ref uci_move } if uci_move == "e2e5"));
    }

    #[test]
    fn bucket_out_of_range() {
        assert!(matches!(parse("net.bin bucket 8"), Err(CliError::InvalidValue { .. })));
        assert!(matches!(parse("net.bin bucket x"), Err(CliError::InvalidValue { .. })));
        assert!(matches!(parse("net.bin bucket"), Err(CliError::MissingValue { .. })));
    }

    #[test]
    fn unknown_token() {
        assert!(matches!(parse("net.bin startpos depth 3"), Err(CliError::UnexpectedToken { .. })));
    }

    #[test]
    fn too_many_moves() {
        let shuffle = "g1f3 g8f6 f3g1 f6g8 ".repeat(MAX_PLY / 4 + 1);
        let err = parse(&format!("net.bin startpos moves {shuffle}")).unwrap_err();
        assert!(matches!(err, CliError::TooManyMoves { max: MAX_PLY, .. }));
    }
}
