//! End-to-end runs against weight files on disk.

use std::path::PathBuf;

use menace_cli::{CliError, run};
use menace_nnue::{LoadError, Network};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("menace-cli-{}-{name}", std::process::id()))
}

#[test]
fn run_with_zero_network() {
    let path = temp_path("zero.bin");
    std::fs::write(&path, Network::zeroed().to_bytes()).unwrap();
    let weights = path.to_string_lossy().into_owned();

    let mut out = Vec::new();
    let result = run(
        &[weights.as_str(), "startpos", "moves", "e2e4", "d7d5", "e4d5", "verify"],
        &mut out,
    );
    std::fs::remove_file(&path).unwrap();

    let report = result.unwrap();
    assert_eq!(report.plies.len(), 4);
    assert_eq!(report.mismatches, 0);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("e4d5"));
}

#[test]
fn run_rejects_short_weight_file() {
    let path = temp_path("short.bin");
    std::fs::write(&path, [0u8; 10]).unwrap();
    let weights = path.to_string_lossy().into_owned();

    let result = run(&[weights.as_str()], &mut std::io::sink());
    std::fs::remove_file(&path).unwrap();

    match result {
        Err(CliError::Load {
            source: LoadError::SizeMismatch { expected, found },
        }) => {
            assert_eq!(expected, Network::BYTES);
            assert_eq!(found, 10);
        }
        other => panic!("expected size mismatch, got {other:?}"),
    }
}

#[test]
fn run_reports_missing_file() {
    let result = run(&["/nonexistent/menace.bin"], &mut std::io::sink());
    assert!(matches!(result, Err(CliError::Load { source: LoadError::Io { .. } })));
}
