//! Command-line driver: scores a move sequence with incremental accumulators.

pub mod command;
pub mod error;
pub mod session;

use std::io::Write;
use std::sync::Arc;

use menace_nnue::Network;
use tracing::debug;

pub use command::{Invocation, parse_invocation};
pub use error::CliError;
pub use session::{PlyScore, Report, Session};

/// Parse `args` (program name excluded), load the weights and run the walk.
pub fn run<S: AsRef<str>>(args: &[S], out: &mut impl Write) -> Result<Report, CliError> {
    let inv = parse_invocation(args)?;
    debug!(weights = %inv.weights.display(), moves = inv.moves.len(), verify = inv.verify, "parsed invocation");
    let net = Network::from_file(&inv.weights)?;
    Session::new(Arc::new(net)).run(&inv, out)
}
