//! Command-line errors.

use menace_nnue::LoadError;

/// Errors that can occur while parsing or running an invocation.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// No weight file path was given.
    #[error("missing weight file argument")]
    MissingWeights,

    /// Failed to parse a FEN string.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
    },

    /// A move string could not be matched to a legal move.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        /// The UCI move string that failed to parse.
        uci_move: String,
    },

    /// A keyword that takes a value was given none.
    #[error("missing value for {param}")]
    MissingValue {
        /// The keyword missing its value.
        param: String,
    },

    /// A keyword value could not be parsed.
    #[error("invalid value for {param}: {value}")]
    InvalidValue {
        /// The keyword whose value failed to parse.
        param: String,
        /// The offending value.
        value: String,
    },

    /// An argument that fits nowhere in the grammar.
    #[error("unexpected argument: {token}")]
    UnexpectedToken {
        /// The argument as given.
        token: String,
    },

    /// The move list is longer than the accumulator stack.
    #[error("{count} moves exceed the ply limit of {max}")]
    TooManyMoves {
        /// Number of moves given.
        count: usize,
        /// Deepest supported ply.
        max: usize,
    },

    /// Incremental and scratch accumulators disagreed.
    #[error("verification failed at {mismatches} ply(s)")]
    VerificationFailed {
        /// Number of plies where at least one perspective diverged.
        mismatches: usize,
    },

    /// Loading the network failed.
    #[error("failed to load network: {source}")]
    Load {
        /// The underlying load error.
        #[from]
        source: LoadError,
    },

    /// Writing the report failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
