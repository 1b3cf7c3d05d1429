//! Weight loading errors.

/// Errors that can occur while loading a network.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The blob length does not match the network shape.
    #[error("weight blob has {found} bytes, expected {expected}")]
    SizeMismatch {
        /// Byte length implied by the network constants.
        expected: usize,
        /// Byte length actually supplied.
        found: usize,
    },

    /// Reading the weight file failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
