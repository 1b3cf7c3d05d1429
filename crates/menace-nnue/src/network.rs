//! Network weights, blob loading and the output layer.

use std::path::Path;

use menace_board::Board;
use tracing::info;

use crate::accumulator::Accumulator;
use crate::error::LoadError;
use crate::features::INPUT_SIZE;

/// Hidden-layer dimension per perspective.
pub const HIDDEN: usize = 256;

/// Number of output buckets (MaterialCount<8>).
pub const NUM_BUCKETS: usize = 8;

/// First-layer quantization factor.
pub const QA: i64 = 255;

/// Output-layer quantization factor.
pub const QB: i64 = 64;

/// Evaluation scale (maps to centipawns).
pub const SCALE: i64 = 400;

/// Quantized `(INPUT_SIZE -> HIDDEN) x 2 -> 1` network with bucketed outputs.
///
/// Blob layout (little-endian `i16`, no header or padding):
/// - `feature_weights`: `INPUT_SIZE` rows of `HIDDEN`. Quantization: QA.
/// - `feature_bias`: `HIDDEN`. Quantization: QA.
/// - `output_weights`: `NUM_BUCKETS` rows of `2 * HIDDEN`, side-to-move half
///   first. Quantization: QB.
/// - `output_bias`: `NUM_BUCKETS`. Quantization: QA * QB.
#[derive(Clone, PartialEq, Eq)]
pub struct Network {
    feature_weights: Box<[[i16; HIDDEN]]>,
    feature_bias: [i16; HIDDEN],
    output_weights: [[i16; 2 * HIDDEN]; NUM_BUCKETS],
    output_bias: [i16; NUM_BUCKETS],
}

/// Sequential little-endian `i16` reader over a length-checked blob.
struct BlobReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl BlobReader<'_> {
    fn fill(&mut self, dst: &mut [i16]) {
        let end = self.pos + 2 * dst.len();
        for (value, pair) in dst.iter_mut().zip(self.bytes[self.pos..end].chunks_exact(2)) {
            *value = i16::from_le_bytes([pair[0], pair[1]]);
        }
        self.pos = end;
    }
}

impl Network {
    /// Exact blob length in bytes.
    pub const BYTES: usize = 2 * (INPUT_SIZE * HIDDEN + HIDDEN + NUM_BUCKETS * 2 * HIDDEN + NUM_BUCKETS);

    /// All-zero network.
    pub fn zeroed() -> Network {
        Network {
            feature_weights: vec![[0; HIDDEN]; INPUT_SIZE].into_boxed_slice(),
            feature_bias: [0; HIDDEN],
            output_weights: [[0; 2 * HIDDEN]; NUM_BUCKETS],
            output_bias: [0; NUM_BUCKETS],
        }
    }

    /// Parse a weight blob. Any length other than [`Network::BYTES`] is
    /// rejected before a single weight is read.
    pub fn load(bytes: &[u8]) -> Result<Network, LoadError> {
        if bytes.len() != Self::BYTES {
            return Err(LoadError::SizeMismatch {
                expected: Self::BYTES,
                found: bytes.len(),
            });
        }

        let mut net = Network::zeroed();
        let mut reader = BlobReader { bytes, pos: 0 };
        for row in net.feature_weights.iter_mut() {
            reader.fill(row);
        }
        reader.fill(&mut net.feature_bias);
        for row in &mut net.output_weights {
            reader.fill(row);
        }
        reader.fill(&mut net.output_bias);
        debug_assert_eq!(reader.pos, Self::BYTES);

        info!(bytes = bytes.len(), "network loaded");
        Ok(net)
    }

    /// Read and parse a weight file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Network, LoadError> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    /// Serialize in the layout [`Network::load`] reads.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::BYTES);
        let words = self
            .feature_weights
            .iter()
            .flatten()
            .chain(&self.feature_bias)
            .chain(self.output_weights.iter().flatten())
            .chain(&self.output_bias);
        for &w in words {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out
    }

    /// First-layer weight column of feature `index`.
    #[inline]
    pub(crate) fn feature_weights(&self, index: usize) -> &[i16; HIDDEN] {
        &self.feature_weights[index]
    }

    #[inline]
    pub(crate) fn feature_bias(&self) -> &[i16; HIDDEN] {
        &self.feature_bias
    }

    /// Forward pass: SCReLU activation, output dequantization.
    ///
    /// Returns a centipawn score from the `us` perspective.
    ///
    /// # Panics
    ///
    /// Panics if `bucket >= NUM_BUCKETS`.
    pub fn evaluate(&self, us: &Accumulator, them: &Accumulator, bucket: usize) -> i32 {
        assert!(bucket < NUM_BUCKETS, "output bucket {bucket} out of range");
        let weights = &self.output_weights[bucket];
        let (ours, theirs) = weights.split_at(HIDDEN);

        let mut output: i64 = 0;
        for (&x, &w) in us.values().iter().zip(ours) {
            output += screlu(x) * i64::from(w);
        }
        for (&x, &w) in them.values().iter().zip(theirs) {
            output += screlu(x) * i64::from(w);
        }

        // Dequantize: QA*QA*QB -> QA*QB
        output /= QA;
        output += i64::from(self.output_bias[bucket]);
        output *= SCALE;
        output /= QA * QB;

        output as i32
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("inputs", &self.feature_weights.len())
            .field("hidden", &HIDDEN)
            .field("buckets", &NUM_BUCKETS)
            .finish_non_exhaustive()
    }
}

/// SCReLU activation: clamp to [0, QA] then square.
#[inline]
fn screlu(x: i16) -> i64 {
    let y = i64::from(x).clamp(0, QA);
    y * y
}

/// Output bucket by piece count: `(pieces - 2) / 4`, capped at the last bucket.
pub fn material_bucket(board: &Board) -> usize {
    let pieces = board.occupied().count() as usize;
    (pieces.saturating_sub(2) / 4).min(NUM_BUCKETS - 1)
}
