//! Incrementally updated threat-input NNUE evaluation.
//!
//! A position maps onto king-oriented piece-square features plus pairwise
//! attacker/defender threat features. [`AccumulatorStack`] keeps the
//! first-layer sums of both perspectives per ply and [`Network`] turns them
//! into a score.

mod accumulator;
mod error;
pub mod features;
mod index_list;
pub mod network;
mod stack;

pub use accumulator::{Accumulator, AccumulatorState};
pub use error::LoadError;
pub use features::{FeatureIndexer, INPUT_SIZE, PsqList, ThreatList, ThreatOffsets};
pub use index_list::{IndexList, sorted_difference};
pub use network::{HIDDEN, NUM_BUCKETS, Network, material_bucket};
pub use stack::{AccumulatorStack, MAX_PLY};
