//! N-gram information model over phonetic segments.
//!
//! - Fixed-order continuation model (`NGramModel`)
//! - Per-context continuation rows (`Continuations`)

/// Fixed-order n-gram model (`n >= 0`).
///
/// Handles sequence ingestion, continuation counting, bit costs
/// and model merging.
pub mod ngram_model;

/// Observed continuations of one context.
///
/// Tracks following-segment counts and turns them into probabilities,
/// costs and entropy.
pub mod continuations;

pub use continuations::Continuations;
pub use ngram_model::{Context, EndOfWord, NGramModel};
