//! Phonemic information measurement library.
//!
//! This crate estimates how many bits a language's words carry once their
//! spelling has been normalised into phonetic segments:
//! - Rule-driven segmentation of orthographic words (`segment`)
//! - Per-language rule tables and their catalog (`language`)
//! - Fixed-order n-gram continuation model with bit costs (`model`)
//! - Verse corpus loading and word tokenisation (`corpus`)
//! - Report computations over a loaded corpus (`report`)

/// Typed errors returned by the model and the corpus loader.
pub mod error;

/// Language rule sets and the catalog keyed by ISO code.
pub mod language;

/// Orthographic word → phonetic segment sequence.
pub mod segment;

/// N-gram continuation tables and information cost queries.
///
/// Models are trained from segment sequences and answer per-segment and
/// per-sequence bit costs. Unseen contexts are errors, never defaults.
pub mod model;

/// Translation files, verses and the word tokenizer.
pub mod corpus;

/// Aggregated statistics consumed by the command-line front end.
pub mod report;

/// I/O utilities (file listing, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{CorpusError, ModelError};
pub use language::{Catalog, LanguageRules};
pub use model::ngram_model::{EndOfWord, NGramModel};
pub use segment::{EDGE, PhoneticSegment, segment_word};
