//! # keyphrase_align
//!
//! Deterministic alignment of keyphrases between a premise sentence and a
//! conclusion sentence.
//!
//! Given token-level annotations (words, lemmas, POS tags) for both sentences
//! and the keyphrase spans already chosen in each, the aligner pairs premise
//! keyphrases with conclusion keyphrases through a fixed sequence of greedy
//! match passes, from exact lemma matches down to a positional fallback.
//! Keyphrases left without a counterpart are reported as single-sided records.
//!
//! ## Features
//!
//! - **Deterministic**: identical inputs always give identical record lists
//! - **One-to-one or many-to-many**: a span can be reused for extra exact matches
//! - **Batch mode**: many sentence pairs aligned on the rayon thread pool
//! - **Observable**: per-pass hooks, plus `tracing` spans behind the `tracing` feature

pub mod align;
pub mod batch;
pub mod errors;
pub mod phrase;
pub mod types;

// Re-export commonly used types
pub use errors::{AlignError, Result, Side};
pub use types::{AlignConfig, KeySpan, PosTag, Sentence, Token, TokenSequence};

// Re-export main functionality
pub use align::{
    align_keyphrases, Alignment, AlignmentObserver, AlignmentSummary, CollectingObserver,
    Keyphrase, KeyphraseAligner, KeywordPair, MatchPass, NoopObserver, PairCategory,
    PassTallyObserver,
};
pub use batch::{BatchAligner, SentencePair};
pub use phrase::similarity::{containment_overlap, word_containment_overlap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
