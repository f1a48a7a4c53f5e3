//! Batch alignment over many sentence pairs
//!
//! Large batches run on the rayon thread pool; small ones run inline where
//! thread hand-off would cost more than the alignment itself. Results always
//! come back in input order, one per pair.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::align::{Alignment, AlignmentObserver, KeyphraseAligner};
use crate::errors::Result;
use crate::types::{AlignConfig, KeySpan, Sentence, TokenSequence};

/// A premise/conclusion pair with their keyphrase spans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair<S = Sentence> {
    /// Caller-chosen identifier, passed through to observers
    pub id: String,
    pub premise: S,
    pub premise_spans: Vec<KeySpan>,
    pub conclusion: S,
    pub conclusion_spans: Vec<KeySpan>,
}

impl<S> SentencePair<S> {
    pub fn new(
        id: impl Into<String>,
        premise: S,
        premise_spans: Vec<KeySpan>,
        conclusion: S,
        conclusion_spans: Vec<KeySpan>,
    ) -> Self {
        Self {
            id: id.into(),
            premise,
            premise_spans,
            conclusion,
            conclusion_spans,
        }
    }
}

/// Thread-safe progress counter shared by batch workers
#[derive(Debug)]
struct ProgressCounter {
    done: AtomicUsize,
    every: usize,
}

impl ProgressCounter {
    fn new(every: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            every: every.max(1),
        }
    }

    /// Count one finished pair; true when a progress line is due
    fn tick(&self, _total: usize) -> bool {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let due = done % self.every == 0;
        #[cfg(feature = "tracing")]
        if due {
            tracing::info!(done, total = _total, "batch alignment progress");
        }
        due
    }

    fn get(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

/// Aligns many sentence pairs with one shared configuration
#[derive(Debug, Clone, Default)]
pub struct BatchAligner {
    aligner: KeyphraseAligner,
}

impl BatchAligner {
    /// Create a batch aligner, rejecting an invalid config
    pub fn new(config: AlignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            aligner: KeyphraseAligner::with_config(config),
        })
    }

    pub fn config(&self) -> &AlignConfig {
        self.aligner.config()
    }

    /// Align every pair; one failing pair does not stop the others.
    ///
    /// The observer sees pairs in completion order, which differs from input
    /// order when the batch runs in parallel.
    pub fn align_all<S, O>(&self, pairs: &[SentencePair<S>], observer: &O) -> Vec<Result<Alignment>>
    where
        S: TokenSequence + Sync,
        O: AlignmentObserver + Sync + ?Sized,
    {
        let config = self.config();
        let progress = ProgressCounter::new(config.progress_every);
        let total = pairs.len();

        let align_one = |pair: &SentencePair<S>| {
            let result = self.aligner.align_observed(
                &pair.id,
                &pair.premise,
                &pair.premise_spans,
                &pair.conclusion,
                &pair.conclusion_spans,
                observer,
            );
            #[cfg(feature = "tracing")]
            if let Err(err) = &result {
                tracing::warn!(pair = %pair.id, error = %err, "pair skipped");
            }
            progress.tick(total);
            result
        };

        let parallel = config.parallel && total >= config.parallel_threshold;

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("align_batch", pairs = total, parallel).entered();

        let results: Vec<Result<Alignment>> = if parallel {
            pairs.par_iter().map(align_one).collect()
        } else {
            pairs.iter().map(align_one).collect()
        };

        debug_assert_eq!(progress.get(), total);
        results
    }
}
