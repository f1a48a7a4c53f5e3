//! The multi-pass greedy keyphrase aligner
//!
//! Passes run in a fixed priority order so that a stronger match type always
//! wins over a weaker one when both are possible:
//!
//! 1. exact phrase match
//! 2. suffix containment
//! 3. prefix containment
//! 4. shared first or last word
//! 5. any shared word
//! 6. many-to-many exact match (opt-in)
//! 7. positional / POS-consistency fallback
//!
//! Passes 1-5 scan premise × conclusion in ascending index order, skip
//! consumed spans on either side, and pair each premise with the first
//! matching conclusion.

use super::observer::{AlignmentObserver, NoopObserver};
use super::{Alignment, Keyphrase, KeywordPair, MatchPass};
use crate::errors::{Result, Side};
use crate::phrase::similarity::{
    is_exact, is_prefix_contained, is_suffix_contained, shares_any_word, shares_boundary_word,
};
use crate::phrase::text::{phrase_key, span_lemma, span_text};
use crate::types::{check_spans, AlignConfig, KeySpan, TokenSequence};

/// Predicate over two lower-cased phrase keys
type PhrasePredicate = fn(&str, &str) -> bool;

const GREEDY_PASSES: [(MatchPass, PhrasePredicate); 5] = [
    (MatchPass::Exact, is_exact),
    (MatchPass::SuffixContainment, is_suffix_contained),
    (MatchPass::PrefixContainment, is_prefix_contained),
    (MatchPass::BoundaryWord, shares_boundary_word),
    (MatchPass::AnyWord, shares_any_word),
];

/// Keyphrase aligner
#[derive(Debug, Clone, Default)]
pub struct KeyphraseAligner {
    config: AlignConfig,
}

impl KeyphraseAligner {
    /// Create an aligner with the default (one-to-one) config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: AlignConfig) -> Self {
        Self { config }
    }

    /// Enable or disable many-to-many alignment
    pub fn with_many_to_many(mut self, many_to_many: bool) -> Self {
        self.config.many_to_many = many_to_many;
        self
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Align premise keyphrases with conclusion keyphrases.
    ///
    /// Fails only if a span does not fit inside its token sequence.
    pub fn align<P, C>(
        &self,
        premise: &P,
        premise_spans: &[KeySpan],
        conclusion: &C,
        conclusion_spans: &[KeySpan],
    ) -> Result<Alignment>
    where
        P: TokenSequence + ?Sized,
        C: TokenSequence + ?Sized,
    {
        self.align_observed(
            "",
            premise,
            premise_spans,
            conclusion,
            conclusion_spans,
            &NoopObserver,
        )
    }

    /// Align and report each pass and the final alignment to `observer`,
    /// tagged with `pair_id`.
    pub fn align_observed<P, C, O>(
        &self,
        pair_id: &str,
        premise: &P,
        premise_spans: &[KeySpan],
        conclusion: &C,
        conclusion_spans: &[KeySpan],
        observer: &O,
    ) -> Result<Alignment>
    where
        P: TokenSequence + ?Sized,
        C: TokenSequence + ?Sized,
        O: AlignmentObserver + ?Sized,
    {
        check_spans(Side::Premise, premise_spans, premise.len())?;
        check_spans(Side::Conclusion, conclusion_spans, conclusion.len())?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "align",
            pair = pair_id,
            premise = premise_spans.len(),
            conclusion = conclusion_spans.len()
        )
        .entered();

        let mut state = AlignState::new(premise, premise_spans, conclusion, conclusion_spans);

        for (pass, predicate) in GREEDY_PASSES {
            trace_pass!(pass.as_str());
            let matched = state.greedy_pass(pass, predicate);
            observer.on_pass(pass, matched);
        }

        if self.config.many_to_many {
            trace_pass!(MatchPass::ManyToMany.as_str());
            let matched = state.many_to_many_pass();
            observer.on_pass(MatchPass::ManyToMany, matched);
        }

        {
            trace_pass!(MatchPass::PositionalFallback.as_str());
            let matched = state.positional_fallback(self.config.many_to_many);
            observer.on_pass(MatchPass::PositionalFallback, matched);
        }

        let alignment = state.finish();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            aligned = alignment.aligned().count(),
            premise_only = alignment.premise_only().count(),
            conclusion_only = alignment.conclusion_only().count(),
            "alignment finished"
        );

        observer.on_alignment(pair_id, &alignment);
        Ok(alignment)
    }
}

/// Convenience function mirroring the aligner's full contract
pub fn align_keyphrases<P, C>(
    premise: &P,
    premise_spans: &[KeySpan],
    conclusion: &C,
    conclusion_spans: &[KeySpan],
    many_to_many: bool,
) -> Result<Alignment>
where
    P: TokenSequence + ?Sized,
    C: TokenSequence + ?Sized,
{
    KeyphraseAligner::new()
        .with_many_to_many(many_to_many)
        .align(premise, premise_spans, conclusion, conclusion_spans)
}

// ============================================================================
// Per-call working state
// ============================================================================

/// Working state for one alignment call; nothing outlives the call.
pub(super) struct AlignState<'a, P: ?Sized, C: ?Sized> {
    pub(super) premise: &'a P,
    pub(super) premise_spans: &'a [KeySpan],
    pub(super) conclusion: &'a C,
    pub(super) conclusion_spans: &'a [KeySpan],
    premise_keys: Vec<String>,
    conclusion_keys: Vec<String>,
    pub(super) premise_consumed: Vec<bool>,
    pub(super) conclusion_consumed: Vec<bool>,
    /// Conclusion index each premise was last aligned to
    pub(super) conclusion_for_premise: Vec<Option<usize>>,
    pairs: Vec<KeywordPair>,
}

impl<'a, P, C> AlignState<'a, P, C>
where
    P: TokenSequence + ?Sized,
    C: TokenSequence + ?Sized,
{
    fn new(
        premise: &'a P,
        premise_spans: &'a [KeySpan],
        conclusion: &'a C,
        conclusion_spans: &'a [KeySpan],
    ) -> Self {
        Self {
            premise,
            premise_spans,
            conclusion,
            conclusion_spans,
            premise_keys: premise_spans.iter().map(|s| phrase_key(premise, s)).collect(),
            conclusion_keys: conclusion_spans
                .iter()
                .map(|s| phrase_key(conclusion, s))
                .collect(),
            premise_consumed: vec![false; premise_spans.len()],
            conclusion_consumed: vec![false; conclusion_spans.len()],
            conclusion_for_premise: vec![None; premise_spans.len()],
            pairs: Vec::with_capacity(premise_spans.len() + conclusion_spans.len()),
        }
    }

    fn premise_keyphrase(&self, index: usize) -> Keyphrase {
        let span = self.premise_spans[index];
        Keyphrase {
            index,
            span,
            text: span_text(self.premise, &span),
            lemma: span_lemma(self.premise, &span),
        }
    }

    fn conclusion_keyphrase(&self, index: usize) -> Keyphrase {
        let span = self.conclusion_spans[index];
        Keyphrase {
            index,
            span,
            text: span_text(self.conclusion, &span),
            lemma: span_lemma(self.conclusion, &span),
        }
    }

    /// Record an aligned pair and consume both sides
    pub(super) fn link(&mut self, premise: usize, conclusion: usize, pass: MatchPass) {
        debug_assert!(
            !self.pairs.iter().any(|p| p.links(premise, conclusion)),
            "premise {premise} and conclusion {conclusion} aligned twice"
        );
        let record = KeywordPair::aligned(
            self.premise_keyphrase(premise),
            self.conclusion_keyphrase(conclusion),
            pass,
        );
        self.pairs.push(record);
        self.premise_consumed[premise] = true;
        self.conclusion_consumed[conclusion] = true;
        self.conclusion_for_premise[premise] = Some(conclusion);
    }

    fn greedy_pass(&mut self, pass: MatchPass, matches: PhrasePredicate) -> usize {
        let mut matched = 0;
        for p in 0..self.premise_spans.len() {
            if self.premise_consumed[p] {
                continue;
            }
            let hit = (0..self.conclusion_spans.len()).find(|&c| {
                !self.conclusion_consumed[c]
                    && matches(&self.premise_keys[p], &self.conclusion_keys[c])
            });
            if let Some(c) = hit {
                self.link(p, c, pass);
                matched += 1;
            }
        }
        matched
    }

    /// Exact matches where at most one side has been aligned before
    fn many_to_many_pass(&mut self) -> usize {
        let mut matched = 0;
        for p in 0..self.premise_spans.len() {
            let hit = (0..self.conclusion_spans.len()).find(|&c| {
                (!self.premise_consumed[p] || !self.conclusion_consumed[c])
                    && is_exact(&self.premise_keys[p], &self.conclusion_keys[c])
            });
            if let Some(c) = hit {
                self.link(p, c, MatchPass::ManyToMany);
                matched += 1;
            }
        }
        matched
    }

    /// Emit dangling records for every unconsumed span and build the result
    fn finish(mut self) -> Alignment {
        for p in 0..self.premise_spans.len() {
            if !self.premise_consumed[p] {
                let record = KeywordPair::premise_only(self.premise_keyphrase(p));
                self.pairs.push(record);
            }
        }
        for c in 0..self.conclusion_spans.len() {
            if !self.conclusion_consumed[c] {
                let record = KeywordPair::conclusion_only(self.conclusion_keyphrase(c));
                self.pairs.push(record);
            }
        }
        Alignment::new(
            self.pairs,
            self.premise_spans.len(),
            self.conclusion_spans.len(),
        )
    }
}
