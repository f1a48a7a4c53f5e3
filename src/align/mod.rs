//! Keyphrase alignment
//!
//! Aligns the keyphrases of a premise sentence with the keyphrases of a
//! conclusion sentence using a fixed sequence of greedy match passes, from the
//! strongest match type (identical lemma strings) down to a positional
//! fallback that only trusts part-of-speech agreement. Every input span ends
//! up in the result, either paired or as a dangling single-sided record.

/// Enter a debug span for one match pass; expands to nothing unless the
/// `tracing` feature is on.
macro_rules! trace_pass {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("align_pass", pass = $name).entered();
    };
}

pub mod aligner;
mod fallback;
pub mod observer;
pub mod summary;

use serde::Serialize;
use std::fmt;

pub use aligner::{align_keyphrases, KeyphraseAligner};
pub use observer::{AlignmentObserver, CollectingObserver, NoopObserver, PassTallyObserver};
pub use summary::{AlignmentSummary, PairCategory};

use crate::types::KeySpan;

// ============================================================================
// Match passes
// ============================================================================

/// The pass that produced an aligned record, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    /// Identical phrase strings
    Exact,
    /// One phrase string ends with the other
    SuffixContainment,
    /// One phrase string starts with the other
    PrefixContainment,
    /// Same first word or same last word
    BoundaryWord,
    /// At least one word in common
    AnyWord,
    /// Identical phrase strings, reusing an already aligned span
    ManyToMany,
    /// Inferred from aligned neighbours and POS agreement
    PositionalFallback,
}

impl MatchPass {
    /// All passes in the order the aligner runs them
    pub const ALL: [MatchPass; 7] = [
        MatchPass::Exact,
        MatchPass::SuffixContainment,
        MatchPass::PrefixContainment,
        MatchPass::BoundaryWord,
        MatchPass::AnyWord,
        MatchPass::ManyToMany,
        MatchPass::PositionalFallback,
    ];

    /// Position of this pass in [`MatchPass::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPass::Exact => "exact",
            MatchPass::SuffixContainment => "suffix_containment",
            MatchPass::PrefixContainment => "prefix_containment",
            MatchPass::BoundaryWord => "boundary_word",
            MatchPass::AnyWord => "any_word",
            MatchPass::ManyToMany => "many_to_many",
            MatchPass::PositionalFallback => "positional_fallback",
        }
    }
}

impl fmt::Display for MatchPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One side of an alignment record: a keyphrase and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyphrase {
    /// Position of the span in the caller's keyphrase list
    pub index: usize,
    /// The span itself
    pub span: KeySpan,
    /// Surface words joined by single spaces
    pub text: String,
    /// Lemmas joined by single spaces, original case
    pub lemma: String,
}

/// A pair of aligned keyphrases, or a keyphrase left without a counterpart.
///
/// At least one side is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordPair {
    premise: Option<Keyphrase>,
    conclusion: Option<Keyphrase>,
    matched_by: Option<MatchPass>,
}

impl KeywordPair {
    pub(crate) fn aligned(premise: Keyphrase, conclusion: Keyphrase, pass: MatchPass) -> Self {
        Self {
            premise: Some(premise),
            conclusion: Some(conclusion),
            matched_by: Some(pass),
        }
    }

    pub(crate) fn premise_only(premise: Keyphrase) -> Self {
        Self {
            premise: Some(premise),
            conclusion: None,
            matched_by: None,
        }
    }

    pub(crate) fn conclusion_only(conclusion: Keyphrase) -> Self {
        Self {
            premise: None,
            conclusion: Some(conclusion),
            matched_by: None,
        }
    }

    pub fn premise(&self) -> Option<&Keyphrase> {
        self.premise.as_ref()
    }

    pub fn conclusion(&self) -> Option<&Keyphrase> {
        self.conclusion.as_ref()
    }

    /// The pass that aligned this pair; `None` for dangling records
    pub fn matched_by(&self) -> Option<MatchPass> {
        self.matched_by
    }

    pub fn has_premise(&self) -> bool {
        self.premise.is_some()
    }

    pub fn has_conclusion(&self) -> bool {
        self.conclusion.is_some()
    }

    /// Both sides present
    pub fn is_aligned(&self) -> bool {
        self.has_premise() && self.has_conclusion()
    }

    pub fn premise_index(&self) -> Option<usize> {
        self.premise.as_ref().map(|k| k.index)
    }

    pub fn conclusion_index(&self) -> Option<usize> {
        self.conclusion.as_ref().map(|k| k.index)
    }

    pub fn premise_lemma(&self) -> Option<&str> {
        self.premise.as_ref().map(|k| k.lemma.as_str())
    }

    pub fn conclusion_lemma(&self) -> Option<&str> {
        self.conclusion.as_ref().map(|k| k.lemma.as_str())
    }

    pub(crate) fn links(&self, premise: usize, conclusion: usize) -> bool {
        self.premise_index() == Some(premise) && self.conclusion_index() == Some(conclusion)
    }
}

impl fmt::Display for KeywordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The missing-premise marker carries a trailing space.
        let premise = self.premise.as_ref().map_or("--- ", |k| k.text.as_str());
        let conclusion = self.conclusion.as_ref().map_or("---", |k| k.text.as_str());
        write!(f, "< {premise}; {conclusion} >")
    }
}

// ============================================================================
// Alignment result
// ============================================================================

/// The records produced for one premise/conclusion pair, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alignment {
    pairs: Vec<KeywordPair>,
    premise_count: usize,
    conclusion_count: usize,
}

impl Alignment {
    pub(crate) fn new(pairs: Vec<KeywordPair>, premise_count: usize, conclusion_count: usize) -> Self {
        Self {
            pairs,
            premise_count,
            conclusion_count,
        }
    }

    pub fn pairs(&self) -> &[KeywordPair] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<KeywordPair> {
        self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeywordPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of premise keyphrases the alignment was computed over
    pub fn premise_count(&self) -> usize {
        self.premise_count
    }

    /// Number of conclusion keyphrases the alignment was computed over
    pub fn conclusion_count(&self) -> usize {
        self.conclusion_count
    }

    pub fn aligned(&self) -> impl Iterator<Item = &KeywordPair> {
        self.pairs.iter().filter(|p| p.is_aligned())
    }

    pub fn premise_only(&self) -> impl Iterator<Item = &KeywordPair> {
        self.pairs.iter().filter(|p| p.has_premise() && !p.has_conclusion())
    }

    pub fn conclusion_only(&self) -> impl Iterator<Item = &KeywordPair> {
        self.pairs.iter().filter(|p| p.has_conclusion() && !p.has_premise())
    }

    /// Conclusion indices aligned to premise keyphrase `premise`
    pub fn partners_of_premise(&self, premise: usize) -> Vec<usize> {
        self.aligned()
            .filter(|p| p.premise_index() == Some(premise))
            .filter_map(|p| p.conclusion_index())
            .collect()
    }

    /// Premise indices aligned to conclusion keyphrase `conclusion`
    pub fn partners_of_conclusion(&self, conclusion: usize) -> Vec<usize> {
        self.aligned()
            .filter(|p| p.conclusion_index() == Some(conclusion))
            .filter_map(|p| p.premise_index())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Alignment {
    type Item = &'a KeywordPair;
    type IntoIter = std::slice::Iter<'a, KeywordPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyphrase(index: usize, text: &str) -> Keyphrase {
        Keyphrase {
            index,
            span: KeySpan::single(index),
            text: text.to_string(),
            lemma: text.to_lowercase(),
        }
    }

    #[test]
    fn test_pass_order_matches_index() {
        for (i, pass) in MatchPass::ALL.iter().enumerate() {
            assert_eq!(pass.index(), i);
        }
        assert!(MatchPass::Exact < MatchPass::PositionalFallback);
    }

    #[test]
    fn test_pair_sides() {
        let aligned = KeywordPair::aligned(keyphrase(0, "Dog"), keyphrase(1, "dog"), MatchPass::Exact);
        assert!(aligned.is_aligned());
        assert_eq!(aligned.matched_by(), Some(MatchPass::Exact));
        assert!(aligned.links(0, 1));

        let dangling = KeywordPair::premise_only(keyphrase(2, "cat"));
        assert!(dangling.has_premise());
        assert!(!dangling.has_conclusion());
        assert!(!dangling.is_aligned());
        assert_eq!(dangling.matched_by(), None);
        assert_eq!(dangling.conclusion_lemma(), None);
    }

    #[test]
    fn test_pair_display() {
        let aligned = KeywordPair::aligned(keyphrase(0, "Dog"), keyphrase(0, "puppy"), MatchPass::PositionalFallback);
        assert_eq!(aligned.to_string(), "< Dog; puppy >");
        let dangling = KeywordPair::conclusion_only(keyphrase(0, "ran"));
        assert_eq!(dangling.to_string(), "< --- ; ran >");
        let dangling = KeywordPair::premise_only(keyphrase(0, "dog"));
        assert_eq!(dangling.to_string(), "< dog; --- >");
    }

    #[test]
    fn test_alignment_filters() {
        let alignment = Alignment::new(
            vec![
                KeywordPair::aligned(keyphrase(0, "a"), keyphrase(1, "a"), MatchPass::Exact),
                KeywordPair::premise_only(keyphrase(1, "b")),
                KeywordPair::conclusion_only(keyphrase(0, "c")),
            ],
            2,
            2,
        );
        assert_eq!(alignment.len(), 3);
        assert_eq!(alignment.aligned().count(), 1);
        assert_eq!(alignment.premise_only().count(), 1);
        assert_eq!(alignment.conclusion_only().count(), 1);
        assert_eq!(alignment.partners_of_premise(0), vec![1]);
        assert_eq!(alignment.partners_of_conclusion(1), vec![0]);
        assert!(alignment.partners_of_premise(1).is_empty());
        assert_eq!((&alignment).into_iter().count(), 3);
    }

    #[test]
    fn test_alignment_serializes() {
        let alignment = Alignment::new(
            vec![KeywordPair::aligned(keyphrase(0, "a"), keyphrase(0, "a"), MatchPass::Exact)],
            1,
            1,
        );
        let json = serde_json::to_value(&alignment).unwrap();
        assert_eq!(json["pairs"][0]["matched_by"], "exact");
        assert_eq!(json["pairs"][0]["premise"]["lemma"], "a");
        assert_eq!(json["premise_count"], 1);
    }
}
