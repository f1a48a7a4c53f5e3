//! Core types for keyphrase_align
//!
//! This module defines the data the aligner reads: part-of-speech tags,
//! annotated tokens, keyphrase spans, the token-sequence accessor trait that
//! external annotators implement, and the aligner configuration.

use crate::errors::{AlignError, Result, Side};
use serde::{Deserialize, Serialize};
use std::ops::Range;

// ============================================================================
// Part of speech
// ============================================================================

/// Part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    Interjection,
    Numeral,
    Particle,
    Punctuation,
    Symbol,
    ProperNoun,
    Other,
}

impl PosTag {
    /// Class letter for a token whose annotator tag was not kept.
    ///
    /// This is the first letter of the Penn Treebank tag family the variant
    /// stands for, so numerals (`CD`) share `C` with conjunctions (`CC`) and
    /// particles (`RP`) share `R` with adverbs. Tokens that carry their raw
    /// tag use its first character instead (see [`TokenSequence::raw_tag`]).
    pub fn class_letter(&self) -> char {
        match self {
            PosTag::Noun | PosTag::ProperNoun => 'N',
            PosTag::Verb => 'V',
            PosTag::Adjective => 'J',
            PosTag::Adverb | PosTag::Particle => 'R',
            PosTag::Pronoun => 'P',
            PosTag::Determiner => 'D',
            PosTag::Preposition => 'I',
            PosTag::Conjunction | PosTag::Numeral => 'C',
            PosTag::Interjection => 'U',
            PosTag::Symbol => 'S',
            PosTag::Punctuation => '.',
            PosTag::Other => 'X',
        }
    }

    /// Parse from a Penn Treebank tag (`NN`, `VBD`, `JJR`, ...)
    pub fn from_penn(tag: &str) -> Self {
        let tag = tag.to_uppercase();
        match tag.as_str() {
            "NNP" | "NNPS" => PosTag::ProperNoun,
            "NN" | "NNS" => PosTag::Noun,
            "MD" => PosTag::Verb,
            "PRP" | "PRP$" | "WP" | "WP$" => PosTag::Pronoun,
            "DT" | "PDT" | "WDT" => PosTag::Determiner,
            "IN" => PosTag::Preposition,
            "CC" => PosTag::Conjunction,
            "CD" => PosTag::Numeral,
            "UH" => PosTag::Interjection,
            "RP" => PosTag::Particle,
            "WRB" => PosTag::Adverb,
            "SYM" | "$" | "#" => PosTag::Symbol,
            "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "HYPH" => PosTag::Punctuation,
            t if t.starts_with("VB") => PosTag::Verb,
            t if t.starts_with("JJ") => PosTag::Adjective,
            t if t.starts_with("RB") => PosTag::Adverb,
            _ => PosTag::Other,
        }
    }

    /// Parse from spaCy-style POS tag
    pub fn from_spacy(tag: &str) -> Self {
        match tag.to_uppercase().as_str() {
            "NOUN" => PosTag::Noun,
            "VERB" | "AUX" => PosTag::Verb,
            "ADJ" => PosTag::Adjective,
            "ADV" => PosTag::Adverb,
            "PRON" => PosTag::Pronoun,
            "DET" => PosTag::Determiner,
            "ADP" => PosTag::Preposition,
            "CCONJ" | "SCONJ" => PosTag::Conjunction,
            "INTJ" => PosTag::Interjection,
            "NUM" => PosTag::Numeral,
            "PART" => PosTag::Particle,
            "PUNCT" => PosTag::Punctuation,
            "SYM" => PosTag::Symbol,
            "PROPN" => PosTag::ProperNoun,
            _ => PosTag::Other,
        }
    }
}

// ============================================================================
// Token
// ============================================================================

/// An annotated token supplied by the tagging pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The surface form (original text)
    pub text: String,
    /// The lemmatized form
    pub lemma: String,
    /// Part-of-speech tag
    pub pos: PosTag,
    /// Tag exactly as the annotator produced it (`NNS`, `VBD`, `TO`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Token {
    /// Create a new token
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, pos: PosTag) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos,
            tag: None,
        }
    }

    /// Create a token from a Penn Treebank tag, keeping the raw tag
    pub fn with_penn_tag(text: impl Into<String>, lemma: impl Into<String>, tag: &str) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos: PosTag::from_penn(tag),
            tag: Some(tag.to_string()),
        }
    }
}

// ============================================================================
// Keyphrase span
// ============================================================================

/// A half-open token range `[start_token, end_token)` marking one keyphrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySpan {
    /// Start token index (inclusive)
    pub start_token: usize,
    /// End token index (exclusive)
    pub end_token: usize,
}

impl KeySpan {
    pub fn new(start_token: usize, end_token: usize) -> Self {
        Self {
            start_token,
            end_token,
        }
    }

    /// Span covering the single token at `index`
    pub fn single(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    /// Get the token length of this span
    pub fn token_len(&self) -> usize {
        self.end_token.saturating_sub(self.start_token)
    }

    pub fn is_empty(&self) -> bool {
        self.token_len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start_token..self.end_token
    }

    /// Check if this span overlaps with another
    pub fn overlaps(&self, other: &KeySpan) -> bool {
        self.start_token < other.end_token && other.start_token < self.end_token
    }

    /// Whether the span is well formed for a sequence of `len` tokens
    pub fn fits(&self, len: usize) -> bool {
        self.start_token <= self.end_token && self.end_token <= len
    }
}

/// Check every span of one side against its sequence length
pub(crate) fn check_spans(side: Side, spans: &[KeySpan], len: usize) -> Result<()> {
    match spans.iter().position(|span| !span.fits(len)) {
        None => Ok(()),
        Some(index) => Err(AlignError::InvalidSpan {
            side,
            index,
            start: spans[index].start_token,
            end: spans[index].end_token,
            len,
        }),
    }
}

// ============================================================================
// Token sequences
// ============================================================================

/// Read-only per-sentence annotations, implemented by external annotators.
///
/// Indices passed to the accessors are always `< len()`; the aligner checks
/// every span before reading through it.
pub trait TokenSequence {
    /// Number of tokens in the sentence
    fn len(&self) -> usize;

    /// Surface form of token `i`
    fn word(&self, i: usize) -> &str;

    /// Lemma of token `i`
    fn lemma(&self, i: usize) -> &str;

    /// Part-of-speech tag of token `i`
    fn pos_tag(&self, i: usize) -> PosTag;

    /// Raw annotator tag of token `i`, when the sequence keeps one
    fn raw_tag(&self, _i: usize) -> Option<&str> {
        None
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class letter of the most frequent tag among the tokens of `span`.
    ///
    /// Tags are compared in full (raw tag when present, coarse tag
    /// otherwise) and the winner's first character is the class. Ties go to
    /// the tag seen first in the span. An empty span, or a winning raw tag
    /// that is empty, has no class.
    fn dominant_pos_class(&self, span: &KeySpan) -> Option<char> {
        let mut counts: Vec<(TagKey<'_>, usize)> = Vec::new();
        for i in span.range() {
            let key = match self.raw_tag(i) {
                Some(raw) => TagKey::Raw(raw),
                None => TagKey::Coarse(self.pos_tag(i)),
            };
            match counts.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 += 1,
                None => counts.push((key, 1)),
            }
        }

        let mut best: Option<(TagKey<'_>, usize)> = None;
        for (key, count) in counts {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((key, count));
            }
        }
        best.and_then(|(key, _)| key.class_letter())
    }
}

/// A token's tag as counted by [`TokenSequence::dominant_pos_class`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKey<'a> {
    Raw(&'a str),
    Coarse(PosTag),
}

impl TagKey<'_> {
    fn class_letter(&self) -> Option<char> {
        match self {
            TagKey::Raw(raw) => raw.chars().next(),
            TagKey::Coarse(pos) => Some(pos.class_letter()),
        }
    }
}

impl TokenSequence for [Token] {
    fn len(&self) -> usize {
        <[Token]>::len(self)
    }

    fn word(&self, i: usize) -> &str {
        &self[i].text
    }

    fn lemma(&self, i: usize) -> &str {
        &self[i].lemma
    }

    fn pos_tag(&self, i: usize) -> PosTag {
        self[i].pos
    }

    fn raw_tag(&self, i: usize) -> Option<&str> {
        self[i].tag.as_deref()
    }
}

/// An annotated sentence backed by owned tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Build a sentence from `(word, lemma, tag)` triples
    pub fn from_tagged(triples: &[(&str, &str, PosTag)]) -> Self {
        Self::new(
            triples
                .iter()
                .map(|&(word, lemma, pos)| Token::new(word, lemma, pos))
                .collect(),
        )
    }

    /// Build a sentence from `(word, lemma, penn_tag)` triples, keeping the
    /// raw tags
    pub fn from_penn(triples: &[(&str, &str, &str)]) -> Self {
        Self::new(
            triples
                .iter()
                .map(|&(word, lemma, tag)| Token::with_penn_tag(word, lemma, tag))
                .collect(),
        )
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl From<Vec<Token>> for Sentence {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl TokenSequence for Sentence {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn word(&self, i: usize) -> &str {
        &self.tokens[i].text
    }

    fn lemma(&self, i: usize) -> &str {
        &self.tokens[i].lemma
    }

    fn pos_tag(&self, i: usize) -> PosTag {
        self.tokens[i].pos
    }

    fn raw_tag(&self, i: usize) -> Option<&str> {
        self.tokens[i].tag.as_deref()
    }
}

// ============================================================================
// Configuration
// ============================================================================

fn default_parallel() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    AlignConfig::DEFAULT_PARALLEL_THRESHOLD
}

fn default_progress_every() -> usize {
    AlignConfig::DEFAULT_PROGRESS_EVERY
}

/// Configuration for keyphrase alignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Allow a span to take part in more than one aligned record
    #[serde(default)]
    pub many_to_many: bool,
    /// Align batches on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Smallest batch that is worth splitting across threads
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Emit a progress event every this many aligned pairs
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            many_to_many: false,
            parallel: default_parallel(),
            parallel_threshold: default_parallel_threshold(),
            progress_every: default_progress_every(),
        }
    }
}

impl AlignConfig {
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;
    pub const DEFAULT_PROGRESS_EVERY: usize = 1000;

    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AlignConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.progress_every == 0 {
            return Err(AlignError::invalid_config("progress_every must be > 0"));
        }
        Ok(())
    }

    /// Builder method: enable or disable many-to-many alignment
    pub fn with_many_to_many(mut self, many_to_many: bool) -> Self {
        self.many_to_many = many_to_many;
        self
    }

    /// Builder method: enable or disable parallel batches
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builder method: set the parallel batch threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Builder method: set the progress logging interval
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }
}
