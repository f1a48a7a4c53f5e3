//! String-similarity predicates over keyphrase strings
//!
//! The public predicates lower-case their inputs. The crate-internal match
//! predicates expect phrase keys that are already lower-cased (see
//! [`crate::phrase::text::phrase_key`]) and back the aligner's match passes.

use rustc_hash::FxHashSet;

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

/// Split a phrase on runs of ASCII whitespace.
///
/// Leading whitespace yields a leading empty word; trailing empty words are
/// dropped. A phrase with no separator is its own single word, so `""`
/// splits to `[""]` while `" "` splits to nothing.
pub(crate) fn split_words(phrase: &str) -> Vec<&str> {
    if !phrase.contains(is_separator) {
        return vec![phrase];
    }
    let mut words: Vec<&str> = phrase
        .split(is_separator)
        .enumerate()
        .filter(|(i, w)| *i == 0 || !w.is_empty())
        .map(|(_, w)| w)
        .collect();
    while words.last().is_some_and(|w| w.is_empty()) {
        words.pop();
    }
    words
}

fn word_set(phrase: &str) -> FxHashSet<&str> {
    split_words(phrase).into_iter().collect()
}

/// True if either lower-cased string is a prefix of the other
pub fn containment_overlap(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.starts_with(&b) || b.starts_with(&a)
}

/// True if the lower-cased word sets of the two strings intersect
pub fn word_containment_overlap(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    shares_any_word(&a, &b)
}

pub(crate) fn is_exact(premise: &str, conclusion: &str) -> bool {
    premise == conclusion
}

/// Either phrase ends with the other (character level)
pub(crate) fn is_suffix_contained(premise: &str, conclusion: &str) -> bool {
    premise.ends_with(conclusion) || conclusion.ends_with(premise)
}

/// Either phrase starts with the other (character level)
pub(crate) fn is_prefix_contained(premise: &str, conclusion: &str) -> bool {
    premise.starts_with(conclusion) || conclusion.starts_with(premise)
}

/// The phrases share their first word or their last word
pub(crate) fn shares_boundary_word(premise: &str, conclusion: &str) -> bool {
    let premise = premise.to_lowercase();
    let conclusion = conclusion.to_lowercase();
    let p = split_words(&premise);
    let c = split_words(&conclusion);
    // An all-blank phrase has no words and no boundary to share.
    p.first().is_some_and(|w| Some(w) == c.first())
        || p.last().is_some_and(|w| Some(w) == c.last())
}

pub(crate) fn shares_any_word(premise: &str, conclusion: &str) -> bool {
    let premise_words = word_set(premise);
    split_words(conclusion)
        .into_iter()
        .any(|w| premise_words.contains(w))
}
