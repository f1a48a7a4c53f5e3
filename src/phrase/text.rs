//! Keyphrase text extraction

use crate::types::{KeySpan, TokenSequence};

/// Extract the surface text for a span, words joined by single spaces
pub fn span_text<S: TokenSequence + ?Sized>(tokens: &S, span: &KeySpan) -> String {
    span.range()
        .map(|i| tokens.word(i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the lemmatized text for a span, original case
pub fn span_lemma<S: TokenSequence + ?Sized>(tokens: &S, span: &KeySpan) -> String {
    span.range()
        .map(|i| tokens.lemma(i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cased lemma string the aligner compares keyphrases by
pub fn phrase_key<S: TokenSequence + ?Sized>(tokens: &S, span: &KeySpan) -> String {
    span_lemma(tokens, span).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PosTag, Sentence};

    fn make_sentence() -> Sentence {
        // "The Big Apple glitters"
        Sentence::from_tagged(&[
            ("The", "the", PosTag::Determiner),
            ("Big", "Big", PosTag::ProperNoun),
            ("Apple", "Apple", PosTag::ProperNoun),
            ("glitters", "glitter", PosTag::Verb),
        ])
    }

    #[test]
    fn test_span_text() {
        let sentence = make_sentence();
        assert_eq!(span_text(&sentence, &KeySpan::new(1, 3)), "Big Apple");
        assert_eq!(span_text(&sentence, &KeySpan::single(3)), "glitters");
    }

    #[test]
    fn test_span_lemma_keeps_case() {
        let sentence = make_sentence();
        assert_eq!(span_lemma(&sentence, &KeySpan::new(1, 4)), "Big Apple glitter");
    }

    #[test]
    fn test_phrase_key_is_lowercase() {
        let sentence = make_sentence();
        assert_eq!(phrase_key(&sentence, &KeySpan::new(1, 3)), "big apple");
    }

    #[test]
    fn test_empty_span_is_empty_string() {
        let sentence = make_sentence();
        assert_eq!(phrase_key(&sentence, &KeySpan::new(2, 2)), "");
    }
}
