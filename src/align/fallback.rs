//! Positional fallback pass
//!
//! Premise keyphrases still unresolved after the string passes are paired by
//! position: a gap flanked by aligned neighbours is assumed to line up with
//! the matching gap on the conclusion side, provided both keyphrases have the
//! same dominant part-of-speech class.

use super::aligner::AlignState;
use super::MatchPass;
use crate::types::TokenSequence;

/// Infer a conclusion index for premise `i` from its resolved neighbours.
///
/// - the first keyphrase takes conclusion 0 when its right neighbour took 1
/// - the last keyphrase takes the last conclusion when its left neighbour
///   took the one before it
/// - an interior keyphrase takes `left + 1` when its neighbours took
///   `left` and `left + 2`
pub(super) fn neighbour_candidate(
    resolved: &[Option<usize>],
    i: usize,
    conclusion_count: usize,
) -> Option<usize> {
    let n = resolved.len();
    if n < 2 || i >= n {
        return None;
    }
    if i == 0 {
        return match resolved[1] {
            Some(1) => Some(0),
            _ => None,
        };
    }
    if i == n - 1 {
        return match resolved[i - 1] {
            Some(left) if left + 2 == conclusion_count => Some(conclusion_count - 1),
            _ => None,
        };
    }
    match (resolved[i - 1], resolved[i + 1]) {
        (Some(left), Some(right)) if right == left + 2 => Some(left + 1),
        _ => None,
    }
}

/// Both classes known and equal
fn pos_agrees(premise: Option<char>, conclusion: Option<char>) -> bool {
    matches!((premise, conclusion), (Some(p), Some(c)) if p == c)
}

impl<'a, P, C> AlignState<'a, P, C>
where
    P: TokenSequence + ?Sized,
    C: TokenSequence + ?Sized,
{
    fn pos_agrees_at(&self, premise: usize, conclusion: usize) -> bool {
        pos_agrees(
            self.premise.dominant_pos_class(&self.premise_spans[premise]),
            self.conclusion
                .dominant_pos_class(&self.conclusion_spans[conclusion]),
        )
    }

    /// Run the positional fallback, returning the number of new pairs
    pub(super) fn positional_fallback(&mut self, many_to_many: bool) -> usize {
        let n = self.premise_spans.len();
        let m = self.conclusion_spans.len();

        if n == 1 {
            if m == 1
                && self.conclusion_for_premise[0].is_none()
                && !self.conclusion_consumed[0]
                && self.pos_agrees_at(0, 0)
            {
                self.link(0, 0, MatchPass::PositionalFallback);
                return 1;
            }
            return 0;
        }

        let mut matched = 0;
        // Neighbour state is read live: a pair made for `i` can unlock `i + 1`.
        for i in 0..n {
            if self.conclusion_for_premise[i].is_some() {
                continue;
            }
            let Some(c) = neighbour_candidate(&self.conclusion_for_premise, i, m) else {
                continue;
            };
            let free = many_to_many || (!self.premise_consumed[i] && !self.conclusion_consumed[c]);
            if free && self.pos_agrees_at(i, c) {
                self.link(i, c, MatchPass::PositionalFallback);
                matched += 1;
            }
        }
        matched
    }
}
