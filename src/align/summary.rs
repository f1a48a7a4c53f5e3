//! Per-alignment summary
//!
//! Classifies every record of an [`Alignment`] by how closely its two lemma
//! strings overlap, and turns the counts into ratios. Every ratio is `0.0`
//! when its denominator is zero.

use serde::Serialize;

use super::{Alignment, KeywordPair};
use crate::phrase::similarity::{containment_overlap, word_containment_overlap};

/// How the two sides of a record relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCategory {
    PremiseOnly,
    ConclusionOnly,
    /// Lemma strings equal, ignoring case
    Exact,
    /// One lemma string starts with the other
    Containment,
    /// The lemma strings share a word
    WordContainment,
    /// Aligned with no string overlap at all
    NoOverlap,
}

impl PairCategory {
    /// Categorize one record; checks run from the strongest overlap down.
    pub fn of(pair: &KeywordPair) -> Self {
        match (pair.premise_lemma(), pair.conclusion_lemma()) {
            (Some(_), None) => PairCategory::PremiseOnly,
            (None, Some(_)) => PairCategory::ConclusionOnly,
            (Some(premise), Some(conclusion)) => {
                if premise.to_lowercase() == conclusion.to_lowercase() {
                    PairCategory::Exact
                } else if containment_overlap(premise, conclusion) {
                    PairCategory::Containment
                } else if word_containment_overlap(premise, conclusion) {
                    PairCategory::WordContainment
                } else {
                    PairCategory::NoOverlap
                }
            }
            // A record always carries at least one side.
            (None, None) => PairCategory::NoOverlap,
        }
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Record counts for one alignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentSummary {
    pub premise_keyphrases: usize,
    pub conclusion_keyphrases: usize,
    /// Total records, aligned and dangling
    pub records: usize,
    pub only_in_premise: usize,
    pub only_in_conclusion: usize,
    pub aligned: usize,
    pub perfect_match: usize,
    pub containment_only: usize,
    pub word_containment_only: usize,
    pub no_overlap: usize,
}

impl AlignmentSummary {
    pub fn from_alignment(alignment: &Alignment) -> Self {
        let mut summary = AlignmentSummary {
            premise_keyphrases: alignment.premise_count(),
            conclusion_keyphrases: alignment.conclusion_count(),
            records: alignment.len(),
            ..Default::default()
        };
        for pair in alignment {
            match PairCategory::of(pair) {
                PairCategory::PremiseOnly => summary.only_in_premise += 1,
                PairCategory::ConclusionOnly => summary.only_in_conclusion += 1,
                PairCategory::Exact => summary.perfect_match += 1,
                PairCategory::Containment => summary.containment_only += 1,
                PairCategory::WordContainment => summary.word_containment_only += 1,
                PairCategory::NoOverlap => summary.no_overlap += 1,
            }
            if pair.is_aligned() {
                summary.aligned += 1;
            }
        }
        summary
    }

    /// Premise-only records over premise keyphrases
    pub fn only_in_premise_ratio(&self) -> f64 {
        ratio(self.only_in_premise, self.premise_keyphrases)
    }

    /// Conclusion-only records over conclusion keyphrases
    pub fn only_in_conclusion_ratio(&self) -> f64 {
        ratio(self.only_in_conclusion, self.conclusion_keyphrases)
    }

    /// Aligned records over all records
    pub fn any_overlap_ratio(&self) -> f64 {
        ratio(self.aligned, self.records)
    }

    /// Perfect matches over all records
    pub fn perfect_match_ratio(&self) -> f64 {
        ratio(self.perfect_match, self.records)
    }

    pub fn perfect_match_premise_ratio(&self) -> f64 {
        ratio(self.perfect_match, self.premise_keyphrases)
    }

    pub fn perfect_match_conclusion_ratio(&self) -> f64 {
        ratio(self.perfect_match, self.conclusion_keyphrases)
    }

    /// Non-overlapping aligned pairs over all records
    pub fn no_overlap_ratio(&self) -> f64 {
        ratio(self.no_overlap, self.records)
    }

    pub fn no_overlap_premise_ratio(&self) -> f64 {
        ratio(self.no_overlap, self.premise_keyphrases)
    }

    pub fn no_overlap_conclusion_ratio(&self) -> f64 {
        ratio(self.no_overlap, self.conclusion_keyphrases)
    }
}

impl From<&Alignment> for AlignmentSummary {
    fn from(alignment: &Alignment) -> Self {
        Self::from_alignment(alignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{Keyphrase, MatchPass};
    use crate::types::KeySpan;

    fn keyphrase(index: usize, lemma: &str) -> Keyphrase {
        Keyphrase {
            index,
            span: KeySpan::single(index),
            text: lemma.to_string(),
            lemma: lemma.to_string(),
        }
    }

    fn aligned(premise: &str, conclusion: &str) -> KeywordPair {
        KeywordPair::aligned(keyphrase(0, premise), keyphrase(0, conclusion), MatchPass::AnyWord)
    }

    #[test]
    fn test_categories() {
        assert_eq!(PairCategory::of(&aligned("Paris", "paris")), PairCategory::Exact);
        assert_eq!(PairCategory::of(&aligned("apple", "apple pie")), PairCategory::Containment);
        assert_eq!(
            PairCategory::of(&aligned("red apple", "apple pie")),
            PairCategory::WordContainment
        );
        assert_eq!(PairCategory::of(&aligned("dog", "puppy")), PairCategory::NoOverlap);
        assert_eq!(
            PairCategory::of(&KeywordPair::premise_only(keyphrase(0, "dog"))),
            PairCategory::PremiseOnly
        );
        assert_eq!(
            PairCategory::of(&KeywordPair::conclusion_only(keyphrase(0, "ran"))),
            PairCategory::ConclusionOnly
        );
    }

    #[test]
    fn test_summary_counts() {
        let alignment = Alignment::new(
            vec![
                aligned("apple", "apple"),
                aligned("red apple", "apple pie"),
                aligned("dog", "puppy"),
                KeywordPair::premise_only(keyphrase(3, "cat")),
                KeywordPair::conclusion_only(keyphrase(3, "tree")),
            ],
            4,
            4,
        );
        let summary = AlignmentSummary::from_alignment(&alignment);
        assert_eq!(summary.records, 5);
        assert_eq!(summary.aligned, 3);
        assert_eq!(summary.perfect_match, 1);
        assert_eq!(summary.containment_only, 0);
        assert_eq!(summary.word_containment_only, 1);
        assert_eq!(summary.no_overlap, 1);
        assert_eq!(summary.only_in_premise, 1);
        assert_eq!(summary.only_in_conclusion, 1);

        assert!((summary.only_in_premise_ratio() - 0.25).abs() < 1e-12);
        assert!((summary.any_overlap_ratio() - 0.6).abs() < 1e-12);
        assert!((summary.perfect_match_ratio() - 0.2).abs() < 1e-12);
        assert!((summary.no_overlap_premise_ratio() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_alignment_has_zero_ratios() {
        let summary = AlignmentSummary::from(&Alignment::default());
        assert_eq!(summary, AlignmentSummary::default());
        assert_eq!(summary.only_in_premise_ratio(), 0.0);
        assert_eq!(summary.only_in_conclusion_ratio(), 0.0);
        assert_eq!(summary.any_overlap_ratio(), 0.0);
        assert_eq!(summary.perfect_match_ratio(), 0.0);
        assert_eq!(summary.perfect_match_premise_ratio(), 0.0);
        assert_eq!(summary.perfect_match_conclusion_ratio(), 0.0);
        assert_eq!(summary.no_overlap_ratio(), 0.0);
        assert_eq!(summary.no_overlap_conclusion_ratio(), 0.0);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = AlignmentSummary {
            records: 2,
            aligned: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["records"], 2);
        assert_eq!(json["aligned"], 1);
    }
}
