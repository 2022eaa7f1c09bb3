//! Set similarity metrics over n-gram sets.
//!
//! A metric scores a candidate of `b` distinct n-grams sharing `c` of them
//! with a query of `a` n-grams. Besides the score, every metric bounds the
//! candidates able to reach a similarity `s`: their size and the overlap
//! they need with the query. The on-disk searcher merges posting lists with
//! that overlap as threshold.

use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SuggestError};
use crate::suggest::jaccard_similarity;

/// Absorbs rounding in products such as `0.7 * 10` before ceil and floor.
const EPSILON: f64 = 1e-9;

fn ceil(value: f64) -> usize {
    (value - EPSILON).ceil().max(0.0) as usize
}

fn floor(value: f64) -> usize {
    (value + EPSILON).floor().max(0.0) as usize
}

/// A similarity measure between two sets given their sizes and overlap.
pub trait Metric: Send + Sync + Debug {
    /// Similarity in `[0, 1]` of sets of sizes `len_a` and `len_b` sharing
    /// `intersection` elements.
    fn similarity(&self, intersection: usize, len_a: usize, len_b: usize) -> f64;

    /// `1 - similarity`.
    fn distance(&self, intersection: usize, len_a: usize, len_b: usize) -> f64 {
        1.0 - self.similarity(intersection, len_a, len_b)
    }

    /// Smallest candidate size that can reach `similarity` against a query
    /// of `len_a` elements.
    fn min_candidate_size(&self, similarity: f64, len_a: usize) -> usize;

    /// Largest candidate size that can reach `similarity`.
    fn max_candidate_size(&self, similarity: f64, len_a: usize) -> usize;

    /// Overlap a candidate of size `len_b` needs to reach `similarity`.
    fn overlap_threshold(&self, similarity: f64, len_a: usize, len_b: usize) -> usize;

    /// Overlap every candidate needs to reach `similarity`, whatever its
    /// size. Never below 1.
    fn min_overlap(&self, similarity: f64, len_a: usize) -> usize;

    /// Whether a candidate of size `len_b` can reach `similarity` at all.
    fn admits(&self, similarity: f64, len_a: usize, len_b: usize) -> bool {
        similarity <= 0.0
            || (self.min_candidate_size(similarity, len_a)..=self.max_candidate_size(similarity, len_a))
                .contains(&len_b)
    }

    fn name(&self) -> &'static str;
}

/// `|A ∩ B| / |A ∪ B|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl Metric for Jaccard {
    fn similarity(&self, intersection: usize, len_a: usize, len_b: usize) -> f64 {
        jaccard_similarity(intersection, len_a, len_b)
    }

    fn min_candidate_size(&self, similarity: f64, len_a: usize) -> usize {
        ceil(similarity * len_a as f64)
    }

    fn max_candidate_size(&self, similarity: f64, len_a: usize) -> usize {
        if similarity <= 0.0 {
            return usize::MAX;
        }
        floor(len_a as f64 / similarity)
    }

    fn overlap_threshold(&self, similarity: f64, len_a: usize, len_b: usize) -> usize {
        ceil(similarity * (len_a + len_b) as f64 / (1.0 + similarity))
    }

    fn min_overlap(&self, similarity: f64, len_a: usize) -> usize {
        ceil(similarity * len_a as f64).max(1)
    }

    fn name(&self) -> &'static str {
        "jaccard"
    }
}

/// `2 |A ∩ B| / (|A| + |B|)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dice;

impl Metric for Dice {
    fn similarity(&self, intersection: usize, len_a: usize, len_b: usize) -> f64 {
        let total = len_a + len_b;
        if total == 0 {
            return 1.0;
        }
        2.0 * intersection as f64 / total as f64
    }

    fn min_candidate_size(&self, similarity: f64, len_a: usize) -> usize {
        ceil(similarity * len_a as f64 / (2.0 - similarity))
    }

    fn max_candidate_size(&self, similarity: f64, len_a: usize) -> usize {
        if similarity <= 0.0 {
            return usize::MAX;
        }
        floor((2.0 - similarity) * len_a as f64 / similarity)
    }

    fn overlap_threshold(&self, similarity: f64, len_a: usize, len_b: usize) -> usize {
        ceil(similarity * (len_a + len_b) as f64 / 2.0)
    }

    fn min_overlap(&self, similarity: f64, len_a: usize) -> usize {
        self.min_candidate_size(similarity, len_a).max(1)
    }

    fn name(&self) -> &'static str {
        "dice"
    }
}

/// `|A ∩ B| / sqrt(|A| |B|)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl Metric for Cosine {
    fn similarity(&self, intersection: usize, len_a: usize, len_b: usize) -> f64 {
        if len_a == 0 && len_b == 0 {
            return 1.0;
        }
        if len_a == 0 || len_b == 0 {
            return 0.0;
        }
        intersection as f64 / ((len_a * len_b) as f64).sqrt()
    }

    fn min_candidate_size(&self, similarity: f64, len_a: usize) -> usize {
        ceil(similarity * similarity * len_a as f64)
    }

    fn max_candidate_size(&self, similarity: f64, len_a: usize) -> usize {
        if similarity <= 0.0 {
            return usize::MAX;
        }
        floor(len_a as f64 / (similarity * similarity))
    }

    fn overlap_threshold(&self, similarity: f64, len_a: usize, len_b: usize) -> usize {
        ceil(similarity * ((len_a * len_b) as f64).sqrt())
    }

    fn min_overlap(&self, similarity: f64, len_a: usize) -> usize {
        self.min_candidate_size(similarity, len_a).max(1)
    }

    fn name(&self) -> &'static str {
        "cosine"
    }
}

/// Selection of a [`Metric`] in configs and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    #[default]
    Jaccard,
    Dice,
    Cosine,
}

impl MetricKind {
    pub fn metric(self) -> &'static dyn Metric {
        match self {
            MetricKind::Jaccard => &Jaccard,
            MetricKind::Dice => &Dice,
            MetricKind::Cosine => &Cosine,
        }
    }
}

impl FromStr for MetricKind {
    type Err = SuggestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "jaccard" => Ok(MetricKind::Jaccard),
            "dice" => Ok(MetricKind::Dice),
            "cosine" => Ok(MetricKind::Cosine),
            other => Err(SuggestError::config(format!("Unknown metric: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [MetricKind; 3] = [MetricKind::Jaccard, MetricKind::Dice, MetricKind::Cosine];

    #[test]
    fn test_similarities() {
        assert!((Jaccard.similarity(2, 4, 3) - 0.4).abs() < 1e-12);
        assert!((Dice.similarity(2, 4, 3) - 4.0 / 7.0).abs() < 1e-12);
        assert!((Cosine.similarity(2, 4, 4) - 0.5).abs() < 1e-12);

        for kind in KINDS {
            let metric = kind.metric();
            assert_eq!(metric.similarity(5, 5, 5), 1.0, "{}", metric.name());
            assert_eq!(metric.similarity(0, 3, 4), 0.0, "{}", metric.name());
            assert_eq!(metric.distance(5, 5, 5), 0.0, "{}", metric.name());
        }
    }

    #[test]
    fn test_jaccard_min_overlap() {
        assert_eq!(Jaccard.min_overlap(0.7, 10), 7);
        assert_eq!(Jaccard.min_overlap(0.5, 5), 3);
        assert_eq!(Jaccard.min_overlap(1.0, 4), 4);
        assert_eq!(Jaccard.min_overlap(0.01, 3), 1);
    }

    #[test]
    fn test_bounds_hold_for_every_qualifying_pair() {
        for kind in KINDS {
            let metric = kind.metric();
            for similarity in [0.1, 0.3, 0.5, 0.7, 0.9, 1.0] {
                for len_a in 1..15 {
                    for len_b in 1..30 {
                        for intersection in 0..=len_a.min(len_b) {
                            if metric.similarity(intersection, len_a, len_b) < similarity {
                                continue;
                            }

                            let context = format!(
                                "{} s={similarity} a={len_a} b={len_b} c={intersection}",
                                metric.name()
                            );
                            assert!(metric.admits(similarity, len_a, len_b), "{context}");
                            assert!(
                                intersection >= metric.min_overlap(similarity, len_a),
                                "{context}"
                            );
                            assert!(
                                intersection >= metric.overlap_threshold(similarity, len_a, len_b),
                                "{context}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("dice".parse::<MetricKind>().unwrap(), MetricKind::Dice);
        assert!("hamming".parse::<MetricKind>().is_err());
        assert_eq!(MetricKind::default().metric().name(), "jaccard");

        let kind: MetricKind = serde_json::from_str(r#""cosine""#).unwrap();
        assert_eq!(kind, MetricKind::Cosine);
    }
}
