//! Similarity scoring and bounded top-K selection.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::index::DocId;

/// Jaccard similarity `|A ∩ B| / |A ∪ B|` of two sets given their sizes and
/// the size of their intersection.
///
/// Two empty sets are identical and have similarity 1.
pub fn jaccard_similarity(intersection: usize, len_a: usize, len_b: usize) -> f64 {
    let union = (len_a + len_b).saturating_sub(intersection);
    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}

/// Jaccard distance, `1 - similarity`.
pub fn jaccard_distance(intersection: usize, len_a: usize, len_b: usize) -> f64 {
    1.0 - jaccard_similarity(intersection, len_a, len_b)
}

/// A scored dictionary entry.
///
/// Ranks order from best to worst: smaller distance first, then lower id.
#[derive(Debug, Clone, Copy)]
pub struct Rank {
    pub doc_id: DocId,
    pub distance: f64,
}

impl Rank {
    pub fn new(doc_id: DocId, distance: f64) -> Self {
        Rank { doc_id, distance }
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Keeps the `k` best ranks seen so far.
///
/// The heap is a max-heap over [`Rank`], so its top is the worst rank kept
/// and can be evicted in `O(log k)`.
#[derive(Debug, Clone)]
pub struct TopKHeap {
    k: usize,
    heap: BinaryHeap<Rank>,
}

impl TopKHeap {
    pub fn new(k: usize) -> Self {
        TopKHeap {
            k,
            heap: BinaryHeap::with_capacity(k.min(1024)),
        }
    }

    /// Offer a rank; returns whether it was kept.
    ///
    /// Once full, a rank is kept only if it strictly beats the worst one.
    pub fn push(&mut self, rank: Rank) -> bool {
        if self.k == 0 {
            return false;
        }

        if self.heap.len() < self.k {
            self.heap.push(rank);
            return true;
        }

        match self.heap.peek() {
            Some(worst) if rank < *worst => {
                self.heap.pop();
                self.heap.push(rank);
                true
            }
            _ => false,
        }
    }

    /// The worst rank kept.
    pub fn worst(&self) -> Option<&Rank> {
        self.heap.peek()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Kept ranks, best first.
    pub fn into_sorted_vec(self) -> Vec<Rank> {
        self.heap.into_sorted_vec()
    }
}

/// A search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Id of the matched dictionary entry.
    pub doc_id: DocId,
    /// The matched word.
    pub word: String,
    /// Distance to the query under the search metric, in `[0, 1]`.
    pub distance: f64,
}

impl Candidate {
    pub fn new(doc_id: DocId, word: String, distance: f64) -> Self {
        Candidate {
            doc_id,
            word,
            distance,
        }
    }

    /// Similarity to the query, `1 - distance`.
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}
