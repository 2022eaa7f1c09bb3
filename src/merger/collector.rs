//! Receivers of merge results.

use crate::error::Result;
use crate::merger::MergeCandidate;

/// Receives every candidate a merge reports.
///
/// Returning an error aborts the merge. Any closure taking a
/// [`MergeCandidate`] and returning `Result<()>` is a collector.
pub trait Collector {
    fn collect(&mut self, candidate: MergeCandidate) -> Result<()>;
}

impl<F> Collector for F
where
    F: FnMut(MergeCandidate) -> Result<()>,
{
    fn collect(&mut self, candidate: MergeCandidate) -> Result<()> {
        self(candidate)
    }
}

/// Collects candidates into a vector, in the order they were reported.
#[derive(Debug, Clone, Default)]
pub struct SimpleCollector {
    candidates: Vec<MergeCandidate>,
}

impl SimpleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[MergeCandidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<MergeCandidate> {
        self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl Collector for SimpleCollector {
    fn collect(&mut self, candidate: MergeCandidate) -> Result<()> {
        self.candidates.push(candidate);
        Ok(())
    }
}
