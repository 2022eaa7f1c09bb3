//! Threshold-occurrence merging of sorted posting lists.
//!
//! Given the posting lists of a query (a [`Rid`]) and a threshold `t`, a
//! merge reports every id occurring in at least `t` lists together with the
//! number of lists it occurs in.
//!
//! [`OptimizedMerger`] picks a plan from the list count alone:
//!
//! - fewer lists than `t`: nothing can qualify, the merge is skipped;
//! - exactly `t` lists: a plain intersection ([`Intersector`]);
//! - otherwise: the configured [`MergerKind`] strategy.
//!
//! # Example
//!
//! ```
//! use ngram_suggest::merger::{ListMerger, OptimizedMerger, Rid, SimpleCollector};
//!
//! # fn main() -> ngram_suggest::error::Result<()> {
//! let lists = vec![vec![1, 2, 3], vec![2, 3, 4], vec![3, 4, 5]];
//! let mut collector = SimpleCollector::new();
//!
//! OptimizedMerger::default().merge(Rid::from_lists(&lists), 2, &mut collector)?;
//!
//! let found: Vec<(u32, u32)> = collector
//!     .candidates()
//!     .iter()
//!     .map(|c| (c.position(), c.overlap()))
//!     .collect();
//! assert_eq!(found, vec![(2, 2), (3, 3), (4, 2)]);
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod candidate;
pub mod collector;
pub mod cp_merge;
pub mod intersect;
pub mod iterator;
pub mod scan_count;

pub use candidate::MergeCandidate;
pub use collector::{Collector, SimpleCollector};
pub use cp_merge::CpMerge;
pub use intersect::Intersector;
pub use iterator::{ListIterator, Rid, SliceIterator};
pub use scan_count::ScanCount;

/// A strategy solving the threshold-occurrence problem.
pub trait ListMerger: Send + Sync + Debug {
    /// Report every id present in at least `threshold` lists of `rid`.
    ///
    /// A threshold of 0 is treated as 1. Errors from the iterators or the
    /// collector abort the merge. Every strategy finishes reading the lists
    /// before reporting, so an iterator error leaves the collector untouched.
    fn merge(&self, rid: Rid<'_>, threshold: usize, collector: &mut dyn Collector) -> Result<()>;

    /// Name of the strategy, used in log output.
    fn name(&self) -> &'static str;
}

/// Selection of the generic threshold strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergerKind {
    #[default]
    CpMerge,
    ScanCount,
}

impl MergerKind {
    pub fn merger(self) -> &'static dyn ListMerger {
        match self {
            MergerKind::CpMerge => &CpMerge,
            MergerKind::ScanCount => &ScanCount,
        }
    }
}

/// How a merge will be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePlan {
    /// No id can reach the threshold.
    Skip,
    /// Every list must contain the id.
    Intersect,
    /// General threshold merge.
    Threshold,
}

impl MergePlan {
    /// Choose a plan for `lists` lists and the given threshold.
    pub fn choose(lists: usize, threshold: usize) -> Self {
        let threshold = threshold.max(1);
        if lists == 0 || lists < threshold {
            MergePlan::Skip
        } else if lists == threshold {
            MergePlan::Intersect
        } else {
            MergePlan::Threshold
        }
    }
}

/// Dispatches a merge to the cheapest applicable algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizedMerger {
    kind: MergerKind,
}

impl OptimizedMerger {
    pub fn new(kind: MergerKind) -> Self {
        OptimizedMerger { kind }
    }

    pub fn kind(&self) -> MergerKind {
        self.kind
    }
}

impl ListMerger for OptimizedMerger {
    fn merge(&self, rid: Rid<'_>, threshold: usize, collector: &mut dyn Collector) -> Result<()> {
        let plan = MergePlan::choose(rid.len(), threshold);
        debug!(
            "Merging {} lists with threshold {threshold}: {plan:?}",
            rid.len()
        );

        match plan {
            MergePlan::Skip => Ok(()),
            MergePlan::Intersect => Intersector.intersect(rid, collector),
            MergePlan::Threshold => self.kind.merger().merge(rid, threshold, collector),
        }
    }

    fn name(&self) -> &'static str {
        "optimized"
    }
}
