use ahash::AHashMap;
use log::debug;

use crate::compression::Position;
use crate::error::Result;
use crate::merger::{Collector, ListMerger, MergeCandidate, Rid};

/// Counts every id of every list, then reports those seen at least
/// `threshold` times in ascending id order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanCount;

impl ListMerger for ScanCount {
    fn merge(&self, mut rid: Rid<'_>, threshold: usize, collector: &mut dyn Collector) -> Result<()> {
        let threshold = threshold.max(1);
        if rid.len() < threshold {
            return Ok(());
        }

        let mut counts: AHashMap<Position, u32> = AHashMap::new();
        for list in rid.lists_mut() {
            let mut current = list.current()?;
            while let Some(position) = current {
                *counts.entry(position).or_insert(0) += 1;
                current = list.advance()?;
            }
        }

        let mut candidates: Vec<MergeCandidate> = counts
            .into_iter()
            .filter(|&(_, count)| count as usize >= threshold)
            .map(|(position, count)| MergeCandidate::new(position, count))
            .collect();
        candidates.sort_unstable();

        debug!(
            "Scan count over {} lists found {} ids with threshold {threshold}",
            rid.len(),
            candidates.len()
        );

        for candidate in candidates {
            collector.collect(candidate)?;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "scan_count"
    }
}
