use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;

use crate::error::Result;
use crate::merger::{Collector, ListMerger, MergeCandidate, Rid};

/// Threshold merge that seeds candidates from the shortest lists and probes
/// the rest.
///
/// An id in at least `t` of `n` lists must occur in one of any `n - t + 1`
/// of them. Those lists, the shortest ones, are merged with a heap to build
/// the candidate set. Each remaining list is then probed once per candidate
/// with `lower_bound`, dropping candidates that can no longer reach `t`.
/// Survivors are reported only after every list has been consulted, so the
/// reported overlaps are exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpMerge;

impl ListMerger for CpMerge {
    fn merge(&self, mut rid: Rid<'_>, threshold: usize, collector: &mut dyn Collector) -> Result<()> {
        let threshold = threshold.max(1);
        let n = rid.len();
        if n == 0 || n < threshold {
            return Ok(());
        }

        rid.sort_by_len();
        let lists = rid.lists_mut();
        let seeds = n - threshold + 1;

        let mut heap = BinaryHeap::with_capacity(seeds);
        for (index, list) in lists[..seeds].iter_mut().enumerate() {
            if let Some(position) = list.current()? {
                heap.push(Reverse((position, index)));
            }
        }

        let mut candidates: Vec<MergeCandidate> = Vec::new();
        while let Some(Reverse((position, index))) = heap.pop() {
            match candidates.last_mut() {
                Some(last) if last.position() == position => last.increment(),
                _ => candidates.push(MergeCandidate::new(position, 1)),
            }

            if let Some(next) = lists[index].advance()? {
                heap.push(Reverse((next, index)));
            }
        }
        let seeded = candidates.len();

        for (probed, list) in lists[seeds..].iter_mut().enumerate() {
            if candidates.is_empty() {
                break;
            }

            // Lists left after this one.
            let remaining = n - seeds - probed - 1;
            let mut survivors = Vec::with_capacity(candidates.len());

            for mut candidate in candidates {
                if list.lower_bound(candidate.position())? == Some(candidate.position()) {
                    candidate.increment();
                }
                if candidate.overlap() as usize + remaining >= threshold {
                    survivors.push(candidate);
                }
            }

            candidates = survivors;
        }

        debug!(
            "CPMerge over {n} lists: {seeded} seeded, {} reported with threshold {threshold}",
            candidates.len()
        );

        for candidate in candidates {
            if candidate.overlap() as usize >= threshold {
                collector.collect(candidate)?;
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "cp_merge"
    }
}
