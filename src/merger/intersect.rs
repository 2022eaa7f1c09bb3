use log::debug;

use crate::error::Result;
use crate::merger::{Collector, MergeCandidate, Rid};

/// Reports the ids present in every list of a rid.
///
/// The shortest list drives the walk; the others are advanced with
/// `lower_bound` to the current target, which jumps forward whenever a list
/// overshoots it. Matches are handed to the collector once the walk is
/// complete, so an iterator error reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intersector;

impl Intersector {
    pub fn intersect(&self, mut rid: Rid<'_>, collector: &mut dyn Collector) -> Result<()> {
        if rid.is_empty() {
            return Ok(());
        }

        rid.sort_by_len();
        let lists = rid.lists_mut();
        let overlap = lists.len() as u32;
        let mut matches = Vec::with_capacity(lists[0].len());

        let Some(mut target) = lists[0].current()? else {
            return Ok(());
        };

        'walk: loop {
            for list in lists.iter_mut() {
                match list.lower_bound(target)? {
                    None => break 'walk,
                    Some(position) if position > target => {
                        target = position;
                        continue 'walk;
                    }
                    Some(_) => {}
                }
            }

            matches.push(target);

            match lists[0].advance()? {
                Some(next) => target = next,
                None => break,
            }
        }

        debug!("Intersected {overlap} lists into {} ids", matches.len());
        for position in matches {
            collector.collect(MergeCandidate::new(position, overlap))?;
        }
        Ok(())
    }
}
