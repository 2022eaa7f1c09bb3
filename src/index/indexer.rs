//! Builds inverted lists from a dictionary.

use std::time::Instant;

use log::{debug, info};

use crate::error::{Result, SuggestError};
use crate::index::{Dictionary, DocId, InvertedLists, NGramGenerator};

/// Scans a [`Dictionary`] and collects the posting list of every n-gram.
#[derive(Debug, Clone)]
pub struct Indexer {
    generator: NGramGenerator,
}

impl Indexer {
    /// Create an indexer using the given n-gram generator.
    pub fn new(generator: NGramGenerator) -> Self {
        Indexer { generator }
    }

    /// The generator used for every word.
    pub fn generator(&self) -> &NGramGenerator {
        &self.generator
    }

    /// Build the inverted lists of `dictionary`.
    ///
    /// Ids must arrive in strictly ascending order, which keeps every posting
    /// list sorted without a final sort.
    pub fn index(&self, dictionary: &dyn Dictionary) -> Result<InvertedLists> {
        let start = Instant::now();
        let mut lists = InvertedLists::new();
        let mut last: Option<DocId> = None;

        for (id, word) in dictionary.iter() {
            if last.is_some_and(|last| id <= last) {
                return Err(SuggestError::index(format!(
                    "Document id {id} does not follow {}",
                    last.unwrap_or_default()
                )));
            }
            last = Some(id);

            for ngram in self.generator.ngram_set(word) {
                lists.entry(ngram).or_default().push(id);
            }
        }

        info!(
            "Indexed {} words into {} terms in {:?}",
            dictionary.len(),
            lists.len(),
            start.elapsed()
        );
        debug!(
            "Average posting list length: {:.2}",
            lists.values().map(Vec::len).sum::<usize>() as f64 / lists.len().max(1) as f64
        );

        Ok(lists)
    }
}
