//! Similarity search over an index stored on disk.

use std::sync::Arc;

use log::debug;

use crate::error::{Result, SuggestError};
use crate::index::{Dictionary, DocId, NGramGenerator, OnDiskReader};
use crate::merger::{ListIterator, ListMerger, MergeCandidate, OptimizedMerger, Rid};
use crate::suggest::{Candidate, Jaccard, Metric, Rank, SearchConfig, TopKHeap};

/// Answers [`SearchConfig`] queries against an [`OnDiskReader`].
///
/// A word reaching similarity `s` to a query of `n` distinct n-grams shares
/// at least [`Metric::min_overlap`] n-grams with it, `ceil(s * n)` under
/// Jaccard. The searcher merges the query's posting lists with that
/// threshold and scores only the merge survivors, looking their words up in
/// the dictionary.
#[derive(Debug)]
pub struct ThresholdSearcher {
    reader: Arc<OnDiskReader>,
    dictionary: Arc<dyn Dictionary>,
    generator: NGramGenerator,
    merger: OptimizedMerger,
}

impl ThresholdSearcher {
    pub fn new(
        reader: Arc<OnDiskReader>,
        dictionary: Arc<dyn Dictionary>,
        generator: NGramGenerator,
        merger: OptimizedMerger,
    ) -> Self {
        ThresholdSearcher {
            reader,
            dictionary,
            generator,
            merger,
        }
    }

    /// Minimum overlap a word needs to reach Jaccard `similarity` against a
    /// query of `query_len` n-grams.
    pub fn overlap_threshold(similarity: f64, query_len: usize) -> usize {
        Jaccard.min_overlap(similarity, query_len)
    }

    /// The `config.top_k` best words with similarity at least
    /// `config.similarity`, best first.
    pub fn search(&self, config: &SearchConfig) -> Result<Vec<Candidate>> {
        config.validate()?;
        if config.top_k == 0 {
            return Ok(Vec::new());
        }

        let ngrams = self.generator.ngram_set(&config.query);
        let len_a = ngrams.len();
        if len_a == 0 {
            return Ok(Vec::new());
        }

        let rid: Rid<'_> = ngrams
            .iter()
            .filter_map(|ngram| self.reader.iterator(ngram))
            .map(|iter| Box::new(iter) as Box<dyn ListIterator + '_>)
            .collect();
        let metric = config.metric();
        let threshold = metric.min_overlap(config.similarity, len_a);

        debug!(
            "Query {:?}: {} of {} terms indexed, {} overlap threshold {}",
            config.query,
            rid.len(),
            len_a,
            metric.name(),
            threshold
        );

        let mut heap = TopKHeap::new(config.top_k);
        let mut collector = |candidate: MergeCandidate| -> Result<()> {
            let word = self.word(candidate.position())?;
            let len_b = self.generator.ngram_set(&word).len();
            if !metric.admits(config.similarity, len_a, len_b) {
                return Ok(());
            }

            let similarity = metric.similarity(candidate.overlap() as usize, len_a, len_b);
            if similarity >= config.similarity {
                heap.push(Rank::new(candidate.position(), 1.0 - similarity));
            }
            Ok(())
        };
        self.merger.merge(rid, threshold, &mut collector)?;

        heap.into_sorted_vec()
            .into_iter()
            .map(|rank| {
                let word = self.word(rank.doc_id)?;
                Ok(Candidate::new(rank.doc_id, word, rank.distance))
            })
            .collect()
    }

    fn word(&self, id: DocId) -> Result<String> {
        self.dictionary
            .get(id)?
            .ok_or_else(|| SuggestError::index(format!("Document id {id} is not in the dictionary")))
    }

    pub fn reader(&self) -> &OnDiskReader {
        &self.reader
    }

    pub fn dictionary(&self) -> &dyn Dictionary {
        self.dictionary.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::Codec;
    use crate::index::{InMemoryDictionary, Indexer, OnDiskWriter};
    use crate::merger::MergerKind;
    use crate::storage::memory::MemoryStorage;
    use crate::suggest::{MetricKind, NGramIndex};

    const WORDS: [&str; 6] = ["tesla", "toyota", "mazda", "tesla model", "audi", "teslas"];

    fn searcher(kind: MergerKind) -> ThresholdSearcher {
        let storage = Arc::new(MemoryStorage::new_default());
        let dictionary: InMemoryDictionary = WORDS.into_iter().map(String::from).collect();
        let generator = NGramGenerator::new(3).unwrap();

        let lists = Indexer::new(generator.clone()).index(&dictionary).unwrap();
        OnDiskWriter::new(storage.clone(), Codec::DeltaVarint, "cars")
            .save(&lists)
            .unwrap();
        let reader = OnDiskReader::open(storage, Codec::DeltaVarint, "cars").unwrap();

        ThresholdSearcher::new(
            Arc::new(reader),
            Arc::new(dictionary),
            generator,
            OptimizedMerger::new(kind),
        )
    }

    #[test]
    fn test_overlap_threshold() {
        assert_eq!(ThresholdSearcher::overlap_threshold(0.7, 10), 7);
        assert_eq!(ThresholdSearcher::overlap_threshold(0.5, 5), 3);
        assert_eq!(ThresholdSearcher::overlap_threshold(1.0, 4), 4);
        assert_eq!(ThresholdSearcher::overlap_threshold(0.01, 3), 1);
    }

    #[test]
    fn test_exact_match() {
        let searcher = searcher(MergerKind::CpMerge);
        let config = SearchConfig::new("tesla", 10, 1.0).unwrap();

        let results = searcher.search(&config).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].word, "tesla");
        assert_eq!(results[0].doc_id, 0);
    }

    #[test]
    fn test_matches_in_memory_ranking() {
        let mut index = NGramIndex::new(3).unwrap();
        for word in WORDS {
            index.add_word(word).unwrap();
        }

        for kind in [MergerKind::CpMerge, MergerKind::ScanCount] {
            let searcher = searcher(kind);
            for (query, similarity) in [("tesla", 0.3), ("teslas", 0.5), ("mazd", 0.2)] {
                let config = SearchConfig::new(query, 3, similarity).unwrap();
                assert_eq!(
                    searcher.search(&config).unwrap(),
                    index.search_with_config(&config),
                    "query {query}"
                );
            }
        }
    }

    #[test]
    fn test_other_metrics_match_in_memory_ranking() {
        let mut index = NGramIndex::new(3).unwrap();
        for word in WORDS {
            index.add_word(word).unwrap();
        }
        let searcher = searcher(MergerKind::CpMerge);

        for kind in [MetricKind::Dice, MetricKind::Cosine] {
            for (query, similarity) in [("tesla", 0.3), ("teslas", 0.6), ("tesl", 0.5)] {
                let config = SearchConfig::new(query, 4, similarity).unwrap().with_metric(kind);
                let results = searcher.search(&config).unwrap();

                assert!(!results.is_empty(), "query {query} with {kind:?}");
                assert_eq!(results, index.search_with_config(&config), "query {query} with {kind:?}");
            }
        }
    }

    #[test]
    fn test_no_match() {
        let searcher = searcher(MergerKind::CpMerge);

        let config = SearchConfig::new("zzz", 5, 0.1).unwrap();
        assert!(searcher.search(&config).unwrap().is_empty());

        let config = SearchConfig::new("tesla", 0, 0.1).unwrap();
        assert!(searcher.search(&config).unwrap().is_empty());
    }
}
