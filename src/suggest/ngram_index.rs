//! In-memory n-gram index with top-K similarity ranking.

use log::debug;
use rayon::prelude::*;

use crate::compression::PostingList;
use crate::error::{Result, SuggestError};
use crate::index::{Dictionary, DocId, InvertedLists, NGramGenerator};
use crate::suggest::{Candidate, Jaccard, Metric, Rank, SearchConfig, TopKHeap};

/// An inverted n-gram index built word by word, answering "the K most
/// similar words" queries.
///
/// Words receive ids 0, 1, 2, ... in insertion order. Once built the index
/// is read-only and can be queried from many threads.
///
/// # Example
///
/// ```
/// use ngram_suggest::suggest::NGramIndex;
///
/// # fn main() -> ngram_suggest::error::Result<()> {
/// let mut index = NGramIndex::new(3)?;
/// for word in ["tesla", "toyota", "mazda"] {
///     index.add_word(word)?;
/// }
///
/// assert_eq!(index.suggest("tesl", 1), vec!["tesla"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NGramIndex {
    generator: NGramGenerator,
    lists: InvertedLists,
    words: Vec<String>,
    cardinalities: Vec<u32>,
}

impl NGramIndex {
    /// Create an empty index over `k`-grams; `k` must lie in `[2, 4]`.
    pub fn new(k: usize) -> Result<Self> {
        Ok(Self::with_generator(NGramGenerator::new(k)?))
    }

    pub fn with_generator(generator: NGramGenerator) -> Self {
        NGramIndex {
            generator,
            lists: InvertedLists::new(),
            words: Vec::new(),
            cardinalities: Vec::new(),
        }
    }

    /// Build an index holding every word of `dictionary`.
    ///
    /// Dictionary ids must be consecutive from 0 so that they are preserved.
    pub fn from_dictionary(generator: NGramGenerator, dictionary: &dyn Dictionary) -> Result<Self> {
        let mut index = Self::with_generator(generator);
        for (id, word) in dictionary.iter() {
            let assigned = index.add_word(word)?;
            if assigned != id {
                return Err(SuggestError::index(format!(
                    "Dictionary id {id} is not consecutive, expected {assigned}"
                )));
            }
        }
        Ok(index)
    }

    /// Add a word and return its id.
    pub fn add_word(&mut self, word: &str) -> Result<DocId> {
        let id = DocId::try_from(self.words.len())
            .map_err(|_| SuggestError::index("Document id space exhausted"))?;

        let ngrams = self.generator.ngram_set(word);
        let cardinality = ngrams.len() as u32;
        for ngram in ngrams {
            self.lists.entry(ngram).or_default().push(id);
        }

        self.words.push(word.to_string());
        self.cardinalities.push(cardinality);
        Ok(id)
    }

    /// The `top_k` most similar words, best first.
    pub fn suggest(&self, query: &str, top_k: usize) -> Vec<String> {
        self.search(query, top_k)
            .into_iter()
            .map(|candidate| candidate.word)
            .collect()
    }

    /// Like [`NGramIndex::suggest`], returning ids and Jaccard distances
    /// as well.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<Candidate> {
        self.rank(query, top_k, 0.0, &Jaccard)
    }

    /// Search with the metric of `config`, dropping results less similar
    /// than `config.similarity`.
    pub fn search_with_config(&self, config: &SearchConfig) -> Vec<Candidate> {
        self.rank(&config.query, config.top_k, config.similarity, config.metric())
    }

    /// Answer independent queries in parallel.
    pub fn suggest_batch<S>(&self, queries: &[S], top_k: usize) -> Vec<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|query| self.suggest(query.as_ref(), top_k))
            .collect()
    }

    fn rank(
        &self,
        query: &str,
        top_k: usize,
        min_similarity: f64,
        metric: &dyn Metric,
    ) -> Vec<Candidate> {
        if top_k == 0 {
            return Vec::new();
        }

        let ngrams = self.generator.ngram_set(query);
        let len_a = ngrams.len();
        let lists: Vec<&PostingList> = ngrams
            .iter()
            .filter_map(|ngram| self.lists.get(ngram))
            .collect();

        let Some(max_id) = lists.iter().filter_map(|list| list.last()).max() else {
            return Vec::new();
        };

        let mut counts = vec![0u32; *max_id as usize + 1];
        for list in &lists {
            for &id in list.iter() {
                counts[id as usize] += 1;
            }
        }

        let mut heap = TopKHeap::new(top_k);
        for (id, &intersection) in counts.iter().enumerate() {
            if intersection == 0 {
                continue;
            }

            let len_b = self.cardinalities[id] as usize;
            if !metric.admits(min_similarity, len_a, len_b) {
                continue;
            }

            let similarity = metric.similarity(intersection as usize, len_a, len_b);
            if similarity < min_similarity {
                continue;
            }

            heap.push(Rank::new(id as DocId, 1.0 - similarity));
        }

        debug!(
            "Query {query:?}: {} terms, {} lists, {} results",
            len_a,
            lists.len(),
            heap.len()
        );

        heap.into_sorted_vec()
            .into_iter()
            .map(|rank| {
                Candidate::new(
                    rank.doc_id,
                    self.words[rank.doc_id as usize].clone(),
                    rank.distance,
                )
            })
            .collect()
    }

    pub fn generator(&self) -> &NGramGenerator {
        &self.generator
    }

    /// The posting list of every term.
    pub fn inverted_lists(&self) -> &InvertedLists {
        &self.lists
    }

    /// Word stored under `id`.
    pub fn word(&self, id: DocId) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    /// Number of distinct n-grams of the word stored under `id`.
    pub fn cardinality(&self, id: DocId) -> Option<usize> {
        self.cardinalities.get(id as usize).map(|&c| c as usize)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::InMemoryDictionary;
    use crate::suggest::MetricKind;

    fn cars() -> NGramIndex {
        let mut index = NGramIndex::new(3).unwrap();
        for word in ["tesla", "toyota", "mazda", "tesla model", "audi"] {
            index.add_word(word).unwrap();
        }
        index
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut index = NGramIndex::new(2).unwrap();

        assert_eq!(index.add_word("first").unwrap(), 0);
        assert_eq!(index.add_word("second").unwrap(), 1);
        assert_eq!(index.add_word("third").unwrap(), 2);
        assert_eq!(index.len(), 3);
        assert_eq!(index.word(1), Some("second"));
    }

    #[test]
    fn test_invalid_k() {
        assert!(NGramIndex::new(1).is_err());
        assert!(NGramIndex::new(5).is_err());
    }

    #[test]
    fn test_posting_lists_sorted() {
        let index = cars();

        assert_eq!(index.inverted_lists().get("$te"), Some(&vec![0, 3]));
        for list in index.inverted_lists().values() {
            assert!(list.windows(2).all(|pair| pair[0] < pair[1]));
        }
        assert_eq!(index.cardinality(0), Some(5));
    }

    #[test]
    fn test_suggest_best_first() {
        let index = cars();

        assert_eq!(index.suggest("tesla", 2), vec!["tesla", "tesla model"]);
        assert_eq!(index.suggest("mazda", 1), vec!["mazda"]);

        let results = index.search("tesla", 10);
        assert_eq!(results[0].distance, 0.0);
        assert!(results.windows(2).all(|pair| pair[0].distance <= pair[1].distance));
        assert!(results.iter().all(|c| (0.0..=1.0).contains(&c.distance)));
    }

    #[test]
    fn test_top_k_bounds() {
        let index = cars();

        assert!(index.suggest("tesla", 0).is_empty());
        assert!(index.suggest("tesla", 1).len() <= 1);
        assert!(index.suggest("xyz", 3).is_empty());
        assert!(index.suggest("", 3).len() <= 3);
    }

    #[test]
    fn test_tie_prefers_lower_id() {
        let mut index = NGramIndex::new(2).unwrap();
        index.add_word("abc").unwrap();
        index.add_word("abc").unwrap();

        let results = index.search("abc", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, 0);
    }

    #[test]
    fn test_search_with_config() {
        let index = cars();

        let config = SearchConfig::new("tesla", 10, 1.0).unwrap();
        let results = index.search_with_config(&config);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].word, "tesla");

        let config = SearchConfig::new("tesla", 10, 0.3).unwrap();
        let results = index.search_with_config(&config);
        assert!(results.iter().all(|c| c.similarity() >= 0.3));
        assert!(results.iter().any(|c| c.word == "tesla model"));
    }

    #[test]
    fn test_search_with_other_metrics() {
        let index = cars();

        for kind in [MetricKind::Dice, MetricKind::Cosine] {
            let config = SearchConfig::new("tesla", 3, 0.4).unwrap().with_metric(kind);
            let results = index.search_with_config(&config);

            assert_eq!(results[0].word, "tesla");
            assert_eq!(results[0].distance, 0.0);
            assert!(results.iter().all(|c| c.similarity() >= 0.4));
        }

        // "tesla model" shares 4 of its 11 trigrams with the 5 of "tesla".
        let dice = SearchConfig::new("tesla", 2, 0.1)
            .unwrap()
            .with_metric(MetricKind::Dice);
        let results = index.search_with_config(&dice);
        assert_eq!(results[1].word, "tesla model");
        assert!((results[1].similarity() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_suggest_batch() {
        let index = cars();
        let queries = ["tesla", "audi", "nothing"];

        let batch = index.suggest_batch(&queries, 1);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], vec!["tesla"]);
        assert_eq!(batch[1], vec!["audi"]);
        assert_eq!(batch[2], index.suggest("nothing", 1));
    }

    #[test]
    fn test_from_dictionary() {
        let dictionary: InMemoryDictionary =
            ["bmw", "audi"].into_iter().map(String::from).collect();
        let index = NGramIndex::from_dictionary(NGramGenerator::new(3).unwrap(), &dictionary).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.suggest("audi", 1), vec!["audi"]);
    }
}
