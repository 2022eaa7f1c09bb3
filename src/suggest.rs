//! Fuzzy word suggestion by n-gram set similarity.
//!
//! [`NGramIndex`] keeps the whole index in memory and ranks every word
//! sharing an n-gram with the query. Scores come from a [`Metric`],
//! Jaccard unless the [`SearchConfig`] picks another one. [`ThresholdSearcher`] works from an
//! index stored on disk and prunes with a minimum similarity before
//! scoring.

pub mod config;
pub mod metric;
pub mod ngram_index;
pub mod rank;
pub mod searcher;

pub use config::SearchConfig;
pub use metric::{Cosine, Dice, Jaccard, Metric, MetricKind};
pub use ngram_index::NGramIndex;
pub use rank::{Candidate, Rank, TopKHeap, jaccard_distance, jaccard_similarity};
pub use searcher::ThresholdSearcher;
