//! # ngram-suggest
//!
//! Fuzzy string matching over a dictionary of words, using character
//! n-grams and set similarity (Jaccard by default, Dice or cosine).
//!
//! ## Features
//!
//! - In-memory n-gram index with top-K ranking ([`suggest::NGramIndex`])
//! - Threshold-occurrence merging of posting lists ([`merger`])
//! - Fixed-width and delta-varint posting list codecs ([`compression`])
//! - On-disk index format with checksummed header ([`index::on_disk`])
//! - Pluggable file and memory storage backends ([`storage`])
//!
//! ## Example
//!
//! ```
//! use ngram_suggest::suggest::NGramIndex;
//!
//! # fn main() -> ngram_suggest::error::Result<()> {
//! let mut index = NGramIndex::new(3)?;
//! for word in ["mercedes", "mazda", "maserati"] {
//!     index.add_word(word)?;
//! }
//!
//! let suggestions = index.suggest("mercedez", 2);
//! assert_eq!(suggestions[0], "mercedes");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compression;
pub mod config;
pub mod error;
pub mod index;
pub mod merger;
pub mod storage;
pub mod suggest;
pub mod util;

pub mod prelude {
    pub use crate::compression::Codec;
    pub use crate::error::{Result, SuggestError};
    pub use crate::index::{Dictionary, InMemoryDictionary, Indexer, NGramGenerator};
    pub use crate::index::{OnDiskReader, OnDiskWriter};
    pub use crate::merger::{ListMerger, MergerKind, OptimizedMerger, Rid};
    pub use crate::suggest::{Candidate, MetricKind, NGramIndex, SearchConfig, ThresholdSearcher};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize `env_logger` from the `RUST_LOG` environment variable.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_logger() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = env_logger::try_init();
        log::debug!("ngram-suggest {VERSION} logging initialized");
    });
}
