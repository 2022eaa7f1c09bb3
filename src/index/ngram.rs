//! N-gram extraction.

use ahash::AHashSet;

use crate::error::{Result, SuggestError};

/// Smallest supported n-gram size.
pub const MIN_NGRAM_SIZE: usize = 2;

/// Largest supported n-gram size.
pub const MAX_NGRAM_SIZE: usize = 4;

/// Padding placed on both sides of a word before it is split.
pub const DEFAULT_WRAP: &str = "$";

/// Splits words into their distinct n-grams.
///
/// The word is wrapped with the padding string on both sides so that its
/// first and last characters produce dedicated boundary terms, then cut
/// into overlapping windows of `k` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGramGenerator {
    k: usize,
    wrap: String,
}

impl NGramGenerator {
    /// Create a generator for `k`-grams with the default `$` padding.
    pub fn new(k: usize) -> Result<Self> {
        Self::with_wrap(k, DEFAULT_WRAP)
    }

    /// Create a generator with a custom padding string (may be empty).
    pub fn with_wrap<S: Into<String>>(k: usize, wrap: S) -> Result<Self> {
        if !(MIN_NGRAM_SIZE..=MAX_NGRAM_SIZE).contains(&k) {
            return Err(SuggestError::config(format!(
                "k should be in [{MIN_NGRAM_SIZE}, {MAX_NGRAM_SIZE}], got {k}"
            )));
        }

        Ok(NGramGenerator {
            k,
            wrap: wrap.into(),
        })
    }

    /// The n-gram size.
    pub fn k(&self) -> usize {
        self.k
    }

    /// The padding string.
    pub fn wrap(&self) -> &str {
        &self.wrap
    }

    /// Distinct n-grams of `word`, in order of first occurrence.
    ///
    /// A wrapped word shorter than `k` characters has no n-grams.
    pub fn ngram_set(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = self
            .wrap
            .chars()
            .chain(word.chars())
            .chain(self.wrap.chars())
            .collect();

        if chars.len() < self.k {
            return Vec::new();
        }

        let mut seen = AHashSet::with_capacity(chars.len());
        chars
            .windows(self.k)
            .map(|window| window.iter().collect::<String>())
            .filter(|ngram| seen.insert(ngram.clone()))
            .collect()
    }
}
