//! Dictionary of indexed words.

use std::io::{BufRead, BufReader, Write};

use crate::error::{Result, SuggestError};
use crate::index::DocId;
use crate::storage::Storage;

/// Source of the words an index is built from.
///
/// During a build the dictionary is scanned once through [`Dictionary::iter`];
/// afterwards it serves random lookups of a word by its [`DocId`].
pub trait Dictionary: Send + Sync + std::fmt::Debug {
    /// Look up the word stored under `id`.
    fn get(&self, id: DocId) -> Result<Option<String>>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the dictionary has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(id, word)` pairs in ascending id order.
    fn iter(&self) -> Box<dyn Iterator<Item = (DocId, &str)> + '_>;
}

/// A dictionary held in memory; the word at index `i` has id `i`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDictionary {
    words: Vec<String>,
}

impl InMemoryDictionary {
    /// Create a dictionary from words in id order.
    pub fn new(words: Vec<String>) -> Self {
        InMemoryDictionary { words }
    }

    /// All words in id order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Load a dictionary stored with one word per line.
    ///
    /// Empty lines are kept so that ids stay aligned with line numbers.
    pub fn load(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage.open_input(name)?;
        let words = BufReader::new(input)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;

        Ok(InMemoryDictionary { words })
    }

    /// Save the dictionary with one word per line.
    pub fn save(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let mut output = storage.create_output(name)?;

        for word in &self.words {
            if word.contains('\n') {
                return Err(SuggestError::index(format!(
                    "Word {word:?} contains a line break and cannot be stored"
                )));
            }

            output.write_all(word.as_bytes())?;
            output.write_all(b"\n")?;
        }

        output.close()
    }
}

impl FromIterator<String> for InMemoryDictionary {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        InMemoryDictionary::new(iter.into_iter().collect())
    }
}

impl Dictionary for InMemoryDictionary {
    fn get(&self, id: DocId) -> Result<Option<String>> {
        Ok(self.words.get(id as usize).cloned())
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (DocId, &str)> + '_> {
        Box::new(
            self.words
                .iter()
                .enumerate()
                .map(|(id, word)| (id as DocId, word.as_str())),
        )
    }
}
