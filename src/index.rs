//! Inverted n-gram index construction and persistence.
//!
//! A dictionary of words is turned into [`InvertedLists`]: every n-gram term
//! maps to the ascending list of document ids whose word contains it. The
//! lists can be persisted with [`on_disk::OnDiskWriter`] and reopened with
//! [`on_disk::OnDiskReader`].

use ahash::AHashMap;

use crate::compression::{Position, PostingList};

pub mod dictionary;
pub mod indexer;
pub mod ngram;
pub mod on_disk;

pub use dictionary::{Dictionary, InMemoryDictionary};
pub use indexer::Indexer;
pub use ngram::NGramGenerator;
pub use on_disk::{OnDiskListIterator, OnDiskReader, OnDiskWriter};

/// Identifier of a dictionary entry, assigned sequentially from 0.
pub type DocId = Position;

/// Mapping from n-gram term to its posting list.
pub type InvertedLists = AHashMap<String, PostingList>;
