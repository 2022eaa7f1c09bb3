//! Shared utility modules used across ngram-suggest components.

pub mod varint;
