//! Forward-only iterators over sorted posting lists.

use std::fmt::Debug;

use crate::compression::{Position, PostingList};
use crate::error::Result;

/// A cursor over one ascending posting list.
///
/// The cursor only moves forward. Once it runs past the last element every
/// method returns `Ok(None)`.
pub trait ListIterator: Debug {
    /// Total number of elements in the list, independent of the cursor.
    fn len(&self) -> usize;

    /// Whether the list has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element under the cursor.
    fn current(&mut self) -> Result<Option<Position>>;

    /// Move to the next element and return it.
    fn advance(&mut self) -> Result<Option<Position>>;

    /// Move to the first element `>= target` and return it.
    ///
    /// A target behind the cursor leaves the cursor where it is.
    fn lower_bound(&mut self, target: Position) -> Result<Option<Position>>;
}

impl<T: ListIterator + ?Sized> ListIterator for Box<T> {
    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn current(&mut self) -> Result<Option<Position>> {
        self.as_mut().current()
    }

    fn advance(&mut self) -> Result<Option<Position>> {
        self.as_mut().advance()
    }

    fn lower_bound(&mut self, target: Position) -> Result<Option<Position>> {
        self.as_mut().lower_bound(target)
    }
}

/// Iterator over a borrowed in-memory list.
#[derive(Debug, Clone)]
pub struct SliceIterator<'a> {
    list: &'a [Position],
    index: usize,
}

impl<'a> SliceIterator<'a> {
    pub fn new(list: &'a [Position]) -> Self {
        SliceIterator { list, index: 0 }
    }
}

impl ListIterator for SliceIterator<'_> {
    fn len(&self) -> usize {
        self.list.len()
    }

    fn current(&mut self) -> Result<Option<Position>> {
        Ok(self.list.get(self.index).copied())
    }

    fn advance(&mut self) -> Result<Option<Position>> {
        if self.index < self.list.len() {
            self.index += 1;
        }
        self.current()
    }

    fn lower_bound(&mut self, target: Position) -> Result<Option<Position>> {
        if self.index < self.list.len() {
            self.index += self.list[self.index..].partition_point(|&position| position < target);
        }
        self.current()
    }
}

/// The list iterators taking part in one merge.
#[derive(Debug, Default)]
pub struct Rid<'a> {
    lists: Vec<Box<dyn ListIterator + 'a>>,
}

impl<'a> Rid<'a> {
    pub fn new() -> Self {
        Rid { lists: Vec::new() }
    }

    /// Build a rid over borrowed in-memory lists.
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a PostingList>,
    {
        lists
            .into_iter()
            .map(|list| Box::new(SliceIterator::new(list)) as Box<dyn ListIterator + 'a>)
            .collect()
    }

    pub fn push<L: ListIterator + 'a>(&mut self, list: L) {
        self.lists.push(Box::new(list));
    }

    /// Number of lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Order the lists by ascending length.
    pub fn sort_by_len(&mut self) {
        self.lists.sort_by_key(|list| list.len());
    }

    /// Length of every list, in current order.
    pub fn lens(&self) -> Vec<usize> {
        self.lists.iter().map(|list| list.len()).collect()
    }

    pub fn lists_mut(&mut self) -> &mut [Box<dyn ListIterator + 'a>] {
        &mut self.lists
    }
}

impl<'a> FromIterator<Box<dyn ListIterator + 'a>> for Rid<'a> {
    fn from_iter<I: IntoIterator<Item = Box<dyn ListIterator + 'a>>>(iter: I) -> Self {
        Rid {
            lists: iter.into_iter().collect(),
        }
    }
}
