//! Comparator-based ordered collections.
//!
//! Every aggregate in the domain (tags, statements, attached policies,
//! project members) keeps its elements in an [`OrderedList`]: an
//! insertion-ordered sequence whose notion of equality comes from a
//! caller-supplied comparator rather than `PartialEq`. This keeps listing
//! deterministic while letting each aggregate decide what "the same
//! element" means (a tag by key, a policy by identifier, and so on).

use std::cmp::Ordering;

use thiserror::Error;

/// Three-way comparison used by [`OrderedList`] for equality and ordering.
///
/// Must return `Ordering::Equal` exactly when the two elements are the same
/// element from the owning aggregate's point of view.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Errors from positional list operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// An insertion-ordered sequence with comparator-based lookup.
///
/// Duplicates are allowed; uniqueness, where an aggregate wants it, is
/// enforced by the caller with [`OrderedList::contains`] before appending.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList<T> {
    items: Vec<T>,
    comparator: Comparator<T>,
}

impl<T> OrderedList<T> {
    /// Create an empty list with the given comparator.
    pub fn new(comparator: Comparator<T>) -> Self {
        Self {
            items: Vec::new(),
            comparator,
        }
    }

    /// Create a list seeded with `items`, preserving their order.
    pub fn with_items(comparator: Comparator<T>, items: Vec<T>) -> Self {
        Self { items, comparator }
    }

    /// Append an item at the end of the list. Duplicates are not checked.
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the first element equal to `item` under the comparator.
    ///
    /// Returns `true` if an element was removed, `false` if none matched.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.position(item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every element equal to `item`, preserving the relative order
    /// of the survivors. Returns how many elements were removed.
    pub fn remove_all(&mut self, item: &T) -> usize {
        let before = self.items.len();
        let comparator = self.comparator;
        self.items.retain(|elem| comparator(elem, item) != Ordering::Equal);
        before - self.items.len()
    }

    /// Remove and return the element at `index`.
    pub fn remove_index(&mut self, index: usize) -> Result<T, CollectionError> {
        if index >= self.items.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Position of the first element equal to `item`, if any.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|elem| (self.comparator)(elem, item) == Ordering::Equal)
    }

    /// First element equal to `item` together with its position.
    pub fn find(&self, item: &T) -> Option<(usize, &T)> {
        self.position(item).map(|index| (index, &self.items[index]))
    }

    /// Whether any element is equal to `item` under the comparator.
    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Sort the list in place into comparator order. The sort is stable.
    pub fn sort(&mut self) {
        let comparator = self.comparator;
        self.items.sort_by(|a, b| comparator(a, b));
    }

    /// First element satisfying `predicate`, without mutating the list.
    pub fn select_one<F>(&self, predicate: F) -> Option<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }

    /// Every element satisfying `predicate`, in original order.
    pub fn select_all<F>(&self, predicate: F) -> Vec<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the elements in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Clone> OrderedList<T> {
    /// Snapshot copy of the elements, safe to iterate while the live list
    /// is mutated.
    pub fn items(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
