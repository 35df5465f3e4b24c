//! Key-value tags attached to domain aggregates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::collection::OrderedList;

/// A key-value annotation. Keys identify a tag within a [`TagSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    key: String,
    value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// Tags are equal when their keys are equal; values do not participate.
pub fn compare_tags(a: &Tag, b: &Tag) -> Ordering {
    a.key.cmp(&b.key)
}

/// An insertion-ordered set of tags, unique by key.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSet {
    tags: OrderedList<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self {
            tags: OrderedList::new(compare_tags),
        }
    }

    /// Build a set from stored tags. Later duplicates of a key win.
    pub fn from_tags(tags: Vec<Tag>) -> Self {
        let mut set = Self::new();
        for tag in tags {
            set.insert(tag);
        }
        set
    }

    /// Add a tag, replacing any existing tag with the same key. The upserted
    /// tag moves to the end of the listing order.
    pub fn insert(&mut self, tag: Tag) {
        self.tags.remove(&tag);
        self.tags.append(tag);
    }

    /// Remove the tag with the given key. Returns `false` if absent.
    pub fn remove(&mut self, key: &str) -> bool {
        self.tags.remove(&Tag::new(key, ""))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains(&Tag::new(key, ""))
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.find(&Tag::new(key, "")).map(|(_, tag)| tag)
    }

    /// Snapshot copy of the tags in insertion order.
    pub fn list(&self) -> Vec<Tag> {
        self.tags.items()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagSet {
    fn default() -> Self {
        Self::new()
    }
}
