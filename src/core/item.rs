//! Audio items and the ordered id -> item table

use crate::error::{BankError, Result};
use ahash::AHashMap;

/// Numeric value of an item id
///
/// Only the canonical decimal form is accepted: `"7"` is id 7, while `"+7"`,
/// `"007"` and `" 7"` are `InvalidId`. Each id maps to exactly one index entry.
pub fn parse_item_id(id: &str) -> Result<u32> {
    match id.parse::<u32>() {
        Ok(value) if value.to_string() == id => Ok(value),
        _ => Err(BankError::InvalidId(id.to_string())),
    }
}

/// One audio payload slot
///
/// The payload is opaque. Its length is always the length of the stored bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    data: Vec<u8>,
}

impl Item {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Item { data: data.into() }
    }

    /// Zero-length item left behind by `Bank::empty`
    pub fn empty() -> Self {
        Item::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Insertion-ordered map of item id -> item
///
/// Entries live in a vector so on-disk order is the enumeration order; the
/// hash index maps an id to its position.
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    entries: Vec<(String, Item)>,
    index: AHashMap<String, usize>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ItemTable {
            entries: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    /// Position of `id` in enumeration order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Insert or replace. A replaced id keeps its position; a new id is appended.
    ///
    /// Returns the previous item when `id` was already present.
    pub fn insert(&mut self, id: impl Into<String>, item: Item) -> Option<Item> {
        let id = id.into();
        match self.index.get(&id) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, item)),
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, item));
                None
            }
        }
    }

    /// Replace an existing entry in place; `None` if the id is absent
    pub fn replace(&mut self, id: &str, item: Item) -> Option<Item> {
        let pos = *self.index.get(id)?;
        Some(std::mem::replace(&mut self.entries[pos].1, item))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Item)> {
        self.entries.iter().map(|(id, item)| (id.as_str(), item))
    }
}

impl PartialEq for ItemTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ItemTable {}
