//! In-memory bank model and mutation API

use crate::core::item::{Item, ItemTable};
use crate::core::parser::ParseOptions;
use crate::error::{BankError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// A parsed sound bank
///
/// Header words and trailing bytes are kept verbatim. Items keep their index
/// order; that order decides both the DIDX entries and the payload offsets on
/// the next write. Any mutation marks the bank dirty.
///
/// # Examples
///
/// ```rust,no_run
/// use bnk::Bank;
///
/// # fn main() -> bnk::Result<()> {
/// let mut bank = Bank::open("Init.bnk")?;
/// for (id, length) in bank.list() {
///     println!("{}.wem: {} bytes", id, length);
/// }
/// bank.empty("123456")?;
/// let bytes = bank.serialize()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub(crate) header: Vec<u32>,
    pub(crate) items: ItemTable,
    pub(crate) trailing: Vec<u8>,
    dirty: bool,
}

impl Bank {
    /// Create a bank with the given header words, no items and no trailing data
    pub fn new(header: Vec<u32>) -> Self {
        Self::from_parts(header, ItemTable::new(), Vec::new())
    }

    pub(crate) fn from_parts(header: Vec<u32>, items: ItemTable, trailing: Vec<u8>) -> Self {
        Bank {
            header,
            items,
            trailing,
            dirty: false,
        }
    }

    /// Open and parse a bank file with the default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ParseOptions::default())
    }

    /// Open and parse a bank file
    pub fn open_with<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        info!("Opening bank at {:?}", path.as_ref());
        let file = File::open(&path)?;
        Self::read_from_with(BufReader::new(file), options)
    }

    /// Raw header words, preamble included
    pub fn header_words(&self) -> &[u32] {
        &self.header
    }

    fn header_word(&self, index: usize) -> u32 {
        self.header.get(index).copied().unwrap_or(0)
    }

    pub fn version(&self) -> u32 {
        self.header_word(2)
    }

    pub fn bank_id(&self) -> u32 {
        self.header_word(3)
    }

    /// Bytes following the DATA chunk
    pub fn trailing(&self) -> &[u8] {
        &self.trailing
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Items in on-disk order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Item)> {
        self.items.iter()
    }

    /// `(id, length)` for every item, in on-disk order
    pub fn list(&self) -> Vec<(&str, usize)> {
        self.items.iter().map(|(id, item)| (id, item.len())).collect()
    }

    /// Raw payload of an item
    pub fn extract(&self, id: &str) -> Result<&[u8]> {
        self.items
            .get(id)
            .map(Item::data)
            .ok_or_else(|| BankError::UnknownItem(id.to_string()))
    }

    /// Insert or replace an item
    ///
    /// An existing id keeps its position, a new id is appended. Ids are only
    /// checked for being `u32` when the bank is written.
    pub fn update(&mut self, id: &str, payload: impl Into<Vec<u8>>) {
        let item = Item::new(payload);
        debug!("Updating item {} with {} bytes", id, item.len());
        if self.items.insert(id, item).is_none() {
            debug!("Item {} is new, appended at position {}", id, self.len() - 1);
        }
        self.dirty = true;
    }

    /// Replace an existing item with a zero-length payload, keeping its slot
    pub fn empty(&mut self, id: &str) -> Result<()> {
        debug!("Emptying item {}", id);
        self.items
            .replace(id, Item::empty())
            .ok_or_else(|| BankError::UnknownItem(id.to_string()))?;
        self.dirty = true;
        Ok(())
    }

    /// True once any mutation has been applied since parse
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forget pending changes, e.g. after they were persisted
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
