//! Error types for bank operations

use thiserror::Error;

/// Bank operation result type
pub type Result<T> = std::result::Result<T, BankError>;

/// Bank operation errors
#[derive(Error, Debug)]
pub enum BankError {
    /// A chunk started with the wrong magic number
    #[error("{chunk} magic number expected ({expected:08X}), got {actual:08X} instead")]
    BadMagic {
        chunk: &'static str,
        expected: u32,
        actual: u32,
    },

    /// Index chunk length does not describe a whole number of entries
    #[error("Index chunk length {0} is not a multiple of 12")]
    MisalignedIndex(u32),

    /// The index lists the same item id twice
    #[error("Duplicate item id {0} in index chunk")]
    DuplicateId(String),

    /// Input ended before the format said it would
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// No item with this id exists in the bank
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Item id cannot be written as an unsigned 32-bit integer
    #[error("Invalid item id '{0}': must be an unsigned 32-bit integer")]
    InvalidId(String),

    /// Item does not fit the 32-bit length and offset fields
    #[error("Item {id} is too large for the bank format ({length} bytes)")]
    ItemTooLarge { id: String, length: usize },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BankError {
    /// True for structural violations found while parsing
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            BankError::BadMagic { .. }
                | BankError::MisalignedIndex(_)
                | BankError::DuplicateId(_)
        )
    }
}

impl From<toml::de::Error> for BankError {
    fn from(err: toml::de::Error) -> Self {
        BankError::Config(err.to_string())
    }
}
