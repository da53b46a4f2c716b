//! # bnk - Sound Bank Container Editor
//!
//! `bnk` reads, edits and rewrites chunked sound bank files: an opaque header,
//! a `DIDX` index of audio items, a `DATA` chunk holding the 16-byte aligned
//! payloads, and opaque trailing chunks.
//!
//! - **Byte-exact round trips**: header words and trailing bytes are kept
//!   verbatim, so an unedited bank re-encodes to the same bytes
//! - **Opaque payloads**: items are raw blobs addressed by their numeric id
//! - **Stable order**: replacing an item keeps its slot, new items are appended
//! - **Safe saves**: `BankFile::close` backs up the original before writing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bnk::{Bank, Result};
//!
//! # fn main() -> Result<()> {
//! let mut bank = Bank::open("Init.bnk")?;
//!
//! for (id, length) in bank.list() {
//!     println!("{}.wem: {} bytes", id, length);
//! }
//!
//! let payload = bank.extract("123456")?.to_vec();
//! bank.update("654321", payload);
//! bank.empty("123456")?;
//!
//! if bank.is_dirty() {
//!     std::fs::write("Init.edited.bnk", bank.serialize()?)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing in place
//!
//! ```rust,no_run
//! use bnk::{BankConfig, BankFile, Result};
//!
//! # fn main() -> Result<()> {
//! let mut file = BankFile::open("Init.bnk", BankConfig::default())?;
//! file.empty("123456")?;
//! // Init.bnk -> Init.bnk.000, then the edited bank is written to Init.bnk
//! file.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod names;
pub mod persist;

pub use crate::config::BankConfig;
pub use crate::core::{
    bank::Bank,
    format::{padding_after, MAGIC_BKHD, MAGIC_DATA, MAGIC_DIDX, PAYLOAD_ALIGNMENT},
    item::{parse_item_id, Item, ItemTable},
    parser::ParseOptions,
    serializer::{BankLayout, Placement},
};
pub use crate::error::{BankError, Result};
pub use crate::names::{expand_item_list, item_id, payload_file_name};
pub use crate::persist::{backup_path, BankFile};
