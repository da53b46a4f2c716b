//! Bank decoding
//!
//! Reads a bank front to back from any `Read`: preamble and extra header
//! words, the DIDX index, the DATA payloads (skipping inter-item padding), and
//! whatever follows as opaque trailing bytes.

use crate::core::bank::Bank;
use crate::core::format::{
    chunk_name, padding_after, ChunkHeader, IndexEntry, CHUNK_HEADER_SIZE, INDEX_ENTRY_SIZE,
    MAGIC_BKHD, MAGIC_DATA, MAGIC_DIDX, PREAMBLE_SIZE,
};
use crate::core::item::{Item, ItemTable};
use crate::error::{BankError, Result};
use std::io::Read;
use tracing::{debug, trace};

/// Upper bound on the item slots reserved up front from a declared index length
const MAX_PRERESERVED_ITEMS: usize = 4096;

/// Upper bound on the bytes reserved up front for one declared payload
const MAX_PRERESERVED_BYTES: usize = 1 << 20;

/// Knobs for the decoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject banks whose first word is not "BKHD"
    pub strict_preamble: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            strict_preamble: true,
        }
    }
}

/// `Read` wrapper that tracks the byte offset and reports short reads as
/// `BankError::Truncated`
struct ChunkReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ChunkReader<R> {
    fn new(inner: R) -> Self {
        ChunkReader { inner, offset: 0 }
    }

    fn read_vec(&mut self, needed: usize) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(needed.min(MAX_PRERESERVED_BYTES));
        let available = (&mut self.inner)
            .take(needed as u64)
            .read_to_end(&mut buffer)?;
        if available < needed {
            return Err(BankError::Truncated {
                offset: self.offset,
                needed,
                available,
            });
        }
        self.offset += needed as u64;
        Ok(buffer)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.read_vec(N)?);
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        if count > 0 {
            self.read_vec(count)?;
        }
        Ok(())
    }

    fn expect_chunk(&mut self, magic: u32) -> Result<ChunkHeader> {
        let chunk = ChunkHeader::from_bytes(self.read_array::<CHUNK_HEADER_SIZE>()?);
        if chunk.magic != magic {
            return Err(BankError::BadMagic {
                chunk: chunk_name(magic),
                expected: magic,
                actual: chunk.magic,
            });
        }
        Ok(chunk)
    }

    fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut rest = Vec::new();
        let read = self.inner.read_to_end(&mut rest)?;
        self.offset += read as u64;
        Ok(rest)
    }
}

impl Bank {
    /// Parse a bank with the default (permissive) options
    pub fn read_from<R: Read>(reader: R) -> Result<Bank> {
        Self::read_from_with(reader, ParseOptions::default())
    }

    /// Parse a bank from a byte slice
    pub fn from_bytes(bytes: &[u8]) -> Result<Bank> {
        Self::read_from(bytes)
    }

    /// Parse a bank
    pub fn read_from_with<R: Read>(reader: R, options: ParseOptions) -> Result<Bank> {
        let mut reader = ChunkReader::new(reader);

        // Preamble: magic, header length, version, bank id
        let mut header = Vec::with_capacity(PREAMBLE_SIZE / 4);
        for _ in 0..PREAMBLE_SIZE / 4 {
            header.push(reader.read_u32()?);
        }
        if options.strict_preamble && header[0] != MAGIC_BKHD {
            return Err(BankError::BadMagic {
                chunk: chunk_name(MAGIC_BKHD),
                expected: MAGIC_BKHD,
                actual: header[0],
            });
        }

        let header_end = u64::from(header[1]) + CHUNK_HEADER_SIZE as u64;
        while reader.offset < header_end {
            header.push(reader.read_u32()?);
        }
        debug!(
            "Bank version {}, id {}, {} header words",
            header[2],
            header[3],
            header.len()
        );

        let index = reader.expect_chunk(MAGIC_DIDX)?;
        if index.length as usize % INDEX_ENTRY_SIZE != 0 {
            return Err(BankError::MisalignedIndex(index.length));
        }
        let count = index.length as usize / INDEX_ENTRY_SIZE;
        debug!("Index chunk lists {} items", count);

        // count comes from the file; the reads below catch a short input
        let reserve = count.min(MAX_PRERESERVED_ITEMS);
        let mut entries = Vec::with_capacity(reserve);
        for _ in 0..count {
            let entry = IndexEntry::from_bytes(reader.read_array::<INDEX_ENTRY_SIZE>()?);
            trace!(
                "Index entry {}: offset {}, length {}",
                entry.id,
                entry.offset,
                entry.length
            );
            entries.push(entry);
        }

        let data = reader.expect_chunk(MAGIC_DATA)?;
        debug!("Data chunk declares {} bytes", data.length);

        let mut items = ItemTable::with_capacity(reserve);
        let mut padding = 0;
        for entry in &entries {
            reader.skip(padding)?;
            let length = entry.length as usize;
            let payload = reader.read_vec(length)?;
            if items
                .insert(entry.id.to_string(), Item::new(payload))
                .is_some()
            {
                return Err(BankError::DuplicateId(entry.id.to_string()));
            }
            padding = padding_after(length);
        }

        let trailing = reader.read_to_end()?;
        debug!(
            "Parsed {} items, {} trailing bytes, {} bytes total",
            items.len(),
            trailing.len(),
            reader.offset
        );

        Ok(Bank::from_parts(header, items, trailing))
    }
}
