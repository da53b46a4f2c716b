//! Bank encoding
//!
//! Lengths, offsets and padding are recomputed from the items on every write;
//! header words and trailing bytes are emitted exactly as parsed.

use crate::core::bank::Bank;
use crate::core::format::{
    aligned_len, padding_after, ChunkHeader, IndexEntry, CHUNK_HEADER_SIZE, INDEX_ENTRY_SIZE,
    MAGIC_DATA, MAGIC_DIDX, PAYLOAD_ALIGNMENT,
};
use crate::core::item::parse_item_id;
use crate::error::{BankError, Result};
use std::io::Write;
use tracing::debug;

/// Where one item lands inside the DATA chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: u32,
    /// Offset relative to the start of the DATA chunk data
    pub offset: u32,
    pub length: u32,
    /// Zero bytes written between the previous payload and this one
    pub padding_before: usize,
}

/// Planned on-disk arrangement of a bank's items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankLayout {
    pub placements: Vec<Placement>,
    /// Declared DATA chunk length: covers inter-item padding, not the
    /// padding after the final item
    pub data_length: u32,
}

impl BankLayout {
    /// Length of the DIDX chunk body
    pub fn index_length(&self) -> u32 {
        (self.placements.len() * INDEX_ENTRY_SIZE) as u32
    }
}

impl Bank {
    /// Compute ids, offsets, padding and chunk lengths without writing anything
    ///
    /// Fails with `InvalidId` for ids that are not a canonical decimal `u32` and `ItemTooLarge`
    /// when an offset or length overflows the 32-bit fields.
    pub fn layout(&self) -> Result<BankLayout> {
        let mut placements = Vec::with_capacity(self.len());
        let mut offset: u64 = 0;
        let mut padding = 0;

        for (id, item) in self.items.iter() {
            let too_large = || BankError::ItemTooLarge {
                id: id.to_string(),
                length: item.len(),
            };
            let length = u32::try_from(item.len()).map_err(|_| too_large())?;
            let start = u32::try_from(offset).map_err(|_| too_large())?;

            placements.push(Placement {
                id: parse_item_id(id)?,
                offset: start,
                length,
                padding_before: padding,
            });

            padding = padding_after(item.len());
            offset += aligned_len(item.len()) as u64;
        }

        // Everything up to the last payload byte, no trailing alignment
        let data_length = offset - padding as u64;
        let data_length = u32::try_from(data_length).map_err(|_| BankError::ItemTooLarge {
            id: placements
                .last()
                .map(|p| p.id.to_string())
                .unwrap_or_default(),
            length: data_length as usize,
        })?;

        if placements.len() > u32::MAX as usize / INDEX_ENTRY_SIZE {
            return Err(BankError::ItemTooLarge {
                id: "index".to_string(),
                length: placements.len() * INDEX_ENTRY_SIZE,
            });
        }

        Ok(BankLayout {
            placements,
            data_length,
        })
    }

    /// Total number of bytes `serialize` will produce
    pub fn encoded_len(&self) -> Result<usize> {
        let layout = self.layout()?;
        Ok(self.header.len() * 4
            + CHUNK_HEADER_SIZE
            + layout.index_length() as usize
            + CHUNK_HEADER_SIZE
            + layout.data_length as usize
            + self.trailing.len())
    }

    /// Write the bank to `writer`
    ///
    /// The layout is validated before the first byte is written, so an
    /// invalid id never leaves a partial bank behind.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let layout = self.layout()?;

        for word in &self.header {
            writer.write_all(&word.to_le_bytes())?;
        }

        writer.write_all(&ChunkHeader::new(MAGIC_DIDX, layout.index_length()).to_bytes())?;
        for placement in &layout.placements {
            let entry = IndexEntry {
                id: placement.id,
                offset: placement.offset,
                length: placement.length,
            };
            writer.write_all(&entry.to_bytes())?;
        }

        writer.write_all(&ChunkHeader::new(MAGIC_DATA, layout.data_length).to_bytes())?;
        let zeros = [0u8; PAYLOAD_ALIGNMENT];
        for ((_, item), placement) in self.items.iter().zip(&layout.placements) {
            writer.write_all(&zeros[..placement.padding_before])?;
            writer.write_all(item.data())?;
        }

        writer.write_all(&self.trailing)?;

        debug!(
            "Wrote {} items, data chunk {} bytes, {} trailing bytes",
            layout.placements.len(),
            layout.data_length,
            self.trailing.len()
        );
        Ok(())
    }

    /// Encode the bank into a new buffer
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.encoded_len()?);
        self.write_to(&mut buffer)?;
        debug_assert_eq!(Some(buffer.len()), self.encoded_len().ok());
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::MAGIC_BKHD;

    fn bank_with(lengths: &[usize]) -> Bank {
        let mut bank = Bank::new(vec![MAGIC_BKHD, 8, 1, 7]);
        for (i, &length) in lengths.iter().enumerate() {
            bank.update(&(i + 1).to_string(), vec![i as u8 + 1; length]);
        }
        bank
    }

    #[test]
    fn test_layout_scenario_a() {
        let layout = bank_with(&[10, 20, 0]).layout().unwrap();

        let paddings: Vec<usize> = layout.placements.iter().map(|p| p.padding_before).collect();
        assert_eq!(paddings, vec![0, 6, 12]);
        let offsets: Vec<u32> = layout.placements.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0, 16, 48]);
        assert_eq!(layout.data_length, 48);
    }

    #[test]
    fn test_layout_excludes_final_padding() {
        let layout = bank_with(&[16, 5]).layout().unwrap();
        assert_eq!(layout.placements[1].offset, 16);
        assert_eq!(layout.data_length, 21);
    }

    #[test]
    fn test_layout_empty_bank() {
        let layout = bank_with(&[]).layout().unwrap();
        assert!(layout.placements.is_empty());
        assert_eq!(layout.data_length, 0);
        assert_eq!(layout.index_length(), 0);
    }

    #[test]
    fn test_serialize_bytes() {
        let bank = bank_with(&[3, 2]);
        let bytes = bank.serialize().unwrap();

        let expected_len = 16 + 8 + 24 + 8 + (3 + 13 + 2);
        assert_eq!(bytes.len(), expected_len);
        assert_eq!(bank.encoded_len().unwrap(), expected_len);

        assert_eq!(&bytes[16..20], b"DIDX");
        assert_eq!(&bytes[20..24], &24u32.to_le_bytes());
        // second entry: id 2, offset 16, length 2
        assert_eq!(&bytes[36..40], &2u32.to_le_bytes());
        assert_eq!(&bytes[40..44], &16u32.to_le_bytes());
        assert_eq!(&bytes[44..48], &2u32.to_le_bytes());

        assert_eq!(&bytes[48..52], b"DATA");
        assert_eq!(&bytes[52..56], &18u32.to_le_bytes());
        assert_eq!(&bytes[56..59], &[1, 1, 1]);
        assert!(bytes[59..72].iter().all(|&b| b == 0));
        assert_eq!(&bytes[72..74], &[2, 2]);
    }

    #[test]
    fn test_serialize_invalid_id() {
        let mut bank = bank_with(&[4]);
        bank.update("not-a-number", b"x".to_vec());
        assert!(matches!(
            bank.serialize(),
            Err(BankError::InvalidId(ref id)) if id == "not-a-number"
        ));

        let mut bank = bank_with(&[]);
        bank.update("4294967296", b"x".to_vec());
        assert!(matches!(bank.serialize(), Err(BankError::InvalidId(_))));
    }

    #[test]
    fn test_serialize_rejects_non_canonical_ids() {
        for alias in ["+7", "007", " 7"] {
            let mut bank = bank_with(&[]);
            bank.update("7", b"seven".to_vec());
            bank.update(alias, b"alias".to_vec());
            assert_eq!(bank.len(), 2);
            assert!(matches!(
                bank.serialize(),
                Err(BankError::InvalidId(ref id)) if id == alias
            ));
        }

        let mut bank = bank_with(&[]);
        bank.update("007", b"x".to_vec());
        assert!(matches!(bank.layout(), Err(BankError::InvalidId(_))));
    }

    #[test]
    fn test_write_to_leaves_nothing_on_invalid_id() {
        let mut bank = bank_with(&[4]);
        bank.update("-1", Vec::new());

        let mut out = Vec::new();
        assert!(bank.write_to(&mut out).is_err());
        assert!(out.is_empty());
    }
}
