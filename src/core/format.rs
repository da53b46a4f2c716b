//! On-disk layout of a sound bank
//!
//! ```text
//! [0..16)                 preamble: magic, header length, version, bank id
//! [16..header length + 8) extra header words (opaque)
//! DIDX chunk              magic, length, then length / 12 entries of
//!                         { id, offset, length }
//! DATA chunk              magic, length, then payloads, each one starting
//!                         on a 16-byte boundary of the chunk data
//! trailing bytes          opaque, copied verbatim
//! ```
//!
//! All integers are little-endian `u32`.

/// Build a little-endian four character code
pub const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*code)
}

/// Bank header chunk magic ("BKHD"), only checked in strict mode
pub const MAGIC_BKHD: u32 = fourcc(b"BKHD");

/// Index chunk magic ("DIDX")
pub const MAGIC_DIDX: u32 = fourcc(b"DIDX");

/// Payload chunk magic ("DATA")
pub const MAGIC_DATA: u32 = fourcc(b"DATA");

/// Size of the fixed preamble: magic, header length, version, bank id
pub const PREAMBLE_SIZE: usize = 16;

/// Size of a chunk descriptor: magic, length
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Size of one index entry: id, offset, length
pub const INDEX_ENTRY_SIZE: usize = 12;

/// Payload alignment inside the DATA chunk
pub const PAYLOAD_ALIGNMENT: usize = 16;

/// Zero bytes needed after a payload of `length` bytes so the next one is aligned
#[inline]
pub const fn padding_after(length: usize) -> usize {
    (PAYLOAD_ALIGNMENT - length % PAYLOAD_ALIGNMENT) % PAYLOAD_ALIGNMENT
}

/// `length` rounded up to the payload alignment
#[inline]
pub const fn aligned_len(length: usize) -> usize {
    length + padding_after(length)
}

/// Human-readable name for a chunk magic
pub fn chunk_name(magic: u32) -> &'static str {
    match magic {
        MAGIC_BKHD => "BKHD",
        MAGIC_DIDX => "DIDX",
        MAGIC_DATA => "DATA",
        _ => "unknown",
    }
}

/// Chunk descriptor preceding the DIDX and DATA regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub magic: u32,
    pub length: u32,
}

impl ChunkHeader {
    pub fn new(magic: u32, length: u32) -> Self {
        ChunkHeader { magic, length }
    }

    pub fn from_bytes(bytes: [u8; CHUNK_HEADER_SIZE]) -> Self {
        ChunkHeader {
            magic: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            length: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; CHUNK_HEADER_SIZE] {
        let mut bytes = [0u8; CHUNK_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.length.to_le_bytes());
        bytes
    }
}

/// One entry of the DIDX chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: u32,
    /// Offset of the payload relative to the DATA chunk data
    pub offset: u32,
    pub length: u32,
}

impl IndexEntry {
    pub fn from_bytes(bytes: [u8; INDEX_ENTRY_SIZE]) -> Self {
        IndexEntry {
            id: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            offset: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            length: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; INDEX_ENTRY_SIZE] {
        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        bytes[0..4].copy_from_slice(&self.id.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.offset.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.length.to_le_bytes());
        bytes
    }
}
