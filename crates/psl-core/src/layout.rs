//! Buffer Layout Constants
//!
//! All multi-byte values are little-endian. The buffer is a single flat
//! `Vec<u8>` split into a fixed-size scratch region followed by a tree
//! region and a character-data region, so the whole thing can be handed
//! to an accelerator (e.g. a WASM module) as one contiguous slice with
//! no pointer fixups.

/// Size in bytes of the scratch prefix reserved at the start of every buffer.
pub const SCRATCH_LEN: usize = 512;

/// Maximum hostname length the scratch region can hold.
pub const HOSTNAME_MAX: usize = 255;

/// Byte offset of the hostname bytes within the scratch region.
pub const HOSTNAME_OFFSET: usize = 0;

/// Byte offset holding the prepared hostname's length.
pub const HOSTNAME_LEN_OFFSET: usize = 256;

/// Byte offset of the wildcard-fallback flag set by the matcher during a query.
///
/// Placed at the one byte between the hostname bytes (which occupy at most
/// `[0, HOSTNAME_MAX)` = `[0, 255)`) and the length byte at 256, so it can
/// never fall inside the label-index table below: with up to 127 entries
/// spanning `[257, 511)`, any offset at or after 257 is reachable by a
/// long-enough hostname and is not safe ground for a fixed flag byte.
pub const WILDCARD_FLAG_BYTE: usize = 255;

/// Word index (32-bit words from the start of the buffer) holding the root
/// node's word offset.
///
/// Parked at word 65 (byte 260), between the length byte at 256 and the
/// label-index table starting at [`LABEL_TABLE_OFFSET`], so a long hostname
/// filling the table can never overwrite it. Bytes 257-259 are unused
/// padding to reach this word's 4-byte alignment.
pub const ROOT_PTR_WORD: usize = 65;

/// Word index holding the byte offset of the character-data region.
///
/// Immediately follows [`ROOT_PTR_WORD`], same reasoning: fixed ground the
/// label-index table must never reach.
pub const CHAR_DATA_PTR_WORD: usize = 66;

/// Byte offset where the label-index table begins.
///
/// Each entry is a `(begin, end)` byte pair describing one label's span
/// within the hostname bytes at [`HOSTNAME_OFFSET`]. Entries are written
/// right to left: index 0 is the rightmost label (the TLD side).
///
/// Starts right after [`CHAR_DATA_PTR_WORD`] so the table's own byte range
/// never overlaps the two pointer words above it.
pub const LABEL_TABLE_OFFSET: usize = 268;

/// Exclusive end of the label-index table region.
pub const LABEL_TABLE_END: usize = 512;

/// Size in bytes of one label-index table entry.
pub const LABEL_ENTRY_SIZE: usize = 2;

/// Word offset of the first node record, immediately after the scratch region.
pub const TREE_REGION_START_WORD: usize = SCRATCH_LEN / 4;

/// Size in 32-bit words of one node record.
pub const NODE_WORDS: usize = 3;

/// Size in bytes of one node record.
pub const NODE_BYTES: usize = NODE_WORDS * 4;

/// Labels up to this many bytes are packed inline into the node's second word.
pub const INLINE_LABEL_MAX: usize = 4;

bitflags::bitflags! {
    /// Per-node flags packed into bits [8,16) of a node's first word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// This node terminates a rule (is itself a public suffix boundary).
        const TERMINUS = 0b0000_0001;
        /// The rule terminating at this node was an exception rule (`!rule`).
        const EXCEPTION = 0b0000_0010;
    }
}

/// Magic/version tag written at the start of a structured selfie.
pub const SELFIE_MAGIC: u16 = 2;

#[inline]
pub fn align4(n: usize) -> usize {
    (n + 3) & !3
}

#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[inline]
pub fn write_u32_le(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[inline]
pub fn write_u16_le(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}
