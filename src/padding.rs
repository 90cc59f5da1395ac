//! Final-block padding: `0x80`, zero fill, then the big-endian bit length.

use crate::engine::BLOCK_LEN;

/// Offset of the 64-bit length field inside the last padded block.
const LENGTH_OFFSET: usize = BLOCK_LEN - 8;

/// One or two padded blocks derived from the final stream remainder.
pub(crate) struct PaddedTail {
    blocks: [[u8; BLOCK_LEN]; 2],
    count: usize,
}

impl PaddedTail {
    /// Padded blocks in absorb order.
    pub(crate) fn blocks(&self) -> &[[u8; BLOCK_LEN]] {
        &self.blocks[..self.count]
    }
}

/// Pad the final `remainder` of a stream that was `total_len` bytes long.
///
/// `remainder` must be shorter than a block; only [`crate::engine::Engine`]
/// calls this, after checking. An empty remainder still yields one full
/// padding block.
pub(crate) fn pad_remainder(remainder: &[u8], total_len: u64) -> PaddedTail {
    debug_assert!(remainder.len() < BLOCK_LEN);
    let mut blocks = [[0u8; BLOCK_LEN]; 2];
    blocks[0][..remainder.len()].copy_from_slice(remainder);
    blocks[0][remainder.len()] = 0x80;

    // The marker must leave eight bytes free for the length field.
    let count = if remainder.len() < LENGTH_OFFSET { 1 } else { 2 };
    let bit_len = total_len.wrapping_mul(8);
    blocks[count - 1][LENGTH_OFFSET..].copy_from_slice(&bit_len.to_be_bytes());
    PaddedTail { blocks, count }
}

/// Number of blocks a message of `len` bytes occupies once padded.
pub fn padded_block_count(len: u64) -> u64 {
    let remainder = (len % BLOCK_LEN as u64) as usize;
    let tail = if remainder < LENGTH_OFFSET { 1 } else { 2 };
    len / BLOCK_LEN as u64 + tail
}
