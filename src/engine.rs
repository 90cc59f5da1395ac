//! Block-level SHA-256 engine: state, message schedule, and compression.

use thiserror::Error;

use crate::digest::{Digest, DIGEST_LEN};
use crate::padding::pad_remainder;

/// Size of one compression block in bytes.
pub const BLOCK_LEN: usize = 64;

/// Initial hash state (first 32 bits of the fractional parts of the square
/// roots of the first eight primes).
const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Round constants.
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Contract violations reported by [`Engine`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("block must be exactly 64 bytes, got {0}")]
    BlockSize(usize),
    #[error("final remainder must be shorter than 64 bytes, got {0}")]
    RemainderTooLong(usize),
    #[error("engine already finalized; reset before reuse")]
    Finalized,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Absorbing,
    Finalized,
}

/// Running SHA-256 state for a single message.
///
/// Whole blocks go through [`Engine::absorb`]; the trailing partial block
/// goes to [`Engine::finalize`], which pads it and emits the digest. After
/// finalization every call fails with [`EngineError::Finalized`] until
/// [`Engine::reset`].
#[derive(Clone, Debug)]
pub struct Engine {
    state: [u32; 8],
    input_len: u64,
    blocks_compressed: u64,
    phase: Phase,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            state: H0,
            input_len: 0,
            blocks_compressed: 0,
            phase: Phase::Absorbing,
        }
    }

    /// Absorb one unpadded 64-byte block of message input.
    pub fn absorb(&mut self, block: &[u8]) -> Result<(), EngineError> {
        self.ensure_absorbing()?;
        let block: &[u8; BLOCK_LEN] = block
            .try_into()
            .map_err(|_| EngineError::BlockSize(block.len()))?;
        self.absorb_block(block);
        Ok(())
    }

    /// Pad the final `remainder` (fewer than 64 bytes, possibly empty),
    /// absorb the padded block(s), and return the digest.
    pub fn finalize(&mut self, remainder: &[u8]) -> Result<Digest, EngineError> {
        self.ensure_absorbing()?;
        if remainder.len() >= BLOCK_LEN {
            return Err(EngineError::RemainderTooLong(remainder.len()));
        }
        Ok(self.finish(remainder))
    }

    /// Return to the initial state so the engine can hash a new message.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Message bytes absorbed so far, excluding padding.
    pub fn input_len(&self) -> u64 {
        self.input_len
    }

    /// Blocks run through the compression function, padding included.
    pub fn blocks_compressed(&self) -> u64 {
        self.blocks_compressed
    }

    fn ensure_absorbing(&self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Absorbing => Ok(()),
            Phase::Finalized => Err(EngineError::Finalized),
        }
    }

    /// Absorb a message block without re-checking the phase.
    pub(crate) fn absorb_block(&mut self, block: &[u8; BLOCK_LEN]) {
        debug_assert_eq!(self.phase, Phase::Absorbing);
        self.input_len = self.input_len.wrapping_add(BLOCK_LEN as u64);
        self.process(block);
    }

    /// Pad, absorb, and emit the digest without re-checking the phase.
    pub(crate) fn finish(&mut self, remainder: &[u8]) -> Digest {
        debug_assert_eq!(self.phase, Phase::Absorbing);
        let total_len = self.input_len.wrapping_add(remainder.len() as u64);
        let tail = pad_remainder(remainder, total_len);
        for block in tail.blocks() {
            self.process(block);
        }
        self.input_len = total_len;
        self.phase = Phase::Finalized;

        let mut out = [0u8; DIGEST_LEN];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Digest::new(out)
    }

    fn process(&mut self, block: &[u8; BLOCK_LEN]) {
        let w = schedule(block);
        compress(&mut self.state, &w);
        self.blocks_compressed += 1;
    }
}

#[inline]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[inline]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline]
fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline]
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

/// Expand a block into the 64-word message schedule.
fn schedule(block: &[u8; BLOCK_LEN]) -> [u32; 64] {
    let mut w = [0u32; 64];
    for (word, bytes) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    for i in 16..64 {
        w[i] = w[i - 16]
            .wrapping_add(small_sigma0(w[i - 15]))
            .wrapping_add(w[i - 7])
            .wrapping_add(small_sigma1(w[i - 2]));
    }
    w
}

/// Run the 64 rounds over `w` and feed the result forward into `state`.
fn compress(state: &mut [u32; 8], w: &[u32; 64]) {
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for (k, w) in K.iter().zip(w.iter()) {
        let t1 = h
            .wrapping_add(big_sigma1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(*k)
            .wrapping_add(*w);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (slot, value) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *slot = slot.wrapping_add(value);
    }
}
