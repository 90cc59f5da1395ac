//! Streaming accumulator that turns arbitrary reads into whole blocks.

use std::io::{self, Read};

use crate::digest::Digest;
use crate::engine::{Engine, BLOCK_LEN};

/// Default read buffer for [`digest_reader`] callers.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Incremental SHA-256 over input delivered in any chunking.
///
/// Bytes are buffered until a full block is available, so the digest does
/// not depend on how the caller splits its input. Padding happens once, in
/// [`Hasher::finalize`], which consumes the hasher.
#[derive(Clone, Debug)]
pub struct Hasher {
    engine: Engine,
    pending: [u8; BLOCK_LEN],
    pending_len: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
            pending: [0u8; BLOCK_LEN],
            pending_len: 0,
        }
    }

    pub fn update(&mut self, mut data: &[u8]) {
        if self.pending_len > 0 {
            let needed = BLOCK_LEN - self.pending_len;
            let take = needed.min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];
            if self.pending_len < BLOCK_LEN {
                return;
            }
            let block = self.pending;
            self.engine.absorb_block(&block);
            self.pending_len = 0;
        }

        while let Some((block, rest)) = data.split_first_chunk::<BLOCK_LEN>() {
            self.engine.absorb_block(block);
            data = rest;
        }
        self.pending[..data.len()].copy_from_slice(data);
        self.pending_len = data.len();
    }

    /// Total message bytes seen so far.
    pub fn bytes_hashed(&self) -> u64 {
        self.engine.input_len() + self.pending_len as u64
    }

    pub fn finalize(mut self) -> Digest {
        let pending = self.pending;
        self.engine.finish(&pending[..self.pending_len])
    }

    /// Compression calls made so far (padding blocks are added at finalize).
    pub fn blocks_compressed(&self) -> u64 {
        self.engine.blocks_compressed()
    }
}

/// Hash an in-memory byte slice.
pub fn digest_bytes(bytes: &[u8]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Hash everything `reader` yields until it reports end-of-stream.
///
/// Only a zero-length read ends the stream; short reads are accumulated.
/// Interrupted reads are retried, any other error is returned and the
/// partial state discarded.
pub fn digest_reader<R: Read>(mut reader: R, buffer_size: usize) -> io::Result<(Digest, u64)> {
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; buffer_size.max(1)];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    let bytes = hasher.bytes_hashed();
    Ok((hasher.finalize(), bytes))
}
