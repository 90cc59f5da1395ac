//! SHA-256 digests for files and byte streams.
//!
//! The [`engine`] module holds the block-level state machine; [`hasher`]
//! accumulates arbitrary reads into blocks and pads once at end-of-stream.

pub mod check;
pub mod digest;
pub mod engine;
pub mod hasher;
pub mod hashing;
pub mod padding;
pub mod report;
pub mod transcript;
pub mod tree;

pub use digest::Digest;
pub use engine::{Engine, EngineError, BLOCK_LEN};
pub use hasher::{digest_bytes, digest_reader, Hasher};
