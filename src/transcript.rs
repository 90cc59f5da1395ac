//! Verbose progress transcript written to stderr.

use crate::hashing::{FileDigest, Input};
use crate::padding::padded_block_count;

/// Step-by-step notes for `--verbose` runs; silent otherwise.
pub struct Transcript {
    enabled: bool,
    started: bool,
}

impl Transcript {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started: false,
        }
    }

    pub fn note(&mut self, message: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        self.start();
        eprintln!("- {}", message.as_ref());
    }

    /// Record a finished digest with its size and block count.
    pub fn hashed(&mut self, input: &Input, result: &FileDigest) {
        if !self.enabled {
            return;
        }
        self.note(hashed_line(input, result));
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        eprintln!("transcript:");
    }
}

fn hashed_line(input: &Input, result: &FileDigest) -> String {
    let blocks = padded_block_count(result.bytes);
    format!(
        "{input}: {} byte{}, {blocks} block{}, {}",
        result.bytes,
        plural(result.bytes),
        plural(blocks),
        result.digest
    )
}

/// `""` for a count of one, `"s"` otherwise.
pub fn plural(count: u64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
