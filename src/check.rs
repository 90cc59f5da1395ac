//! Verification of checksum lists in the `<hex>  <path>` format.

use serde::Serialize;
use std::ops::AddAssign;
use std::path::PathBuf;

use crate::digest::Digest;
use crate::hashing::{sha256_input, Input};

/// One well-formed line of a checksum list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    pub line: usize,
    pub expected: Digest,
    pub path: PathBuf,
}

/// Parsed checksum list, keeping malformed line numbers for reporting.
#[derive(Debug, Default)]
pub struct Checklist {
    pub entries: Vec<ChecksumEntry>,
    pub malformed: Vec<usize>,
}

/// Result of re-hashing a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Mismatch { actual: Digest },
    Unreadable(String),
}

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub entry: ChecksumEntry,
    pub status: CheckStatus,
}

/// Counts over a whole check run.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub ok: usize,
    pub mismatched: usize,
    pub unreadable: usize,
    pub malformed: usize,
}

impl CheckSummary {
    pub fn is_clean(&self) -> bool {
        self.mismatched == 0 && self.unreadable == 0 && self.malformed == 0
    }
}

impl AddAssign for CheckSummary {
    fn add_assign(&mut self, other: Self) {
        self.ok += other.ok;
        self.mismatched += other.mismatched;
        self.unreadable += other.unreadable;
        self.malformed += other.malformed;
    }
}

/// Parse a checksum list. Blank lines and `#` comments are skipped.
pub fn parse_checklist(content: &str) -> Checklist {
    let mut checklist = Checklist::default();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Some((expected, path)) => checklist.entries.push(ChecksumEntry {
                line: index + 1,
                expected,
                path,
            }),
            None => checklist.malformed.push(index + 1),
        }
    }
    checklist
}

/// `<64 hex><space><space or *><path>`
fn parse_line(line: &str) -> Option<(Digest, PathBuf)> {
    let hex = line.get(..64)?;
    let rest = line.get(64..)?;
    let expected: Digest = hex.parse().ok()?;
    let path = rest
        .strip_prefix("  ")
        .or_else(|| rest.strip_prefix(" *"))?;
    if path.is_empty() {
        return None;
    }
    Some((expected, PathBuf::from(path)))
}

/// Re-hash one entry and compare against its expected digest.
pub fn verify_entry(entry: &ChecksumEntry, buffer_size: usize) -> CheckStatus {
    let input = Input::from_arg(&entry.path);
    match sha256_input(&input, buffer_size) {
        Ok(result) if result.digest == entry.expected => CheckStatus::Ok,
        Ok(result) => CheckStatus::Mismatch {
            actual: result.digest,
        },
        Err(err) => CheckStatus::Unreadable(err.to_string()),
    }
}

/// Verify every entry of `checklist`, in order.
pub fn verify_checklist(
    checklist: &Checklist,
    buffer_size: usize,
) -> (Vec<CheckOutcome>, CheckSummary) {
    let mut summary = CheckSummary {
        malformed: checklist.malformed.len(),
        ..CheckSummary::default()
    };
    let mut outcomes = Vec::with_capacity(checklist.entries.len());
    for entry in &checklist.entries {
        let status = verify_entry(entry, buffer_size);
        match status {
            CheckStatus::Ok => summary.ok += 1,
            CheckStatus::Mismatch { .. } => summary.mismatched += 1,
            CheckStatus::Unreadable(_) => summary.unreadable += 1,
        }
        outcomes.push(CheckOutcome {
            entry: entry.clone(),
            status,
        });
    }
    (outcomes, summary)
}
