//! JSON report emitted by `--json`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::check::{CheckOutcome, CheckStatus, CheckSummary};
use crate::digest::Digest;

/// Tool version emitted in reports.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level report for a hashing run.
#[derive(Serialize, Default)]
pub struct DigestReport {
    pub tool_version: String,
    pub files: Vec<FileEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
}

/// Digest recorded for one input.
#[derive(Serialize)]
pub struct FileEntry {
    pub path: String,
    pub sha256: Digest,
    pub bytes: u64,
}

/// Input that could not be hashed.
#[derive(Serialize)]
pub struct ErrorEntry {
    pub path: String,
    pub message: String,
}

/// Top-level report for a `--check` run, one per invocation.
#[derive(Serialize, Default)]
pub struct CheckReport {
    pub tool_version: String,
    pub lists: Vec<ListReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
    /// Totals across every list.
    pub summary: CheckSummary,
}

/// Results for one checksum list.
#[derive(Serialize)]
pub struct ListReport {
    pub path: String,
    pub entries: Vec<CheckEntry>,
    pub summary: CheckSummary,
}

/// Per-entry verification result.
#[derive(Serialize)]
pub struct CheckEntry {
    pub line: usize,
    pub path: String,
    pub expected: Digest,
    pub status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status classification for a checked entry.
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    Ok,
    Mismatch,
    Unreadable,
}

impl DigestReport {
    pub fn new() -> Self {
        Self {
            tool_version: TOOL_VERSION.to_string(),
            ..Self::default()
        }
    }
}

impl CheckReport {
    pub fn new() -> Self {
        Self {
            tool_version: TOOL_VERSION.to_string(),
            ..Self::default()
        }
    }

    /// Append one list's outcomes and fold its counts into the totals.
    pub fn push_list(&mut self, path: String, outcomes: &[CheckOutcome], summary: CheckSummary) {
        let entries = outcomes
            .iter()
            .map(|outcome| {
                let (status, actual, message) = match &outcome.status {
                    CheckStatus::Ok => (StatusCode::Ok, None, None),
                    CheckStatus::Mismatch { actual } => (StatusCode::Mismatch, Some(*actual), None),
                    CheckStatus::Unreadable(message) => {
                        (StatusCode::Unreadable, None, Some(message.clone()))
                    }
                };
                CheckEntry {
                    line: outcome.entry.line,
                    path: outcome.entry.path.display().to_string(),
                    expected: outcome.entry.expected,
                    status,
                    actual,
                    message,
                }
            })
            .collect();
        self.summary += summary;
        self.lists.push(ListReport {
            path,
            entries,
            summary,
        });
    }
}

/// Serialize `report` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize, W: Write>(mut out: W, report: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(report).context("serialize report")?;
    out.write_all(&json).context("write report")?;
    out.write_all(b"\n").context("write report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::digest_bytes;

    #[test]
    fn omits_empty_errors() {
        let mut report = DigestReport::new();
        report.files.push(FileEntry {
            path: "abc.txt".to_string(),
            sha256: digest_bytes(b"abc"),
            bytes: 3,
        });
        let mut out = Vec::new();
        write_json(&mut out, &report).expect("write report");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("parse report");
        assert!(value.get("errors").is_none());
        assert_eq!(
            value["files"][0]["sha256"].as_str(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(value["tool_version"].as_str(), Some(TOOL_VERSION));
    }

    #[test]
    fn status_codes_are_snake_case() {
        let json = serde_json::to_string(&StatusCode::Unreadable).expect("serialize status");
        assert_eq!(json, "\"unreadable\"");
    }

    #[test]
    fn check_report_totals_lists() {
        use crate::check::ChecksumEntry;
        use std::path::PathBuf;

        let digest = digest_bytes(b"abc");
        let outcome = |status| CheckOutcome {
            entry: ChecksumEntry {
                line: 1,
                expected: digest,
                path: PathBuf::from("abc.txt"),
            },
            status,
        };
        let mut report = CheckReport::new();
        report.push_list(
            "first".to_string(),
            &[outcome(CheckStatus::Ok)],
            CheckSummary {
                ok: 1,
                ..CheckSummary::default()
            },
        );
        report.push_list(
            "second".to_string(),
            &[outcome(CheckStatus::Unreadable("gone".to_string()))],
            CheckSummary {
                unreadable: 1,
                ..CheckSummary::default()
            },
        );

        let mut out = Vec::new();
        write_json(&mut out, &report).expect("write report");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("parse report");
        assert_eq!(value["lists"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["lists"][1]["path"].as_str(), Some("second"));
        assert_eq!(
            value["lists"][1]["entries"][0]["message"].as_str(),
            Some("gone")
        );
        assert_eq!(value["summary"]["ok"].as_u64(), Some(1));
        assert_eq!(value["summary"]["unreadable"].as_u64(), Some(1));
        assert!(value.get("errors").is_none());
    }
}
