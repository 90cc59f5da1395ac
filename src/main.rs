//! sha256sum entrypoint.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sha256sum::check::{parse_checklist, verify_checklist, CheckStatus};
use sha256sum::hasher::DEFAULT_BUFFER_SIZE;
use sha256sum::hashing::{sha256_input, Input, STDIN_MARKER};
use sha256sum::report::{write_json, CheckReport, DigestReport, ErrorEntry, FileEntry};
use sha256sum::transcript::{plural, Transcript};
use sha256sum::tree::{expand_paths, Expansion};

/// Environment override for the read buffer size.
const BUFFER_SIZE_ENV: &str = "SHA256SUM_BUFFER_SIZE";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sha256sum",
    version,
    about = "Print or check SHA-256 checksums"
)]
struct Args {
    /// Files to hash (`-` or none reads standard input)
    files: Vec<PathBuf>,

    /// Read checksum lists from FILES and verify them
    #[arg(short, long)]
    check: bool,

    /// Hash every regular file under directory arguments
    #[arg(short, long)]
    recursive: bool,

    /// Emit a JSON report instead of checksum lines
    #[arg(long)]
    json: bool,

    /// Print a transcript of each step to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Read buffer size in bytes (overrides SHA256SUM_BUFFER_SIZE)
    #[arg(long, value_name = "BYTES")]
    buffer_size: Option<usize>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<ExitCode> {
    let buffer_size = resolve_buffer_size(args.buffer_size)?;
    let mut transcript = Transcript::new(args.verbose);
    transcript.note(format!("read buffer: {buffer_size} bytes"));

    let files = if args.files.is_empty() {
        vec![PathBuf::from(STDIN_MARKER)]
    } else {
        args.files.clone()
    };

    if args.check {
        return run_check(&files, buffer_size, args.json, &mut transcript);
    }
    let expansion = expand_paths(&files, args.recursive);
    run_hash(&expansion, buffer_size, args.json, &mut transcript)
}

/// Hash each input, printing `<hex>  <path>` lines or a JSON report.
fn run_hash(
    expansion: &Expansion,
    buffer_size: usize,
    json: bool,
    transcript: &mut Transcript,
) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut report = DigestReport::new();
    let mut failed = false;

    for walk_error in &expansion.errors {
        failed = true;
        eprintln!(
            "sha256sum: {}: {}",
            walk_error.path.display(),
            walk_error.message
        );
        report.errors.push(ErrorEntry {
            path: walk_error.path.display().to_string(),
            message: walk_error.message.clone(),
        });
    }

    for path in &expansion.paths {
        let input = Input::from_arg(path);
        match sha256_input(&input, buffer_size) {
            Ok(result) => {
                transcript.hashed(&input, &result);
                if json {
                    report.files.push(FileEntry {
                        path: input.to_string(),
                        sha256: result.digest,
                        bytes: result.bytes,
                    });
                } else {
                    writeln!(out, "{}  {}", result.digest, input).context("write digest")?;
                }
            }
            Err(err) => {
                failed = true;
                eprintln!("sha256sum: {input}: {err}");
                report.errors.push(ErrorEntry {
                    path: input.to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    if json {
        write_json(&mut out, &report)?;
    }
    Ok(exit_status(failed))
}

/// Verify every checksum list named in `lists`.
///
/// A list that cannot be read is reported and skipped; the remaining lists
/// are still verified. JSON mode emits a single report for the whole run.
fn run_check(
    lists: &[PathBuf],
    buffer_size: usize,
    json: bool,
    transcript: &mut Transcript,
) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut report = CheckReport::new();
    let mut failed = false;

    for list in lists {
        let content = match read_checklist(list) {
            Ok(content) => content,
            Err(err) => {
                failed = true;
                eprintln!("sha256sum: {}: {err}", list.display());
                report.errors.push(ErrorEntry {
                    path: list.display().to_string(),
                    message: err.to_string(),
                });
                continue;
            }
        };
        let checklist = parse_checklist(&content);
        transcript.note(format!(
            "{}: {} entries, {} malformed",
            list.display(),
            checklist.entries.len(),
            checklist.malformed.len()
        ));
        let (outcomes, summary) = verify_checklist(&checklist, buffer_size);
        failed |= !summary.is_clean();

        if json {
            report.push_list(list.display().to_string(), &outcomes, summary);
            continue;
        }
        for outcome in &outcomes {
            let path = outcome.entry.path.display();
            let written = match &outcome.status {
                CheckStatus::Ok => writeln!(out, "{path}: OK"),
                CheckStatus::Mismatch { .. } => writeln!(out, "{path}: FAILED"),
                CheckStatus::Unreadable(message) => {
                    eprintln!("sha256sum: {path}: {message}");
                    writeln!(out, "{path}: FAILED open or read")
                }
            };
            written.context("write check result")?;
        }
        warn_count(summary.malformed, "line", "improperly formatted");
        warn_count(summary.unreadable, "listed file", "could not be read");
        warn_count(summary.mismatched, "computed checksum", "did NOT match");
    }

    if json {
        write_json(&mut out, &report)?;
    }
    Ok(exit_status(failed))
}

fn warn_count(count: usize, noun: &str, verb: &str) {
    if count > 0 {
        eprintln!(
            "sha256sum: WARNING: {count} {noun}{} {verb}",
            plural(count as u64)
        );
    }
}

fn read_checklist(path: &Path) -> io::Result<String> {
    if path.as_os_str() == STDIN_MARKER {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    fs::read_to_string(path)
}

/// Flag value wins, then the environment, then the default.
fn resolve_buffer_size(flag: Option<usize>) -> Result<usize> {
    let size = match flag {
        Some(size) => size,
        None => match env::var(BUFFER_SIZE_ENV) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid {BUFFER_SIZE_ENV}: {raw}"))?,
            Err(_) => DEFAULT_BUFFER_SIZE,
        },
    };
    if size == 0 {
        return Err(anyhow!("buffer size must be greater than zero"));
    }
    Ok(size)
}

fn exit_status(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
