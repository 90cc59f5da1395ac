//! SHA-256 helpers for files, stdin, and raw bytes.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::digest::Digest;
use crate::hasher::{digest_bytes, digest_reader};

/// Path argument that selects standard input.
pub const STDIN_MARKER: &str = "-";

/// A byte source named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl Input {
    pub fn from_arg(path: &Path) -> Self {
        if path.as_os_str() == STDIN_MARKER {
            Input::Stdin
        } else {
            Input::Path(path.to_path_buf())
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => f.write_str(STDIN_MARKER),
            Input::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Digest of a complete byte source plus the number of bytes read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDigest {
    pub digest: Digest,
    pub bytes: u64,
}

/// Hash raw bytes and return a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    digest_bytes(bytes).to_hex()
}

/// Hash a file by streaming it through a `buffer_size` read buffer.
pub fn sha256_file(path: &Path, buffer_size: usize) -> io::Result<FileDigest> {
    let file = fs::File::open(path)?;
    let (digest, bytes) = digest_reader(file, buffer_size)?;
    Ok(FileDigest { digest, bytes })
}

/// Hash everything available on standard input.
pub fn sha256_stdin(buffer_size: usize) -> io::Result<FileDigest> {
    let stdin = io::stdin();
    let (digest, bytes) = digest_reader(stdin.lock(), buffer_size)?;
    Ok(FileDigest { digest, bytes })
}

/// Hash whichever source `input` names.
pub fn sha256_input(input: &Input, buffer_size: usize) -> io::Result<FileDigest> {
    match input {
        Input::Stdin => sha256_stdin(buffer_size),
        Input::Path(path) => sha256_file(path, buffer_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_file_contents_across_buffer_sizes() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("abc.txt");
        fs::write(&path, b"abc").expect("write file");
        for buffer_size in [1usize, 2, 64, 8192] {
            let result = sha256_file(&path, buffer_size).expect("hash file");
            assert_eq!(result.bytes, 3);
            assert_eq!(result.digest.to_hex(), sha256_hex(b"abc"));
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = sha256_file(&dir.path().join("absent"), 64).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn dash_selects_stdin() {
        assert_eq!(Input::from_arg(Path::new("-")), Input::Stdin);
        let input = Input::from_arg(Path::new("a/b.txt"));
        assert_eq!(input, Input::Path(PathBuf::from("a/b.txt")));
        assert_eq!(input.to_string(), "a/b.txt");
    }
}
