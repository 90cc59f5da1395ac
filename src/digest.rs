//! The 32-byte digest value and its hex form.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// A finished SHA-256 digest.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

/// Reasons a hex string is not a digest.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseDigestError {
    #[error("expected 64 hex characters, got {0}")]
    Length(usize),
    #[error("invalid hex digit in digest")]
    InvalidHex,
}

impl Digest {
    pub fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex, 64 characters, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = ParseDigestError;

    /// Accepts upper- or lowercase hex.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() != DIGEST_LEN * 2 {
            return Err(ParseDigestError::Length(value.len()));
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| ParseDigestError::InvalidHex)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn parses_and_displays_lowercase() {
        let digest: Digest = ABC.to_uppercase().parse().expect("parse digest");
        assert_eq!(digest.to_string(), ABC);
        assert_eq!(digest.as_bytes()[0], 0xba);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = "abcd".parse::<Digest>().unwrap_err();
        assert_eq!(err, ParseDigestError::Length(4));
    }

    #[test]
    fn rejects_non_hex() {
        let value = "z".repeat(64);
        assert_eq!(
            value.parse::<Digest>().unwrap_err(),
            ParseDigestError::InvalidHex
        );
    }

    #[test]
    fn serializes_as_hex_string() {
        let digest: Digest = ABC.parse().expect("parse digest");
        let json = serde_json::to_string(&digest).expect("serialize digest");
        assert_eq!(json, format!("\"{ABC}\""));
    }
}
