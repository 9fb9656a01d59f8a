use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors that can occur when parsing a hex string into a [`ContentAddress`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressParseError {
    /// The string has the wrong length.
    #[error("content address must be 64 hex characters, got {0}")]
    Length(usize),

    /// The string is not valid hexadecimal.
    #[error("content address is not valid hex: {0}")]
    Hex(String),
}

/// Deterministic identifier derived from a record's bytes (SHA-256).
///
/// Identical bytes always map to the same address, so storing the same
/// content twice yields one logical record. Addresses render and serialize
/// as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentAddress([u8; 32]);

impl ContentAddress {
    /// Compute the address of a byte payload.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Wrap a raw 32-byte digest.
    #[must_use]
    pub fn from_raw(raw: [u8; 32]) -> Self {
        Self(raw)
    }

    /// The raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering of the address.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", self.to_hex())
    }
}

impl FromStr for ContentAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(AddressParseError::Length(s.len()));
        }
        let decoded = hex::decode(s).map_err(|e| AddressParseError::Hex(e.to_string()))?;
        let mut raw = [0u8; 32];
        raw.copy_from_slice(&decoded);
        Ok(Self(raw))
    }
}

impl Serialize for ContentAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
