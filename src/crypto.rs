//! Cryptographic primitives for hashledger

use crate::error::ChainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Size in bytes of a SHA-256 fingerprint.
pub const FINGERPRINT_SIZE: usize = 32;

/// Text form of the genesis block's missing predecessor.
pub const ORIGIN_SENTINEL: &str = "0";

/// A SHA-256 digest identifying a block's contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_SIZE]);

impl Fingerprint {
    /// Hashes `data` with SHA-256.
    pub fn digest(data: &[u8]) -> Self {
        Fingerprint(Sha256::digest(data).into())
    }

    pub fn from_bytes(bytes: [u8; FINGERPRINT_SIZE]) -> Self {
        Fingerprint(bytes)
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ChainError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ChainError::InvalidFingerprint(format!("Invalid hex fingerprint: {}", e)))?;
        if bytes.len() != FINGERPRINT_SIZE {
            return Err(ChainError::InvalidFingerprint(format!(
                "Fingerprint must be {} bytes, got {}",
                FINGERPRINT_SIZE,
                bytes.len()
            )));
        }
        let array: [u8; FINGERPRINT_SIZE] = bytes.try_into().map_err(|_| {
            ChainError::InvalidFingerprint("Failed to convert bytes into fingerprint".to_string())
        })?;
        Ok(Fingerprint(array))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fingerprint::from_hex(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// What a block points back to: nothing for genesis, otherwise its predecessor's fingerprint.
///
/// Externally the origin is written as `"0"`, which can never collide with a
/// 64-character hex digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviousFingerprint {
    Origin,
    Block(Fingerprint),
}

impl PreviousFingerprint {
    pub fn is_origin(&self) -> bool {
        matches!(self, PreviousFingerprint::Origin)
    }
}

impl From<Fingerprint> for PreviousFingerprint {
    fn from(fingerprint: Fingerprint) -> Self {
        PreviousFingerprint::Block(fingerprint)
    }
}

impl fmt::Display for PreviousFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PreviousFingerprint::Origin => f.write_str(ORIGIN_SENTINEL),
            PreviousFingerprint::Block(fingerprint) => fmt::Display::fmt(fingerprint, f),
        }
    }
}

impl FromStr for PreviousFingerprint {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ORIGIN_SENTINEL {
            Ok(PreviousFingerprint::Origin)
        } else {
            Fingerprint::from_hex(s).map(PreviousFingerprint::Block)
        }
    }
}

impl Serialize for PreviousFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PreviousFingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
