//! Error types for hashledger

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    EmptyPayload,
    PayloadTooLarge { size: usize, limit: usize },
    IndexMismatch { expected: u64, found: u64 },
    BrokenLink(u64),
    FingerprintMismatch(u64),
    InvalidGenesis(String),
    InvalidFingerprint(String),
    ConfigError(String),
    NodeNotFound(String),
    IoError(String),
    SerializationError(String),
}

impl ChainError {
    /// True for the conditions `audit` reports on a tampered or corrupted chain.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            ChainError::IndexMismatch { .. }
                | ChainError::BrokenLink(_)
                | ChainError::FingerprintMismatch(_)
                | ChainError::InvalidGenesis(_)
        )
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::EmptyPayload => write!(f, "Payload must not be empty"),
            ChainError::PayloadTooLarge { size, limit } => {
                write!(f, "Payload is {} bytes, limit is {}", size, limit)
            }
            ChainError::IndexMismatch { expected, found } => {
                write!(f, "Block index mismatch: expected {}, found {}", expected, found)
            }
            ChainError::BrokenLink(index) => {
                write!(f, "Block {} does not link to its predecessor", index)
            }
            ChainError::FingerprintMismatch(index) => {
                write!(f, "Block {} fingerprint does not match its contents", index)
            }
            ChainError::InvalidGenesis(msg) => write!(f, "Invalid genesis block: {}", msg),
            ChainError::InvalidFingerprint(msg) => write!(f, "Invalid fingerprint: {}", msg),
            ChainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::NodeNotFound(name) => write!(f, "Node not found: {}", name),
            ChainError::IoError(msg) => write!(f, "IO error: {}", msg),
            ChainError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
