//! hashledger - an append-only, hash-linked ledger of opaque payloads
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the ledger, exported records and integrity checks
//! - [`node`] - Lock-protected ledger instances and lockstep node sets
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 fingerprints and the genesis predecessor marker
//!
//! ## Configuration & Utilities
//! - [`clock`] - Timestamp sources
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use hashledger::blockchain::Ledger;
//!
//! let mut ledger = Ledger::new();
//! let block = ledger.append("hello").unwrap();
//! assert_eq!(block.index(), 1);
//! assert!(ledger.verify());
//! ```

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod node;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod clock;
pub mod config;
pub mod error;

pub use blockchain::{Block, BlockRecord, Ledger};
pub use error::{ChainError, Result};
pub use node::{Node, NodeSet};
