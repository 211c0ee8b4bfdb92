use crate::config::LedgerConfig;
use crate::crypto::PreviousFingerprint;
use crate::error::ChainError;

use super::chain::{Block, GENESIS_PAYLOAD};

pub fn validate_payload(payload: &str, config: &LedgerConfig) -> Result<(), ChainError> {
    if payload.is_empty() || (!config.allow_blank_payloads && payload.trim().is_empty()) {
        return Err(ChainError::EmptyPayload);
    }
    if payload.len() > config.max_payload_bytes {
        return Err(ChainError::PayloadTooLarge {
            size: payload.len(),
            limit: config.max_payload_bytes,
        });
    }
    Ok(())
}

pub fn validate_genesis(block: &Block) -> Result<(), ChainError> {
    if block.index() != 0 {
        return Err(ChainError::IndexMismatch {
            expected: 0,
            found: block.index(),
        });
    }
    if !block.previous_fingerprint().is_origin() {
        return Err(ChainError::InvalidGenesis(format!(
            "first block references predecessor {}",
            block.previous_fingerprint()
        )));
    }
    if !block.is_self_consistent() {
        return Err(ChainError::FingerprintMismatch(0));
    }
    // Genesis contents are fixed.
    if block.payload() != GENESIS_PAYLOAD {
        return Err(ChainError::InvalidGenesis(format!(
            "unexpected payload {:?}",
            block.payload()
        )));
    }
    if block.nonce() != 0 {
        return Err(ChainError::InvalidGenesis(format!(
            "unexpected nonce {}",
            block.nonce()
        )));
    }
    Ok(())
}

/// Checks that `block` sits at `position` directly after `parent`.
pub fn validate_successor(block: &Block, parent: &Block, position: u64) -> Result<(), ChainError> {
    if block.index() != position {
        return Err(ChainError::IndexMismatch {
            expected: position,
            found: block.index(),
        });
    }
    if *block.previous_fingerprint() != PreviousFingerprint::Block(parent.fingerprint()) {
        return Err(ChainError::BrokenLink(position));
    }
    if !block.is_self_consistent() {
        return Err(ChainError::FingerprintMismatch(position));
    }
    Ok(())
}

pub fn validate_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let genesis = blocks
        .first()
        .ok_or_else(|| ChainError::InvalidGenesis("chain has no blocks".to_string()))?;
    validate_genesis(genesis)?;

    for (i, pair) in blocks.windows(2).enumerate() {
        validate_successor(&pair[1], &pair[0], i as u64 + 1)?;
    }
    Ok(())
}
