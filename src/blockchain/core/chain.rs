use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::crypto::{Fingerprint, PreviousFingerprint};
use crate::error::{ChainError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::record::BlockRecord;
use super::validation::{validate_chain, validate_payload};

/// Payload carried by every ledger's first block.
pub const GENESIS_PAYLOAD: &str = "Origin Block";

/// One immutable ledger entry. The fingerprint is computed exactly once, in
/// [`Block::new`], from fields that cannot change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    index: u64,
    previous_fingerprint: PreviousFingerprint,
    timestamp: u64,
    payload: String,
    nonce: u64,
    fingerprint: Fingerprint,
}

impl Block {
    pub fn new(
        index: u64,
        previous_fingerprint: PreviousFingerprint,
        timestamp: u64,
        payload: impl Into<String>,
        nonce: u64,
    ) -> Self {
        let payload = payload.into();
        let fingerprint = Fingerprint::digest(
            canonical_form(index, &previous_fingerprint, timestamp, &payload, nonce).as_bytes(),
        );

        Block {
            index,
            previous_fingerprint,
            timestamp,
            payload,
            nonce,
            fingerprint,
        }
    }

    pub fn genesis(timestamp: u64) -> Self {
        Block::new(0, PreviousFingerprint::Origin, timestamp, GENESIS_PAYLOAD, 0)
    }

    /// Rebuilds a block from an exported record, keeping the stored
    /// fingerprint as-is so that tampering stays detectable.
    pub(crate) fn from_record(record: BlockRecord) -> Self {
        Block {
            index: record.index,
            previous_fingerprint: record.previous_fingerprint,
            timestamp: record.timestamp,
            payload: record.payload,
            nonce: record.nonce,
            fingerprint: record.fingerprint,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn previous_fingerprint(&self) -> &PreviousFingerprint {
        &self.previous_fingerprint
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The fingerprint stored at construction.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Recomputes the fingerprint from the block's current fields.
    pub fn calculate_fingerprint(&self) -> Fingerprint {
        Fingerprint::digest(self.canonical_form().as_bytes())
    }

    /// The exact bytes that are hashed, as a compact JSON object with sorted keys.
    pub fn canonical_form(&self) -> String {
        canonical_form(
            self.index,
            &self.previous_fingerprint,
            self.timestamp,
            &self.payload,
            self.nonce,
        )
    }

    pub fn is_self_consistent(&self) -> bool {
        self.calculate_fingerprint() == self.fingerprint
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_fingerprint.is_origin()
    }

    pub fn to_record(&self) -> BlockRecord {
        BlockRecord::from(self)
    }
}

fn canonical_form(
    index: u64,
    previous_fingerprint: &PreviousFingerprint,
    timestamp: u64,
    payload: &str,
    nonce: u64,
) -> String {
    // Keys listed in lexicographic order; serde_json's map keeps them sorted too.
    serde_json::json!({
        "index": index,
        "nonce": nonce,
        "payload": payload,
        "previous_fingerprint": previous_fingerprint.to_string(),
        "timestamp": timestamp,
    })
    .to_string()
}

/// An ordered, append-only sequence of blocks that always starts with genesis.
#[derive(Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("len", &self.blocks.len())
            .field("latest", &self.latest().fingerprint())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::len_without_is_empty)]
impl Ledger {
    /// Create a `Ledger` with default limits, stamped by the system clock.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a `Ledger` whose timestamps, genesis included, come from `clock`.
    pub fn with_clock(config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        let genesis = Block::genesis(clock.now());
        info!(fingerprint = %genesis.fingerprint(), "Created ledger with genesis block");

        Ledger {
            blocks: vec![genesis],
            config,
            clock,
        }
    }

    /// Rebuild a ledger from exported records. Only the shape is checked
    /// here; use [`Ledger::audit`] to find out whether the records can be trusted.
    pub fn restore(records: Vec<BlockRecord>, config: LedgerConfig) -> Result<Self> {
        if records.is_empty() {
            return Err(ChainError::InvalidGenesis(
                "cannot restore a ledger from zero blocks".to_string(),
            ));
        }

        let blocks: Vec<Block> = records.into_iter().map(Block::from_record).collect();
        info!(blocks = blocks.len(), "Restored ledger from records");

        Ok(Ledger {
            blocks,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn latest(&self) -> &Block {
        // Never empty: genesis is pushed at construction and nothing removes blocks.
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn append(&mut self, payload: impl Into<String>) -> Result<Block> {
        self.append_with_nonce(payload, 0)
    }

    /// Link a new block carrying `payload` onto the end of the chain.
    ///
    /// Position, predecessor and timestamp are all settled before the block
    /// is built, so its fingerprint is computed once over final values.
    pub fn append_with_nonce(&mut self, payload: impl Into<String>, nonce: u64) -> Result<Block> {
        let payload = payload.into();
        if let Err(e) = validate_payload(&payload, &self.config) {
            warn!(error = %e, "Rejected payload");
            return Err(e);
        }

        let index = self.blocks.len() as u64;
        let previous_fingerprint = PreviousFingerprint::Block(self.latest().fingerprint());
        let timestamp = self.clock.now();

        let block = Block::new(index, previous_fingerprint, timestamp, payload, nonce);
        debug!(index, fingerprint = %block.fingerprint(), "Appended block");

        self.blocks.push(block.clone());
        Ok(block)
    }

    pub fn chain(&self) -> &[Block] {
        &self.blocks
    }

    pub fn to_records(&self) -> Vec<BlockRecord> {
        self.blocks.iter().map(Block::to_record).collect()
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Walk the whole chain and report the first integrity violation.
    pub fn audit(&self) -> Result<()> {
        validate_chain(&self.blocks).inspect_err(|e| {
            warn!(error = %e, "Ledger failed integrity audit");
        })
    }

    pub fn verify(&self) -> bool {
        self.audit().is_ok()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
