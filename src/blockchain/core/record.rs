use crate::crypto::{Fingerprint, PreviousFingerprint};
use serde::{Deserialize, Serialize};

use super::chain::Block;

/// The six-field view of a block handed to renderers and interchange formats.
///
/// Field names are part of the external contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub index: u64,
    pub previous_fingerprint: PreviousFingerprint,
    pub timestamp: u64,
    pub payload: String,
    pub nonce: u64,
    pub fingerprint: Fingerprint,
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        BlockRecord {
            index: block.index(),
            previous_fingerprint: *block.previous_fingerprint(),
            timestamp: block.timestamp(),
            payload: block.payload().to_string(),
            nonce: block.nonce(),
            fingerprint: block.fingerprint(),
        }
    }
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        BlockRecord::from(&block)
    }
}
