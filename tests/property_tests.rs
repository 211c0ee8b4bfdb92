//! Property-based tests for fingerprinting and chain integrity
//!
//! These tests check properties that must hold for all inputs,
//! not just specific test cases.

use hashledger::blockchain::{Block, Ledger};
use hashledger::clock::SteppingClock;
use hashledger::config::LedgerConfig;
use hashledger::crypto::{Fingerprint, PreviousFingerprint};
use proptest::prelude::*;
use std::sync::Arc;

fn previous_strategy() -> impl Strategy<Value = PreviousFingerprint> {
    prop_oneof![
        Just(PreviousFingerprint::Origin),
        any::<[u8; 32]>().prop_map(|bytes| PreviousFingerprint::Block(Fingerprint::from_bytes(bytes))),
    ]
}

// ============================================================================
// Fingerprint Invariants
// ============================================================================

proptest! {
    /// Property: identically constructed blocks share a fingerprint
    #[test]
    fn fingerprint_is_deterministic(
        index in any::<u64>(),
        previous in previous_strategy(),
        timestamp in any::<u64>(),
        payload in ".*",
        nonce in any::<u64>(),
    ) {
        let a = Block::new(index, previous, timestamp, payload.clone(), nonce);
        let b = Block::new(index, previous, timestamp, payload, nonce);
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
        prop_assert!(a.is_self_consistent());
    }

    /// Property: changing the payload changes the fingerprint
    #[test]
    fn payload_change_changes_fingerprint(
        payload in ".{0,64}",
        other in ".{0,64}",
        index in 0u64..1_000,
        timestamp in any::<u64>(),
    ) {
        prop_assume!(payload != other);
        let a = Block::new(index, PreviousFingerprint::Origin, timestamp, payload, 0);
        let b = Block::new(index, PreviousFingerprint::Origin, timestamp, other, 0);
        prop_assert_ne!(a.fingerprint(), b.fingerprint());
    }

    /// Property: changing any numeric field changes the fingerprint
    #[test]
    fn numeric_change_changes_fingerprint(
        index in 0u64..u64::MAX,
        timestamp in 0u64..u64::MAX,
        nonce in 0u64..u64::MAX,
    ) {
        let base = Block::new(index, PreviousFingerprint::Origin, timestamp, "p", nonce);
        let bumped = [
            Block::new(index + 1, PreviousFingerprint::Origin, timestamp, "p", nonce),
            Block::new(index, PreviousFingerprint::Origin, timestamp + 1, "p", nonce),
            Block::new(index, PreviousFingerprint::Origin, timestamp, "p", nonce + 1),
        ];
        for block in &bumped {
            prop_assert_ne!(block.fingerprint(), base.fingerprint());
        }
    }
}

// ============================================================================
// Chain Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: any sequence of accepted appends yields a verifiable, linked chain
    #[test]
    fn appended_chains_verify(payloads in prop::collection::vec("[a-zA-Z0-9 ]{1,32}", 0..20)) {
        let mut ledger = Ledger::with_clock(
            LedgerConfig::default(),
            Arc::new(SteppingClock::new(0, 1)),
        );
        let mut accepted = 0usize;
        for payload in &payloads {
            if ledger.append(payload.as_str()).is_ok() {
                accepted += 1;
            }
        }

        prop_assert_eq!(ledger.len(), accepted + 1);
        for (i, pair) in ledger.chain().windows(2).enumerate() {
            prop_assert_eq!(pair[1].index(), i as u64 + 1);
            prop_assert_eq!(
                pair[1].previous_fingerprint(),
                &PreviousFingerprint::Block(pair[0].fingerprint())
            );
        }
        prop_assert!(ledger.verify());
    }
}
