//! Named ledger instances and groups of them appended in lockstep.
//!
//! A [`Node`] wraps one [`Ledger`] behind a lock so it can be shared across
//! threads. A [`NodeSet`] holds several independently owned nodes and feeds
//! each the same payload; there is no replication protocol between them.

use crate::blockchain::{validate_payload, Block, BlockRecord, Ledger};
use crate::clock::Clock;
use crate::config::{Config, LedgerConfig};
use crate::error::{ChainError, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    ledger: Arc<RwLock<Ledger>>,
}

#[allow(clippy::len_without_is_empty)]
impl Node {
    pub fn new(name: impl Into<String>, config: LedgerConfig) -> Self {
        Self::from_ledger(name, Ledger::with_config(config))
    }

    pub fn with_clock(name: impl Into<String>, config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_ledger(name, Ledger::with_clock(config, clock))
    }

    pub fn from_ledger(name: impl Into<String>, ledger: Ledger) -> Self {
        Self {
            name: name.into(),
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn append(&self, payload: impl Into<String>) -> Result<Block> {
        self.append_with_nonce(payload, 0)
    }

    /// The whole append runs under the write lock, so two callers can never
    /// link onto the same predecessor.
    pub fn append_with_nonce(&self, payload: impl Into<String>, nonce: u64) -> Result<Block> {
        self.ledger.write().append_with_nonce(payload, nonce)
    }

    pub fn latest(&self) -> Block {
        self.ledger.read().latest().clone()
    }

    pub fn chain(&self) -> Vec<BlockRecord> {
        self.ledger.read().to_records()
    }

    pub fn len(&self) -> usize {
        self.ledger.read().len()
    }

    pub fn audit(&self) -> Result<()> {
        self.ledger.read().audit()
    }

    pub fn verify(&self) -> bool {
        self.ledger.read().verify()
    }

    /// Run `f` with read access to the underlying ledger.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.ledger.read())
    }
}

#[derive(Debug, Clone)]
pub struct NodeSet {
    nodes: Vec<Node>,
    config: LedgerConfig,
}

impl NodeSet {
    /// `count` nodes named `node-1`, `node-2`, ...
    pub fn new(count: usize, config: LedgerConfig) -> Result<Self> {
        Self::named("node", count, config)
    }

    /// A set always holds at least one node, under a non-empty prefix.
    pub fn named(prefix: &str, count: usize, config: LedgerConfig) -> Result<Self> {
        if count == 0 {
            return Err(ChainError::ConfigError(
                "nodes.count must be at least 1".to_string(),
            ));
        }
        if prefix.is_empty() {
            return Err(ChainError::ConfigError(
                "nodes.name_prefix must be set".to_string(),
            ));
        }

        let nodes = (1..=count)
            .map(|i| Node::new(format!("{}-{}", prefix, i), config.clone()))
            .collect();
        info!(count, prefix, "Created node set");
        Ok(Self { nodes, config })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::named(
            &config.nodes.name_prefix,
            config.nodes.count,
            config.ledger.clone(),
        )
    }

    pub fn append_all(&self, payload: impl Into<String>) -> Result<Vec<Block>> {
        self.append_all_with_nonce(payload, 0)
    }

    /// Append the same payload to every node, in order.
    ///
    /// The payload is validated once up front; a rejected payload reaches no node.
    pub fn append_all_with_nonce(&self, payload: impl Into<String>, nonce: u64) -> Result<Vec<Block>> {
        let payload = payload.into();
        validate_payload(&payload, &self.config)?;

        let mut appended = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            match node.append_with_nonce(payload.clone(), nonce) {
                Ok(block) => appended.push(block),
                Err(e) => {
                    warn!(node = node.name(), error = %e, "Append failed part way through node set");
                    return Err(e);
                }
            }
        }
        info!(nodes = appended.len(), "Block added to all nodes");
        Ok(appended)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, name: &str) -> Result<&Node> {
        self.nodes
            .iter()
            .find(|node| node.name() == name)
            .ok_or_else(|| ChainError::NodeNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Chain length of each node, in node order.
    pub fn heights(&self) -> Vec<(String, usize)> {
        self.nodes
            .iter()
            .map(|node| (node.name().to_string(), node.len()))
            .collect()
    }

    pub fn verify_all(&self) -> Vec<(String, bool)> {
        self.nodes
            .iter()
            .map(|node| (node.name().to_string(), node.verify()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_node_set_names_and_heights() {
        let set = NodeSet::new(3, LedgerConfig::default()).unwrap();
        let names: Vec<&str> = set.nodes().iter().map(Node::name).collect();
        assert_eq!(names, ["node-1", "node-2", "node-3"]);
        assert!(set.heights().iter().all(|(_, height)| *height == 1));
    }

    #[test]
    fn test_append_all_grows_every_node() {
        let set = NodeSet::new(3, LedgerConfig::default()).unwrap();
        let blocks = set.append_all("New data generated").unwrap();

        assert_eq!(blocks.len(), 3);
        for block in &blocks {
            assert_eq!(block.index(), 1);
            assert_eq!(block.payload(), "New data generated");
        }
        assert!(set.heights().iter().all(|(_, height)| *height == 2));
        assert!(set.verify_all().iter().all(|(_, ok)| *ok));
    }

    #[test]
    fn test_rejected_payload_reaches_no_node() {
        let set = NodeSet::new(2, LedgerConfig::default()).unwrap();
        assert_eq!(set.append_all("   ").unwrap_err(), ChainError::EmptyPayload);
        assert!(set.heights().iter().all(|(_, height)| *height == 1));
    }

    #[test]
    fn test_empty_node_set_is_rejected() {
        assert!(matches!(
            NodeSet::new(0, LedgerConfig::default()),
            Err(ChainError::ConfigError(_))
        ));
        assert!(matches!(
            NodeSet::named("", 2, LedgerConfig::default()),
            Err(ChainError::ConfigError(_))
        ));
    }

    #[test]
    fn test_from_config_uses_prefix() {
        let config = Config::from_toml_str("[nodes]\ncount = 2\nname_prefix = \"replica\"\n").unwrap();
        let set = NodeSet::from_config(&config).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.get("replica-2").is_ok());
        assert_eq!(
            set.get("node-1").unwrap_err(),
            ChainError::NodeNotFound("node-1".to_string())
        );
    }

    #[test]
    fn test_cloned_node_shares_ledger() {
        let node = Node::new("shared", LedgerConfig::default());
        let handle = node.clone();
        handle.append("via clone").unwrap();
        assert_eq!(node.len(), 2);
        assert_eq!(node.latest().payload(), "via clone");
        assert_eq!(node.with_ledger(|ledger| ledger.genesis().index()), 0);
    }

    #[test]
    fn test_concurrent_appends_never_fork() {
        let node = Node::with_clock(
            "busy",
            LedgerConfig::default(),
            Arc::new(SteppingClock::new(1_000, 1)),
        );

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let node = node.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        node.append(format!("thread {} entry {}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(node.len(), 201);
        assert!(node.verify());

        let chain = node.chain();
        let parents: HashSet<String> = chain
            .iter()
            .skip(1)
            .map(|record| record.previous_fingerprint.to_string())
            .collect();
        assert_eq!(parents.len(), 200);
    }
}
