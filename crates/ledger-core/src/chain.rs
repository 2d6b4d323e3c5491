use crate::block::{Block, Difficulty};
use crate::config::ChainConfig;
use crate::constants::GENESIS_PREVIOUS_HASH;
use crate::error::{LedgerError, Result};
use crate::hashing::{self, meets_difficulty};
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A single integrity problem found by [`Chain::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The first block does not carry the `"0"` previous-hash sentinel.
    GenesisSentinel,
    /// The block's recorded hash misses its own difficulty target.
    DifficultyNotMet { position: usize },
    /// The block's hash differs from the next block's `previous_hash`.
    BrokenLink { position: usize },
    /// The last block's hash differs from the chain's tip pointer.
    TipMismatch,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::GenesisSentinel => write!(f, "genesis block does not link to the sentinel hash"),
            Fault::DifficultyNotMet { position } => {
                write!(f, "block {position} does not meet its difficulty")
            }
            Fault::BrokenLink { position } => {
                write!(f, "block {position} does not match block {}'s previous hash", position + 1)
            }
            Fault::TipMismatch => write!(f, "chain hash does not match the last block"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    faults: Vec<Fault>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }
}

/// Ordered, hash-linked blocks plus the hash of the most recent one.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
    tip_hash: String,
}

impl Chain {
    /// An empty chain. The first append becomes the genesis block.
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding a freshly mined genesis block.
    pub fn with_genesis(config: &ChainConfig) -> Result<Self> {
        let mut chain = Self::new();
        let genesis = Block::with_current_time(0, config.genesis_data.clone(), config.genesis_difficulty);
        chain.append(genesis)?;
        Ok(chain)
    }

    /// Link `block` to the current tip, mine it and append it.
    ///
    /// The block's index must equal the current size. Nothing is mutated
    /// when this fails.
    pub fn append(&mut self, mut block: Block) -> Result<()> {
        self.check_next_index(&block)?;
        block.set_previous_hash(self.next_previous_hash());
        let hash = block.mine_to_target();
        self.commit(block, hash);
        Ok(())
    }

    /// [`Chain::append`] with mining that stops once `cancel` is set. A
    /// cancelled append leaves the chain as it was.
    pub fn append_cancellable(&mut self, mut block: Block, cancel: &AtomicBool) -> Result<()> {
        self.check_next_index(&block)?;
        block.set_previous_hash(self.next_previous_hash());
        let hash = block.mine_until(cancel)?;
        self.commit(block, hash);
        Ok(())
    }

    /// Stamp a new block for `data` at the next index and append it.
    pub fn push_data(&mut self, data: impl Into<String>, difficulty: Difficulty) -> Result<&Block> {
        let block = Block::with_current_time(self.blocks.len() as u64, data, difficulty);
        self.append(block)?;
        self.latest()
    }

    pub fn latest(&self) -> Result<&Block> {
        self.blocks.last().ok_or(LedgerError::EmptyChain)
    }

    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Hash of the last appended block, or `""` before the first append.
    pub fn tip_hash(&self) -> &str {
        &self.tip_hash
    }

    /// SHA-256 digests this machine computes in one second.
    pub fn benchmark_hash_rate(&self) -> u64 {
        hashing::hash_rate(Duration::from_secs(1))
    }

    /// Check every block against its difficulty, every adjacent link, the
    /// tip pointer and the genesis sentinel, using each block's recorded
    /// nonce. Nothing is re-mined.
    pub fn validate(&self) -> ValidationReport {
        let mut faults = Vec::new();

        if let Some(genesis) = self.blocks.first() {
            if genesis.previous_hash() != GENESIS_PREVIOUS_HASH {
                faults.push(Fault::GenesisSentinel);
            }
        }

        for (position, block) in self.blocks.iter().enumerate() {
            let hash = block.content_hash();
            if !meets_difficulty(&hash, block.difficulty().get()) {
                faults.push(Fault::DifficultyNotMet { position });
            }
            match self.blocks.get(position + 1) {
                Some(next) if next.previous_hash() != hash => {
                    faults.push(Fault::BrokenLink { position });
                }
                None if self.tip_hash != hash => faults.push(Fault::TipMismatch),
                _ => {}
            }
        }

        for fault in &faults {
            debug!(%fault, "chain validation fault");
        }
        ValidationReport { faults }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// Re-mine every block oldest to newest, rewriting each successor's
    /// `previous_hash` and finally the tip pointer. Index, timestamp, data
    /// and difficulty are never touched.
    ///
    /// Returns how many blocks needed a new nonce.
    pub fn repair(&mut self) -> usize {
        let Some(genesis) = self.blocks.first_mut() else {
            return 0;
        };
        genesis.set_previous_hash(GENESIS_PREVIOUS_HASH);

        let mut remined = 0;
        for position in 0..self.blocks.len() {
            let block = &mut self.blocks[position];
            if !block.meets_target() {
                remined += 1;
            }
            let hash = block.mine_to_target();
            match self.blocks.get_mut(position + 1) {
                Some(next) => next.set_previous_hash(hash),
                None => self.tip_hash = hash,
            }
        }
        info!(blocks = self.blocks.len(), remined, "chain repaired");
        remined
    }

    /// Overwrite a block's data without re-mining. This deliberately leaves
    /// the chain invalid until [`Chain::repair`] runs.
    pub fn set_block_data(&mut self, position: usize, data: impl Into<String>) -> Result<()> {
        let size = self.blocks.len();
        let block = self
            .blocks
            .get_mut(position)
            .ok_or(LedgerError::BlockOutOfRange { position, size })?;
        block.set_data(data);
        warn!(position, "block data overwritten");
        Ok(())
    }

    fn check_next_index(&self, block: &Block) -> Result<()> {
        let expected = self.blocks.len() as u64;
        if block.index() != expected {
            return Err(LedgerError::IndexMismatch {
                expected,
                found: block.index(),
            });
        }
        Ok(())
    }

    fn next_previous_hash(&self) -> String {
        if self.blocks.is_empty() {
            GENESIS_PREVIOUS_HASH.to_string()
        } else {
            self.tip_hash.clone()
        }
    }

    fn commit(&mut self, block: Block, hash: String) {
        info!(index = block.index(), hash = %hash, "block appended");
        self.tip_hash = hash;
        self.blocks.push(block);
    }
}
