//! Thread-safe handle around a [`Chain`].
//!
//! Every mutation holds the write lock for its whole run, so readers observe
//! a chain either before or after an append, repair or corruption, never in
//! between.

use crate::block::{Block, Difficulty};
use crate::chain::{Chain, ValidationReport};
use crate::error::{LedgerError, Result};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
pub struct SharedChain {
    inner: Arc<RwLock<Chain>>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Chain>> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Chain>> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    pub fn append(&self, block: Block) -> Result<()> {
        self.write()?.append(block)
    }

    /// Assign the next index under the lock and append. Returns a copy of
    /// the appended block.
    pub fn append_data(&self, data: impl Into<String>, difficulty: Difficulty) -> Result<Block> {
        let mut chain = self.write()?;
        chain.push_data(data, difficulty).cloned()
    }

    pub fn repair(&self) -> Result<usize> {
        Ok(self.write()?.repair())
    }

    pub fn set_block_data(&self, position: usize, data: impl Into<String>) -> Result<()> {
        self.write()?.set_block_data(position, data)
    }

    pub fn size(&self) -> Result<usize> {
        Ok(self.read()?.size())
    }

    pub fn latest(&self) -> Result<Block> {
        self.read()?.latest().cloned()
    }

    pub fn tip_hash(&self) -> Result<String> {
        Ok(self.read()?.tip_hash().to_string())
    }

    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.read()?.is_valid())
    }

    pub fn validate(&self) -> Result<ValidationReport> {
        Ok(self.read()?.validate())
    }

    /// A consistent copy of the whole chain.
    pub fn snapshot(&self) -> Result<Chain> {
        Ok(self.read()?.clone())
    }
}

impl From<Chain> for SharedChain {
    fn from(chain: Chain) -> Self {
        Self::new(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChainConfig;
    use std::thread;

    #[test]
    fn concurrent_appends_stay_linked() {
        let shared = SharedChain::new(Chain::with_genesis(&ChainConfig::default()).unwrap());
        let difficulty = Difficulty::new(1).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for n in 0..5 {
                        shared
                            .append_data(format!("worker {worker} tx {n}"), difficulty)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.size().unwrap(), 21);
        assert!(shared.is_valid().unwrap());
        let snapshot = shared.snapshot().unwrap();
        for (position, block) in snapshot.blocks().iter().enumerate() {
            assert_eq!(block.index(), position as u64);
        }
    }

    #[test]
    fn readers_see_whole_appends() {
        let shared = SharedChain::default();
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    shared.append_data("tx", Difficulty::new(2).unwrap()).unwrap();
                }
            })
        };
        for _ in 0..50 {
            let snapshot = shared.snapshot().unwrap();
            assert!(snapshot.is_valid());
            if let Ok(latest) = snapshot.latest() {
                assert_eq!(latest.index() as usize, snapshot.size() - 1);
            }
        }
        writer.join().unwrap();
        assert_eq!(shared.size().unwrap(), 10);
    }

    #[test]
    fn corruption_and_repair_through_the_handle() {
        let shared: SharedChain = Chain::with_genesis(&ChainConfig::default()).unwrap().into();
        shared.append_data("Alice pays Bob 10", Difficulty::new(2).unwrap()).unwrap();
        shared.set_block_data(1, "Eve pays Bob 1000").unwrap();
        assert!(!shared.is_valid().unwrap());
        shared.repair().unwrap();
        assert!(shared.is_valid().unwrap());
        assert_eq!(shared.latest().unwrap().data(), "Eve pays Bob 1000");
    }

    #[test]
    fn empty_handle_reports_empty_chain() {
        let shared = SharedChain::default();
        assert_eq!(shared.latest().unwrap_err(), LedgerError::EmptyChain);
        assert_eq!(shared.tip_hash().unwrap(), "");
    }
}
