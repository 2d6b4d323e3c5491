use crate::error::{LedgerError, Result};
use crate::hashing::meets_difficulty;
use crate::Block;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Mine the block by incrementing its nonce until the hex hash has at least
/// `difficulty` leading zeros. Blocks the caller until it succeeds.
pub fn mine(block: &mut Block) -> String {
    let target = block.difficulty().get();
    let mut attempts = 1u64;
    loop {
        let hash = block.content_hash();
        if meets_difficulty(&hash, target) {
            info!(
                "Mined block {} with nonce {} after {} attempts: {}",
                block.index(),
                block.nonce(),
                attempts,
                hash
            );
            return hash;
        }
        block.increment_nonce();
        attempts = attempts.saturating_add(1);
    }
}

/// Same search as [`mine`], checking `cancel` before every attempt.
///
/// On cancellation the nonce is left wherever the search stopped.
pub fn mine_until(block: &mut Block, cancel: &AtomicBool) -> Result<String> {
    let target = block.difficulty().get();
    loop {
        if cancel.load(Ordering::Relaxed) {
            warn!("mining of block {} cancelled at nonce {}", block.index(), block.nonce());
            return Err(LedgerError::MiningCancelled { index: block.index() });
        }
        let hash = block.content_hash();
        if meets_difficulty(&hash, target) {
            info!("Mined block {} with nonce {}: {}", block.index(), block.nonce(), hash);
            return Ok(hash);
        }
        block.increment_nonce();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, Timestamp};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn block(difficulty: u32) -> Block {
        Block::new(1, Timestamp::now(), "pow", Difficulty::new(difficulty).unwrap())
    }

    #[test]
    fn mine_example() {
        let mut b = block(3);
        let hash = mine(&mut b);
        assert!(hash.starts_with("000"));
    }

    #[test]
    fn two_independent_mines_meet_the_same_target() {
        let ts = Timestamp::now();
        let mut a = Block::new(4, ts, "same", Difficulty::new(2).unwrap());
        let mut b = a.clone();
        let ha = mine(&mut a);

        // Start the second search past the first one's answer.
        while b.nonce() <= a.nonce() {
            b.increment_nonce();
        }
        let hb = mine(&mut b);

        assert_ne!(a.nonce(), b.nonce());
        assert_ne!(ha, hb);
        assert!(meets_difficulty(&ha, 2));
        assert!(meets_difficulty(&hb, 2));
    }

    #[test]
    fn mine_until_returns_when_not_cancelled() {
        let cancel = AtomicBool::new(false);
        let mut b = block(2);
        let hash = mine_until(&mut b, &cancel).unwrap();
        assert_eq!(hash, b.content_hash());
    }

    #[test]
    fn mine_until_honours_preset_flag() {
        let cancel = AtomicBool::new(true);
        let mut b = block(0);
        assert_eq!(
            mine_until(&mut b, &cancel),
            Err(LedgerError::MiningCancelled { index: 1 })
        );
    }

    #[test]
    fn mine_until_can_be_interrupted_from_another_thread() {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        // 64 hex zeros will not be found before the flag flips.
        let worker = thread::spawn(move || {
            let mut b = block(64);
            mine_until(&mut b, &flag)
        });
        thread::sleep(Duration::from_millis(50));
        cancel.store(true, Ordering::Relaxed);
        let result = worker.join().unwrap();
        assert!(matches!(result, Err(LedgerError::MiningCancelled { .. })));
    }
}
