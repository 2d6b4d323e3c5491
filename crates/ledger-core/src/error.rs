use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("chain is empty")]
    EmptyChain,

    #[error("invalid difficulty {difficulty}: must be between 0 and {max}")]
    InvalidDifficulty { difficulty: i64, max: u32 },

    #[error("SHA-256 is unavailable in this runtime")]
    HashingUnavailable,

    #[error("block {position} is out of range for a chain of {size} blocks")]
    BlockOutOfRange { position: usize, size: usize },

    #[error("block index {found} does not match the next chain position {expected}")]
    IndexMismatch { expected: u64, found: u64 },

    #[error("mining of block {index} was cancelled")]
    MiningCancelled { index: u64 },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("chain lock poisoned by a panicked writer")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
