//! Hash-linked proof-of-work ledger.
//!
//! A [`Chain`] owns an ordered list of [`Block`]s. Each block hashes its own
//! fields with SHA-256 and is mined until the lowercase hex digest starts
//! with `difficulty` zeros; each block records the hash of its predecessor.

pub mod block;
pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod hashing;
pub mod pow;
pub mod shared;

pub use block::{new_block, Block, Difficulty, Timestamp};
pub use chain::{Chain, Fault, ValidationReport};
pub use config::ChainConfig;
pub use error::{LedgerError, Result};
pub use shared::SharedChain;
