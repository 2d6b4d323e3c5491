//! SHA-256 helpers shared by blocks, mining and the chain.

use crate::constants::HASH_RATE_PLAINTEXT;
use crate::error::{LedgerError, Result};
use sha2::{Digest, Sha256};
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::debug;

// FIPS 180-2 test vector for "abc".
const SELF_TEST_INPUT: &str = "abc";
const SELF_TEST_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

/// SHA-256 of the UTF-8 bytes of `input`, as lowercase hex.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Number of leading `'0'` characters in a hex digest.
pub fn leading_hex_zeros(hash: &str) -> usize {
    hash.bytes().take_while(|b| *b == b'0').count()
}

/// True when the first `difficulty` characters of `hash` are all `'0'`.
///
/// A hash shorter than `difficulty` never satisfies it.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let wanted = difficulty as usize;
    hash.len() >= wanted && hash.as_bytes()[..wanted].iter().all(|b| *b == b'0')
}

/// Known-answer self test for the hash primitive. Run once at start-up.
pub fn ensure_available() -> Result<()> {
    if sha256_hex(SELF_TEST_INPUT) == SELF_TEST_DIGEST {
        Ok(())
    } else {
        Err(LedgerError::HashingUnavailable)
    }
}

/// Count SHA-256 digests of a fixed 8 character plaintext computed in `window`.
pub fn hash_rate(window: Duration) -> u64 {
    let input = HASH_RATE_PLAINTEXT.as_bytes();
    let start = Instant::now();
    let mut count = 0u64;
    while start.elapsed() < window {
        black_box(Sha256::digest(black_box(input)));
        count += 1;
    }
    debug!(count, window_ms = window.as_millis() as u64, "hash rate probe finished");
    count
}
