use crate::constants::{GENESIS_PREVIOUS_HASH, INITIAL_NONCE, MAX_DIFFICULTY};
use crate::error::{LedgerError, Result};
use crate::hashing::{meets_difficulty, sha256_hex};
use crate::pow;
use chrono::{Local, NaiveDateTime, Timelike};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const NANOS_PER_MILLI: u32 = 1_000_000;

/// Wall-clock creation time of a block.
///
/// Its canonical text form (`2024-03-01 09:15:02.5`) is part of the hash
/// input, so `Display` must stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Current local time, truncated to milliseconds.
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        let millis = now.nanosecond() / NANOS_PER_MILLI * NANOS_PER_MILLI;
        Self(now.with_nanosecond(millis).unwrap_or(now))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction = format!("{:09}", self.0.nanosecond());
        let fraction = fraction.trim_end_matches('0');
        write!(
            f,
            "{}.{}",
            self.0.format("%Y-%m-%d %H:%M:%S"),
            if fraction.is_empty() { "0" } else { fraction }
        )
    }
}

impl FromStr for Timestamp {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_PARSE_FORMAT)
            .map(Self)
            .map_err(|e| LedgerError::InvalidTimestamp(format!("{s:?}: {e}")))
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Timestamp {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Number of leading hex `'0'` characters a block hash must have.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "i64")]
pub struct Difficulty(u32);

impl Difficulty {
    pub const ZERO: Difficulty = Difficulty(0);

    pub fn new(value: u32) -> Result<Self> {
        if value > MAX_DIFFICULTY {
            return Err(LedgerError::InvalidDifficulty {
                difficulty: i64::from(value),
                max: MAX_DIFFICULTY,
            });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = LedgerError;

    fn try_from(value: i64) -> Result<Self> {
        match u32::try_from(value) {
            Ok(v) if v <= MAX_DIFFICULTY => Ok(Self(v)),
            _ => Err(LedgerError::InvalidDifficulty {
                difficulty: value,
                max: MAX_DIFFICULTY,
            }),
        }
    }
}

impl From<Difficulty> for u32 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ledger entry plus its linkage and proof-of-work fields.
///
/// The block hash is never stored; [`Block::content_hash`] derives it from
/// the fields every time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: Timestamp,
    data: String,
    previous_hash: String,
    #[serde(with = "nonce_decimal")]
    nonce: BigUint,
    difficulty: Difficulty,
}

impl Block {
    pub fn new(index: u64, timestamp: Timestamp, data: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            index,
            timestamp,
            data: data.into(),
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            nonce: BigUint::from(INITIAL_NONCE),
            difficulty,
        }
    }

    /// A block stamped with the current time.
    pub fn with_current_time(index: u64, data: impl Into<String>, difficulty: Difficulty) -> Self {
        Self::new(index, Timestamp::now(), data, difficulty)
    }

    /// Hash preimage: every field rendered as text and concatenated without
    /// separators, in the order index, timestamp, data, previous hash,
    /// nonce, difficulty.
    pub fn hash_input(&self) -> String {
        format!(
            "{}{}{}{}{}{}",
            self.index, self.timestamp, self.data, self.previous_hash, self.nonce, self.difficulty
        )
    }

    /// SHA-256 of [`Block::hash_input`] as lowercase hex. Pure.
    pub fn content_hash(&self) -> String {
        sha256_hex(&self.hash_input())
    }

    /// Whether the hash for the current nonce meets this block's difficulty.
    pub fn meets_target(&self) -> bool {
        meets_difficulty(&self.content_hash(), self.difficulty.get())
    }

    /// Proof of work: bump the nonce until the hash meets the difficulty and
    /// return that hash. Unbounded; returns at once if the current nonce
    /// already satisfies the target.
    pub fn mine_to_target(&mut self) -> String {
        pow::mine(self)
    }

    /// Like [`Block::mine_to_target`] but gives up once `cancel` is set.
    pub fn mine_until(&mut self, cancel: &AtomicBool) -> Result<String> {
        pow::mine_until(self, cancel)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> &BigUint {
        &self.nonce
    }

    pub fn nonce_decimal(&self) -> String {
        self.nonce.to_string()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub(crate) fn increment_nonce(&mut self) {
        self.nonce += 1u32;
    }

    pub(crate) fn set_previous_hash(&mut self, previous_hash: impl Into<String>) {
        self.previous_hash = previous_hash.into();
    }

    pub(crate) fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }
}

/// Build a block from untrusted input, rejecting a negative or oversized
/// difficulty instead of clamping it.
pub fn new_block(index: u64, timestamp: Timestamp, data: impl Into<String>, difficulty: i64) -> Result<Block> {
    let difficulty = Difficulty::try_from(difficulty)?;
    Ok(Block::new(index, timestamp, data, difficulty))
}

mod nonce_decimal {
    use num_bigint::BigUint;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(nonce: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(nonce)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse::<BigUint>()
            .map_err(|e| D::Error::custom(format!("invalid nonce {text:?}: {e}")))
    }
}
