pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const MAX_DIFFICULTY: u32 = HASH_HEX_SIZE as u32;
pub const DEFAULT_GENESIS_DIFFICULTY: u32 = 2;
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const INITIAL_NONCE: u32 = 1;
pub const HASH_RATE_PLAINTEXT: &str = "00000000";
