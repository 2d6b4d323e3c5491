use crate::block::Difficulty;
use crate::constants::DEFAULT_GENESIS_DIFFICULTY;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How a new chain seeds its genesis block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub genesis_difficulty: Difficulty,
    pub genesis_data: String,
}

impl ChainConfig {
    pub fn new(genesis_difficulty: u32, genesis_data: impl Into<String>) -> Result<Self> {
        Ok(Self {
            genesis_difficulty: Difficulty::new(genesis_difficulty)?,
            genesis_data: genesis_data.into(),
        })
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            genesis_difficulty: Difficulty::new(DEFAULT_GENESIS_DIFFICULTY)
                .unwrap_or(Difficulty::ZERO),
            genesis_data: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChainConfig::default();
        assert_eq!(config.genesis_difficulty.get(), 2);
        assert!(config.genesis_data.is_empty());
    }

    #[test]
    fn config_rejects_out_of_range_difficulty() {
        assert!(ChainConfig::new(65, "").is_err());
        assert_eq!(ChainConfig::new(3, "hello").unwrap().genesis_data, "hello");
    }

    #[test]
    fn config_from_partial_json() {
        let config: ChainConfig = serde_json::from_str(r#"{"genesis_difficulty":1}"#).unwrap();
        assert_eq!(config.genesis_difficulty.get(), 1);
        assert_eq!(config.genesis_data, "");
    }
}
